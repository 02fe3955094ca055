mod collection;
mod store;

pub use collection::{Coll, MongoCollection};
pub use store::MongoActivityStore;
