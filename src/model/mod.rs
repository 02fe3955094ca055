pub mod activity;
pub mod api;
pub mod mongodb;
pub mod store;
