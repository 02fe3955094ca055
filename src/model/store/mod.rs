use std::{ops::Deref, sync::Arc};

use rocket::{
    http::Status,
    request::{self, FromRequest, Request},
};

use crate::error::Result;
use crate::model::activity::Activity;

mod memory;

pub use memory::MemoryActivityStore;

/// Persistent storage for activities.
///
/// Each operation touches at most one activity document, except
/// [`ActivityStore::replace_all`].
#[rocket::async_trait]
pub trait ActivityStore: Send + Sync {
    /// Every activity in the store.
    async fn all(&self) -> Result<Vec<Activity>>;

    /// The activity with the given name, if it exists.
    async fn find(&self, name: &str) -> Result<Option<Activity>>;

    /// Append `email` to the participants of `name`, unless it is already there.
    /// Returns true iff the activity was modified.
    async fn add_participant(&self, name: &str, email: &str) -> Result<bool>;

    /// Remove every occurrence of `email` from the participants of `name`.
    /// Returns true iff the activity was modified.
    async fn remove_participant(&self, name: &str, email: &str) -> Result<bool>;

    /// Delete all activities and insert the given ones in their place.
    async fn replace_all(&self, activities: Vec<Activity>) -> Result<()>;
}

/// Shared handle on the activity store, created once at launch and placed in managed state.
#[derive(Clone)]
pub struct Roster(Arc<dyn ActivityStore>);

impl Roster {
    pub fn new<S>(store: S) -> Self
    where
        S: ActivityStore + 'static,
    {
        Self(Arc::new(store))
    }
}

impl Deref for Roster {
    type Target = dyn ActivityStore;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Roster {
    type Error = ();

    /// Get the roster from the managed state.
    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        match req.rocket().state::<Roster>() {
            Some(roster) => request::Outcome::Success(roster.clone()),
            None => {
                error!("No activity store is managed; was the database fairing attached?");
                request::Outcome::Failure((Status::InternalServerError, ()))
            }
        }
    }
}
