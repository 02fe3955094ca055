use mongodb::{bson::doc, Database};
use rocket::futures::TryStreamExt;

use super::collection::Coll;
use crate::error::Result;
use crate::model::{activity::Activity, store::ActivityStore};

/// Activity store backed by the `activities` collection, with the activity name as `_id`.
pub struct MongoActivityStore {
    activities: Coll<Activity>,
}

impl MongoActivityStore {
    pub fn new(db: &Database) -> Self {
        Self {
            activities: Coll::from_db(db),
        }
    }
}

#[rocket::async_trait]
impl ActivityStore for MongoActivityStore {
    async fn all(&self) -> Result<Vec<Activity>> {
        let activities: Vec<Activity> = self
            .activities
            .find(None, None)
            .await?
            .try_collect()
            .await?;
        Ok(activities)
    }

    async fn find(&self, name: &str) -> Result<Option<Activity>> {
        Ok(self.activities.find_one(doc! { "_id": name }, None).await?)
    }

    async fn add_participant(&self, name: &str, email: &str) -> Result<bool> {
        // Only match if the email is absent, so concurrent signups cannot push it twice.
        let filter = doc! {
            "_id": name,
            "participants": { "$ne": email },
        };
        let update = doc! {
            "$push": { "participants": email },
        };
        let result = self.activities.update_one(filter, update, None).await?;
        Ok(result.modified_count > 0)
    }

    async fn remove_participant(&self, name: &str, email: &str) -> Result<bool> {
        let update = doc! {
            "$pull": { "participants": email },
        };
        let result = self
            .activities
            .update_one(doc! { "_id": name }, update, None)
            .await?;
        Ok(result.modified_count > 0)
    }

    async fn replace_all(&self, activities: Vec<Activity>) -> Result<()> {
        let deleted = self.activities.delete_many(doc! {}, None).await?;
        debug!("Deleted {} activities", deleted.deleted_count);
        if activities.is_empty() {
            return Ok(());
        }
        let inserted = self.activities.insert_many(activities, None).await?;
        debug!("Inserted {} activities", inserted.inserted_ids.len());
        Ok(())
    }
}
