//! In-memory activity store, used by tests and local runs without a database.
//!
//! Nothing here is durable. Mutations take a write lock, so each one is atomic
//! within the process, which matches the single-document guarantees of MongoDB.

use rocket::tokio::sync::RwLock;

use super::ActivityStore;
use crate::error::Result;
use crate::model::activity::Activity;

#[derive(Debug, Default)]
pub struct MemoryActivityStore {
    activities: RwLock<Vec<Activity>>,
}

impl MemoryActivityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[rocket::async_trait]
impl ActivityStore for MemoryActivityStore {
    async fn all(&self) -> Result<Vec<Activity>> {
        Ok(self.activities.read().await.clone())
    }

    async fn find(&self, name: &str) -> Result<Option<Activity>> {
        let activities = self.activities.read().await;
        Ok(activities.iter().find(|a| a.name == name).cloned())
    }

    async fn add_participant(&self, name: &str, email: &str) -> Result<bool> {
        let mut activities = self.activities.write().await;
        match activities.iter_mut().find(|a| a.name == name) {
            Some(activity) if !activity.has_participant(email) => {
                activity.participants.push(email.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn remove_participant(&self, name: &str, email: &str) -> Result<bool> {
        let mut activities = self.activities.write().await;
        let Some(activity) = activities.iter_mut().find(|a| a.name == name) else {
            return Ok(false);
        };
        let before = activity.participants.len();
        activity.participants.retain(|p| p != email);
        Ok(activity.participants.len() != before)
    }

    async fn replace_all(&self, activities: Vec<Activity>) -> Result<()> {
        *self.activities.write().await = activities;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::activity::{reset_to_seed, seed_activities};

    async fn seeded() -> MemoryActivityStore {
        let store = MemoryActivityStore::new();
        reset_to_seed(&store).await.unwrap();
        store
    }

    #[rocket::async_test]
    async fn starts_empty() {
        let store = MemoryActivityStore::new();
        assert!(store.all().await.unwrap().is_empty());
        assert!(store.find("Chess Club").await.unwrap().is_none());
    }

    #[rocket::async_test]
    async fn add_is_conditional() {
        let store = seeded().await;
        assert!(store
            .add_participant("Chess Club", "new@mergington.edu")
            .await
            .unwrap());
        assert!(!store
            .add_participant("Chess Club", "new@mergington.edu")
            .await
            .unwrap());
        assert!(!store
            .add_participant("Unknown Club", "new@mergington.edu")
            .await
            .unwrap());

        let chess = store.find("Chess Club").await.unwrap().unwrap();
        assert_eq!(
            chess.participants,
            vec![
                "michael@mergington.edu",
                "daniel@mergington.edu",
                "new@mergington.edu"
            ]
        );
    }

    #[rocket::async_test]
    async fn remove_reports_modification() {
        let store = seeded().await;
        assert!(store
            .remove_participant("Art Club", "noah@mergington.edu")
            .await
            .unwrap());
        assert!(!store
            .remove_participant("Art Club", "noah@mergington.edu")
            .await
            .unwrap());
        assert!(!store
            .remove_participant("Unknown Club", "noah@mergington.edu")
            .await
            .unwrap());

        let art = store.find("Art Club").await.unwrap().unwrap();
        assert_eq!(art.participants, vec!["isabella@mergington.edu"]);
    }

    #[rocket::async_test]
    async fn reset_discards_changes() {
        let store = seeded().await;
        store
            .add_participant("Mathletes", "x@mergington.edu")
            .await
            .unwrap();
        store
            .remove_participant("Gym Class", "john@mergington.edu")
            .await
            .unwrap();

        reset_to_seed(&store).await.unwrap();
        assert_eq!(store.all().await.unwrap(), seed_activities());
    }
}
