//! API-compatible types.
//!
//! The types in this module are what the HTTP endpoints accept and return,
//! as opposed to the stored documents in [`crate::model::activity`].

use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

use crate::model::activity::Activity;

/// All activities, serialised as a JSON object keyed by name.
///
/// Keys appear in the order the store returned them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityListing(pub Vec<Activity>);

impl From<Vec<Activity>> for ActivityListing {
    fn from(activities: Vec<Activity>) -> Self {
        Self(activities)
    }
}

impl Serialize for ActivityListing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for activity in &self.0 {
            map.serialize_entry(&activity.name, &activity.activity)?;
        }
        map.end()
    }
}

/// A human-readable confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn signed_up(email: &str, activity_name: &str) -> Self {
        Self {
            message: format!("Signed up {email} for {activity_name}"),
        }
    }

    pub fn removed(email: &str, activity_name: &str) -> Self {
        Self {
            message: format!("{email} has been removed from {activity_name}."),
        }
    }
}

#[cfg(test)]
mod tests {
    use rocket::serde::json::serde_json;

    use super::*;
    use crate::model::activity::seed_activities;

    #[test]
    fn listing_is_keyed_by_name_in_store_order() {
        let json = serde_json::to_string(&ActivityListing::from(seed_activities())).unwrap();

        let chess = json.find("\"Chess Club\"").unwrap();
        let programming = json.find("\"Programming Class\"").unwrap();
        let science = json.find("\"Science Club\"").unwrap();
        assert!(chess < programming && programming < science);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let drama = &value["Drama Society"];
        assert_eq!(drama["schedule"], "Thursdays, 4:00 PM - 5:30 PM");
        assert_eq!(drama["max_participants"], 20);
        assert!(drama.get("_id").is_none());
    }

    #[test]
    fn empty_listing() {
        let json = serde_json::to_string(&ActivityListing::from(Vec::new())).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn messages() {
        assert_eq!(
            Message::signed_up("new@mergington.edu", "Chess Club").message,
            "Signed up new@mergington.edu for Chess Club"
        );
        assert_eq!(
            Message::removed("new@mergington.edu", "Chess Club").message,
            "new@mergington.edu has been removed from Chess Club."
        );
    }
}
