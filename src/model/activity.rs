use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::store::ActivityStore;

/// Everything about an activity except its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCore {
    pub description: String,
    pub schedule: String,
    /// Advisory only; signups are never rejected for capacity.
    pub max_participants: u32,
    /// Participant emails, in signup order.
    pub participants: Vec<String>,
}

impl ActivityCore {
    /// Is the given email on this activity's roster?
    pub fn has_participant(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p == email)
    }
}

/// An activity as stored in the database, keyed by its unique name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "_id")]
    pub name: String,
    #[serde(flatten)]
    pub activity: ActivityCore,
}

impl Activity {
    pub fn new(name: impl Into<String>, activity: ActivityCore) -> Self {
        Self {
            name: name.into(),
            activity,
        }
    }
}

impl Deref for Activity {
    type Target = ActivityCore;

    fn deref(&self) -> &Self::Target {
        &self.activity
    }
}

impl DerefMut for Activity {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.activity
    }
}

/// (name, description, schedule, max participants, participants)
type SeedEntry = (&'static str, &'static str, &'static str, u32, [&'static str; 2]);

#[rustfmt::skip]
const SEED: &[SeedEntry] = &[
    ("Chess Club", "Learn strategies and compete in chess tournaments",
        "Fridays, 3:30 PM - 5:00 PM", 12,
        ["michael@mergington.edu", "daniel@mergington.edu"]),
    ("Programming Class", "Learn programming fundamentals and build software projects",
        "Tuesdays and Thursdays, 3:30 PM - 4:30 PM", 20,
        ["emma@mergington.edu", "sophia@mergington.edu"]),
    ("Gym Class", "Physical education and sports activities",
        "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM", 30,
        ["john@mergington.edu", "olivia@mergington.edu"]),
    ("Soccer Team", "Join the school soccer team and compete in local leagues",
        "Tuesdays and Thursdays, 4:00 PM - 5:30 PM", 18,
        ["lucas@mergington.edu", "mia@mergington.edu"]),
    ("Basketball Club", "Practice basketball skills and play friendly matches",
        "Wednesdays, 3:30 PM - 5:00 PM", 15,
        ["liam@mergington.edu", "ava@mergington.edu"]),
    ("Art Club", "Explore painting, drawing, and other visual arts",
        "Mondays, 3:30 PM - 5:00 PM", 16,
        ["noah@mergington.edu", "isabella@mergington.edu"]),
    ("Drama Society", "Participate in theater productions and acting workshops",
        "Thursdays, 4:00 PM - 5:30 PM", 20,
        ["amelia@mergington.edu", "benjamin@mergington.edu"]),
    ("Mathletes", "Compete in math competitions and solve challenging problems",
        "Fridays, 2:30 PM - 3:30 PM", 10,
        ["charlotte@mergington.edu", "jackson@mergington.edu"]),
    ("Science Club", "Conduct experiments and explore scientific concepts",
        "Wednesdays, 4:00 PM - 5:00 PM", 14,
        ["elijah@mergington.edu", "harper@mergington.edu"]),
];

/// The fixed set of activities the roster starts from.
pub fn seed_activities() -> Vec<Activity> {
    SEED.iter()
        .map(|(name, description, schedule, max_participants, participants)| {
            Activity::new(
                *name,
                ActivityCore {
                    description: description.to_string(),
                    schedule: schedule.to_string(),
                    max_participants: *max_participants,
                    participants: participants.iter().map(|p| p.to_string()).collect(),
                },
            )
        })
        .collect()
}

/// Wipe every activity in the store and reload the seed list.
///
/// This is destructive: any signups or removals made since the last reset are lost.
pub async fn reset_to_seed(store: &dyn ActivityStore) -> Result<()> {
    let activities = seed_activities();
    info!("Resetting roster to {} seed activities", activities.len());
    store.replace_all(activities).await
}
