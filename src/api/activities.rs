use rocket::{serde::json::Json, Route};

use crate::error::{Error, Result};
use crate::model::{
    api::{ActivityListing, Message},
    store::Roster,
};

pub fn routes() -> Vec<Route> {
    routes![list_activities, signup, unregister]
}

#[get("/activities")]
async fn list_activities(roster: Roster) -> Result<Json<ActivityListing>> {
    let activities = roster.all().await?;
    Ok(Json(activities.into()))
}

// A missing query parameter would otherwise forward the request and surface as a 404.
fn required_email(email: Option<&str>) -> Result<&str> {
    email.ok_or_else(|| Error::unprocessable("Missing required query parameter: email"))
}

// The existence/membership check and the update are separate round trips.
// The store's conditional push stops a racing duplicate from being appended;
// the losing request sees no modification and is reported as an internal error.
#[post("/activities/<activity_name>/signup?<email>")]
async fn signup(
    activity_name: &str,
    email: Option<&str>,
    roster: Roster,
) -> Result<Json<Message>> {
    let email = required_email(email)?;
    let activity = roster
        .find(activity_name)
        .await?
        .ok_or_else(|| Error::not_found("Activity not found"))?;

    if activity.has_participant(email) {
        return Err(Error::conflict("Already signed up for this activity"));
    }

    if !roster.add_participant(activity_name, email).await? {
        warn!("Signup of {email} for {activity_name} passed checks but changed nothing");
        return Err(Error::internal("Failed to sign up for activity"));
    }

    info!("Signed up {email} for {activity_name}");
    Ok(Json(Message::signed_up(email, activity_name)))
}

#[post("/activities/<activity_name>/unregister?<email>")]
async fn unregister(
    activity_name: &str,
    email: Option<&str>,
    roster: Roster,
) -> Result<Json<Message>> {
    let email = required_email(email)?;
    let activity = roster
        .find(activity_name)
        .await?
        .ok_or_else(|| Error::not_found("Activity not found"))?;

    if !activity.has_participant(email) {
        return Err(Error::not_found("Participant not found in this activity"));
    }

    if !roster.remove_participant(activity_name, email).await? {
        warn!("Removal of {email} from {activity_name} passed checks but changed nothing");
        return Err(Error::internal("Failed to remove participant"));
    }

    info!("Removed {email} from {activity_name}");
    Ok(Json(Message::removed(email, activity_name)))
}
