use rocket::Route;

mod activities;
mod public;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(public::routes());
    routes.extend(activities::routes());
    routes
}
