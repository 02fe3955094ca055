use rocket::{response::Redirect, Route};

/// Where the front-end entry point is served from; see `AssetsFairing`.
pub const INDEX_PAGE: &str = "/static/index.html";

pub fn routes() -> Vec<Route> {
    routes![index]
}

#[get("/")]
fn index() -> Redirect {
    Redirect::temporary(INDEX_PAGE)
}
