use mongodb::error::Error as DbError;
use rocket::{
    http::Status,
    response::{self, status::Custom, Responder},
    serde::json::Json,
    Catcher, Request,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::RequestId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unprocessable: {0}")]
    Unprocessable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self::Unprocessable(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// The HTTP status this error is reported with.
    pub fn status(&self) -> Status {
        match self {
            Self::NotFound(_) => Status::NotFound,
            // Duplicate signups are reported as a bad request, not 409.
            Self::Conflict(_) => Status::BadRequest,
            Self::Unprocessable(_) => Status::UnprocessableEntity,
            Self::Internal(_) | Self::Db(_) => Status::InternalServerError,
        }
    }

    /// The message shown to the caller. Database errors are not echoed back.
    pub fn detail(&self) -> String {
        match self {
            Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::Unprocessable(msg)
            | Self::Internal(msg) => msg.clone(),
            Self::Db(_) => "Database error".to_string(),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let id = RequestId::of(req);
        if let Self::Db(ref err) = self {
            error!("req{id} database failure: {err}");
        } else {
            debug!("req{id} failed: {self}");
        }
        let body = ErrorBody {
            detail: self.detail(),
        };
        Custom(self.status(), Json(body)).respond_to(req)
    }
}

/// Render errors that never reached a handler (unknown routes, failed guards)
/// in the same JSON shape as handler errors.
#[catch(default)]
fn json_catcher(status: Status, _req: &Request<'_>) -> Custom<Json<ErrorBody>> {
    let detail = status.reason().unwrap_or("Unknown error").to_string();
    Custom(status, Json(ErrorBody { detail }))
}

pub fn catchers() -> Vec<Catcher> {
    catchers![json_catcher]
}

#[cfg(test)]
mod tests {
    use std::io;

    use rocket::local::asynchronous::Client;

    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(Error::not_found("x").status(), Status::NotFound);
        assert_eq!(Error::conflict("x").status(), Status::BadRequest);
        assert_eq!(
            Error::unprocessable("x").status(),
            Status::UnprocessableEntity
        );
        assert_eq!(Error::internal("x").status(), Status::InternalServerError);
    }

    #[test]
    fn detail_is_the_bare_message() {
        let err = Error::not_found("Activity not found");
        assert_eq!(err.detail(), "Activity not found");
        assert_eq!(err.to_string(), "Not found: Activity not found");
    }

    #[test]
    fn database_errors_are_not_echoed() {
        let err = Error::from(DbError::from(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "connection refused by 10.0.0.7",
        )));
        assert_eq!(err.status(), Status::InternalServerError);
        assert_eq!(err.detail(), "Database error");
    }

    #[rocket::async_test]
    async fn catcher_renders_json() {
        let rocket = rocket::build().register("/", catchers());
        let client = Client::tracked(rocket).await.unwrap();

        let response = client.get("/nowhere").dispatch().await;
        assert_eq!(Status::NotFound, response.status());
        let body = response.into_json::<ErrorBody>().await.unwrap();
        assert_eq!(body.detail, "Not Found");
    }
}
