use rocket::{
    fairing::{Fairing, Info, Kind},
    http::StatusClass,
    Data, Orbit, Request, Response, Rocket,
};
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// A unique identifier for a particular request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct RequestId(pub usize);

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl RequestId {
    /// Atomically get the next ID. Wraps around on overflow.
    pub fn next() -> RequestId {
        static REQUEST_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);
        RequestId(REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The ID assigned to this request, allocating one on first use.
    pub fn of(req: &Request<'_>) -> RequestId {
        *req.local_cache(RequestId::next)
    }
}

/// When the request arrived.
#[derive(Debug, Copy, Clone)]
struct Received(Instant);

impl Received {
    fn now() -> Self {
        Self(Instant::now())
    }

    fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

/// Describe the route a request was matched to.
fn route_name(req: &Request<'_>) -> String {
    match req.route() {
        Some(r) => match r.name {
            Some(ref name) => format!("{name} ({})", r.uri),
            None => r.uri.to_string(),
        },
        None => "UNKNOWN ROUTE".to_string(),
    }
}

/// A rocket fairing that logs every request and response, with how long the response took.
#[derive(Debug, Copy, Clone)]
pub struct LoggerFairing;

#[rocket::async_trait]
impl Fairing for LoggerFairing {
    fn info(&self) -> Info {
        Info {
            name: "Logger",
            kind: Kind::Liftoff | Kind::Request | Kind::Response | Kind::Shutdown,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let protocol = if rocket.config().tls_enabled() {
            "https"
        } else {
            "http"
        };
        let ip = &rocket.config().address;
        let port = &rocket.config().port;
        info!("Roster server launched on {protocol}://{ip}:{port}");
    }

    async fn on_request(&self, req: &mut Request<'_>, _data: &mut Data<'_>) {
        req.local_cache(Received::now);
        let id = RequestId::of(req);
        info!("->req{id} {} {}", req.method(), req.uri());
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        let id = RequestId::of(req);
        let elapsed = req.local_cache(Received::now).elapsed();
        let code = res.status();
        let log_msg = format!(
            "<-rsp{id} {code} {} in {}ms",
            route_name(req),
            elapsed.as_millis()
        );
        match code.class() {
            StatusClass::ServerError => error!("{log_msg}"),
            StatusClass::ClientError => warn!("{log_msg}"),
            _ => info!("{log_msg}"),
        }
    }

    async fn on_shutdown(&self, _rocket: &Rocket<Orbit>) {
        warn!("Shutdown requested, stopping gracefully...");
    }
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::Status,
        local::asynchronous::Client,
        request::{FromRequest, Outcome},
    };

    use super::*;

    #[test]
    fn ids_increase() {
        let first = RequestId::next();
        let second = RequestId::next();
        assert!(second > first);
        assert_eq!(format!("{}", RequestId(7)), "7");
    }

    /// The request's ID, looked up twice.
    struct SeenIds(RequestId, RequestId);

    #[rocket::async_trait]
    impl<'r> FromRequest<'r> for SeenIds {
        type Error = ();

        async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
            Outcome::Success(SeenIds(RequestId::of(req), RequestId::of(req)))
        }
    }

    #[get("/ids")]
    fn ids(seen: SeenIds) -> String {
        format!("{} {}", seen.0, seen.1)
    }

    async fn ids_of_one_request(client: &Client) -> Vec<usize> {
        let response = client.get("/ids").dispatch().await;
        assert_eq!(Status::Ok, response.status());
        response
            .into_string()
            .await
            .unwrap()
            .split(' ')
            .map(|id| id.parse().unwrap())
            .collect()
    }

    #[rocket::async_test]
    async fn ids_are_stable_within_a_request() {
        let rocket = rocket::build()
            .mount("/", routes![ids])
            .attach(LoggerFairing);
        let client = Client::tracked(rocket).await.unwrap();

        let first = ids_of_one_request(&client).await;
        assert_eq!(first[0], first[1]);
        let second = ids_of_one_request(&client).await;
        assert_eq!(second[0], second[1]);
        assert_ne!(first[0], second[0]);
    }
}
