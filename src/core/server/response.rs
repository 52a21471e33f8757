//! Response body type and the few responses the site builds itself.

use bytes::Bytes;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty};
use hyper::header::{self, HeaderValue};
use hyper::{Response, StatusCode};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Streamed file bodies and empty site responses share one boxed body type.
pub type Body = UnsyncBoxBody<Bytes, BoxError>;

pub fn empty_body() -> Body {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn empty(status: StatusCode) -> Response<Body> {
    let mut resp = Response::new(empty_body());
    *resp.status_mut() = status;
    resp
}

pub fn redirect(status: StatusCode, location: &'static str) -> Response<Body> {
    let mut resp = empty(status);
    resp.headers_mut()
        .insert(header::LOCATION, HeaderValue::from_static(location));
    resp
}
