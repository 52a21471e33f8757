//! Site request handling: entry-page redirect, content-type overrides and CORS headers
//! around the generic static file service.

use std::net::SocketAddr;
use std::path::PathBuf;

use http_body_util::BodyExt;
use hyper::header::{self, HeaderMap, HeaderName, HeaderValue};
use hyper::{Method, Request, Response, StatusCode};
use tower::ServiceExt;
use tower_http::services::ServeDir;

use super::mime::content_type_override;
use super::response::{self, Body, BoxError};

/// Canonical entry page that the site root redirects to.
pub const ENTRY_PAGE: &str = "/pages/index.html";

const REDIRECT_PATHS: &[&str] = &["/", "/index.html"];

/// Cross-origin headers added to every response.
pub const CORS_HEADERS: [(HeaderName, &str); 3] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
];

/// Wraps [`ServeDir`] with the site's redirect, content-type and CORS rules.
///
/// Path decoding, traversal rejection, index files, directory redirects, conditional
/// requests and not-found handling all come from `ServeDir`.
pub struct SiteHandler {
    files: ServeDir,
}

impl SiteHandler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            files: ServeDir::new(root.into()),
        }
    }

    pub async fn handle<B>(&self, req: Request<B>) -> Response<Body>
    where
        B: Send + 'static,
    {
        let mut resp = if is_entry_redirect(&req) {
            response::redirect(StatusCode::FOUND, ENTRY_PAGE)
        } else if req.method() == Method::OPTIONS {
            response::empty(StatusCode::NO_CONTENT)
        } else {
            self.serve_static(req).await
        };
        add_cors(resp.headers_mut());
        resp
    }

    async fn serve_static<B>(&self, req: Request<B>) -> Response<Body>
    where
        B: Send + 'static,
    {
        let content_type = content_type_override(req.uri().path());
        let resp = match self.files.clone().oneshot(req).await {
            Ok(resp) => resp,
            Err(never) => match never {},
        };
        let mut resp = resp.map(|body| {
            body.map_err(|e| -> BoxError { e.into() })
                .boxed_unsync()
        });

        if let Some(content_type) = content_type
            && matches!(resp.status(), StatusCode::OK | StatusCode::PARTIAL_CONTENT)
        {
            resp.headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        resp
    }
}

fn is_entry_redirect<B>(req: &Request<B>) -> bool {
    req.method() == Method::GET && REDIRECT_PATHS.contains(&req.uri().path())
}

fn add_cors(headers: &mut HeaderMap) {
    for (name, value) in CORS_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
}

/// Request line as it appears in the access log: `GET /path HTTP/1.1`.
pub fn request_line<B>(req: &Request<B>) -> String {
    format!("{} {} {:?}", req.method(), req.uri(), req.version())
}

/// One access-log line: `[client] "GET /path HTTP/1.1" 200 1234`.
pub fn access_line(peer: SocketAddr, request_line: &str, resp: &Response<Body>) -> String {
    let size = resp
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    format!(
        "[{}] \"{}\" {} {}",
        peer.ip(),
        request_line,
        resp.status().as_u16(),
        size
    )
}
