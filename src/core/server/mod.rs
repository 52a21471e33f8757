//! Local development server for the site.
//!
//! Lifecycle: check the working directory, pick a port, bind, print the banner, then serve
//! one connection at a time until Ctrl+C cancels the loop. Idle connections are cut off
//! by the header read timeout so they cannot stall the loop.

mod handler;
mod mime;
mod port;
mod response;

use std::convert::Infallible;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;

use crate::core::app;

pub use handler::{CORS_HEADERS, ENTRY_PAGE, SiteHandler, access_line, request_line};
pub use port::find_available_port;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8000;
pub const MAX_PORT_ATTEMPTS: u16 = 10;

/// A connection that has not sent a complete request head by then is dropped.
pub const HEADER_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// File that must exist below the root for the server to start.
pub const ENTRY_FILE: &str = "pages/index.html";

/// Feature pages listed in the startup banner.
const FEATURE_PAGES: &[(&str, &str)] = &[
    ("Home", "/"),
    ("Subspecies comparison", "/pages/compare.html"),
    ("Quiz", "/pages/quiz.html"),
    ("Gallery", "/pages/gallery.html"),
    ("Distribution map", "/pages/map.html"),
];

const RULE: &str = "========================================";

/// Server settings, fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    /// Explicit port; `None` runs port discovery from [`DEFAULT_PORT`].
    pub port: Option<u16>,
    pub open_browser: bool,
    /// Document root; also where [`ENTRY_FILE`] is looked up.
    pub root: PathBuf,
}

impl ServerConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: None,
            open_browser: true,
            root: root.into(),
        }
    }
}

/// Startup failures. Runtime request errors never surface here.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("{} not found", .0.display())]
    MissingEntryPage(PathBuf),
    #[error("no available port in range {start}-{end}")]
    NoAvailablePort { start: u16, end: u16 },
    #[error("port {port} is already in use")]
    PortInUse { port: u16 },
    #[error("failed to start server on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
}

impl ServerError {
    /// Follow-up advice for the operator, when there is any.
    pub fn hint(&self) -> Option<String> {
        match self {
            ServerError::MissingEntryPage(_) => Some(
                "Run this command from the directory that contains the site files".to_string(),
            ),
            ServerError::PortInUse { port } => Some(format!(
                "Try a different port: {} serve --port {}",
                app::NAME,
                port.saturating_add(1)
            )),
            ServerError::NoAvailablePort { .. } => {
                Some("Pick a free port explicitly with --port".to_string())
            }
            ServerError::Bind { .. } => None,
        }
    }
}

/// Run the server until interrupted.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let entry = config.root.join(ENTRY_FILE);
    if !entry.is_file() {
        return Err(ServerError::MissingEntryPage(entry));
    }

    let port = match config.port {
        Some(port) => port,
        None => find_available_port(&config.host, DEFAULT_PORT, MAX_PORT_ATTEMPTS)?,
    };
    let listener = bind(&config.host, port).await?;
    let url = format!("http://{}:{}", config.host, port);

    print_banner(&url, &config.root);
    warn_missing_pages(&config.root);
    if config.open_browser {
        open_browser(&url);
    }

    let shutdown = CancellationToken::new();
    let token = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        token.cancel();
    });

    serve(listener, SiteHandler::new(&config.root), shutdown).await;

    println!("\n\n🔴 Server stopped");
    println!("Thanks for using the {} dev server! 🐾", app::SITE_TITLE);
    Ok(())
}

async fn bind(host: &str, port: u16) -> Result<TcpListener, ServerError> {
    log::info!("Binding {}:{}", host, port);
    TcpListener::bind((host, port))
        .await
        .map_err(|source| match source.kind() {
            io::ErrorKind::AddrInUse => ServerError::PortInUse { port },
            _ => ServerError::Bind {
                addr: format!("{}:{}", host, port),
                source,
            },
        })
}

/// Accept and serve connections one at a time until `shutdown` is cancelled.
///
/// Keep-alive is off so each connection ends after one response, and a client that
/// sends nothing is dropped after [`HEADER_READ_TIMEOUT`].
pub async fn serve(listener: TcpListener, handler: SiteHandler, shutdown: CancellationToken) {
    loop {
        let (stream, peer) = tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    log::warn!("Failed to accept connection: {}", e);
                    continue;
                }
            },
        };
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = serve_connection(&handler, stream, peer) => {}
        }
    }
    log::debug!("Serve loop stopped");
}

async fn serve_connection(handler: &SiteHandler, stream: TcpStream, peer: SocketAddr) {
    let service = service_fn(move |req: Request<Incoming>| async move {
        let line = request_line(&req);
        let resp = handler.handle(req).await;
        println!("{}", access_line(peer, &line, &resp));
        Ok::<_, Infallible>(resp)
    });
    if let Err(e) = http1::Builder::new()
        .timer(TokioTimer::new())
        .header_read_timeout(HEADER_READ_TIMEOUT)
        .keep_alive(false)
        .serve_connection(TokioIo::new(stream), service)
        .await
    {
        log::debug!("Connection error from {}: {}", peer, e);
    }
}

fn print_banner(url: &str, root: &Path) {
    println!("🌟 {} dev server v{}", app::SITE_TITLE, app::VERSION);
    println!("{}", RULE);
    println!("🚀 Server started!");
    println!("📍 URL:  {}", url);
    println!("📁 Root: {}", root.display());
    println!("{}", RULE);
    println!("📱 Pages:");
    for (label, path) in FEATURE_PAGES {
        println!("   {:<22} {}{}", format!("{}:", label), url, path);
    }
    println!("{}", RULE);
    println!("⏹️  Press Ctrl+C to stop the server");
    println!();
}

/// The page list is informational; missing pages are only logged.
fn warn_missing_pages(root: &Path) {
    for (label, path) in FEATURE_PAGES.iter().skip(1) {
        let file = root.join(path.trim_start_matches('/'));
        if !file.is_file() {
            log::warn!("{} page not found: {}", label, file.display());
        }
    }
}

fn open_browser(url: &str) {
    println!("🌐 Opening browser...");
    if let Err(e) = opener::open(url) {
        log::debug!("Browser launch failed: {:?}", e);
        println!("⚠️  Could not open a browser automatically: {}", e);
        println!("Open it manually: {}", url);
    }
}
