//! Local preview server.
//!
//! A lightweight HTTP server built on `tiny_http`:
//!
//! - Static file serving from the build output directory
//! - Automatic `index.html` resolution for directories
//! - Live projects listing: `/projects/?q=..&tag=..` is rendered per request
//!   through the project filter
//! - Loading screen on the first page of the session (`hasLoaded` flag)
//! - Graceful shutdown on Ctrl+C
//!
//! # Request Resolution
//!
//! ```text
//! /projects/?q=react&tag=AI ──► render_listing(filter)
//! /about/                   ──► public/about/index.html
//! /style.css                ──► public/style.css
//! anything else             ──► public/404.html (status 404)
//! ```

use crate::{
    build::Site,
    config::SiteConfig,
    filter::ProjectFilter,
    log,
    render::{Renderer, inject_loader},
    settings::first_visit,
    storage::SessionStore,
};
use anyhow::{Context, Result};
use std::{
    borrow::Cow,
    fs,
    net::{IpAddr, SocketAddr},
    path::Path,
    sync::Arc,
};
use tiny_http::{Header, Request, Response, Server};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

// ============================================================================
// Server Entry Point
// ============================================================================

/// Start the preview server.
///
/// This function:
/// 1. Binds to the configured interface and port (with auto-retry on port conflict)
/// 2. Sets up Ctrl+C handler for graceful shutdown
/// 3. Enters the main request handling loop
///
/// The server blocks until Ctrl+C is received.
pub fn serve_site(config: &'static SiteConfig, site: &Site) -> Result<()> {
    let interface: IpAddr = config
        .serve
        .interface
        .parse()
        .with_context(|| format!("Invalid interface `{}`", config.serve.interface))?;

    let (server, addr) = try_bind_port(interface, config.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    // Set up Ctrl+C handler for graceful shutdown
    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);

    let preview = Preview::new(config, site);
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &preview) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(interface: IpAddr, base_port: u16, max_retries: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }
    Err(anyhow::anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

// ============================================================================
// Request Handling
// ============================================================================

/// Resolved response, independent of the transport.
#[derive(Debug)]
struct Reply {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
}

impl Reply {
    fn html(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: "text/html; charset=utf-8",
            body: body.into_bytes(),
        }
    }

    fn is_html(&self) -> bool {
        self.content_type.starts_with("text/html")
    }
}

/// Request resolver for one serve session.
struct Preview<'a> {
    config: &'a SiteConfig,
    renderer: Renderer<'a>,
    owner: &'a str,
    session: SessionStore,
}

impl<'a> Preview<'a> {
    fn new(config: &'a SiteConfig, site: &'a Site) -> Self {
        Self {
            config,
            renderer: site.renderer(config),
            owner: &site.content.profile.name,
            session: SessionStore::default(),
        }
    }

    /// Resolve a raw request URL (path plus optional query).
    ///
    /// Resolution order:
    /// 1. `/projects/` with a query → live listing
    /// 2. Exact file match → serve file
    /// 3. Directory with index.html → serve index.html
    /// 4. Nothing found → 404 page
    fn respond(&self, url: &str) -> Result<Reply> {
        let (raw_path, query) = match url.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (url, None),
        };
        let path = urlencoding::decode(raw_path).unwrap_or(Cow::Borrowed(raw_path));
        let request_path = path.trim_matches('/');

        let reply = match query {
            Some(query) if request_path == "projects" => {
                let filter = parse_filter(query);
                Reply::html(200, self.renderer.render_listing(&filter))
            }
            _ => self.serve_output(request_path)?,
        };

        if reply.is_html() && first_visit(&self.session)? {
            let html = String::from_utf8_lossy(&reply.body);
            return Ok(Reply::html(reply.status, inject_loader(&html, self.owner)));
        }
        Ok(reply)
    }

    fn serve_output(&self, request_path: &str) -> Result<Reply> {
        let serve_root = &self.config.build.output;

        // Reject paths escaping the output directory
        if request_path.split('/').any(|part| part == "..") {
            return self.not_found();
        }
        let local_path = serve_root.join(request_path);

        if local_path.is_file() {
            return read_file(&local_path, 200);
        }
        let index_path = local_path.join("index.html");
        if local_path.is_dir() && index_path.is_file() {
            return read_file(&index_path, 200);
        }
        self.not_found()
    }

    fn not_found(&self) -> Result<Reply> {
        let page = self.config.build.output.join("404.html");
        if page.is_file() {
            return read_file(&page, 404);
        }
        Ok(Reply {
            status: 404,
            content_type: "text/plain",
            body: b"404 Not Found".to_vec(),
        })
    }
}

/// Parse `q` and `tag` from a query string. An empty tag means no tag.
fn parse_filter(query: &str) -> ProjectFilter {
    let mut search = String::new();
    let mut tag = None;

    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = value.replace('+', " ");
        let value = urlencoding::decode(&value)
            .map(Cow::into_owned)
            .unwrap_or_else(|_| value.clone());
        match key {
            "q" => search = value,
            "tag" if !value.is_empty() => tag = Some(value),
            _ => {}
        }
    }

    ProjectFilter::new(search, tag)
}

fn handle_request(request: Request, preview: &Preview<'_>) -> Result<()> {
    let reply = preview.respond(request.url())?;
    let header = Header::from_bytes("Content-Type", reply.content_type)
        .map_err(|()| anyhow::anyhow!("invalid content type header"))?;
    let response = Response::from_data(reply.body)
        .with_status_code(reply.status)
        .with_header(header);
    request.respond(response)?;
    Ok(())
}

// ============================================================================
// Response Helpers
// ============================================================================

/// Read a file with appropriate content type.
fn read_file(path: &Path, status: u16) -> Result<Reply> {
    let body = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Reply {
        status,
        content_type: guess_content_type(path),
        body,
    })
}

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        // Web content
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",

        // Images
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Documents
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",

        // Default binary
        _ => "application/octet-stream",
    }
}

// ============================================================================
// Tests
// ============================================================================
