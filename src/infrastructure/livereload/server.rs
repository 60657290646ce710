//! Live-reload HTTP endpoint
//!
//! `GET /livereload.js` serves the client script. `GET /changes?since=N`
//! answers with the latest notice as soon as its sequence exceeds `N`, or
//! after the long-poll window.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{debug, info, warn};

use super::hub::ReloadHub;
use crate::error::{SheafError, SheafResult};

pub const LONG_POLL: Duration = Duration::from_secs(25);

const CLIENT: &str = r#"(function () {
  var base = document.currentScript ? new URL(document.currentScript.src).origin : "";
  var seq = -1;
  function poll() {
    fetch(base + "/changes?since=" + Math.max(seq, 0))
      .then(function (r) { return r.json(); })
      .then(function (notice) {
        if (seq >= 0 && notice.seq > seq) { location.reload(); return; }
        seq = notice.seq;
        poll();
      })
      .catch(function () { setTimeout(poll, 1000); });
  }
  poll();
})();
"#;

/// Running endpoint; stops when dropped.
pub struct LiveReloadServer {
    server: Arc<Server>,
    handle: Option<JoinHandle<()>>,
    port: u16,
}

impl LiveReloadServer {
    /// Bind on localhost. Port 0 picks a free port.
    pub fn start(port: u16, hub: Arc<ReloadHub>) -> SheafResult<Self> {
        Self::start_with_poll(port, hub, LONG_POLL)
    }

    pub fn start_with_poll(port: u16, hub: Arc<ReloadHub>, poll: Duration) -> SheafResult<Self> {
        let server = Server::http(("127.0.0.1", port))
            .map_err(|e| SheafError::Io(std::io::Error::other(e.to_string())))?;
        let port = server.server_addr().port();
        let server = Arc::new(server);

        let accept = Arc::clone(&server);
        let handle = thread::Builder::new()
            .name("sheaf-livereload".to_string())
            .spawn(move || {
                for request in accept.incoming_requests() {
                    let hub = Arc::clone(&hub);
                    // Long polls block, so every request gets its own thread.
                    thread::spawn(move || respond(request, &hub, poll));
                }
            })?;

        info!(port, "live reload listening");
        Ok(Self {
            server,
            handle: Some(handle),
            port,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn script_url(&self) -> String {
        format!("http://127.0.0.1:{}/livereload.js", self.port)
    }
}

impl Drop for LiveReloadServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn respond(request: Request, hub: &ReloadHub, poll: Duration) {
    let url = request.url().to_string();
    let (path, query) = url.split_once('?').unwrap_or((url.as_str(), ""));
    debug!(method = %request.method(), path, "live reload request");

    let response = match (request.method(), path) {
        (Method::Get, "/livereload.js") => text(CLIENT, "application/javascript"),
        (Method::Get, "/changes") => {
            let since = query
                .split('&')
                .find_map(|pair| pair.strip_prefix("since="))
                .and_then(|n| n.parse::<u64>().ok())
                .unwrap_or(0);
            let notice = hub.wait_since(since, poll);
            match serde_json::to_string(&notice) {
                Ok(body) => text(&body, "application/json"),
                Err(e) => text(&e.to_string(), "text/plain").with_status_code(500u16),
            }
        }
        _ => text("not found", "text/plain").with_status_code(404u16),
    };

    if let Err(e) = request.respond(response) {
        warn!(error = %e, "failed to answer live reload client");
    }
}

fn text(body: &str, content_type: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    let mut response = Response::from_string(body);
    if let Ok(header) = Header::from_bytes("Content-Type", content_type) {
        response.add_header(header);
    }
    if let Ok(header) = Header::from_bytes("Access-Control-Allow-Origin", "*") {
        response.add_header(header);
    }
    response
}
