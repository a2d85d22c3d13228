//! Append-only access log in Apache Combined Log Format.
//!
//! One line per request, written after the response is produced:
//! `remote - - [date] "METHOD url HTTP/x" status length "referer" "user-agent"`

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::{
    body::HttpBody,
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, Version},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

use goalkeeper_core::error::{GoalError, Result};

use crate::app_state::AppState;

pub struct AccessLog {
    path: PathBuf,
    file: Mutex<fs::File>,
}

impl AccessLog {
    /// Open `path` for appending, creating parent directories as needed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await.map_err(|e| {
                GoalError::Internal(format!("create log dir {} failed: {e}", dir.display()))
            })?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| GoalError::Internal(format!("open {} failed: {e}", path.display())))?;

        Ok(Self { path, file: Mutex::new(file) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line. The lock keeps concurrent lines whole.
    pub async fn append(&self, line: &str) -> Result<()> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        let mut f = self.file.lock().await;
        f.write_all(buf.as_bytes())
            .await
            .map_err(|e| GoalError::Internal(format!("access log write failed: {e}")))?;
        f.flush()
            .await
            .map_err(|e| GoalError::Internal(format!("access log flush failed: {e}")))
    }
}

/// Request half of an access-log line, captured before the request is consumed.
#[derive(Debug, Clone)]
pub struct AccessEntry {
    remote: Option<SocketAddr>,
    method: String,
    url: String,
    version: Version,
    referer: Option<String>,
    user_agent: Option<String>,
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned)
}

fn http_version(v: Version) -> &'static str {
    if v == Version::HTTP_09 {
        "0.9"
    } else if v == Version::HTTP_10 {
        "1.0"
    } else if v == Version::HTTP_2 {
        "2.0"
    } else if v == Version::HTTP_3 {
        "3.0"
    } else {
        "1.1"
    }
}

impl AccessEntry {
    pub fn from_request(req: &Request) -> Self {
        let headers = req.headers();
        Self {
            remote: req
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| *addr),
            method: req.method().to_string(),
            url: req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_owned())
                .unwrap_or_else(|| req.uri().path().to_owned()),
            version: req.version(),
            referer: header_str(headers, header::REFERER),
            user_agent: header_str(headers, header::USER_AGENT),
        }
    }

    /// Render the full line once the response status and size are known.
    pub fn finish(&self, response: &Response, at: DateTime<Utc>) -> String {
        let length = response
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .or_else(|| response.body().size_hint().exact().map(|n| n.to_string()))
            .unwrap_or_else(|| "-".into());

        format!(
            "{} - - [{}] \"{} {} HTTP/{}\" {} {} \"{}\" \"{}\"",
            self.remote.map(|a| a.ip().to_string()).unwrap_or_else(|| "-".into()),
            at.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.url,
            http_version(self.version),
            response.status().as_u16(),
            length,
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }
}

/// Outermost middleware: log every request, whatever route or status.
pub async fn log_access(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let entry = AccessEntry::from_request(&req);
    let response = next.run(req).await;

    let line = entry.finish(&response, Utc::now());
    if let Err(e) = state.access_log().append(&line).await {
        tracing::warn!(error = %e, path = %state.access_log().path().display(), "access log append failed");
    }
    response
}
