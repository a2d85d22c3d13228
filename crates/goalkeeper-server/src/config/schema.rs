use std::net::SocketAddr;

use serde::Deserialize;
use goalkeeper_core::error::{GoalError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub access_log: AccessLogSection,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            store: StoreSection::default(),
            access_log: AccessLogSection::default(),
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(GoalError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.store.validate()?;
        if self.access_log.path.trim().is_empty() {
            return Err(GoalError::Config("access_log.path must not be empty".into()));
        }

        Ok(())
    }

    /// Apply `PORT` and `MONGO_URL` on top of file values.
    /// Empty variables count as unset.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());

        if let Some(port) = var("PORT") {
            self.server.port = port.trim().parse().map_err(|_| {
                GoalError::Config(format!("PORT must be a valid port number, got {port:?}"))
            })?;
        }
        if let Some(url) = var("MONGO_URL") {
            self.store.url = Some(url);
        }
        Ok(self)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSection {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| GoalError::Config(format!("server.host is not a valid address: {e}")))
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    3000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    /// Connection string; normally supplied through `MONGO_URL`.
    #[serde(default)]
    pub url: Option<String>,

    /// Database used when the connection string names none.
    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            url: None,
            database: default_database(),
            collection: default_collection(),
        }
    }
}

impl StoreSection {
    pub fn validate(&self) -> Result<()> {
        match self.url.as_deref() {
            Some(url) if !url.trim().is_empty() => {}
            _ => {
                return Err(GoalError::Config(
                    "MONGO_URL is not defined in the environment or .env".into(),
                ))
            }
        }
        if self.database.is_empty() || self.collection.is_empty() {
            return Err(GoalError::Config(
                "store.database and store.collection must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn default_database() -> String {
    "goals".into()
}
fn default_collection() -> String {
    "goals".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessLogSection {
    #[serde(default = "default_access_log_path")]
    pub path: String,
}

impl Default for AccessLogSection {
    fn default() -> Self {
        Self { path: default_access_log_path() }
    }
}

fn default_access_log_path() -> String {
    "logs/access.log".into()
}
