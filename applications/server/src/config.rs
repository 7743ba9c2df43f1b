/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

/// Plain port override, applied after the file and `VIV_` variables
pub const PORT_ENV: &str = "PORT";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Only origin allowed by CORS
    #[serde(default = "default_client_origin")]
    pub client_origin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// Without an explicit path, `config.toml` in the working directory is
    /// used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = path.map_or_else(|| PathBuf::from("config.toml"), Path::to_path_buf);
        if path.is_some() || config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        }

        // Override with environment variables (VIV_SERVER__PORT, ...)
        settings = settings.add_source(
            config::Environment::with_prefix("VIV")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config.with_port_override(std::env::var(PORT_ENV).ok().as_deref())
    }

    /// Apply the plain `PORT` value, if any
    pub fn with_port_override(mut self, port: Option<&str>) -> Result<Self> {
        if let Some(raw) = port {
            self.server.port = raw.trim().parse().map_err(|_| {
                ServerError::Config(format!("{} must be a port number, got {:?}", PORT_ENV, raw))
            })?;
        }
        Ok(self)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.server
            .host
            .parse::<IpAddr>()
            .map_err(|e| ServerError::Config(format!("Invalid host {:?}: {}", self.server.host, e)))?;

        let origin = &self.server.client_origin;
        if !origin.starts_with("http://") && !origin.starts_with("https://") {
            return Err(ServerError::Config(format!(
                "client_origin must be an http(s) origin, got {:?}",
                origin
            )));
        }

        if self.storage.database_url.is_empty() {
            return Err(ServerError::Config("database_url is required".to_string()));
        }

        Ok(())
    }

    /// Address to bind
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let host = self
            .server
            .host
            .parse::<IpAddr>()
            .map_err(|e| ServerError::Config(e.to_string()))?;
        Ok(SocketAddr::from((host, self.server.port)))
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
        client_origin: default_client_origin(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_client_origin() -> String {
    "http://localhost:5173".to_string()
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://tracks.db".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
        }
    }
}
