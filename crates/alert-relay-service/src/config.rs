//! Configuration types for the relay service
//!
//! Loaded at startup from layered sources (optional file plus
//! `RELAY__`-prefixed environment variables, see `main.rs`) and validated
//! before the server binds. A missing required value is fatal: the process
//! exits without serving.

use alert_relay_core::FormattingPolicy;
use serde::Deserialize;

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// The two fixed serving environments
    pub environments: Environments,
}

impl ServiceConfig {
    /// Enforce cross-field requirements that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingValue`] when a required per-environment
    /// value is empty, or when an `auth` section is present but incomplete.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.environments.staging.validate("staging")?;
        self.environments.production.validate("production")?;
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// One configuration block per fixed route.
///
/// Exactly one instance is bound to `/staging` and one to `/production` for
/// the lifetime of the process.
#[derive(Debug, Clone, Deserialize)]
pub struct Environments {
    pub staging: EnvironmentConfig,
    pub production: EnvironmentConfig,
}

/// Immutable per-environment relay settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    /// Downstream chat webhook URL. Opaque here; validity is checked at
    /// send time so a malformed value yields 400 per request rather than a
    /// startup failure.
    pub webhook_url: String,

    /// Label interpolated into incident-formatted messages.
    pub project_label: String,

    /// Basic-auth credential pair. Absent means the auth gate is omitted
    /// and the environment accepts unauthenticated requests.
    #[serde(default)]
    pub auth: Option<BasicAuthConfig>,

    /// How parsed JSON bodies become the outbound message content.
    #[serde(default)]
    pub formatting: FormattingPolicy,
}

impl EnvironmentConfig {
    fn validate(&self, environment: &'static str) -> Result<(), ConfigError> {
        if self.webhook_url.is_empty() {
            return Err(ConfigError::MissingValue {
                environment,
                field: "webhook_url",
            });
        }

        if self.project_label.is_empty() {
            return Err(ConfigError::MissingValue {
                environment,
                field: "project_label",
            });
        }

        if let Some(auth) = &self.auth {
            if auth.username.is_empty() {
                return Err(ConfigError::MissingValue {
                    environment,
                    field: "auth.username",
                });
            }
            if auth.password.is_empty() {
                return Err(ConfigError::MissingValue {
                    environment,
                    field: "auth.password",
                });
            }
        }

        Ok(())
    }
}

/// Credential pair for the Basic-auth gate.
#[derive(Clone, Deserialize)]
pub struct BasicAuthConfig {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthConfig")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

/// Startup configuration failures. All fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required configuration value for {environment}: {field}")]
    MissingValue {
        environment: &'static str,
        field: &'static str,
    },

    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
