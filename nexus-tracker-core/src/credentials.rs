//! Credential lookup by logical name (`userid`, `passwd`).

use std::env;
use std::fmt;

use tracing::{error, info};

use crate::error::TrackerError;

pub const PRINCIPAL_NAME: &str = "userid";
pub const SECRET_NAME: &str = "passwd";
pub const DEFAULT_ENV_PREFIX: &str = "NEXUS";

pub trait CredentialSource {
    fn credential(&self, name: &str) -> Result<String, TrackerError>;
}

/// Reads `<PREFIX>_<NAME>` from the process environment, e.g. `NEXUS_USERID`.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    prefix: String,
}

impl EnvCredentials {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn var_name(&self, name: &str) -> String {
        format!("{}_{}", self.prefix, name).to_uppercase()
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_ENV_PREFIX)
    }
}

impl CredentialSource for EnvCredentials {
    fn credential(&self, name: &str) -> Result<String, TrackerError> {
        let var = self.var_name(name);
        match env::var(&var) {
            Ok(value) if !value.is_empty() => {
                info!(var = %var, "Credential found in env");
                Ok(value)
            }
            Ok(_) => {
                error!(var = %var, "Credential env var is empty");
                Err(TrackerError::Credential {
                    name: name.to_string(),
                    message: format!("{var} is empty"),
                })
            }
            Err(e) => {
                error!(error = ?e, var = %var, "Credential env var not set");
                Err(TrackerError::Credential {
                    name: name.to_string(),
                    message: format!("{var}: {e}"),
                })
            }
        }
    }
}

/// Basic-auth pair. `Debug` never prints the secret.
#[derive(Clone)]
pub struct Credentials {
    pub principal: String,
    pub secret: String,
}

impl Credentials {
    pub fn from_source<S: CredentialSource + ?Sized>(source: &S) -> Result<Self, TrackerError> {
        Ok(Self {
            principal: source.credential(PRINCIPAL_NAME)?,
            secret: source.credential(SECRET_NAME)?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("principal", &self.principal)
            .field("secret", &"<redacted>")
            .finish()
    }
}
