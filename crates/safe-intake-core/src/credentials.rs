// SPDX-License-Identifier: Apache-2.0

//! Database credentials sourced from the process environment.
//!
//! Credentials are read once at startup into a [`Credentials`] value and
//! handed to the persistence writer. Nothing here is global, and no secret
//! is ever part of the config file.

use secrecy::SecretString;

use crate::error::ConfigurationError;

/// Environment variable holding the database endpoint URL.
pub const DB_URL_ENV: &str = "DB_URL";
/// Environment variable holding the database user.
pub const DB_USER_ENV: &str = "DB_USER";
/// Environment variable holding the database password.
pub const DB_PASSWORD_ENV: &str = "DB_PASSWORD";

/// Database credentials as found at startup. Any field may be absent.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    endpoint: Option<String>,
    principal: Option<String>,
    secret: Option<SecretString>,
}

/// Credentials with every field present.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedCredentials<'a> {
    /// Endpoint URL (e.g. `mysql://db.example.com/mydb`).
    pub endpoint: &'a str,
    /// User name.
    pub principal: &'a str,
    /// Password.
    pub secret: &'a SecretString,
}

impl Credentials {
    /// Reads `DB_URL`, `DB_USER` and `DB_PASSWORD` from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds credentials from an arbitrary variable lookup.
    ///
    /// Blank values are treated as absent.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            endpoint: read(DB_URL_ENV),
            principal: read(DB_USER_ENV),
            secret: read(DB_PASSWORD_ENV).map(SecretString::from),
        }
    }

    /// Returns all three fields, or the names of the missing variables.
    pub fn require(&self) -> Result<ResolvedCredentials<'_>, ConfigurationError> {
        match (&self.endpoint, &self.principal, &self.secret) {
            (Some(endpoint), Some(principal), Some(secret)) => Ok(ResolvedCredentials {
                endpoint,
                principal,
                secret,
            }),
            _ => {
                let missing = [
                    (DB_URL_ENV, self.endpoint.is_none()),
                    (DB_USER_ENV, self.principal.is_none()),
                    (DB_PASSWORD_ENV, self.secret.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(ConfigurationError::MissingCredentials { missing })
            }
        }
    }
}
