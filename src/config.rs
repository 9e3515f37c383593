//! Environment configuration read once at process start-up.

use std::env;

/// The emails that may use the application when `AUTHORIZED_EMAILS` is unset.
pub const DEFAULT_AUTHORIZED_EMAILS: [&str; 2] =
    ["owner@expenseur.dev", "partner@expenseur.dev"];

/// A snapshot of the environment variables the server reads.
///
/// The variables are read exactly once, before storage selection; changing
/// the environment afterwards has no effect on a running process.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Path to the SQLite database file. When unset the server runs purely
    /// in memory.
    pub database_url: Option<String>,
    /// Base URL of the managed REST storage surface, e.g.
    /// `https://project.example.co`. Only probed when [Config::database_url]
    /// is also set.
    pub rest_api_url: Option<String>,
    /// API key sent with every REST storage request.
    pub rest_api_key: Option<String>,
    /// The emails allowed through the authorization gate.
    pub authorized_emails: Vec<String>,
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").ok(),
            rest_api_url: env::var("REST_API_URL").ok(),
            rest_api_key: env::var("REST_API_KEY").ok(),
            authorized_emails: env::var("AUTHORIZED_EMAILS")
                .map(|raw| {
                    raw.split(',')
                        .map(|email| email.trim().to_owned())
                        .filter(|email| !email.is_empty())
                        .collect()
                })
                .unwrap_or_else(|_| {
                    DEFAULT_AUTHORIZED_EMAILS
                        .iter()
                        .map(|email| email.to_string())
                        .collect()
                }),
        }
    }
}
