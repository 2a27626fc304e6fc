use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Central configuration loaded from environment variables.
///
/// Identity and endpoint settings come from the environment (a .env file
/// is loaded automatically at startup via dotenvy); collection parameters
/// are CLI flags and live on `pipeline::collect::CollectOpts`.
pub struct Config {
    /// Handle used to establish the session (e.g. someone.bsky.social).
    pub bluesky_handle: String,
    /// Path to a plaintext file holding the app password.
    pub password_file: PathBuf,
    /// XRPC service endpoint the session is created against.
    pub service_url: String,
}

/// Default XRPC endpoint for authenticated AT Protocol calls.
pub const DEFAULT_SERVICE_URL: &str = "https://bsky.social";

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Ok(Self {
            bluesky_handle: env::var("BLUESKY_HANDLE").unwrap_or_default(),
            password_file: env::var("REPLYGRAPH_PASSWORD_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("my_password.txt")),
            service_url: env::var("REPLYGRAPH_SERVICE_URL")
                .unwrap_or_else(|_| DEFAULT_SERVICE_URL.to_string()),
        })
    }

    /// Check that the Bluesky handle is configured.
    /// Call this before anything that needs an authenticated session.
    pub fn require_handle(&self) -> Result<()> {
        if self.bluesky_handle.is_empty() {
            anyhow::bail!(
                "BLUESKY_HANDLE not set. Add it to your .env file or environment."
            );
        }
        Ok(())
    }

    /// Read the app password from the configured credential file.
    ///
    /// A missing or unreadable file is fatal — collection cannot proceed
    /// without a session, so this aborts the run before any network call.
    pub fn read_password(&self) -> Result<String> {
        let raw = fs::read_to_string(&self.password_file).with_context(|| {
            format!(
                "Failed to read password file {} (set REPLYGRAPH_PASSWORD_FILE to override)",
                self.password_file.display()
            )
        })?;
        let password = raw.trim().to_string();
        if password.is_empty() {
            anyhow::bail!(
                "Password file {} is empty",
                self.password_file.display()
            );
        }
        Ok(password)
    }
}
