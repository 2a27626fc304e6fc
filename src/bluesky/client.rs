// Authenticated AT Protocol client — XRPC over HTTP.
//
// The collector reads through the authenticated search endpoints, so a
// session is established once at startup via com.atproto.server.createSession
// and the access token is attached to every subsequent GET.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

/// Authenticated HTTP client for AT Protocol XRPC endpoints.
///
/// A thin reqwest wrapper with a generic XRPC GET helper. Session state is
/// just the access JWT returned by `createSession`.
pub struct AtpClient {
    client: reqwest::Client,
    base_url: String,
    access_jwt: Option<String>,
}

/// Session details returned by `com.atproto.server.createSession`.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    #[serde(rename = "accessJwt")]
    pub access_jwt: String,
    pub did: String,
    pub handle: String,
}

impl AtpClient {
    /// Create a new client pointing at the given XRPC service base URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("replygraph/0.1 (interaction-graph collector)")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_jwt: None,
        })
    }

    /// Establish an authenticated session for `identifier` and store the
    /// access token for subsequent requests.
    ///
    /// Authentication failure is fatal to the run — there is nothing useful
    /// the collector can do without a session.
    pub async fn login(&mut self, identifier: &str, password: &str) -> Result<Session> {
        let url = format!("{}/xrpc/com.atproto.server.createSession", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "identifier": identifier,
                "password": password,
            }))
            .send()
            .await
            .context("createSession request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("createSession returned {status}: {body}");
        }

        let session: Session = response
            .json()
            .await
            .context("Failed to deserialize createSession response")?;

        debug!(did = session.did, "Session established");
        self.access_jwt = Some(session.access_jwt.clone());
        Ok(session)
    }

    /// Make a GET request to an XRPC endpoint and deserialize the response.
    ///
    /// `nsid` is the XRPC method name (e.g. "app.bsky.feed.searchPosts").
    /// `params` are query string key-value pairs. The session token, when
    /// present, is sent as a bearer credential.
    pub async fn xrpc_get<T: DeserializeOwned>(
        &self,
        nsid: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/xrpc/{}", self.base_url, nsid);

        debug!(nsid = nsid, "XRPC GET request");

        let mut request = self.client.get(&url).query(params);
        if let Some(ref jwt) = self.access_jwt {
            request = request.bearer_auth(jwt);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("XRPC request failed: {nsid}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("XRPC {nsid} returned {status}: {body}");
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to deserialize {nsid} response"))
    }
}
