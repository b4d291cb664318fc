//! Twitter API client.
//!
//! Uses application-only auth: the consumer key/secret are exchanged for a
//! bearer token, which covers search and status lookup. The user token pair
//! is still required in the credential bundle so a missing variable fails
//! fast before any network call.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::TwitterCredentials;

const TOKEN_URL: &str = "https://api.twitter.com/oauth2/token";
const API_BASE: &str = "https://api.twitter.com/1.1";

/// A tweet from search or lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct Tweet {
    pub id_str: String,
    pub text: String,
    #[serde(default)]
    pub in_reply_to_status_id_str: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    statuses: Vec<Tweet>,
}

/// Application-only Twitter client.
pub struct TwitterClient {
    http: reqwest::Client,
    bearer: String,
}

impl TwitterClient {
    /// Exchange consumer credentials for a bearer token.
    pub async fn login(creds: &TwitterCredentials) -> Result<Self, String> {
        let http = reqwest::Client::new();
        let basic = STANDARD.encode(format!(
            "{}:{}",
            urlencoding::encode(&creds.key),
            urlencoding::encode(&creds.secret)
        ));

        let response = http
            .post(TOKEN_URL)
            .header("Authorization", format!("Basic {basic}"))
            .header("Content-Type", "application/x-www-form-urlencoded;charset=UTF-8")
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(|e| format!("Twitter token request failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Twitter auth error {status}: {body}"));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse Twitter token response: {e}"))?;

        info!("Authenticated with Twitter (app-only)");
        Ok(Self {
            http,
            bearer: token.access_token,
        })
    }

    /// Search recent tweets matching a query.
    pub async fn search(&self, query: &str, count: u32) -> Result<Vec<Tweet>, String> {
        let url = format!(
            "{API_BASE}/search/tweets.json?q={}&count={count}&lang=en",
            urlencoding::encode(query)
        );

        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.bearer))
            .send()
            .await
            .map_err(|e| format!("Twitter search failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Twitter API error {status}: {body}"));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse search response: {e}"))?;

        debug!("Search \"{}\" returned {} tweets", query, body.statuses.len());
        Ok(body.statuses)
    }

    /// Look up a single tweet by id. Returns None when it no longer exists.
    pub async fn status(&self, id: &str) -> Result<Option<Tweet>, String> {
        let url = format!("{API_BASE}/statuses/show.json?id={}", urlencoding::encode(id));

        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.bearer))
            .send()
            .await
            .map_err(|e| format!("Twitter status lookup failed: {e}"))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Twitter API error {status}: {body}"));
        }

        let tweet: Tweet = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse status: {e}"))?;
        Ok(Some(tweet))
    }
}
