//! Reddit API client.
//!
//! Script-app OAuth2 (password grant), hot submission listings, comment
//! forests, and authenticated comment replies. Reddit's listing JSON wraps
//! everything in kind/data "things"; the `replies` field on a comment is
//! either a nested listing or the empty string, hence the untagged enum.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::RedditCredentials;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";
const USER_AGENT: &str = "edward:v0.2.0 (by /u/uselessbots)";

/// A submission from a subreddit listing.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: String,
    pub title: String,
    /// None means the author deleted their account (original skips these).
    pub author: Option<String>,
    pub score: i64,
}

/// A comment with its direct replies.
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: String,
    pub author: Option<String>,
    pub body: String,
    pub replies: Vec<Comment>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
    children: Vec<Thing>,
}

#[derive(Deserialize)]
struct Thing {
    kind: String,
    data: ThingData,
}

#[derive(Deserialize)]
struct ThingData {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    body: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    replies: Replies,
}

/// Reddit sends `""` when a comment has no replies.
#[derive(Deserialize, Default)]
#[serde(untagged)]
enum Replies {
    #[default]
    None,
    Empty(String),
    Listing(Box<Listing>),
}

fn things_to_comments(things: Vec<Thing>) -> Vec<Comment> {
    things
        .into_iter()
        .filter(|t| t.kind == "t1")
        .map(|t| {
            let replies = match t.data.replies {
                Replies::Listing(listing) => things_to_comments(listing.data.children),
                Replies::None | Replies::Empty(_) => Vec::new(),
            };
            Comment {
                id: t.data.id,
                author: t.data.author,
                body: t.data.body,
                replies,
            }
        })
        .collect()
}

/// Authenticated Reddit API client.
pub struct RedditClient {
    http: reqwest::Client,
    token: String,
    pub username: String,
}

impl RedditClient {
    /// Log in with the password grant and return a ready client.
    pub async fn login(creds: &RedditCredentials) -> Result<Self, String> {
        let http = reqwest::Client::new();
        let basic = STANDARD.encode(format!("{}:{}", creds.client_id, creds.client_secret));

        let response = http
            .post(TOKEN_URL)
            .header("Authorization", format!("Basic {basic}"))
            .header("User-Agent", USER_AGENT)
            .form(&[
                ("grant_type", "password"),
                ("username", creds.username.as_str()),
                ("password", creds.password.as_str()),
            ])
            .send()
            .await
            .map_err(|e| format!("Reddit token request failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Reddit auth error {status}: {body}"));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse Reddit token response: {e}"))?;

        info!("Authenticated with Reddit as {}", creds.username);
        Ok(Self {
            http,
            token: token.access_token,
            username: creds.username.clone(),
        })
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value, String> {
        let response = self
            .http
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| format!("Reddit request failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Reddit API error {status}: {body}"));
        }

        response
            .json()
            .await
            .map_err(|e| format!("Failed to parse Reddit response: {e}"))
    }

    /// Fetch the hot listing of a subreddit.
    pub async fn hot(&self, subreddit: &str, limit: u32) -> Result<Vec<Submission>, String> {
        let url = format!(
            "{API_BASE}/r/{}/hot?limit={limit}&raw_json=1",
            urlencoding::encode(subreddit)
        );
        let json = self.get_json(&url).await?;
        let listing: Listing = serde_json::from_value(json)
            .map_err(|e| format!("Failed to parse hot listing: {e}"))?;

        let submissions: Vec<Submission> = listing
            .data
            .children
            .into_iter()
            .filter(|t| t.kind == "t3")
            .map(|t| Submission {
                id: t.data.id,
                title: t.data.title.unwrap_or_default(),
                author: t.data.author,
                score: t.data.score,
            })
            .collect();

        debug!("Fetched {} hot submissions from r/{}", submissions.len(), subreddit);
        Ok(submissions)
    }

    /// Fetch the comment forest of a submission.
    pub async fn comments(&self, submission_id: &str) -> Result<Vec<Comment>, String> {
        let url = format!("{API_BASE}/comments/{submission_id}?raw_json=1&depth=2");
        let json = self.get_json(&url).await?;

        // Response is [submission listing, comment listing]
        let listings: Vec<Listing> = serde_json::from_value(json)
            .map_err(|e| format!("Failed to parse comment listing: {e}"))?;

        let comments = listings
            .into_iter()
            .nth(1)
            .map(|l| things_to_comments(l.data.children))
            .unwrap_or_default();

        debug!("Fetched {} top-level comments for {}", comments.len(), submission_id);
        Ok(comments)
    }

    /// Fetch the newest comments in a subreddit (flat, no reply trees).
    pub async fn new_comments(&self, subreddit: &str, limit: u32) -> Result<Vec<Comment>, String> {
        let url = format!(
            "{API_BASE}/r/{}/comments?limit={limit}&raw_json=1",
            urlencoding::encode(subreddit)
        );
        let json = self.get_json(&url).await?;
        let listing: Listing = serde_json::from_value(json)
            .map_err(|e| format!("Failed to parse comment stream: {e}"))?;

        Ok(things_to_comments(listing.data.children))
    }

    /// Post a reply to a comment. `comment_id` is the bare id (no t1_ prefix).
    pub async fn reply(&self, comment_id: &str, text: &str) -> Result<(), String> {
        let thing_id = format!("t1_{comment_id}");
        let response = self
            .http
            .post(format!("{API_BASE}/api/comment"))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", USER_AGENT)
            .form(&[("api_type", "json"), ("thing_id", &thing_id), ("text", text)])
            .send()
            .await
            .map_err(|e| format!("Reddit reply failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Reply to {} failed: {} {}", comment_id, status, body);
            return Err(format!("Reddit API error {status}"));
        }

        info!("Replied to comment {}", comment_id);
        Ok(())
    }
}
