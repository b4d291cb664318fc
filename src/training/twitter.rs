//! Twitter feed training.
//!
//! Searches a handful of seed words, keeps only tweets that are replies,
//! fetches each parent status, and trains (parent text, reply text) pairs.
//! The filter is shallow: no retweets, no tweets carrying URLs, @mentions
//! stripped. A fixed sleep between searches respects the rate limit.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, info};

use crate::engine::{ResponseEngine, TrainingPair};
use crate::twitter::{Tweet, TwitterClient};

/// Seed words searched for reply threads, mirroring the common-word seeding
/// of the original trainer.
pub const SEED_WORDS: [&str; 8] = ["the", "you", "what", "how", "today", "think", "good", "why"];

/// Tweets fetched per seed word.
const SEARCH_COUNT: u32 = 50;

/// Delay between API calls.
const FETCH_DELAY: Duration = Duration::from_millis(500);

static URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());
static MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\w+\s*").unwrap());

/// Clean a tweet for training. Returns None when the tweet is unusable:
/// a retweet, carries a URL, or is empty once mentions are stripped.
pub fn clean_tweet(text: &str) -> Option<String> {
    if text.starts_with("RT @") {
        return None;
    }
    if URL.is_match(text) {
        return None;
    }
    let stripped = MENTION.replace_all(text, "");
    let stripped = stripped.trim();
    if stripped.is_empty() {
        return None;
    }
    Some(stripped.to_string())
}

/// Build a training pair from a parent tweet and its reply, if both clean up.
pub fn pair_from_thread(parent: &Tweet, reply: &Tweet) -> Option<TrainingPair> {
    let input = clean_tweet(&parent.text)?;
    let response = clean_tweet(&reply.text)?;
    TrainingPair::new(&input, &response)
}

/// Search the seed words and train every usable reply thread.
/// Returns the number of pairs trained.
pub async fn run<E: ResponseEngine>(engine: &E, twitter: &TwitterClient) -> Result<usize, String> {
    let mut trained = 0usize;

    for word in SEED_WORDS {
        let tweets = twitter.search(word, SEARCH_COUNT).await?;
        debug!("Seed \"{}\": {} tweets", word, tweets.len());

        for tweet in tweets {
            let Some(parent_id) = tweet.in_reply_to_status_id_str.as_deref() else {
                continue;
            };
            if clean_tweet(&tweet.text).is_none() {
                continue;
            }

            tokio::time::sleep(FETCH_DELAY).await;
            let Some(parent) = twitter.status(parent_id).await? else {
                debug!("Parent {} no longer exists", parent_id);
                continue;
            };

            if let Some(pair) = pair_from_thread(&parent, &tweet) {
                engine.train(&pair).await.map_err(|e| e.to_string())?;
                trained += 1;
            }
        }

        tokio::time::sleep(FETCH_DELAY).await;
    }

    info!("Twitter training done: {} pairs", trained);
    Ok(trained)
}
