//! Reddit thread flattening trainer.
//!
//! Fetches hot submissions, walks each comment forest, and turns parent →
//! reply edges into training pairs. Filters are deliberately shallow:
//! deleted comments are skipped on the input side, removed or overlong
//! replies on the output side. A fixed sleep between comment fetches keeps
//! us under Reddit's rate limit; there is no retry or backoff beyond that.

use std::time::Duration;

use tracing::{debug, info};

use crate::engine::{ResponseEngine, TrainingPair};
use crate::reddit::{Comment, RedditClient};

/// Reddit's placeholder body for a comment whose author deleted it.
pub const DELETED: &str = "[deleted]";
/// Reddit's placeholder body for a comment removed by moderators.
pub const REMOVED: &str = "[removed]";
/// Replies at or above this many characters are ignored.
pub const MAX_REPLY_CHARS: usize = 80;

/// Delay between comment-forest fetches.
const FETCH_DELAY: Duration = Duration::from_millis(100);

/// Flatten a comment forest into training pairs.
///
/// For each top-level comment that is not `[deleted]`, each direct reply
/// that is not `[removed]` and is under 80 characters becomes
/// (comment body, reply body). Pairs with an empty side are dropped.
pub fn flatten(comments: &[Comment]) -> Vec<TrainingPair> {
    let mut pairs = Vec::new();

    for comment in comments {
        if comment.body == DELETED {
            debug!("Skipping deleted comment {}", comment.id);
            continue;
        }

        for reply in &comment.replies {
            if reply.body == REMOVED {
                debug!("Skipping removed reply {}", reply.id);
                continue;
            }
            if reply.body.chars().count() >= MAX_REPLY_CHARS {
                debug!("Reply {} is too long", reply.id);
                continue;
            }
            if let Some(pair) = TrainingPair::new(&comment.body, &reply.body) {
                pairs.push(pair);
            }
        }
    }

    pairs
}

/// Fetch `limit` hot submissions from `subreddit` and train every pair the
/// flattener emits. Returns the number of pairs trained. API errors
/// propagate and terminate the run.
pub async fn run<E: ResponseEngine>(
    engine: &E,
    reddit: &RedditClient,
    subreddit: &str,
    limit: u32,
) -> Result<usize, String> {
    let submissions = reddit.hot(subreddit, limit).await?;
    info!("Flattening {} submissions from r/{}", submissions.len(), subreddit);

    let mut trained = 0usize;
    for submission in submissions {
        // A missing author means the submission itself was deleted
        if submission.author.is_none() {
            debug!("Skipping authorless submission {}", submission.id);
            continue;
        }

        debug!("Submission \"{}\" (score {})", submission.title, submission.score);
        tokio::time::sleep(FETCH_DELAY).await;
        let comments = reddit.comments(&submission.id).await?;

        for pair in flatten(&comments) {
            engine.train(&pair).await.map_err(|e| e.to_string())?;
            trained += 1;
        }
    }

    info!("Reddit training done: {} pairs from r/{}", trained, subreddit);
    Ok(trained)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(body: &str, replies: Vec<Comment>) -> Comment {
        Comment {
            id: "c".to_string(),
            author: Some("user".to_string()),
            body: body.to_string(),
            replies,
        }
    }

    fn leaf(body: &str) -> Comment {
        comment(body, Vec::new())
    }

    #[test]
    fn test_basic_pair_emission() {
        let forest = vec![comment("what editor do you use", vec![leaf("vim"), leaf("emacs")])];
        let pairs = flatten(&forest);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].input(), "what editor do you use");
        assert_eq!(pairs[0].response(), "vim");
        assert_eq!(pairs[1].response(), "emacs");
    }

    #[test]
    fn test_deleted_comment_emits_nothing() {
        let forest = vec![comment(DELETED, vec![leaf("a perfectly good reply")])];
        assert!(flatten(&forest).is_empty());
    }

    #[test]
    fn test_removed_reply_is_skipped() {
        let forest = vec![comment("a question", vec![leaf(REMOVED), leaf("an answer")])];
        let pairs = flatten(&forest);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].response(), "an answer");
    }

    #[test]
    fn test_long_reply_is_skipped() {
        let long = "x".repeat(MAX_REPLY_CHARS);
        let just_under = "y".repeat(MAX_REPLY_CHARS - 1);
        let forest = vec![comment("a question", vec![leaf(&long), leaf(&just_under)])];
        let pairs = flatten(&forest);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].response(), just_under);
    }

    #[test]
    fn test_length_bound_counts_chars_not_bytes() {
        // 79 emoji are 79 chars but well over 80 bytes
        let emoji_reply = "🦀".repeat(MAX_REPLY_CHARS - 1);
        let forest = vec![comment("a question", vec![leaf(&emoji_reply)])];
        assert_eq!(flatten(&forest).len(), 1);
    }

    #[test]
    fn test_empty_reply_emits_nothing() {
        let forest = vec![comment("a question", vec![leaf(""), leaf("   ")])];
        assert!(flatten(&forest).is_empty());
    }

    #[test]
    fn test_nested_replies_are_not_walked() {
        // Only parent -> direct reply edges become pairs
        let grandchild = leaf("deep reply");
        let child = comment("short reply", vec![grandchild]);
        let forest = vec![comment("a question", vec![child])];
        let pairs = flatten(&forest);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].response(), "short reply");
    }
}
