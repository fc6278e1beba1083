use serde_json::Value;
use tracing::warn;

use crate::models::models::{Comment, Post, ReactionCounts};

/// Server-confirmed change to a single post.
#[derive(Debug, Clone, PartialEq)]
pub enum PostPatch {
    Text(String),
    Reactions(ReactionCounts),
    Comments(Vec<Comment>),
}

impl Post {
    pub fn apply(&mut self, patch: PostPatch) {
        match patch {
            PostPatch::Text(text) => self.text = text,
            PostPatch::Reactions(counts) => {
                self.likes = counts.likes;
                self.dislikes = counts.dislikes;
            }
            PostPatch::Comments(comments) => self.comments = comments,
        }
    }
}

/// Merge a patch into the matching post. Returns false if no post has that id.
pub fn reconcile(posts: &mut [Post], post_id: &str, patch: PostPatch) -> bool {
    match posts.iter_mut().find(|p| p.id == post_id) {
        Some(post) => {
            post.apply(patch);
            true
        }
        None => false,
    }
}

/// Drop the post with the given id. Returns whether anything was removed.
pub fn remove_post(posts: &mut Vec<Post>, post_id: &str) -> bool {
    let before = posts.len();
    posts.retain(|p| p.id != post_id);
    posts.len() != before
}

/// Coerce the `/posts/me` payload into a post list.
///
/// Accepts a bare array or an object wrapping it under `posts`. Anything else
/// degrades to an empty list.
pub fn coerce_posts(data: Value) -> Vec<Post> {
    let items = match data {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("posts") {
            Some(Value::Array(items)) => items,
            _ => {
                warn!("posts payload is an object without a posts array");
                return Vec::new();
            }
        },
        other => {
            warn!(payload = %other, "posts payload is not an array");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Post>(item) {
            Ok(post) => Some(post),
            Err(e) => {
                warn!(error = %e, "skipping malformed post");
                None
            }
        })
        .collect()
}
