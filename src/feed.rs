//! Profile feed controller: the current user's profile plus their posts.
//!
//! All mutations wait for the server and then merge the server's answer into
//! the local list. Nothing is applied optimistically and nothing is refetched.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::auth::TokenSource;
use crate::config::{DELETE_FAILED, FETCH_FAILED, LOGIN_REQUIRED, UPDATE_FAILED};
use crate::core::api::ApiClient;
use crate::core::errors::ApiError;
use crate::core::helpers::is_blank;
use crate::models::models::{Post, Profile};
use crate::posts::{coerce_posts, reconcile, remove_post, PostPatch};
use crate::users::normalize_profile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    Loading,
    /// Blocking, page-level failure.
    Error(String),
    Ready,
}

pub struct ProfileFeed<T: TokenSource> {
    api: ApiClient,
    tokens: T,
    state: FeedState,
    profile: Profile,
    posts: Vec<Post>,
    notice: Option<String>,
    cancel: CancellationToken,
}

impl<T: TokenSource> ProfileFeed<T> {
    pub fn new(api: ApiClient, tokens: T) -> Self {
        Self {
            api,
            tokens,
            state: FeedState::Loading,
            profile: Profile::default(),
            posts: Vec::new(),
            notice: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn post(&self, post_id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == post_id)
    }

    /// Last non-blocking error from a mutation.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Handle that tears the feed down from elsewhere (navigation, Ctrl-C).
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Abandon in-flight requests; their responses are never applied.
    pub fn teardown(&self) {
        self.cancel.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    async fn guarded<R>(
        &self,
        request: impl Future<Output = Result<R, ApiError>>,
    ) -> Result<R, ApiError> {
        if self.cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ApiError::Cancelled),
            result = request => {
                if self.cancel.is_cancelled() {
                    Err(ApiError::Cancelled)
                } else {
                    result
                }
            }
        }
    }

    fn token_for(&self, action: &str) -> Option<String> {
        if self.is_torn_down() {
            debug!(action, "feed torn down, ignoring");
            return None;
        }
        let token = self.tokens.token();
        if token.is_none() {
            debug!(action, "no token, skipping");
        }
        token
    }

    /// Fetch profile, then posts. Always leaves `Loading`.
    pub async fn load_profile_and_posts(&mut self) {
        if self.is_torn_down() {
            debug!("feed torn down, skipping load");
            self.state = FeedState::Error(ApiError::Cancelled.to_string());
            return;
        }
        let Some(token) = self.token_for("load") else {
            self.state = FeedState::Error(LOGIN_REQUIRED.to_string());
            return;
        };

        self.state = FeedState::Loading;
        self.notice = None;

        match self.fetch_all(&token).await {
            Ok(()) => self.state = FeedState::Ready,
            Err(ApiError::Cancelled) => {
                debug!("profile load abandoned");
                self.state = FeedState::Error(ApiError::Cancelled.to_string());
            }
            Err(e) => {
                error!(error = %e, "error fetching profile/posts");
                self.state = FeedState::Error(FETCH_FAILED.to_string());
            }
        }
    }

    async fn fetch_all(&mut self, token: &str) -> Result<(), ApiError> {
        let raw_profile = self.guarded(self.api.my_profile(token)).await?;
        self.profile = normalize_profile(&raw_profile);

        let raw_posts = self.guarded(self.api.my_posts(token)).await?;
        self.posts = coerce_posts(raw_posts);
        Ok(())
    }

    /// Replace a post's text with whatever the server stored.
    pub async fn update_post(&mut self, post_id: &str, new_text: &str) -> bool {
        let Some(token) = self.token_for("update_post") else {
            if !self.is_torn_down() {
                self.notice = Some(UPDATE_FAILED.to_string());
            }
            return false;
        };

        let result = self.guarded(self.api.update_post(&token, post_id, new_text)).await;
        match result {
            Ok(text) => {
                reconcile(&mut self.posts, post_id, PostPatch::Text(text));
                true
            }
            Err(ApiError::Cancelled) => false,
            Err(e) => {
                error!(post_id, error = %e, "error updating post");
                self.notice = Some(UPDATE_FAILED.to_string());
                false
            }
        }
    }

    /// Remove a post once the server confirms the delete.
    pub async fn delete_post(&mut self, post_id: &str) -> bool {
        let Some(token) = self.token_for("delete_post") else {
            if !self.is_torn_down() {
                self.notice = Some(DELETE_FAILED.to_string());
            }
            return false;
        };

        let result = self.guarded(self.api.delete_post(&token, post_id)).await;
        match result {
            Ok(()) => {
                if !remove_post(&mut self.posts, post_id) {
                    warn!(post_id, "deleted post was not in the feed");
                }
                true
            }
            Err(ApiError::Cancelled) => false,
            Err(e) => {
                error!(post_id, error = %e, "error deleting post");
                self.notice = Some(DELETE_FAILED.to_string());
                false
            }
        }
    }

    pub async fn like_post(&mut self, post_id: &str) {
        let Some(token) = self.token_for("like_post") else {
            return;
        };
        let result = self.guarded(self.api.like_post(&token, post_id)).await;
        self.settle(post_id, "liking post", result.map(PostPatch::Reactions));
    }

    pub async fn dislike_post(&mut self, post_id: &str) {
        let Some(token) = self.token_for("dislike_post") else {
            return;
        };
        let result = self.guarded(self.api.dislike_post(&token, post_id)).await;
        self.settle(post_id, "disliking post", result.map(PostPatch::Reactions));
    }

    /// Blank text is ignored without touching the network.
    pub async fn add_comment(&mut self, post_id: &str, text: &str) {
        if is_blank(text) {
            return;
        }
        let Some(token) = self.token_for("add_comment") else {
            return;
        };
        let result = self.guarded(self.api.add_comment(&token, post_id, text)).await;
        self.settle(post_id, "adding comment", result.map(PostPatch::Comments));
    }

    pub async fn delete_comment(&mut self, post_id: &str, comment_id: &str) {
        let Some(token) = self.token_for("delete_comment") else {
            return;
        };
        let result = self
            .guarded(self.api.delete_comment(&token, post_id, comment_id))
            .await;
        self.settle(post_id, "deleting comment", result.map(PostPatch::Comments));
    }

    // Reactions and comments fail quietly: logged, state untouched.
    fn settle(&mut self, post_id: &str, action: &str, result: Result<PostPatch, ApiError>) {
        match result {
            Ok(patch) => {
                if !reconcile(&mut self.posts, post_id, patch) {
                    warn!(post_id, action, "post not in feed, response dropped");
                }
            }
            Err(ApiError::Cancelled) => debug!(post_id, action, "abandoned"),
            Err(e) => error!(post_id, error = %e, "error {}", action),
        }
    }
}
