//! Typed HTTP client for the social API.
//!
//! Every endpoint lives under `<origin>/api`. Authenticated calls carry the
//! token in the `x-auth-token` header rather than `Authorization`.

use http::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::config::{ClientConfig, AUTH_HEADER};
use crate::core::errors::ApiError;
use crate::core::helpers::{api_url, segment, server_message};
use crate::models::models::{AuthResponse, Comment, ReactionCounts};

#[derive(Deserialize)]
struct UpdatedPost {
    text: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base, None)
    }

    pub fn with_timeout(
        base: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base: base.into(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::with_timeout(config.api_base.clone(), config.timeout)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let url = api_url(&self.base, path);
        debug!(%method, %url, "api request");

        let mut request = self.http.request(method, url);
        if let Some(token) = token {
            request = request.header(AUTH_HEADER, token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        if !status.is_success() {
            debug!(status = status.as_u16(), "api request rejected");
            return Err(ApiError::Status {
                status,
                message: server_message(&body),
            });
        }
        Ok(body)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        let body = json!({ "name": name, "email": email, "password": password });
        decode(self.send(Method::POST, "/auth/register", None, Some(body)).await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = json!({ "email": email, "password": password });
        decode(self.send(Method::POST, "/auth/login", None, Some(body)).await?)
    }

    /// Raw profile payload; shape varies between backend versions.
    pub async fn my_profile(&self, token: &str) -> Result<Value, ApiError> {
        self.send(Method::GET, "/profile/me", Some(token), None).await
    }

    /// Raw posts payload; either an array or `{ "posts": [...] }`.
    pub async fn my_posts(&self, token: &str) -> Result<Value, ApiError> {
        self.send(Method::GET, "/posts/me", Some(token), None).await
    }

    /// Returns the text stored by the server.
    pub async fn update_post(
        &self,
        token: &str,
        post_id: &str,
        text: &str,
    ) -> Result<String, ApiError> {
        let path = format!("/posts/{}", segment(post_id));
        let body = json!({ "text": text });
        let response = self.send(Method::PUT, &path, Some(token), Some(body)).await?;
        let updated: UpdatedPost = decode(response)?;
        Ok(updated.text)
    }

    pub async fn delete_post(&self, token: &str, post_id: &str) -> Result<(), ApiError> {
        let path = format!("/posts/{}", segment(post_id));
        self.send(Method::DELETE, &path, Some(token), None).await?;
        Ok(())
    }

    pub async fn like_post(
        &self,
        token: &str,
        post_id: &str,
    ) -> Result<ReactionCounts, ApiError> {
        let path = format!("/posts/{}/like", segment(post_id));
        decode(self.send(Method::PUT, &path, Some(token), Some(json!({}))).await?)
    }

    pub async fn dislike_post(
        &self,
        token: &str,
        post_id: &str,
    ) -> Result<ReactionCounts, ApiError> {
        let path = format!("/posts/{}/dislike", segment(post_id));
        decode(self.send(Method::PUT, &path, Some(token), Some(json!({}))).await?)
    }

    /// Returns the post's full comment list after the insert.
    pub async fn add_comment(
        &self,
        token: &str,
        post_id: &str,
        text: &str,
    ) -> Result<Vec<Comment>, ApiError> {
        let path = format!("/posts/comment/{}", segment(post_id));
        let body = json!({ "text": text });
        decode(self.send(Method::POST, &path, Some(token), Some(body)).await?)
    }

    /// Returns the post's full comment list after the removal.
    pub async fn delete_comment(
        &self,
        token: &str,
        post_id: &str,
        comment_id: &str,
    ) -> Result<Vec<Comment>, ApiError> {
        let path = format!("/posts/comment/{}/{}", segment(post_id), segment(comment_id));
        decode(self.send(Method::DELETE, &path, Some(token), None).await?)
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    Ok(serde_json::from_value(body)?)
}
