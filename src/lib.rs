//! # linkboard
//!
//! Client for the linkboard social API: a persisted session store and the
//! profile feed controller built on top of it.
//!
//! The application root owns one [`auth::SessionStore`] and lends it to each
//! [`feed::ProfileFeed`] as its [`auth::TokenSource`].

pub mod auth;
pub mod config;
pub mod core;
pub mod feed;
pub mod models;
pub mod posts;
pub mod users;

pub use crate::auth::{SessionStore, TokenSource};
pub use crate::core::api::ApiClient;
pub use crate::core::errors::ApiError;
pub use crate::core::storage::{FileStore, KeyValueStore, MemoryStore};
pub use crate::feed::{FeedState, ProfileFeed};
pub use crate::models::models::{AuthOutcome, Comment, Post, Profile, Session};
