use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Authenticated identity. Only complete when all three fields are non-empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub name: String,
    pub token: String,
    pub id: String,
}

impl Session {
    pub fn from_parts(
        token: Option<String>,
        name: Option<String>,
        id: Option<String>,
    ) -> Option<Self> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        Some(Session {
            token: non_empty(token)?,
            name: non_empty(name)?,
            id: non_empty(id)?,
        })
    }
}

/// Body returned by both auth endpoints.
#[derive(Deserialize, Clone, Debug)]
pub struct AuthResponse {
    pub token: String,
    pub name: String,
    #[serde(alias = "_id")]
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthOutcome {
    Success,
    Failure(String),
}

impl AuthOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileUser {
    pub name: String,
    pub email: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    pub user: ProfileUser,
    pub bio: String,
    pub location: String,
    pub social: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A post as held in the profile feed. Fields the client does not touch
/// (author, date, ...) ride along in `extra`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub text: String,
    #[serde(default, deserialize_with = "reaction_count")]
    pub likes: u64,
    #[serde(default, deserialize_with = "reaction_count")]
    pub dislikes: u64,
    #[serde(default, deserialize_with = "nullable_comments")]
    pub comments: Vec<Comment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of the like/dislike endpoints.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReactionCounts {
    #[serde(default, deserialize_with = "reaction_count")]
    pub likes: u64,
    #[serde(default, deserialize_with = "reaction_count")]
    pub dislikes: u64,
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_comments<'de, D>(deserializer: D) -> Result<Vec<Comment>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Comment>>::deserialize(deserializer)?.unwrap_or_default())
}

// The backend may report reactions as a count or as the array of reacting user ids.
fn reaction_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Array(items) => Ok(items.len() as u64),
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .ok_or_else(|| serde::de::Error::custom(format!("invalid reaction count {}", n))),
        other => Err(serde::de::Error::custom(format!(
            "expected reaction count, got {}",
            other
        ))),
    }
}
