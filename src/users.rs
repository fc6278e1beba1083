use serde_json::Value;
use std::collections::BTreeMap;

use crate::config::{DEFAULT_BIO, DEFAULT_LOCATION};
use crate::models::models::{Profile, ProfileUser};

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn build_user(value: &Value) -> ProfileUser {
    ProfileUser {
        name: non_empty_str(value, "name").unwrap_or_default().to_string(),
        email: non_empty_str(value, "email").unwrap_or_default().to_string(),
    }
}

/// Normalize whatever `/profile/me` returned into a complete [`Profile`].
///
/// Older backends return a flat user document; newer ones nest it under
/// `user`. Missing or empty `bio`/`location` fall back to fixed defaults.
pub fn normalize_profile(data: &Value) -> Profile {
    let user = match data.get("user") {
        Some(nested) if nested.is_object() => build_user(nested),
        _ => build_user(data),
    };

    let social = data
        .get("social")
        .and_then(Value::as_object)
        .map(|links| {
            links
                .iter()
                .filter_map(|(k, v)| v.as_str().map(|url| (k.clone(), url.to_string())))
                .collect()
        })
        .unwrap_or_else(BTreeMap::new);

    Profile {
        user,
        bio: non_empty_str(data, "bio").unwrap_or(DEFAULT_BIO).to_string(),
        location: non_empty_str(data, "location").unwrap_or(DEFAULT_LOCATION).to_string(),
        social,
    }
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            user: ProfileUser::default(),
            bio: DEFAULT_BIO.to_string(),
            location: DEFAULT_LOCATION.to_string(),
            social: BTreeMap::new(),
        }
    }
}

impl Profile {
    pub fn display_name(&self) -> &str {
        if self.user.name.is_empty() {
            "Anonymous User"
        } else {
            &self.user.name
        }
    }

    pub fn initial(&self) -> char {
        self.user.name.chars().next().unwrap_or('U')
    }
}
