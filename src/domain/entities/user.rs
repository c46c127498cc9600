use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Avatar shown for users without one of their own.
pub const DEFAULT_AVATAR_URL: &str = "https://hackclub.com/team/orpheus.jpg";

/// Author of a Scrapbook post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: String,
    username: String,
    #[serde(default)]
    streak_count: u32,
    #[serde(default)]
    avatar: Option<String>,
}

impl User {
    /// Creates a new user.
    #[must_use]
    pub fn new(id: impl Into<String>, username: impl Into<String>, streak_count: u32) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            streak_count,
            avatar: None,
        }
    }

    /// Sets the avatar URL string.
    #[must_use]
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Returns the user ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the current posting streak.
    #[must_use]
    pub const fn streak_count(&self) -> u32 {
        self.streak_count
    }

    /// Returns the avatar URL, falling back to the default avatar when the
    /// user has none or it does not parse.
    #[must_use]
    pub fn avatar_url(&self) -> Option<Url> {
        self.avatar
            .as_deref()
            .and_then(|raw| Url::parse(raw).ok())
            .or_else(|| Url::parse(DEFAULT_AVATAR_URL).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_camel_case_fields() {
        let json = r#"{"id":"u1","username":"orpheus","streakCount":12,"avatar":"https://x/a.png","css":"x"}"#;
        let user: User = serde_json::from_str(json).unwrap();

        assert_eq!(user.username(), "orpheus");
        assert_eq!(user.streak_count(), 12);
        assert_eq!(user.avatar_url().unwrap().as_str(), "https://x/a.png");
    }

    #[test]
    fn test_avatar_fallback() {
        let missing = User::new("u1", "a", 0);
        assert_eq!(missing.avatar_url().unwrap().as_str(), DEFAULT_AVATAR_URL);

        let malformed = User::new("u2", "b", 0).with_avatar("not a url");
        assert_eq!(malformed.avatar_url().unwrap().as_str(), DEFAULT_AVATAR_URL);
    }
}
