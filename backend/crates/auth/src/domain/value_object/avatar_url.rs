//! Avatar URL Value Object

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const AVATAR_URL_MAX_LENGTH: usize = 2048;

/// Absolute http(s) URL pointing at the user's picture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarUrl(String);

impl AvatarUrl {
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let url = raw.into().trim().to_string();

        let host = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .and_then(|rest| rest.split(['/', '?', '#']).next())
            .unwrap_or_default();

        if host.is_empty()
            || url.len() > AVATAR_URL_MAX_LENGTH
            || url.chars().any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(AppError::bad_request("Invalid avatar URL"));
        }

        Ok(Self(url))
    }

    pub fn from_db(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
