//! Acting user identity.
//!
//! The identity provider resolves a session to a username and an admin flag.
//! Both travel to the remote service in the [`USER_INFO_HEADER`] header as a
//! JSON object whose admin flag is a string:
//!
//! ```json
//! {"username": "alice", "isAdmin": "false"}
//! ```

use crate::error::Result;
use serde::{Deserialize, Deserializer};

/// Header carrying the acting user's identity.
pub const USER_INFO_HEADER: &str = "X-User-Info";

/// The user performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    /// Username as resolved by the identity provider
    pub username: String,

    /// Whether the user holds the admin role
    pub is_admin: bool,
}

impl Identity {
    /// A regular user.
    pub fn user(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_admin: false,
        }
    }

    /// An admin user.
    pub fn admin(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_admin: true,
        }
    }

    /// Encode for the user-info header.
    pub fn header_value(&self) -> String {
        serde_json::json!({
            "username": self.username,
            "isAdmin": self.is_admin.to_string(),
        })
        .to_string()
    }

    /// Decode a user-info header value. The admin flag may be a string or a
    /// JSON bool.
    pub fn from_header_value(value: &str) -> Result<Self> {
        let info: UserInfo = serde_json::from_str(value)?;
        Ok(Self {
            username: info.username,
            is_admin: info.is_admin,
        })
    }
}

#[derive(Deserialize)]
struct UserInfo {
    username: String,
    #[serde(rename = "isAdmin", default, deserialize_with = "lenient_flag")]
    is_admin: bool,
}

fn lenient_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Text(s) => s.trim().eq_ignore_ascii_case("true"),
    })
}
