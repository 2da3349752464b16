//! Player kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classification of the player a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "player_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    /// Logged in without a password; all state is discarded on disconnect.
    Guest,
    /// Logged in with valid credentials.
    Authenticated,
    /// Player with administrator privileges.
    Admin,
}

impl PlayerKind {
    /// Check if this kind carries administrator privileges.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Check if the player authenticated with credentials.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated | Self::Admin)
    }

    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Authenticated => "authenticated",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlayerKind {
    type Err = playhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "guest" => Ok(Self::Guest),
            "authenticated" => Ok(Self::Authenticated),
            "admin" => Ok(Self::Admin),
            _ => Err(playhub_core::AppError::validation(format!(
                "Invalid player kind: '{s}'. Expected one of: guest, authenticated, admin"
            ))),
        }
    }
}
