//! Account session state.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Per-account login state.
///
/// Persisted as the boolean `logged_in` column. Registration and sign-in move
/// an account to `SignedIn`; sign-out moves it to `SignedOut`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoginState {
    /// No active session (initial state).
    #[default]
    SignedOut,
    /// The account has an active session.
    SignedIn,
}

impl LoginState {
    /// Whether this is the signed-in state.
    #[must_use]
    pub const fn is_signed_in(self) -> bool {
        matches!(self, Self::SignedIn)
    }
}

impl From<bool> for LoginState {
    fn from(logged_in: bool) -> Self {
        if logged_in {
            Self::SignedIn
        } else {
            Self::SignedOut
        }
    }
}

impl From<LoginState> for bool {
    fn from(state: LoginState) -> Self {
        state.is_signed_in()
    }
}

impl fmt::Display for LoginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignedOut => f.write_str("signed_out"),
            Self::SignedIn => f.write_str("signed_in"),
        }
    }
}
