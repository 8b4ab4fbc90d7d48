// src/models/user.rs

use std::fmt;

use serde::Serialize;

/// Identity of the caller, resolved by the auth middleware from the bearer token's `sub` claim.
///
/// The value is opaque: it is whatever identifier the auth collaborator issued,
/// and every engine operation takes it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
