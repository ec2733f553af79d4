//! The identity a containerized process runs as.

use serde::{Deserialize, Serialize};

use crate::{ContainerzError, ContainerzResult};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The identity the containerized process runs as.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunAs {
    /// The user name or uid.
    pub user: String,

    /// The group name or gid.
    pub group: Option<String>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl RunAs {
    /// Creates a run-as identity with a user and no group.
    pub fn user(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            group: None,
        }
    }

    /// Creates a run-as identity with a user and a group.
    pub fn user_and_group(user: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            group: Some(group.into()),
        }
    }

    /// Fails if no user is set. A group on its own is never valid.
    pub fn validate(&self) -> ContainerzResult<()> {
        if self.user.is_empty() {
            return Err(ContainerzError::EmptyRunAsUser);
        }

        Ok(())
    }

    /// Renders the identity as the engine's `user` or `user:group` string.
    pub fn to_user_spec(&self) -> ContainerzResult<String> {
        self.validate()?;

        Ok(match self.group.as_deref() {
            Some(group) if !group.is_empty() => format!("{}:{}", self.user, group),
            _ => self.user.clone(),
        })
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
