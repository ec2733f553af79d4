//! Restart policies and their engine names.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ContainerzError, ContainerzResult};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The condition under which the engine restarts a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestartPolicyKind {
    /// Never restart.
    No,

    /// Always restart, regardless of exit status.
    Always,

    /// Restart only when the container exits with a non-zero status.
    OnFailure,

    /// Always restart unless the container was explicitly stopped.
    UnlessStopped,
}

/// A restart policy as handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RestartPolicy {
    /// The restart condition.
    pub kind: RestartPolicyKind,

    /// The maximum number of restart attempts. Only meaningful for [`RestartPolicyKind::OnFailure`].
    pub max_retries: i64,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl RestartPolicyKind {
    /// Returns the engine's name for this policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::No => "no",
            Self::Always => "always",
            Self::OnFailure => "on-failure",
            Self::UnlessStopped => "unless-stopped",
        }
    }
}

impl RestartPolicy {
    /// Creates a new restart policy.
    pub fn new(kind: RestartPolicyKind, max_retries: i64) -> Self {
        Self { kind, max_retries }
    }

    /// Returns the engine's name for the policy.
    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl TryFrom<i32> for RestartPolicyKind {
    type Error = ContainerzError;

    /// Converts a wire-level policy code into a policy kind.
    fn try_from(code: i32) -> ContainerzResult<Self> {
        match code {
            0 => Ok(Self::No),
            1 => Ok(Self::Always),
            2 => Ok(Self::OnFailure),
            3 => Ok(Self::UnlessStopped),
            _ => Err(ContainerzError::InvalidArgument(format!(
                "unknown restart policy code {}",
                code
            ))),
        }
    }
}

impl fmt::Display for RestartPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
