//! Entry lifetime policies.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How long a cache entry lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "secs")]
pub enum TtlPolicy {
    /// Entry lives until explicitly deleted.
    #[default]
    Persistent,
    /// Entry expires after the given number of seconds.
    Expiring(u64),
}

impl TtlPolicy {
    /// The lifetime to pass to the backend, if any.
    pub fn ttl(&self) -> Option<Duration> {
        match self {
            Self::Persistent => None,
            Self::Expiring(secs) => Some(Duration::from_secs(*secs)),
        }
    }
}
