//! Hub and route identifiers.
//!
//! Ids are embedded in `:`-separated cache keys, so a valid id is non-empty,
//! carries no surrounding whitespace, and never contains `:`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a string without checking it. See [`parse`](Self::parse).
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Wrap a string, rejecting ids that cannot be used in a cache key.
            pub fn parse(id: &str) -> Result<Self, DomainError> {
                let id = Self::new(id);
                id.validate()?;
                Ok(id)
            }

            /// Fresh time-ordered id.
            pub fn generate() -> Self {
                Self(next_id())
            }

            pub fn validate(&self) -> Result<(), DomainError> {
                if is_valid_id(&self.0) {
                    Ok(())
                } else {
                    Err(DomainError::InvalidId {
                        kind: $kind,
                        id: self.0.clone(),
                    })
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a logistics hub.
    HubId,
    "hub"
);
string_id!(
    /// Identifier of a stored hub-to-hub route.
    RouteId,
    "route"
);

fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.trim() == id && !id.contains(':')
}

/// Hex wall-clock nanoseconds followed by a wrapping process counter.
fn next_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static SEQUENCE: AtomicU64 = AtomicU64::new(0);

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed) & 0xffff;

    format!("{nanos:016x}{seq:04x}")
}
