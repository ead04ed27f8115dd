// ── Entity identity ──
//
// Backend ids are integer primary keys. Records built locally after a
// failed write get a millisecond timestamp instead, so both share one
// integer newtype.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};

/// Canonical identifier for a project, section, event, product, or order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(i64);

static LAST_SYNTHESIZED: AtomicI64 = AtomicI64::new(0);

impl EntityId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    /// A fresh local id from the current time in milliseconds.
    ///
    /// Strictly increasing within the process: two records built in the
    /// same millisecond still get distinct ids.
    pub fn synthesize() -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        let mut last = LAST_SYNTHESIZED.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match LAST_SYNTHESIZED.compare_exchange_weak(
                last,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Self(next),
                Err(current) => last = current,
            }
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn synthesized_ids_are_unique_and_increasing() {
        let a = EntityId::synthesize();
        let b = EntityId::synthesize();
        let c = EntityId::synthesize();
        assert!(a < b && b < c);
    }

    #[test]
    fn synthesized_ids_look_like_timestamps() {
        let before = chrono::Utc::now().timestamp_millis();
        let id = EntityId::synthesize();
        assert!(id.get() >= before);
    }

    #[test]
    fn parses_from_cli_input() {
        assert_eq!(" 42 ".parse::<EntityId>().unwrap(), EntityId::new(42));
        assert!("abc".parse::<EntityId>().is_err());
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&EntityId::new(7)).unwrap();
        assert_eq!(json, "7");
    }
}
