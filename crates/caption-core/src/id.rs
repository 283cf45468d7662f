use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for layer IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Prefix used for generated layer IDs (`text-1718000000000`).
pub const LAYER_ID_PREFIX: &str = "text";

/// A lightweight, interned identifier for text layers.
/// Internally a 4-byte `Spur` index, so comparison and hashing are O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(Spur);

impl LayerId {
    /// Intern a string as a LayerId, or return existing if already interned.
    pub fn intern(s: &str) -> Self {
        LayerId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Build the time-based ID for a millisecond stamp.
    pub fn from_millis(ms: u64) -> Self {
        Self::intern(&format!("{LAYER_ID_PREFIX}-{ms}"))
    }

    /// The millisecond stamp of a generated ID, if this ID has that shape.
    pub fn millis(&self) -> Option<u64> {
        self.as_str()
            .strip_prefix(LAYER_ID_PREFIX)?
            .strip_prefix('-')?
            .parse()
            .ok()
    }
}

/// Issues time-based layer IDs that never repeat within a session.
///
/// IDs are `text-<millis>`. When the clock has not advanced (two layers in the
/// same millisecond) or went backwards, the stamp is bumped past the last one
/// issued, so IDs stay strictly increasing.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next ID for the given wall-clock time.
    pub fn next(&mut self, now_ms: u64) -> LayerId {
        let stamp = now_ms.max(self.last.saturating_add(1));
        self.last = stamp;
        LayerId::from_millis(stamp)
    }

    /// Make sure future IDs sort after `id` (used after loading a session).
    pub fn observe(&mut self, id: LayerId) {
        if let Some(ms) = id.millis() {
            self.last = self.last.max(ms);
        }
    }
}

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LayerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LayerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(LayerId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = LayerId::intern("text-42");
        let b = LayerId::intern("text-42");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "text-42");
        assert_eq!(a.millis(), Some(42));
    }

    #[test]
    fn same_millisecond_ids_are_distinct() {
        let mut ids = IdGenerator::new();
        let a = ids.next(1_000);
        let b = ids.next(1_000);
        let c = ids.next(999);
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(b.millis(), Some(1_001));
        assert_eq!(c.millis(), Some(1_002));
    }

    #[test]
    fn observe_skips_past_loaded_ids() {
        let mut ids = IdGenerator::new();
        ids.observe(LayerId::intern("text-5000"));
        ids.observe(LayerId::intern("custom"));
        assert_eq!(ids.next(10).millis(), Some(5_001));
    }
}
