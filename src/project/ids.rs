//! Identifier generation for tracks, items and plugin instances.

use std::cell::Cell;
use std::fmt;

use uuid::Uuid;

/// Source of fresh 128-bit identifiers.
///
/// Every identifier a project assigns goes through this trait so tests
/// can swap in a deterministic sequence.
pub trait IdGenerator: fmt::Debug {
    fn next_id(&self) -> Uuid;
}

/// Random (v4) identifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Counts upward from a starting value: 1, 2, 3, ...
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    last: Cell<u128>,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first id produced will be `start + 1`.
    pub fn starting_after(start: u128) -> Self {
        Self {
            last: Cell::new(start),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> Uuid {
        let next = self.last.get().wrapping_add(1);
        self.last.set(next);
        Uuid::from_u128(next)
    }
}

/// Render an id the way Reaper writes GUIDs: braced, upper-case, hyphenated.
pub fn format_guid(id: &Uuid) -> String {
    format!("{{{}}}", id.hyphenated().to_string().to_uppercase())
}

/// Parse a GUID with or without braces.
pub fn parse_guid(text: &str) -> Option<Uuid> {
    let inner = text
        .trim()
        .trim_start_matches('{')
        .trim_end_matches('}');
    Uuid::parse_str(inner).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIdGenerator::new();
        assert_eq!(ids.next_id(), Uuid::from_u128(1));
        assert_eq!(ids.next_id(), Uuid::from_u128(2));

        let ids = SequentialIdGenerator::starting_after(100);
        assert_eq!(ids.next_id(), Uuid::from_u128(101));
    }

    #[test]
    fn test_random_ids_differ() {
        let ids = UuidGenerator;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn test_guid_format_round_trip() {
        let id = Uuid::from_u128(0xABCDEF);
        let text = format_guid(&id);
        assert_eq!(text, "{00000000-0000-0000-0000-000000ABCDEF}");
        assert_eq!(parse_guid(&text), Some(id));
        assert_eq!(parse_guid("00000000-0000-0000-0000-000000abcdef"), Some(id));
        assert_eq!(parse_guid("{not-a-guid}"), None);
    }
}
