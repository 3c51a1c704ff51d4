//! Document identifiers and sharded-path derivation.
//!
//! Records are stored under sharded directories derived from their identifier.
//! To keep path derivation deterministic, identifiers use a canonical form:
//! **32 lowercase hexadecimal characters** (no hyphens) — the same value
//! `Uuid::new_v4().simple()` produces.
//!
//! For a canonical identifier `d`, a record lives at
//! `<collection_dir>/<d[0..2]>/<d[2..4]>/<d>.json`. The two shard levels keep
//! any single directory from fanning out as collections grow.

use std::fmt;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{RecordError, RecordResult};

/// A document identifier in canonical form.
///
/// Once constructed, the identifier is guaranteed to be canonical, so path
/// derivation and display are always consistent. Use [`DocumentId::new`] when
/// allocating an identifier for a fresh record and [`DocumentId::parse`] to
/// validate an externally supplied one (CLI argument, URL path segment).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be canonical.
    ///
    /// Other common UUID forms (hyphenated, uppercase) are not normalised;
    /// callers must supply the canonical representation.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidInput`] if `input` is not 32 lowercase
    /// hex characters.
    pub fn parse(input: &str) -> RecordResult<Self> {
        let canonical = input.len() == 32
            && input
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        if !canonical {
            return Err(RecordError::InvalidInput(format!(
                "document id must be 32 lowercase hex characters, got: '{}'",
                input
            )));
        }

        let uuid = Uuid::parse_str(input).map_err(|e| {
            RecordError::InvalidInput(format!("document id is not a valid UUID: {}", e))
        })?;
        Ok(Self(uuid))
    }

    /// Returns the record's path below the collection directory:
    /// `<s1>/<s2>/<id>.json`.
    pub fn sharded_path(&self, collection_dir: &Path) -> PathBuf {
        let id = self.to_string();
        collection_dir
            .join(&id[0..2])
            .join(&id[2..4])
            .join(format!("{}.json", id))
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl serde::Serialize for DocumentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for DocumentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DocumentId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_canonical() {
        let id = DocumentId::new().to_string();
        assert_eq!(id.len(), 32);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn parse_roundtrips_generated_ids() {
        let id = DocumentId::new();
        let parsed = DocumentId::parse(&id.to_string()).expect("generated id should parse");
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_rejects_hyphenated_form() {
        let err = DocumentId::parse("550e8400-e29b-41d4-a716-446655440000")
            .expect_err("hyphenated form should be rejected");
        assert!(matches!(err, RecordError::InvalidInput(_)));
    }

    #[test]
    fn parse_rejects_uppercase_and_short_input() {
        assert!(DocumentId::parse("550E8400E29B41D4A716446655440000").is_err());
        assert!(DocumentId::parse("abc123").is_err());
    }

    #[test]
    fn sharded_path_uses_two_levels() {
        let id = DocumentId::parse("550e8400e29b41d4a716446655440000")
            .expect("canonical id should parse");
        let path = id.sharded_path(Path::new("data/MidwifeNotes"));
        assert_eq!(
            path,
            Path::new("data/MidwifeNotes/55/0e/550e8400e29b41d4a716446655440000.json")
        );
    }
}
