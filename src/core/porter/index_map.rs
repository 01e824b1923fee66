//! Per-kind identifier maps
//!
//! On export a map translates a real store id into the record's position in
//! the document; on import it translates a document position back into the id
//! the target system assigned. Lookups that miss leave the value untouched.

use std::collections::HashMap;
use std::fmt;

/// A top-level section of a porter document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Hospitals,
    Admins,
    Doctors,
    Nurses,
    Patients,
    Appointments,
    Tests,
    Prescriptions,
    LogEntries,
}

impl EntityKind {
    /// Sections in the order they are imported
    pub const IMPORT_ORDER: [EntityKind; 9] = [
        EntityKind::Hospitals,
        EntityKind::Admins,
        EntityKind::Doctors,
        EntityKind::Nurses,
        EntityKind::Patients,
        EntityKind::Appointments,
        EntityKind::Tests,
        EntityKind::Prescriptions,
        EntityKind::LogEntries,
    ];

    /// Document key of this section
    pub fn key(&self) -> &'static str {
        match self {
            EntityKind::Hospitals => "hospitals",
            EntityKind::Admins => "admins",
            EntityKind::Doctors => "doctors",
            EntityKind::Nurses => "nurses",
            EntityKind::Patients => "patients",
            EntityKind::Appointments => "appointments",
            EntityKind::Tests => "tests",
            EntityKind::Prescriptions => "prescriptions",
            EntityKind::LogEntries => "log_entries",
        }
    }

    /// Whether other records can reference entities of this kind
    pub fn is_referenced(&self) -> bool {
        matches!(
            self,
            EntityKind::Hospitals
                | EntityKind::Admins
                | EntityKind::Doctors
                | EntityKind::Nurses
                | EntityKind::Patients
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        EntityKind::IMPORT_ORDER
            .into_iter()
            .find(|kind| kind.key() == normalized)
            .ok_or_else(|| {
                format!(
                    "Unknown section '{}'. Expected one of: {}",
                    s,
                    EntityKind::IMPORT_ORDER.map(|k| k.key()).join(", ")
                )
            })
    }
}

/// A single or list reference as it appears in a document
pub type Ref = Option<i64>;

/// Identifier maps for the referenced kinds, built fresh for every run
#[derive(Debug, Clone, Default)]
pub struct IndexMaps {
    maps: HashMap<EntityKind, HashMap<i64, i64>>,
}

impl IndexMaps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `from` to `to` for `kind`, replacing any earlier mapping
    pub fn insert(&mut self, kind: EntityKind, from: i64, to: i64) {
        self.maps.entry(kind).or_default().insert(from, to);
    }

    pub fn get(&self, kind: EntityKind, from: i64) -> Option<i64> {
        self.maps.get(&kind).and_then(|map| map.get(&from)).copied()
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        self.maps.get(&kind).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.maps.values().all(HashMap::is_empty)
    }

    /// Translate one reference; null stays null and a miss stays raw
    pub fn resolve(&self, kind: EntityKind, reference: Ref) -> Ref {
        reference.map(|raw| self.get(kind, raw).unwrap_or(raw))
    }

    /// Translate every element of a reference list in place
    pub fn resolve_all(&self, kind: EntityKind, references: &mut [Ref]) {
        for reference in references.iter_mut() {
            *reference = self.resolve(kind, *reference);
        }
    }

    pub fn resolve_in_place(&self, kind: EntityKind, reference: &mut Ref) {
        *reference = self.resolve(kind, *reference);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_hit_miss_and_null() {
        let mut maps = IndexMaps::new();
        maps.insert(EntityKind::Doctors, 42, 0);

        assert_eq!(maps.resolve(EntityKind::Doctors, Some(42)), Some(0));
        assert_eq!(maps.resolve(EntityKind::Doctors, Some(7)), Some(7));
        assert_eq!(maps.resolve(EntityKind::Doctors, None), None);
        // Maps are per kind
        assert_eq!(maps.resolve(EntityKind::Patients, Some(42)), Some(42));
    }

    #[test]
    fn test_resolve_all() {
        let mut maps = IndexMaps::new();
        maps.insert(EntityKind::Hospitals, 10, 0);
        maps.insert(EntityKind::Hospitals, 20, 1);

        let mut refs = vec![Some(20), None, Some(30), Some(10)];
        maps.resolve_all(EntityKind::Hospitals, &mut refs);
        assert_eq!(refs, vec![Some(1), None, Some(30), Some(0)]);
    }

    #[test]
    fn test_len_and_empty() {
        let mut maps = IndexMaps::new();
        assert!(maps.is_empty());
        maps.insert(EntityKind::Nurses, 1, 5);
        maps.insert(EntityKind::Nurses, 1, 6);
        assert_eq!(maps.len(EntityKind::Nurses), 1);
        assert_eq!(maps.get(EntityKind::Nurses, 1), Some(6));
        assert!(!maps.is_empty());
    }

    #[test]
    fn test_kind_keys_parse() {
        for kind in EntityKind::IMPORT_ORDER {
            assert_eq!(kind.key().parse::<EntityKind>().unwrap(), kind);
        }
        assert_eq!("log-entries".parse::<EntityKind>().unwrap(), EntityKind::LogEntries);
        assert!("results".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_referenced_kinds() {
        let referenced: Vec<_> = EntityKind::IMPORT_ORDER
            .into_iter()
            .filter(EntityKind::is_referenced)
            .collect();
        assert_eq!(referenced.len(), 5);
        assert!(!EntityKind::Tests.is_referenced());
    }
}
