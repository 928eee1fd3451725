//! City registry: display name → opaque source identifier.
//!
//! Loaded once at startup from a JSON object file and read-only thereafter.
//! The map is BTreeMap-backed so iteration order (and therefore everything
//! dispatch order could leak into) is deterministic.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::AppError;

/// The fixed set of cities a run operates on.
#[derive(Debug, Clone)]
pub struct CityRegistry {
    cities: BTreeMap<String, String>,
}

impl CityRegistry {
    /// Load the registry from a JSON object file (`{"MOSCOW": "moscow-...", ...}`).
    ///
    /// An unreadable, malformed, or empty file is a configuration error.
    pub fn from_file(path: &Path) -> Result<CityRegistry, AppError> {
        let json = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read city registry '{}': {e}", path.display()))
        })?;
        let cities: BTreeMap<String, String> = serde_json::from_str(&json).map_err(|e| {
            AppError::Config(format!(
                "malformed city registry '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_entries(cities)
    }

    /// Build a registry from in-memory entries. Used by tests and by
    /// `from_file`; rejects an empty set.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, String)>,
    ) -> Result<CityRegistry, AppError> {
        let cities: BTreeMap<String, String> = entries.into_iter().collect();
        if cities.is_empty() {
            return Err(AppError::Config("city registry is empty".to_string()));
        }
        Ok(CityRegistry { cities })
    }

    /// (display name, source identifier) pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cities.iter().map(|(n, id)| (n.as_str(), id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_iterate_in_name_order() {
        let reg = CityRegistry::from_entries([
            ("PARIS".to_string(), "paris-id".to_string()),
            ("BERLIN".to_string(), "berlin-id".to_string()),
            ("MOSCOW".to_string(), "moscow-id".to_string()),
        ])
        .unwrap();
        let names: Vec<&str> = reg.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["BERLIN", "MOSCOW", "PARIS"]);
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn empty_registry_is_a_config_error() {
        let err = CityRegistry::from_entries([]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn malformed_registry_file_is_a_config_error() {
        let path = std::env::temp_dir().join(format!(
            "wrank-registry-{}.json",
            std::process::id()
        ));
        fs::write(&path, "[1, 2, 3]").unwrap();
        let err = CityRegistry::from_file(&path).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        let _ = fs::remove_file(&path);
    }
}
