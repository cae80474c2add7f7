//! Flat-file persistence for registers.
//!
//! The on-disk format is a single JSON object mapping one-character keys to
//! their text, e.g. `{"a": "hello", "1": "world"}`. A missing file reads as
//! an empty object. Anything else that fails to parse as an object of
//! string values fails the whole operation with `ImportFormat` so a partial
//! or garbled file never leaks into the live store.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{ClipError, ClipResult};
use crate::registers::RegisterCategory;

/// Read the register file into a key map. Missing file means empty.
pub fn load(path: &Path) -> ClipResult<BTreeMap<char, String>> {
    if !path.is_file() {
        return Ok(BTreeMap::new());
    }
    let content = fs::read_to_string(path)?;
    parse(&content)
}

/// Write `entries` to `path` as pretty-printed JSON.
pub fn save(path: &Path, entries: &BTreeMap<char, String>) -> ClipResult<()> {
    let by_string: BTreeMap<String, &String> = entries
        .iter()
        .map(|(key, text)| (key.to_string(), text))
        .collect();
    let json = serde_json::to_string_pretty(&by_string)
        .map_err(|e| ClipError::ImportFormat(e.to_string()))?;
    fs::write(path, json)?;
    Ok(())
}

/// Read the file and keep only non-empty entries in `category`, ready to be
/// merged into the live store.
pub fn load_category(path: &Path, category: RegisterCategory) -> ClipResult<BTreeMap<char, String>> {
    let mut entries = load(path)?;
    entries.retain(|key, text| category.contains(*key) && !text.is_empty());
    Ok(entries)
}

/// Remove every key in `category` from the file, leaving the rest in place.
/// The in-memory store is not involved.
pub fn erase_category(path: &Path, category: RegisterCategory) -> ClipResult<()> {
    let mut entries = load(path)?;
    entries.retain(|key, _| !category.contains(*key));
    save(path, &entries)
}

fn parse(content: &str) -> ClipResult<BTreeMap<char, String>> {
    let raw: BTreeMap<String, String> = serde_json::from_str(content)
        .map_err(|e| ClipError::ImportFormat(e.to_string()))?;

    let mut entries = BTreeMap::new();
    for (key, text) in raw {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                entries.insert(c, text);
            }
            _ => {
                return Err(ClipError::ImportFormat(format!(
                    "register key {key:?} is not a single character"
                )));
            }
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClipError;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let entries = load(&dir.path().join("absent.json")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registers.json");

        let mut entries = BTreeMap::new();
        entries.insert('a', "hello".to_string());
        entries.insert('1', "one\ntwo".to_string());
        save(&path, &entries).unwrap();

        assert_eq!(load(&path).unwrap(), entries);
    }

    #[test]
    fn test_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registers.json");
        fs::write(&path, "not json at all").unwrap();
        assert!(matches!(load(&path), Err(ClipError::ImportFormat(_))));
    }

    #[test]
    fn test_non_string_value_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registers.json");
        fs::write(&path, r#"{"a": 3}"#).unwrap();
        assert!(matches!(load(&path), Err(ClipError::ImportFormat(_))));
    }

    #[test]
    fn test_multi_char_key_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registers.json");
        fs::write(&path, r#"{"ab": "x"}"#).unwrap();
        assert!(matches!(load(&path), Err(ClipError::ImportFormat(_))));
    }

    #[test]
    fn test_load_category_filters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registers.json");
        fs::write(&path, r#"{"a": "low", "B": "up", "1": "num", "c": ""}"#).unwrap();

        let lower = load_category(&path, RegisterCategory::Lowercase).unwrap();
        assert_eq!(lower.len(), 1);
        assert_eq!(lower.get(&'a'), Some(&"low".to_string()));

        let all = load_category(&path, RegisterCategory::All).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_erase_category_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registers.json");
        fs::write(&path, r#"{"a": "low", "1": "num"}"#).unwrap();

        erase_category(&path, RegisterCategory::Numbers).unwrap();
        let entries = load(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.get(&'a'), Some(&"low".to_string()));
    }
}
