//! Reading layer: format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers used by the catalog builder.

use forge_core::DomainError;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A slug reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// A duplicate slug was found.
    #[error("duplicate slug '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// An entry parsed but failed domain validation.
    #[error("invalid entry '{entry}' in {file}: {source}")]
    Domain {
        file: PathBuf,
        entry: String,
        #[source]
        source: DomainError,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let extensions = ["ron", "toml", "json"];
    let mut found: Option<PathBuf> = None;

    for ext in &extensions {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(path: &Path, e: impl ToString) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: e.to_string(),
    }
}

/// Deserialize a list from in-memory content. For TOML, extracts the array at
/// `toml_key` from a top-level table. For RON and JSON, deserializes directly
/// as `Vec<T>`. `path` is used only for error context.
pub fn parse_list<T: DeserializeOwned>(
    content: &str,
    format: Format,
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(path, e)),
        Format::Toml => {
            let mut table: toml::Table =
                toml::from_str(content).map_err(|e| parse_error(path, e))?;
            let array = table.remove(toml_key).ok_or_else(|| DataLoadError::Parse {
                file: path.to_path_buf(),
                detail: format!("missing key '{toml_key}' in TOML file"),
            })?;
            array
                .try_into()
                .map_err(|e: toml::de::Error| parse_error(path, e))
        }
    }
}

/// Read a list file; see [`parse_list`] for the per-format layout.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_list(&content, format, path, toml_key)
}

// ===========================================================================
// Slug resolution helpers
// ===========================================================================

/// Look up a slug in a map, returning an `UnresolvedRef` error if not found.
pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    file: &Path,
    expected_kind: &'static str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind,
    })
}

/// Return a `DuplicateName` error if `taken` reports the slug as already
/// defined.
pub fn check_duplicate(taken: bool, name: &str, file: &Path) -> Result<(), DataLoadError> {
    if taken {
        Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BuildingData, ItemData};
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "forge_data_loader_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    // -----------------------------------------------------------------------
    // detect_format
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("items.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("items.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("items.json")).unwrap(), Format::Json);
    }

    #[test]
    fn detect_format_unsupported() {
        for name in ["items.yaml", "items"] {
            let result = detect_format(Path::new(name));
            assert!(matches!(result, Err(DataLoadError::UnsupportedFormat { .. })));
        }
    }

    // -----------------------------------------------------------------------
    // find_data_file / require_data_file
    // -----------------------------------------------------------------------

    #[test]
    fn find_data_file_found_toml() {
        let dir = make_test_dir("find_toml");
        fs::write(dir.join("items.toml"), "").unwrap();

        let result = find_data_file(&dir, "items").unwrap();
        assert_eq!(result, Some(dir.join("items.toml")));

        cleanup(&dir);
    }

    #[test]
    fn find_data_file_missing() {
        let dir = make_test_dir("find_missing");
        assert_eq!(find_data_file(&dir, "items").unwrap(), None);
        cleanup(&dir);
    }

    #[test]
    fn find_data_file_conflict() {
        let dir = make_test_dir("find_conflict");
        fs::write(dir.join("items.ron"), "[]").unwrap();
        fs::write(dir.join("items.json"), "[]").unwrap();

        let result = find_data_file(&dir, "items");
        assert!(matches!(result, Err(DataLoadError::ConflictingFormats { .. })));

        cleanup(&dir);
    }

    #[test]
    fn require_data_file_missing_names_the_file() {
        let dir = make_test_dir("require_missing");

        let err = require_data_file(&dir, "buildings").unwrap_err();
        assert!(matches!(&err, DataLoadError::MissingRequired { file, .. } if file == "buildings"));
        assert!(err.to_string().contains("'buildings'"));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // deserialize_list / parse_list
    // -----------------------------------------------------------------------

    #[test]
    fn deserialize_list_ron() {
        let dir = make_test_dir("list_ron");
        let path = dir.join("items.ron");
        fs::write(&path, r#"[(slug: "iron-ore", name: "Iron Ore")]"#).unwrap();

        let items: Vec<ItemData> = deserialize_list(&path, "items").unwrap();
        assert_eq!(items[0].slug, "iron-ore");

        cleanup(&dir);
    }

    #[test]
    fn deserialize_list_toml_uses_key() {
        let dir = make_test_dir("list_toml");
        let path = dir.join("buildings.toml");
        fs::write(&path, "[[buildings]]\nslug = \"smelter\"\nname = \"Smelter\"\n").unwrap();

        let buildings: Vec<BuildingData> = deserialize_list(&path, "buildings").unwrap();
        assert_eq!(buildings[0].name, "Smelter");

        cleanup(&dir);
    }

    #[test]
    fn parse_list_toml_missing_key() {
        let result: Result<Vec<ItemData>, _> =
            parse_list("other = 1", Format::Toml, Path::new("items.toml"), "items");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("missing key 'items'"));
    }

    #[test]
    fn parse_list_json_error_names_file() {
        let result: Result<Vec<ItemData>, _> =
            parse_list("[{", Format::Json, Path::new("items.json"), "items");
        assert!(matches!(
            result,
            Err(DataLoadError::Parse { ref file, .. }) if file == Path::new("items.json")
        ));
    }

    #[test]
    fn deserialize_list_missing_is_io_error() {
        let result: Result<Vec<BuildingData>, _> =
            deserialize_list(Path::new("/nonexistent/forge/buildings.ron"), "buildings");
        assert!(matches!(result, Err(DataLoadError::Io(_))));
    }

    // -----------------------------------------------------------------------
    // resolve_name / check_duplicate
    // -----------------------------------------------------------------------

    #[test]
    fn resolve_name_found_and_missing() {
        let mut map = HashMap::new();
        map.insert("iron-ore".to_string(), 7u32);
        let file = Path::new("recipes.ron");

        assert_eq!(*resolve_name(&map, "iron-ore", file, "item").unwrap(), 7);
        let err = resolve_name(&map, "copper-ore", file, "item").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unresolved item reference 'copper-ore' in recipes.ron"
        );
    }

    #[test]
    fn check_duplicate_detects_existing() {
        let seen: std::collections::HashSet<String> = ["smelter".to_string()].into();
        let file = Path::new("buildings.ron");

        assert!(check_duplicate(seen.contains("constructor"), "constructor", file).is_ok());
        let err = check_duplicate(seen.contains("smelter"), "smelter", file).unwrap_err();
        assert_eq!(err.to_string(), "duplicate slug 'smelter' in buildings.ron");
    }
}
