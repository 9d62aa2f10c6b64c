/// Dataset persistence: the JSON file handed from `generate-apis` to the server.
///
/// Loading is strict about shape (required strings present, URLs absolute, slugs unique) and
/// lenient about the declared `count`, which only produces a [`Diagnostic`].
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use mcp_common::error::CommonError;
use tracing::info;
use url::Url;

use crate::error::AppError;
use crate::model::Dataset;
use crate::text::normalize_key;

/// Non-fatal findings produced while loading or indexing a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    CountMismatch { declared: u64, actual: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::CountMismatch { declared, actual } => write!(
                f,
                "dataset count mismatch: declared {declared}, actual {actual}"
            ),
        }
    }
}

pub fn count_diagnostic(dataset: &Dataset) -> Option<Diagnostic> {
    let actual = dataset.apis.len();
    (dataset.count != actual as u64).then_some(Diagnostic::CountMismatch {
        declared: dataset.count,
        actual,
    })
}

pub fn parse_dataset(json: &str) -> Result<Dataset, AppError> {
    let dataset: Dataset =
        serde_json::from_str(json).map_err(|e| AppError::Validation(e.to_string()))?;
    validate(&dataset)?;
    Ok(dataset)
}

pub fn load_dataset(path: &Path) -> Result<Dataset, AppError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("failed to read {}: {e}", path.display())))?;
    let dataset = parse_dataset(&json)?;
    info!(path = %path.display(), entries = dataset.apis.len(), "dataset loaded");
    Ok(dataset)
}

/// Write pretty-printed JSON, creating parent directories as needed.
pub fn write_dataset(path: &Path, dataset: &Dataset) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(CommonError::from)?;
    }
    let json = serde_json::to_string_pretty(dataset).map_err(CommonError::from)?;
    std::fs::write(path, json).map_err(CommonError::from)?;
    info!(path = %path.display(), entries = dataset.apis.len(), "dataset written");
    Ok(())
}

/// Absolute URLs everywhere, and slugs that are non-empty and unique (case-insensitively).
pub fn validate(dataset: &Dataset) -> Result<(), AppError> {
    check_url("source", &dataset.source)?;
    let mut slugs = HashSet::new();
    for (i, api) in dataset.apis.iter().enumerate() {
        let slug = normalize_key(&api.slug);
        if slug.is_empty() {
            return Err(AppError::Validation(format!("apis[{i}].slug: empty slug")));
        }
        if !slugs.insert(slug) {
            return Err(AppError::Validation(format!(
                "apis[{i}].slug: duplicate slug {:?}",
                api.slug
            )));
        }
        for (j, reference) in api.references.iter().enumerate() {
            check_url(&format!("apis[{i}].references[{j}].url"), &reference.url)?;
        }
    }
    Ok(())
}

fn check_url(field: &str, value: &str) -> Result<(), AppError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| AppError::Validation(format!("{field}: invalid URL {value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture_dataset;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_round_trip_preserves_dataset() {
        let dataset = fixture_dataset();
        let json = serde_json::to_string(&dataset).unwrap();
        assert!(json.contains("\"generatedAt\""));
        assert!(json.contains("\"anchorId\""));
        assert_eq!(parse_dataset(&json).unwrap(), dataset);
    }

    #[test]
    fn file_round_trip_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("apis.json");
        let dataset = fixture_dataset();

        write_dataset(&path, &dataset).unwrap();
        assert_eq!(load_dataset(&path).unwrap(), dataset);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let json = r#"{"source":"https://moodledev.io/docs/4.5/apis","generatedAt":"x","count":1,
            "apis":[{"title":"A","slug":"a","anchorId":"a","category":"C","summary":"","references":[]}]}"#;
        let err = parse_dataset(json).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("categoryId")));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let json = r#"{"source":"https://moodledev.io/docs/4.5/apis","generatedAt":"x","count":-1,"apis":[]}"#;
        assert!(matches!(parse_dataset(json), Err(AppError::Validation(_))));
    }

    #[test]
    fn malformed_reference_url_is_rejected() {
        let json = r#"{"source":"https://moodledev.io/docs/4.5/apis","generatedAt":"x","count":1,
            "apis":[{"title":"A","slug":"a","anchorId":"a","category":"C","categoryId":"c",
            "summary":"","references":[{"title":"bad","url":"/relative/only"}]}]}"#;
        let err = parse_dataset(json).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("apis[0].references[0].url")));
    }

    #[test]
    fn empty_slug_is_rejected() {
        let mut dataset = fixture_dataset();
        dataset.apis[2].slug = " \u{200B}".to_string();
        let json = serde_json::to_string(&dataset).unwrap();
        let err = parse_dataset(&json).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("apis[2].slug")));
    }

    #[test]
    fn duplicate_slug_is_rejected() {
        let mut dataset = fixture_dataset();
        dataset.apis[3].slug = "CACHE".to_string();
        let json = serde_json::to_string(&dataset).unwrap();
        let err = parse_dataset(&json).unwrap_err();
        assert!(
            matches!(err, AppError::Validation(ref msg) if msg.contains("apis[3].slug") && msg.contains("duplicate"))
        );
    }

    #[test]
    fn malformed_source_is_rejected() {
        let json = r#"{"source":"not a url","generatedAt":"x","count":0,"apis":[]}"#;
        assert!(matches!(parse_dataset(json), Err(AppError::Validation(_))));
    }

    #[test]
    fn count_mismatch_is_a_diagnostic_not_an_error() {
        let mut dataset = fixture_dataset();
        assert_eq!(count_diagnostic(&dataset), None);

        dataset.count = 99;
        let json = serde_json::to_string(&dataset).unwrap();
        let reloaded = parse_dataset(&json).unwrap();
        assert_eq!(
            count_diagnostic(&reloaded),
            Some(Diagnostic::CountMismatch {
                declared: 99,
                actual: 7
            })
        );
    }
}
