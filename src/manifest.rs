use std::path::Path;

use log::warn;
use serde::Deserialize;
use serde::Deserializer;

use crate::error::SetupError;

// -----------------------------------------------------------------------------
// Types

/// One issue described by the manifest.
///
/// Missing fields deserialize to `None`/empty rather than failing the whole
/// manifest. Use [`Record::title`] and [`Record::body`] to read them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub labels: Vec<String>,
    /// Raw JSON, since manifests use both milestone numbers and titles.
    /// Nothing submits it yet.
    #[serde(default)]
    pub milestone: Option<serde_json::Value>,
}

impl Record {
    pub fn new(title: &str, body: &str, labels: &[&str]) -> Self {
        Self {
            title: Some(title.to_string()),
            body: Some(body.to_string()),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            milestone: None,
        }
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }

    /// Names of required fields that are absent or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = vec![];
        if self.title().trim().is_empty() {
            missing.push("title");
        }
        if self.body().trim().is_empty() {
            missing.push("body");
        }
        missing
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

// -----------------------------------------------------------------------------
// Loading

/// Load the records of a manifest file.
///
/// Records without a title or body are passed through with empty values and
/// a warning, unless `strict` is set, in which case the first one found is
/// rejected.
pub async fn load(path: &Path, strict: bool) -> Result<Vec<Record>, SetupError> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Err(SetupError::ManifestNotFound(path.to_path_buf()));
        }
        Err(error) => {
            return Err(SetupError::ManifestUnreadable {
                path: path.to_path_buf(),
                error,
            });
        }
    };
    parse(path, &contents, strict)
}

/// Parse manifest contents. `path` is only used in error messages.
pub fn parse(path: &Path, contents: &str, strict: bool) -> Result<Vec<Record>, SetupError> {
    let records: Vec<Record> =
        serde_json::from_str(contents).map_err(|error| SetupError::MalformedManifest {
            path: path.to_path_buf(),
            error,
        })?;

    for (i, record) in records.iter().enumerate() {
        for field in record.missing_fields() {
            if strict {
                return Err(SetupError::SchemaViolation {
                    path: path.to_path_buf(),
                    index: i + 1,
                    field,
                });
            }
            warn!(
                "Record {} in {} has no {}; submitting it empty",
                i + 1,
                path.display(),
                field
            );
        }
    }

    Ok(records)
}
