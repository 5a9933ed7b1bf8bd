use std::collections::BTreeSet;

use crate::manifest::Record;

/// Color used for labels missing from [`LABEL_COLORS`].
pub const DEFAULT_LABEL_COLOR: &str = "ededed";

/// Known label names and their colors (hex, without `#`).
pub const LABEL_COLORS: &[(&str, &str)] = &[
    // Type
    ("enhancement", "a2eeef"),
    ("bug", "d73a4a"),
    ("documentation", "0075ca"),
    ("testing", "fef2c0"),
    // Component
    ("parser", "d4c5f9"),
    ("renderer", "c5def5"),
    ("cli", "bfdadc"),
    ("vscode-extension", "1d76db"),
    ("figma-plugin", "f9d0c4"),
    // Area
    ("validation", "e99695"),
    ("watch-mode", "bfdadc"),
    ("configuration", "d4c5f9"),
    ("npm", "fbca04"),
    ("packaging", "fbca04"),
    ("api", "0e8a16"),
    ("vitepress", "5319e7"),
    ("website", "0075ca"),
    ("demo", "1d76db"),
    ("vue", "42b883"),
    ("svelte", "ff3e00"),
    ("angular", "dd0031"),
    ("syntax-highlighting", "c5def5"),
    ("intellisense", "c5def5"),
    ("export", "fef2c0"),
    ("import", "fef2c0"),
    ("images", "f9d0c4"),
    ("components", "a2eeef"),
    ("release", "0e8a16"),
    ("marketplace", "0075ca"),
    ("figma-community", "f9d0c4"),
    ("quality", "fef2c0"),
    ("coverage", "fef2c0"),
    ("performance", "d93f0b"),
    ("benchmarks", "fef2c0"),
    ("ci-cd", "0e8a16"),
    ("github-actions", "0e8a16"),
    ("automation", "0e8a16"),
    ("examples", "0075ca"),
    ("showcase", "0075ca"),
    ("pdf", "d4c5f9"),
    ("beta", "fbca04"),
    ("community", "7057ff"),
    ("discord", "7289da"),
    ("support", "d4c5f9"),
    ("marketing", "d876e3"),
    ("product-hunt", "da3633"),
    ("launch", "0e8a16"),
    ("content", "0075ca"),
    ("blog", "0075ca"),
    ("video", "1d76db"),
    ("tutorials", "0075ca"),
    ("styling", "c5def5"),
    ("dark-mode", "0d1117"),
    ("accessibility", "fef2c0"),
    ("a11y", "fef2c0"),
    ("i18n", "bfdadc"),
    ("internationalization", "bfdadc"),
    ("responsive", "c5def5"),
    ("syntax", "d4c5f9"),
    ("states", "a2eeef"),
    ("annotations", "d4c5f9"),
    ("placeholders", "fbca04"),
    ("data", "bfdadc"),
    ("migration", "fbca04"),
    ("versioning", "0e8a16"),
    ("linting", "fef2c0"),
    ("plugins", "a2eeef"),
    ("reusability", "a2eeef"),
    ("telemetry", "d4c5f9"),
    ("analytics", "d4c5f9"),
    ("education", "0075ca"),
    ("theming", "c5def5"),
];

/// A label to create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDefinition {
    pub name: String,
    pub color: String,
    /// Sent with the create/update request when set. The manifest has no
    /// field for it, so derived labels leave it empty and an upsert keeps
    /// whatever description the label already has.
    pub description: Option<String>,
}

impl LabelDefinition {
    /// Label with the color from the static table.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            color: label_color(name).to_string(),
            description: None,
        }
    }
}

/// Look up the color for a label name.
pub fn label_color(name: &str) -> &'static str {
    LABEL_COLORS
        .iter()
        .find(|(label, _)| *label == name)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_LABEL_COLOR)
}

/// Every distinct label used by the records, sorted by name.
pub fn derive_labels(records: &[Record]) -> Vec<LabelDefinition> {
    let names: BTreeSet<&str> = records
        .iter()
        .flat_map(|record| record.labels.iter().map(String::as_str))
        .collect();
    names.into_iter().map(LabelDefinition::new).collect()
}
