//! GitHub label definitions and creation outcomes.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// A repository label as passed to `gh label create`.
pub struct Label {
    pub name: String,
    /// Six hex digits, no leading `#`.
    pub color: String,
    #[serde(default)]
    pub description: String,
}

impl Label {
    pub fn new(name: &str, color: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
            description: description.to_string(),
        }
    }

    /// Check name and color; a leading `#` on the color is tolerated and stripped.
    pub fn normalized(mut self) -> Result<Self, String> {
        static HEX: OnceLock<Regex> = OnceLock::new();
        let hex = HEX.get_or_init(|| Regex::new(r"^[0-9a-fA-F]{6}$").expect("static regex"));
        if self.name.trim().is_empty() {
            return Err("label name must not be empty".to_string());
        }
        let c = self.color.trim().trim_start_matches('#').to_string();
        if !hex.is_match(&c) {
            return Err(format!(
                "label '{}' has invalid color '{}' (expected 6 hex digits)",
                self.name, self.color
            ));
        }
        self.color = c.to_lowercase();
        Ok(self)
    }
}

/// The project's standard label set.
pub fn default_labels() -> Vec<Label> {
    [
        ("bug", "d73a4a", "Something isn't working"),
        ("enhancement", "a2eeef", "New feature or request"),
        ("documentation", "0075ca", "Improvements or additions to documentation"),
        ("question", "d876e3", "Further information is requested"),
        ("good first issue", "7057ff", "Good for newcomers"),
        ("help wanted", "008672", "Extra attention is needed"),
        ("duplicate", "cfd3d7", "This issue or pull request already exists"),
        ("invalid", "e4e669", "This doesn't seem right"),
        ("wontfix", "ffffff", "This will not be worked on"),
        ("dependencies", "0366d6", "Dependency updates"),
        ("compiler", "5319e7", "Lexer, parser, type checker"),
        ("runtime", "1d76db", "Interpreter and runtime environment"),
        ("godot", "478cbf", "Godot / GDExtension integration"),
        ("tooling", "c5def5", "Scripts, CI, editor support"),
        ("ci", "bfdadc", "Continuous integration"),
        ("tests", "0e8a16", "Test coverage and test infrastructure"),
        ("performance", "fbca04", "Speed or memory improvements"),
        ("breaking-change", "b60205", "Changes public behavior or syntax"),
        ("priority: high", "e11d21", "Needs attention soon"),
        ("priority: low", "c2e0c6", "Nice to have"),
    ]
    .into_iter()
    .map(|(n, c, d)| Label::new(n, c, d))
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "kebab-case")]
pub enum LabelStatus {
    Created,
    Exists,
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelOutcome {
    pub name: String,
    #[serde(flatten)]
    pub status: LabelStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelSummary {
    pub created: usize,
    pub existing: usize,
    pub failed: usize,
    pub total: usize,
}

impl LabelSummary {
    pub fn from_outcomes(outcomes: &[LabelOutcome]) -> Self {
        let mut s = LabelSummary {
            total: outcomes.len(),
            ..Default::default()
        };
        for o in outcomes {
            match o.status {
                LabelStatus::Created => s.created += 1,
                LabelStatus::Exists => s.existing += 1,
                LabelStatus::Failed(_) => s.failed += 1,
            }
        }
        s
    }
}
