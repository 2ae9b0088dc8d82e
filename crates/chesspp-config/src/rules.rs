//! Game-rules document validation.
//!
//! The setup editor lets players paste a JSON rules document before a game.
//! The editor itself is an external collaborator; this module owns the
//! validation it calls into: JSON syntax plus the required top-level shape.

use serde_json::Value;

/// Outcome of validating a rules document. Collects every error rather than
/// stopping at the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesValidation {
    pub errors: Vec<String>,
}

impl RulesValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Required top-level keys of a rules document.
const REQUIRED_KEYS: [&str; 3] = ["version", "units", "abilities"];

/// Validate a game-rules JSON string.
pub fn validate_rules(json: &str) -> RulesValidation {
    let value: Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => {
            return RulesValidation {
                errors: vec![format!("invalid JSON syntax: {e}")],
            }
        }
    };

    let mut errors = Vec::new();

    let Some(object) = value.as_object() else {
        return RulesValidation {
            errors: vec!["rules document must be a JSON object".into()],
        };
    };

    for key in REQUIRED_KEYS {
        if !object.contains_key(key) {
            errors.push(format!("missing required key {key:?}"));
        }
    }

    if let Some(version) = object.get("version") {
        if !version.is_string() {
            errors.push("version must be a string".into());
        }
    }
    for key in ["units", "abilities"] {
        if let Some(section) = object.get(key) {
            if !section.is_object() {
                errors.push(format!("{key} must be a JSON object"));
            }
        }
    }

    RulesValidation { errors }
}

/// The default rules template offered to the editor.
pub fn default_rules_json() -> String {
    serde_json::to_string_pretty(&serde_json::json!({
        "version": "1.0",
        "units": {},
        "abilities": {}
    }))
    .unwrap_or_default()
}
