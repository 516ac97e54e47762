use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Matches `${name}` markers inside a ticket template.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]*)\}").expect("placeholder pattern is valid"));

/// One input field of a ticket form.
/// `name` is what the template references via `${name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TicketTemplateData {
    pub name: String,
    /// Label shown next to the input
    pub title: String,
    /// Hint text shown inside the empty input
    pub placeholder: String,
}

/// Ticket definition sent to `POST /tickets/<id>`.
/// Keys missing on deserialization fall back to the built-in ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TicketRequest {
    pub title: String,
    pub description: String,
    /// Text with `${name}` markers the server fills in from `data`
    pub template: String,
    pub data: Vec<TicketTemplateData>,
}

impl Default for TicketRequest {
    fn default() -> Self {
        Self {
            title: "Test".to_string(),
            description: "Test".to_string(),
            template: "test: ${test}".to_string(),
            data: vec![TicketTemplateData {
                name: "test".to_string(),
                title: "Test".to_string(),
                placeholder: "test text".to_string(),
            }],
        }
    }
}

impl TicketRequest {
    /// Marker names in order of first appearance, without duplicates.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for caps in PLACEHOLDER.captures_iter(&self.template) {
            if let Some(name) = caps.get(1).map(|m| m.as_str()) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Markers in the template that have no matching `data` entry.
    pub fn missing_fields(&self) -> Vec<&str> {
        self.placeholders()
            .into_iter()
            .filter(|name| !self.data.iter().any(|d| d.name == *name))
            .collect()
    }

    /// `data` entries the template never references.
    pub fn unused_fields(&self) -> Vec<&str> {
        let used = self.placeholders();
        self.data
            .iter()
            .map(|d| d.name.as_str())
            .filter(|name| !used.contains(name))
            .collect()
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).context("failed to serialize ticket request")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn default_payload_has_expected_shape() {
        let body = TicketRequest::default().to_json_bytes().unwrap();
        let parsed: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(
            parsed,
            json!({
                "title": "Test",
                "description": "Test",
                "template": "test: ${test}",
                "data": [
                    { "name": "test", "title": "Test", "placeholder": "test text" }
                ]
            })
        );
        assert_eq!(parsed.as_object().unwrap().len(), 4);
    }

    #[test]
    fn serialization_is_byte_identical() {
        let first = TicketRequest::default().to_json_bytes().unwrap();
        let second = TicketRequest::default().to_json_bytes().unwrap();
        assert_eq!(first, second);
        assert_eq!(
            String::from_utf8(first).unwrap(),
            r#"{"title":"Test","description":"Test","template":"test: ${test}","data":[{"name":"test","title":"Test","placeholder":"test text"}]}"#
        );
    }

    #[test]
    fn placeholders_are_ordered_and_deduplicated() {
        let ticket = TicketRequest {
            template: "${b} and ${a}, again ${b}; literal $a {c}".to_string(),
            ..Default::default()
        };
        assert_eq!(ticket.placeholders(), vec!["b", "a"]);
    }

    #[test]
    fn missing_and_unused_fields() {
        let ticket = TicketRequest {
            template: "user: ${user}, test: ${test}".to_string(),
            data: vec![
                TicketTemplateData {
                    name: "test".to_string(),
                    title: "Test".to_string(),
                    placeholder: "test text".to_string(),
                },
                TicketTemplateData {
                    name: "extra".to_string(),
                    title: "Extra".to_string(),
                    placeholder: String::new(),
                },
            ],
            ..Default::default()
        };
        assert_eq!(ticket.missing_fields(), vec!["user"]);
        assert_eq!(ticket.unused_fields(), vec!["extra"]);

        let default = TicketRequest::default();
        assert!(default.missing_fields().is_empty());
        assert!(default.unused_fields().is_empty());
    }
}
