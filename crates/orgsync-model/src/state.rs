//! Tracked-state ledger records

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One resource as reported by the tracked-state backend's full-state query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateResource {
    pub mode: String,
    #[serde(rename = "type")]
    pub state_type: String,
    pub index: String,
    #[serde(default)]
    pub values: Value,
}

impl StateResource {
    pub fn new(state_type: impl Into<String>, index: impl Into<String>, values: Value) -> Self {
        Self {
            mode: "managed".to_string(),
            state_type: state_type.into(),
            index: index.into(),
            values,
        }
    }

    /// Only managed-mode resources participate in sync; data sources do not.
    pub fn is_managed(&self) -> bool {
        self.mode == "managed"
    }

    /// The canonical address this resource is bound under.
    pub fn address(&self) -> String {
        render_address(&self.state_type, &self.index)
    }
}

/// Render a state address from its type and index parts.
pub fn render_address(state_type: &str, index: &str) -> String {
    format!("{state_type}.this[\"{index}\"]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn address_rendering() {
        let resource = StateResource::new(
            "github_membership",
            "alice",
            json!({"username": "alice", "role": "admin"}),
        );
        assert_eq!(resource.address(), "github_membership.this[\"alice\"]");
        assert!(resource.is_managed());
    }

    #[test]
    fn full_state_records_deserialize() {
        let raw = json!({
            "mode": "data",
            "type": "github_organization",
            "index": "org",
            "values": {"login": "org"}
        });
        let resource: StateResource = serde_json::from_value(raw).unwrap();
        assert!(!resource.is_managed());
    }
}
