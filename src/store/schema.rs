use serde::{Deserialize, Serialize};

use crate::client::api::Group;

const SCHEMA_VERSION: u32 = 1;

/// Who is playing on this machine, and which class group they joined.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityData {
    pub schema_version: u32,
    #[serde(default)]
    pub player: Option<String>,
    #[serde(default)]
    pub group: Option<Group>,
}

impl Default for IdentityData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            player: None,
            group: None,
        }
    }
}

impl IdentityData {
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_old_file_without_group_loads() {
        let data: IdentityData =
            serde_json::from_str(r#"{"schema_version":1,"player":"Ada"}"#).unwrap();
        assert_eq!(data.player.as_deref(), Some("Ada"));
        assert!(data.group.is_none());
        assert!(!data.needs_reset());
    }

    #[test]
    fn test_future_schema_needs_reset() {
        let data: IdentityData = serde_json::from_str(r#"{"schema_version":9}"#).unwrap();
        assert!(data.needs_reset());
    }
}
