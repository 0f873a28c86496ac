use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::generator::TABLE_RANGE;
use crate::session::question::ExerciseType;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_network_enabled")]
    pub network_enabled: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_question_limit")]
    pub question_limit: usize,
    #[serde(default = "default_megamix_limit")]
    pub megamix_limit: usize,
    #[serde(default = "default_time_limit_secs")]
    pub time_limit_secs: u64,
    #[serde(default = "default_factor_time_limit_secs")]
    pub factor_time_limit_secs: u64,
    #[serde(default = "default_correct_delay_ms")]
    pub correct_delay_ms: u64,
    #[serde(default = "default_incorrect_delay_ms")]
    pub incorrect_delay_ms: u64,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Setup screen remembers the previous selection.
    #[serde(default = "default_last_mode")]
    pub last_mode: ExerciseType,
    #[serde(default)]
    pub last_tables: Vec<u32>,
}

fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_network_enabled() -> bool {
    true
}
fn default_request_timeout_secs() -> u64 {
    5
}
fn default_question_limit() -> usize {
    40
}
fn default_megamix_limit() -> usize {
    100
}
fn default_time_limit_secs() -> u64 {
    6
}
fn default_factor_time_limit_secs() -> u64 {
    20
}
fn default_correct_delay_ms() -> u64 {
    500
}
fn default_incorrect_delay_ms() -> u64 {
    10_000
}
fn default_theme() -> String {
    "default".to_string()
}
fn default_last_mode() -> ExerciseType {
    ExerciseType::Multiplication
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            network_enabled: default_network_enabled(),
            request_timeout_secs: default_request_timeout_secs(),
            question_limit: default_question_limit(),
            megamix_limit: default_megamix_limit(),
            time_limit_secs: default_time_limit_secs(),
            factor_time_limit_secs: default_factor_time_limit_secs(),
            correct_delay_ms: default_correct_delay_ms(),
            incorrect_delay_ms: default_incorrect_delay_ms(),
            theme: default_theme(),
            last_mode: default_last_mode(),
            last_tables: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str::<Config>(&content)?
        } else {
            Config::default()
        };
        config.validate();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tabledrill")
            .join("config.toml")
    }

    /// Clamp hand-edited values back into ranges the quiz can run with.
    pub fn validate(&mut self) {
        self.request_timeout_secs = self.request_timeout_secs.clamp(1, 60);
        self.question_limit = self.question_limit.clamp(1, 500);
        self.megamix_limit = self.megamix_limit.clamp(1, 500);
        self.time_limit_secs = self.time_limit_secs.clamp(1, 300);
        self.factor_time_limit_secs = self
            .factor_time_limit_secs
            .clamp(self.time_limit_secs, 300);
        self.correct_delay_ms = self.correct_delay_ms.min(10_000);
        self.incorrect_delay_ms = self.incorrect_delay_ms.min(30_000);
        self.last_tables.retain(|t| TABLE_RANGE.contains(t));
        self.last_tables.sort_unstable();
        self.last_tables.dedup();
        if self.server_url.trim().is_empty() {
            self.server_url = default_server_url();
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Cap on how many cards one session asks.
    pub fn limit_for(&self, mode: ExerciseType) -> usize {
        if mode.is_megamix() {
            self.megamix_limit
        } else {
            self.question_limit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.question_limit, 40);
        assert_eq!(config.megamix_limit, 100);
        assert_eq!(config.time_limit_secs, 6);
        assert_eq!(config.factor_time_limit_secs, 20);
        assert_eq!(config.correct_delay_ms, 500);
        assert_eq!(config.incorrect_delay_ms, 10_000);
        assert!(config.network_enabled);
        assert!(config.last_tables.is_empty());
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
server_url = "https://drill.example.org"
time_limit_secs = 15
last_mode = "factor"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server_url, "https://drill.example.org");
        assert_eq!(config.time_limit_secs, 15);
        assert_eq!(config.last_mode, ExerciseType::Factorization);
        assert_eq!(config.megamix_limit, 100);
    }

    #[test]
    fn test_validate_clamps_out_of_range_values() {
        let mut config = Config {
            question_limit: 0,
            time_limit_secs: 0,
            incorrect_delay_ms: 1_000_000,
            last_tables: vec![13, 3, 0, 3, 2],
            server_url: "  ".to_string(),
            ..Config::default()
        };
        config.validate();
        assert_eq!(config.question_limit, 1);
        assert_eq!(config.time_limit_secs, 1);
        assert_eq!(config.incorrect_delay_ms, 30_000);
        assert_eq!(config.last_tables, vec![2, 3]);
        assert_eq!(config.server_url, "http://localhost:8080");
    }

    #[test]
    fn test_validate_keeps_factor_limit_at_least_base() {
        let mut config = Config {
            time_limit_secs: 30,
            factor_time_limit_secs: 5,
            ..Config::default()
        };
        config.validate();
        assert_eq!(config.factor_time_limit_secs, 30);
    }

    #[test]
    fn test_limit_for_mode() {
        let config = Config::default();
        assert_eq!(config.limit_for(ExerciseType::Addition), 40);
        assert_eq!(config.limit_for(ExerciseType::Megamix), 100);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            last_tables: vec![4, 7],
            last_mode: ExerciseType::Subtraction,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.last_tables, vec![4, 7]);
        assert_eq!(loaded.last_mode, ExerciseType::Subtraction);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.theme, "default");
    }
}
