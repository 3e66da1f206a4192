use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use symcheck_core::MatcherSettings;
use symcheck_core::dataset::default_known_symptoms;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub matcher: MatcherSettings,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "DatabaseConfig::default_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
        }
    }
}

impl DatabaseConfig {
    fn default_url() -> String {
        Config::home_dir().map_or_else(
            || "sqlite://symcheck.db?mode=rwc".to_string(),
            |dir| format!("sqlite://{}?mode=rwc", dir.join("symcheck.db").display()),
        )
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatasetConfig {
    /// Directory holding the candidate CSV files
    #[serde(default = "DatasetConfig::default_dir")]
    pub dir: PathBuf,
    /// File names tried in order
    #[serde(default = "DatasetConfig::default_candidates")]
    pub candidates: Vec<String>,
    /// Symptoms a dataset should share to be preferred
    #[serde(default = "default_known_symptoms")]
    pub known_symptoms: Vec<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            dir: Self::default_dir(),
            candidates: Self::default_candidates(),
            known_symptoms: default_known_symptoms(),
        }
    }
}

impl DatasetConfig {
    fn default_dir() -> PathBuf {
        Config::home_dir().map_or_else(|| PathBuf::from("."), |dir| dir.join("data"))
    }

    fn default_candidates() -> Vec<String> {
        ["dataset.csv", "sample_dataset_large.csv", "sample_large.csv"]
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_page_size")]
    pub page_size: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            page_size: Self::default_page_size(),
        }
    }
}

impl HistoryConfig {
    const fn default_page_size() -> u64 {
        10
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    #[serde(default = "SessionConfig::default_ttl_hours")]
    pub ttl_hours: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: Self::default_ttl_hours(),
        }
    }
}

impl SessionConfig {
    const fn default_ttl_hours() -> i64 {
        24
    }

    /// Session lifetime. Must be a positive number of hours chrono can represent.
    pub fn ttl(&self) -> anyhow::Result<chrono::Duration> {
        if self.ttl_hours <= 0 {
            anyhow::bail!("session.ttl_hours must be positive, got {}", self.ttl_hours);
        }
        chrono::Duration::try_hours(self.ttl_hours)
            .ok_or_else(|| anyhow::anyhow!("session.ttl_hours is too large: {}", self.ttl_hours))
    }
}

impl Config {
    /// `~/symcheck`, if a home directory exists.
    #[must_use]
    pub fn home_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join("symcheck"))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::ensure_config_dir()?.join("config.json"))
    }

    /// Load `~/symcheck/config.json`, or defaults when it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let config_dir =
            Self::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?;
        let config_path = config_dir.join("config.json");

        if !config_path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        Self::from_json(&std::fs::read_to_string(&config_path)?)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir =
            Self::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?;

        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    /// Write a config file with every default spelled out.
    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        let content = serde_json::to_string_pretty(&Self::default())?;
        std::fs::write(&config_path, content)?;
        std::fs::create_dir_all(Self::default().dataset.dir)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Put a symptom dataset (CSV with a Disease column) into the dataset dir");
        println!("   2. Run 'symcheck register' to create an account");
        println!("   3. Run 'symcheck login' and then 'symcheck check \"fever, cough\"'");
        println!();
        println!("🔧 Configuration options:");
        println!("   - dataset.candidates: CSV file names tried in order");
        println!("   - matcher.max_results: number of ranked diseases shown");
        println!("   - history.page_size: entries per history page");
        println!("   - session.ttl_hours: how long a login lasts");
        println!();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() -> anyhow::Result<()> {
        let config = Config::from_json("{}")?;
        assert_eq!(config.matcher.max_results, 20);
        assert_eq!(config.matcher.limits.max_len, 500);
        assert_eq!(config.history.page_size, 10);
        assert_eq!(config.session.ttl_hours, 24);
        assert_eq!(config.dataset.candidates[0], "dataset.csv");
        assert!(config.dataset.known_symptoms.contains(&"fever".to_string()));
        Ok(())
    }

    #[test]
    fn partial_sections_keep_other_defaults() -> anyhow::Result<()> {
        let config = Config::from_json(
            r#"{
  "database": { "url": "sqlite::memory:" },
  "matcher": { "max_results": 5, "default_specialty": "Family Medicine" }
}"#,
        )?;
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.matcher.max_results, 5);
        assert_eq!(config.matcher.max_alternatives, 5);
        assert_eq!(config.matcher.default_specialty, "Family Medicine");
        Ok(())
    }

    #[test]
    fn session_ttl_must_be_positive_and_representable() -> anyhow::Result<()> {
        assert_eq!(SessionConfig::default().ttl()?, chrono::Duration::hours(24));

        for ttl_hours in [0, -1, i64::MIN, i64::MAX] {
            let session = SessionConfig { ttl_hours };
            assert!(session.ttl().is_err(), "ttl_hours {ttl_hours} was accepted");
        }
        Ok(())
    }

    #[test]
    fn defaults_round_trip_through_json() -> anyhow::Result<()> {
        let json = serde_json::to_string(&Config::default())?;
        let config = Config::from_json(&json)?;
        assert_eq!(config.dataset.candidates, DatasetConfig::default_candidates());
        Ok(())
    }
}
