use academy_bridge_engine::{ArticleId, Section};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid article pattern {pattern:?} in {config_path}: {source}")]
    InvalidPattern {
        config_path: PathBuf,
        pattern: String,
        source: glob::PatternError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root of a local corpus checkout.
    pub corpus_path: PathBuf,
    #[serde(default = "default_sections")]
    pub sections: Vec<Section>,
    /// Glob patterns over article ids, e.g. `translate/figs-*`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tsv_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

fn default_sections() -> Vec<Section> {
    Section::ALL.to_vec()
}

impl Config {
    pub fn new(corpus_path: impl Into<PathBuf>) -> Self {
        Self {
            corpus_path: corpus_path.into(),
            sections: default_sections(),
            include: vec![],
            exclude: vec![],
            tsv_path: None,
            log_level: None,
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        for pattern in config.include.iter().chain(&config.exclude) {
            glob::Pattern::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                config_path: config_path.to_path_buf(),
                pattern: pattern.clone(),
                source,
            })?;
        }

        // Expand shell variables and tilde in the loaded paths
        config.corpus_path = Self::expand_path(&config.corpus_path).unwrap_or(config.corpus_path);
        config.tsv_path = config
            .tsv_path
            .map(|p| Self::expand_path(&p).unwrap_or(p));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/academy-bridge");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }

    /// Whether an article is part of the run: it must match an `include`
    /// pattern (when any are given) and no `exclude` pattern.
    pub fn selects(&self, id: &ArticleId) -> bool {
        let matches = |pattern: &String| {
            glob::Pattern::new(pattern).is_ok_and(|p| p.matches(id.as_str()))
        };
        let included = self.include.is_empty() || self.include.iter().any(matches);
        included && !self.exclude.iter().any(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/academy-bridge/config.toml"));
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: Config = toml::from_str(r#"corpus_path = "/data/en_ta""#).unwrap();

        assert_eq!(config.sections, Section::ALL.to_vec());
        assert!(config.include.is_empty());
        assert_eq!(config.tsv_path, None);
    }

    #[test]
    fn test_sections_parse_lowercase() {
        let config: Config = toml::from_str(
            r#"
corpus_path = "/data/en_ta"
sections = ["translate", "checking"]
"#,
        )
        .unwrap();

        assert_eq!(config.sections, vec![Section::Translate, Section::Checking]);
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("ACADEMY_TEST_VAR", "/test/env/path");
        }

        let path = PathBuf::from("$ACADEMY_TEST_VAR/subdir");
        let expanded = Config::expand_path(&path);

        assert_eq!(expanded, Some(PathBuf::from("/test/env/path/subdir")));

        unsafe {
            env::remove_var("ACADEMY_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path(&PathBuf::from("~/corpus")).unwrap();

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().ends_with("corpus"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "corpus_path = [").unwrap();

        let result = Config::load_from_path(&config_file);

        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_load_invalid_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "corpus_path = \"/data\"\ninclude = [\"translate/[\"]\n",
        )
        .unwrap();

        let result = Config::load_from_path(&config_file);

        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/config.toml");
        let mut test_config = Config::new("/tmp/en_ta");
        test_config.include = vec!["translate/figs-*".into()];
        test_config.tsv_path = Some(PathBuf::from("/tmp/index.tsv"));

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_selects_include_then_exclude() {
        // Given figs articles included except idioms
        let mut config = Config::new("/tmp/en_ta");
        config.include = vec!["translate/figs-*".into()];
        config.exclude = vec!["translate/figs-idiom".into()];

        // Then selection follows both lists
        assert!(config.selects(&ArticleId::from("translate/figs-metaphor")));
        assert!(!config.selects(&ArticleId::from("translate/figs-idiom")));
        assert!(!config.selects(&ArticleId::from("checking/check-level1")));
    }

    #[test]
    fn test_selects_everything_by_default() {
        let config = Config::new("/tmp/en_ta");
        assert!(config.selects(&ArticleId::from("intro/ta-intro")));
    }
}
