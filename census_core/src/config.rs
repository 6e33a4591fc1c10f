use crate::pretty::DEFAULT_MAX_RENDER_LEN;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct ProducerSettings {
    pub command: Vec<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    pub working_dir: Option<PathBuf>,
}

pub fn default_timeout_ms() -> u64 {
    30_000
}

impl ProducerSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct ReportSettings {
    #[serde(default = "default_max_render_len")]
    pub max_render_len: usize,
    #[serde(default)]
    pub format: ReportFormat,
}

pub fn default_max_render_len() -> usize {
    DEFAULT_MAX_RENDER_LEN
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            max_render_len: default_max_render_len(),
            format: ReportFormat::default(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct CensusConfig {
    /// Generator command that populates a scratch corpus before analysis.
    #[serde(default)]
    pub producer: Option<ProducerSettings>,
    /// Existing corpus file to analyze instead of generating one.
    #[serde(default)]
    pub corpus_path: Option<PathBuf>,
    /// Reference list of known adversarial strings. Falls back to the
    /// bundled list when unset.
    #[serde(default)]
    pub reference_path: Option<PathBuf>,
    #[serde(default)]
    pub report: ReportSettings,
}

impl CensusConfig {
    pub fn load_from_file(path: &PathBuf) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file at {:?}: {}", path, e))?;

        let config: CensusConfig = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse TOML from config file {:?}: {}", path, e)
        })?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses() {
        let config: CensusConfig = toml::from_str(
            r#"
            corpus-path = "./words.bin"
            reference-path = "./naughty.txt"

            [producer]
            command = ["./generate_words", "{}"]
            timeout-ms = 5000
            working-dir = "/tmp"

            [report]
            max-render-len = 80
            format = "json"
            "#,
        )
        .unwrap();

        let producer = config.producer.unwrap();
        assert_eq!(producer.command, vec!["./generate_words", "{}"]);
        assert_eq!(producer.timeout(), Duration::from_millis(5000));
        assert_eq!(producer.working_dir, Some(PathBuf::from("/tmp")));
        assert_eq!(config.corpus_path, Some(PathBuf::from("./words.bin")));
        assert_eq!(config.reference_path, Some(PathBuf::from("./naughty.txt")));
        assert_eq!(config.report.max_render_len, 80);
        assert_eq!(config.report.format, ReportFormat::Json);
    }

    #[test]
    fn defaults_are_applied() {
        let config: CensusConfig = toml::from_str(
            r#"
            [producer]
            command = ["./generate_words"]
            "#,
        )
        .unwrap();

        assert_eq!(config.producer.unwrap().timeout_ms, default_timeout_ms());
        assert_eq!(config.report.max_render_len, DEFAULT_MAX_RENDER_LEN);
        assert_eq!(config.report.format, ReportFormat::Text);
        assert!(config.corpus_path.is_none());
        assert!(config.reference_path.is_none());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<CensusConfig, _> = toml::from_str(
            r#"
            no-such-field = true
            "#,
        );
        assert!(result.is_err());
    }
}
