//! Pipeline configuration, loadable from TOML.

use serde::Deserialize;

use triage_llm::LlmConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Completion endpoint settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Path of the append-only conversation memory log.
    #[serde(default = "default_memory_log_path")]
    pub memory_log_path: String,
    /// How many memory log lines to include in replies.
    #[serde(default = "default_tail_lines")]
    pub tail_lines: usize,
}

fn default_memory_log_path() -> String {
    "data/memory/conversation.log".into()
}

fn default_tail_lines() -> usize {
    10
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            memory_log_path: default_memory_log_path(),
            tail_lines: default_tail_lines(),
        }
    }
}

impl PipelineConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: PipelineConfig = toml::from_str("").unwrap();
        assert_eq!(config.memory_log_path, "data/memory/conversation.log");
        assert_eq!(config.tail_lines, 10);
        assert_eq!(config.llm.base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn full_document() {
        let toml_str = r#"
memory_log_path = "/var/lib/triage/conversation.log"
tail_lines = 25

[llm]
base_url = "http://10.13.18.40:2266/v1"
model = "Qwen/Qwen2.5-VL-32B-Instruct"
temperature = 0.0
timeout_secs = 45
"#;
        let config: PipelineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.memory_log_path, "/var/lib/triage/conversation.log");
        assert_eq!(config.tail_lines, 25);
        assert_eq!(config.llm.model, "Qwen/Qwen2.5-VL-32B-Instruct");
        assert_eq!(config.llm.timeout_secs, 45);
    }

    #[test]
    fn partial_llm_section() {
        let config: PipelineConfig = toml::from_str("[llm]\nmodel = \"gemma:2b\"").unwrap();
        assert_eq!(config.llm.model, "gemma:2b");
        assert_eq!(config.tail_lines, 10);
    }
}
