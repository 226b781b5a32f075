use crate::core::templates::{validate_template, ExtraTemplate, TemplateCatalog};
use crate::domain::model::{Audience, Length, Scenario, Tone, MAX_SPECIFICITY};
use crate::utils::error::{ExcuseError, Result};
use crate::utils::validation::{validate_path, validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub defaults: Option<DefaultsConfig>,
    pub history: Option<HistoryConfig>,
    #[serde(default)]
    pub templates: Vec<ExtraTemplate>,
}

/// Request values used when the command line does not set them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub scenario: Option<Scenario>,
    pub audience: Option<Audience>,
    pub tone: Option<Tone>,
    pub specificity: Option<u8>,
    pub length: Option<Length>,
    pub context: Option<String>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub persist: Option<bool>,
    pub dir: Option<String>,
}

impl TomlConfig {
    /// Reads and parses a config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ExcuseError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses config text after `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ExcuseError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Unknown variables are kept as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ExcuseError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(specificity) = self.defaults.as_ref().and_then(|d| d.specificity) {
            validate_range("defaults.specificity", specificity, 0, MAX_SPECIFICITY)?;
        }

        if let Some(dir) = self.history_dir() {
            validate_path("history.dir", dir)?;
        }

        for template in &self.templates {
            validate_template(&template.text)?;
        }

        Ok(())
    }

    pub fn history_dir(&self) -> Option<&str> {
        self.history.as_ref().and_then(|h| h.dir.as_deref())
    }

    pub fn persist_history(&self) -> bool {
        self.history
            .as_ref()
            .and_then(|h| h.persist)
            .unwrap_or(false)
    }

    /// Built-in templates plus the ones from `[[templates]]`.
    pub fn catalog(&self) -> Result<TemplateCatalog> {
        let mut catalog = TemplateCatalog::builtin();
        catalog.extend(&self.templates)?;
        Ok(catalog)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
