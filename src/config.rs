use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::workflow::deadline::{ComplianceDeadline, DEFAULT_GRACE_PERIOD_DAYS};

/// Main configuration structure for compliance-actions
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ComplianceActionsConfig {
    /// Workflow rule settings
    pub workflow: WorkflowConfig,
    /// Message catalog settings
    pub locale: LocaleConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkflowConfig {
    /// Days after the end of a compliance period during which a report may
    /// still be returned to its supplier
    pub grace_period_days: u32,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LocaleConfig {
    /// TOML catalog replacing the built-in English copy
    pub catalog_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level or EnvFilter directive
    pub log_level: String,
    /// Emit JSON lines instead of human-readable logs
    pub json_logs: bool,
}

impl Default for ComplianceActionsConfig {
    fn default() -> Self {
        Self {
            workflow: WorkflowConfig {
                grace_period_days: DEFAULT_GRACE_PERIOD_DAYS,
            },
            locale: LocaleConfig::default(),
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                json_logs: false,
            },
        }
    }
}

impl ComplianceActionsConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (compliance-actions.toml, .compliance-actions-rc)
    /// 3. Environment variables (COMPLIANCE_ACTIONS__WORKFLOW__GRACE_PERIOD_DAYS, ...)
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if Path::new("compliance-actions.toml").exists() {
            builder = builder.add_source(File::with_name("compliance-actions"));
        }

        if Path::new(".compliance-actions-rc").exists() {
            builder = builder.add_source(
                File::with_name(".compliance-actions-rc").format(config::FileFormat::Toml),
            );
        }

        // Double underscore keeps snake_case field names intact
        builder = builder.add_source(
            Environment::with_prefix("COMPLIANCE_ACTIONS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }

    pub fn deadline(&self) -> ComplianceDeadline {
        ComplianceDeadline::new(self.workflow.grace_period_days)
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<ComplianceActionsConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        // Load .env file first
        let _ = ComplianceActionsConfig::load_env_file();
        ComplianceActionsConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static ComplianceActionsConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let config = config()?;
    tracing::info!(
        grace_period_days = config.workflow.grace_period_days,
        catalog = ?config.locale.catalog_path,
        "Configuration loaded successfully"
    );
    Ok(())
}
