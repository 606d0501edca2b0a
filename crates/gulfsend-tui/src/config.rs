use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use gulfsend_core::plan::{Plan, DEFAULT_PLAN_NAME};
use gulfsend_core::seed::seed_keys;
use gulfsend_core::{ApiKeyRegistry, DashboardConfig};

#[derive(Debug, Parser)]
#[command(name = "gulfsend", about = "GulfSend API key dashboard")]
pub struct Config {
    /// How long a copied key stays flagged (milliseconds)
    #[arg(long, env = "GULFSEND_COPY_FEEDBACK_MS", default_value = "2000")]
    pub copy_feedback_ms: u64,

    /// Prefix for generated secrets and the masked placeholder
    #[arg(long, env = "GULFSEND_KEY_PREFIX", default_value = "tvly-")]
    pub key_prefix: String,

    /// Monthly request limit shown on the plan card
    #[arg(long, env = "GULFSEND_PLAN_LIMIT", default_value = "1000")]
    pub plan_limit: u64,

    /// Start without the example keys
    #[arg(long)]
    pub empty: bool,

    /// Write logs to this file. The terminal owns stdout, so nothing is
    /// logged unless this is set.
    #[arg(long, env = "GULFSEND_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn dashboard_config(&self) -> DashboardConfig {
        DashboardConfig {
            key_prefix: self.key_prefix.clone(),
            copy_feedback: Duration::from_millis(self.copy_feedback_ms),
            plan: Plan {
                name: DEFAULT_PLAN_NAME.into(),
                monthly_limit: self.plan_limit,
            },
        }
    }

    /// Registry the session starts from: the example keys unless `--empty`.
    pub fn registry(&self) -> ApiKeyRegistry {
        let keys = if self.empty { Vec::new() } else { seed_keys() };
        ApiKeyRegistry::with_keys(self.key_prefix.clone(), keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["gulfsend"]).unwrap();
        let dash = config.dashboard_config();
        assert_eq!(dash.copy_feedback, Duration::from_secs(2));
        assert_eq!(dash.key_prefix, "tvly-");
        assert_eq!(dash.plan.monthly_limit, 1_000);
        assert_eq!(config.registry().len(), 5);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "gulfsend",
            "--copy-feedback-ms",
            "500",
            "--key-prefix",
            "sk-",
            "--plan-limit",
            "50",
            "--empty",
        ])
        .unwrap();
        let dash = config.dashboard_config();
        assert_eq!(dash.copy_feedback, Duration::from_millis(500));
        assert_eq!(dash.plan.monthly_limit, 50);
        let registry = config.registry();
        assert!(registry.is_empty());
        assert_eq!(registry.key_prefix(), "sk-");
    }

    #[test]
    fn zero_delay_fails_validation() {
        let config = Config::try_parse_from(["gulfsend", "--copy-feedback-ms", "0"]).unwrap();
        assert!(config.dashboard_config().validate().is_err());
    }
}
