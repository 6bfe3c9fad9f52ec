use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub default_level: tracing::Level,
    pub json_format: bool,
    pub show_thread_ids: bool,
    pub show_targets: bool,
    /// Whether to write logs to stderr at all
    pub show_logs: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: tracing::Level::INFO,
            json_format: false,
            show_thread_ids: false,
            show_targets: true,
            show_logs: true,
        }
    }
}

impl LogConfig {
    /// Development configuration (verbose, human-readable)
    pub fn dev() -> Self {
        Self {
            default_level: tracing::Level::DEBUG,
            show_thread_ids: true,
            ..Default::default()
        }
    }

    /// Only warnings and errors, for piping JSON output
    pub fn quiet() -> Self {
        Self {
            default_level: tracing::Level::WARN,
            ..Default::default()
        }
    }

    /// Structured JSON log lines
    pub fn with_json(mut self) -> Self {
        self.json_format = true;
        self
    }

    pub fn without_logs(mut self) -> Self {
        self.show_logs = false;
        self
    }

    /// Filter used when `RUST_LOG` is not set
    pub fn fallback_filter(&self) -> String {
        format!(
            "{}={level},konnekt_assessment_core={level}",
            env!("CARGO_PKG_NAME").replace('-', "_"),
            level = self.default_level
        )
    }

    pub fn init(self) -> Result<(), String> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.fallback_filter()));

        if !self.show_logs {
            return tracing_subscriber::registry()
                .with(env_filter)
                .try_init()
                .map_err(|e| format!("Failed to initialize tracing: {}", e));
        }

        if self.json_format {
            let json_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(self.show_targets)
                .with_thread_ids(self.show_thread_ids);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(json_layer)
                .try_init()
                .map_err(|e| format!("Failed to initialize tracing: {}", e))
        } else {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(self.show_targets)
                .with_thread_ids(self.show_thread_ids);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()
                .map_err(|e| format!("Failed to initialize tracing: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.default_level, tracing::Level::INFO);
        assert!(!config.json_format);
        assert!(config.show_logs);
    }

    #[test]
    fn test_dev_config() {
        let config = LogConfig::dev();
        assert_eq!(config.default_level, tracing::Level::DEBUG);
        assert!(config.show_thread_ids);
    }

    #[test]
    fn test_quiet_with_json() {
        let config = LogConfig::quiet().with_json();
        assert_eq!(config.default_level, tracing::Level::WARN);
        assert!(config.json_format);
    }

    #[test]
    fn test_without_logs() {
        assert!(!LogConfig::default().without_logs().show_logs);
    }

    #[test]
    fn test_fallback_filter_names_both_crates() {
        let filter = LogConfig::dev().fallback_filter();
        assert_eq!(
            filter,
            "konnekt_assessment_cli=DEBUG,konnekt_assessment_core=DEBUG"
        );
    }
}
