//! Tracing and logging setup
//!
//! One subscriber per process: a `fmt` layer (pretty or JSON) under an
//! `EnvFilter` that honours `RUST_LOG` and falls back to the configured level.

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::Registry,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter, Layer,
};

use crate::config::Environment;

/// Subscriber options
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Fallback filter when `RUST_LOG` is unset
    pub level: Level,
    /// Structured output for log shippers
    pub json: bool,
    /// Emit span open/close events
    pub span_events: bool,
    pub file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json: false,
            span_events: false,
            file_line: true,
        }
    }
}

impl TracingConfig {
    /// Preset for a deployment environment
    ///
    /// Development logs at debug with span events; production emits JSON
    /// without source locations.
    #[must_use]
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                level: Level::DEBUG,
                span_events: true,
                ..Self::default()
            },
            Environment::Staging => Self::default(),
            Environment::Production => Self {
                json: true,
                file_line: false,
                ..Self::default()
            },
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

fn build_subscriber(config: &TracingConfig) -> impl SubscriberInitExt {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    let fmt_layer = fmt::layer()
        .with_file(config.file_line)
        .with_line_number(config.file_line)
        .with_span_events(config.span_events());

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = if config.json {
        fmt_layer.json().boxed()
    } else {
        fmt_layer.boxed()
    };

    tracing_subscriber::registry().with(fmt_layer).with(env_filter)
}

/// Install the global subscriber
///
/// Safe to call more than once; later calls report `AlreadyInitialized`.
pub fn try_init_tracing(config: &TracingConfig) -> Result<(), TracingError> {
    build_subscriber(config)
        .try_init()
        .map_err(|_: TryInitError| TracingError::AlreadyInitialized)
}

/// Tracing initialization errors
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_presets() {
        let dev = TracingConfig::for_environment(Environment::Development);
        assert_eq!(dev.level, Level::DEBUG);
        assert!(dev.span_events);
        assert!(!dev.json);

        let prod = TracingConfig::for_environment(Environment::Production);
        assert_eq!(prod.level, Level::INFO);
        assert!(prod.json);
        assert!(!prod.file_line);
    }

    #[test]
    fn test_level_override() {
        let config = TracingConfig::for_environment(Environment::Development).with_level(Level::WARN);
        assert_eq!(config.level, Level::WARN);
        assert!(config.span_events);
    }

    #[test]
    fn test_second_init_reports_already_initialized() {
        let config = TracingConfig::default();
        let _ = try_init_tracing(&config);
        assert!(matches!(
            try_init_tracing(&config),
            Err(TracingError::AlreadyInitialized)
        ));
    }
}
