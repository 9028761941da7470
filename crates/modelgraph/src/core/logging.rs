//! Logging infrastructure for model conversion
//!
//! Structured logging through `tracing`. Every pipeline stage opens a span
//! (`convert_model`, `emit_graph`, `extract_svg_geometry`,
//! `resolve_directions`, `external_render`, `pipeline`) and reports counts
//! as event fields, so a single conversion can be followed end to end.
//!
//! # Usage
//!
//! ```rust,no_run
//! use modelgraph::core::logging::init_logging;
//!
//! init_logging(Some("debug"), Some("pretty")).unwrap();
//! ```
//!
//! # Environment Variables
//!
//! - `MODELGRAPH_LOG_LEVEL`: log level or filter directive (trace|debug|info|warn|error|off)
//! - `MODELGRAPH_LOG_FORMAT`: compact|pretty|json
//! - `RUST_LOG`: standard `tracing-subscriber` filter, consulted last
//!
//! Filtering by component works with the usual directive syntax:
//!
//! ```bash
//! RUST_LOG="info,modelgraph::plugins::layout=trace" modelgraph graph shop.yaml --render
//! ```
//!
//! WASM builds log to the browser console through `tracing-wasm` and ignore
//! the format argument.

use std::fmt;
use std::str::FromStr;

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::{
    fmt::{self as subscriber_fmt, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

#[cfg(target_arch = "wasm32")]
use tracing_wasm::WASMLayerConfig;

pub const LEVEL_ENV: &str = "MODELGRAPH_LOG_LEVEL";
pub const FORMAT_ENV: &str = "MODELGRAPH_LOG_FORMAT";

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Single line per event, no targets
    #[default]
    Compact,
    /// Multi-line with source locations and span activity
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Compact => write!(f, "compact"),
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Logging settings after argument and environment lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub directive: String,
    pub format: LogFormat,
}

impl LogSettings {
    /// Resolve settings: explicit argument, then `MODELGRAPH_*`, then
    /// `RUST_LOG`, then `info`/`compact`
    pub fn resolve(level: Option<&str>, format: Option<&str>) -> Result<Self, String> {
        Self::resolve_with(level, format, |key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup
    pub fn resolve_with<F>(level: Option<&str>, format: Option<&str>, env: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let directive = level
            .map(str::to_string)
            .or_else(|| env(LEVEL_ENV))
            .or_else(|| env("RUST_LOG"))
            .unwrap_or_else(|| "info".to_string());

        let format = match format.map(str::to_string).or_else(|| env(FORMAT_ENV)) {
            Some(name) => LogFormat::from_str(&name)?,
            None => LogFormat::default(),
        };

        Ok(Self { directive, format })
    }
}

/// Initialize the global tracing subscriber
///
/// Returns an error when the format name is invalid or a subscriber is
/// already installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(target_arch = "wasm32")]
    {
        let _ = (level, format);
        tracing_wasm::set_as_global_default_with_config(WASMLayerConfig::default());
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let settings = LogSettings::resolve(level, format)?;

        let filter = if settings.directive == "off" {
            EnvFilter::new("off")
        } else {
            EnvFilter::try_new(&settings.directive).unwrap_or_else(|_| EnvFilter::new("info"))
        };

        let layer: Box<dyn Layer<Registry> + Send + Sync> = match settings.format {
            LogFormat::Compact => subscriber_fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .with_span_events(FmtSpan::NONE)
                .compact()
                .boxed(),
            LogFormat::Pretty => subscriber_fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::ACTIVE)
                .pretty()
                .boxed(),
            LogFormat::Json => subscriber_fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::CLOSE)
                .json()
                .boxed(),
        };

        Registry::default().with(layer).with(filter).try_init()?;
        Ok(())
    }
}

/// Initialize logging with default settings
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}
