//! Harness configuration.
//!
//! Configuration can come from environment variables, command line
//! arguments of the embedding binary, or be built programmatically.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RESTCHECK_BASE_URL` | https://apichallenges.eviltester.com/simpleapi | Base URL of the resource under test |
//! | `RESTCHECK_REQUEST_TIMEOUT` | 30 | Per-request timeout (seconds) |
//! | `RESTCHECK_LOG_LEVEL` | info | Log level (error, warn, info, debug, trace) |

use std::time::Duration;

use clap::Parser;

/// Configuration for a contract run.
///
/// Construct from environment variables with [`HarnessConfig::from_env`],
/// from command line arguments with [`HarnessConfig::parse`], or
/// programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "restcheck")]
#[command(about = "Contract-testing harness for CRUD HTTP resources")]
pub struct HarnessConfig {
    /// Base URL of the items resource under test.
    #[arg(
        long,
        env = "RESTCHECK_BASE_URL",
        default_value = "https://apichallenges.eviltester.com/simpleapi"
    )]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = "RESTCHECK_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "RESTCHECK_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: "https://apichallenges.eviltester.com/simpleapi".to_string(),
            request_timeout: 30,
            log_level: "info".to_string(),
        }
    }
}

impl HarnessConfig {
    /// Creates a config from environment variables without requiring
    /// command line arguments.
    ///
    /// A malformed variable is an error, not a fallback to defaults: a
    /// typoed `RESTCHECK_REQUEST_TIMEOUT` must not silently redirect the
    /// run to the default base URL.
    pub fn from_env() -> Result<Self, clap::Error> {
        Self::try_parse_from(std::iter::empty::<std::ffi::OsString>())
    }

    /// Config pointing at a local stub resource, with a short timeout.
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            request_timeout: 5,
            log_level: "debug".to_string(),
        }
    }

    /// The per-request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at run startup.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("restcheck={level}")));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
