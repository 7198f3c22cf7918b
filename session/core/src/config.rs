//! Session Configuration
//!
//! Tunables for the engine, read from the environment at startup.

use std::time::Duration;

/// Default host shell
pub const DEFAULT_SHELL: &str = "sh";

/// Default interval between progress ticks
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Default progress advance per tick
pub const DEFAULT_PROGRESS_STEP: f64 = 0.01;

/// Default visible height of a block viewport after a resize
pub const DEFAULT_VIEWPORT_HEIGHT: u16 = 15;

/// Default character limit of the input field
pub const DEFAULT_INPUT_LIMIT: usize = 500;

/// Engine configuration
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Shell invoked as `<shell> -c <command>`
    pub shell: String,
    /// Interval between progress ticks
    pub tick_interval: Duration,
    /// Progress advance per tick, in (0, 1]
    pub progress_step: f64,
    /// Whether to start with the demo blocks
    pub seed: bool,
    /// Viewport height applied on resize
    pub viewport_height: u16,
    /// Maximum characters accepted by the input field
    pub input_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            shell: DEFAULT_SHELL.to_string(),
            tick_interval: DEFAULT_TICK_INTERVAL,
            progress_step: DEFAULT_PROGRESS_STEP,
            seed: true,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            input_limit: DEFAULT_INPUT_LIMIT,
        }
    }
}

impl SessionConfig {
    /// Create configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create configuration from any variable source
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            shell: lookup("GBLOXS_SHELL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SHELL.to_string()),
            tick_interval: lookup("GBLOXS_TICK_MS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_TICK_INTERVAL),
            progress_step: lookup("GBLOXS_PROGRESS_STEP")
                .and_then(|v| v.parse::<f64>().ok())
                .map(clamp_step)
                .unwrap_or(DEFAULT_PROGRESS_STEP),
            seed: lookup("GBLOXS_NO_SEED")
                .map(|v| v != "1" && !v.eq_ignore_ascii_case("true"))
                .unwrap_or(true),
            viewport_height: lookup("GBLOXS_VIEWPORT_HEIGHT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_VIEWPORT_HEIGHT),
            input_limit: lookup("GBLOXS_INPUT_LIMIT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_INPUT_LIMIT),
        }
    }

    /// Use a different shell
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Start without demo blocks
    pub fn without_seed(mut self) -> Self {
        self.seed = false;
        self
    }

    /// Change the tick interval
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }
}

fn clamp_step(step: f64) -> f64 {
    if step.is_finite() && step > 0.0 {
        step.min(1.0)
    } else {
        DEFAULT_PROGRESS_STEP
    }
}
