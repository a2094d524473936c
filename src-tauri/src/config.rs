use std::str::FromStr;
use std::time::Duration;

use crate::auto_fit::{DEFAULT_FIT_PADDING, DEFAULT_JITTER_THRESHOLD};
use crate::cursor::CURSOR_POLL_INTERVAL;
use crate::input_routing::RoutingStrategy;

pub const KEY_FIT_PADDING: &str = "fit_padding";
pub const KEY_JITTER_THRESHOLD: &str = "jitter_threshold";
pub const KEY_CURSOR_POLL_MS: &str = "cursor_poll_ms";
pub const KEY_ROUTING_STRATEGY: &str = "routing_strategy";

/// Requested routing strategy; `Auto` defers to platform detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyChoice {
    #[default]
    Auto,
    Fixed(RoutingStrategy),
}

impl FromStr for StrategyChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "auto" => Ok(StrategyChoice::Auto),
            "forwarding" => Ok(StrategyChoice::Fixed(RoutingStrategy::Forwarding)),
            "toggle" => Ok(StrategyChoice::Fixed(RoutingStrategy::Toggle)),
            "always-interactive" => Ok(StrategyChoice::Fixed(RoutingStrategy::AlwaysInteractive)),
            other => Err(format!("unknown routing strategy '{other}'")),
        }
    }
}

/// Overlay tunables, read once at startup from the settings table.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    pub fit_padding: f64,
    pub jitter_threshold: u32,
    pub cursor_poll_ms: u64,
    pub routing_strategy: StrategyChoice,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            fit_padding: DEFAULT_FIT_PADDING,
            jitter_threshold: DEFAULT_JITTER_THRESHOLD,
            cursor_poll_ms: CURSOR_POLL_INTERVAL.as_millis() as u64,
            routing_strategy: StrategyChoice::Auto,
        }
    }
}

impl OverlayConfig {
    /// Build from `(key, value)` rows. Unknown keys are ignored; bad values
    /// keep the default and log a warning.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            let applied = match key {
                KEY_FIT_PADDING => parse_in_range(value, 0.0f64, 512.0)
                    .map(|v| config.fit_padding = v),
                KEY_JITTER_THRESHOLD => parse_in_range(value, 0u32, 64)
                    .map(|v| config.jitter_threshold = v),
                KEY_CURSOR_POLL_MS => parse_in_range(value, 1u64, 1000)
                    .map(|v| config.cursor_poll_ms = v),
                KEY_ROUTING_STRATEGY => value
                    .parse::<StrategyChoice>()
                    .map(|v| config.routing_strategy = v),
                _ => Ok(()),
            };
            if let Err(e) = applied {
                log::warn!("[config] {key}: {e}; keeping default");
            }
        }
        config
    }

    pub fn cursor_poll_interval(&self) -> Duration {
        Duration::from_millis(self.cursor_poll_ms)
    }

    pub fn strategy(&self) -> RoutingStrategy {
        match self.routing_strategy {
            StrategyChoice::Auto => RoutingStrategy::detect(),
            StrategyChoice::Fixed(strategy) => strategy,
        }
    }
}

fn parse_in_range<T>(value: &str, min: T, max: T) -> Result<T, String>
where
    T: FromStr + PartialOrd + std::fmt::Display,
{
    let parsed: T = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    // NaN fails both comparisons and lands here too.
    if !(parsed >= min && parsed <= max) {
        return Err(format!("'{value}' outside {min}..={max}"));
    }
    Ok(parsed)
}
