//! Session configuration from environment variables.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `PUYO_SEED` | 1 | Seed for the pair queue |
//! | `PUYO_TICK_MS` | 16 | Fixed tick length, must be > 0 |
//! | `PUYO_COLORS` | 4 | Colours in play, 3..=5 |
//! | `PUYO_READY_TICKS` | 60 | Ticks before the host grants spawn permission |
//! | `PUYO_LOG_PATH` | unset | Log file; no logging when unset |
//! | `PUYO_SUMMARY_PATH` | unset | JSON summary written on exit |
//!
//! Unset and empty variables take their defaults.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::types::TICK_MS;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var}: cannot parse {value:?} as {expected}")]
    Parse {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("{var}: {value} is outside {range}")]
    OutOfRange {
        var: &'static str,
        value: u32,
        range: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub seed: u32,
    pub tick_ms: u32,
    pub colors: u8,
    pub ready_ticks: u32,
    pub log_path: Option<PathBuf>,
    pub summary_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            tick_ms: TICK_MS,
            colors: 4,
            ready_ticks: 60,
            log_path: None,
            summary_path: None,
        }
    }
}

impl SessionConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Create from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let seed = parse_var(&get, "PUYO_SEED", "u32")?.unwrap_or(defaults.seed);

        let tick_ms = parse_var(&get, "PUYO_TICK_MS", "u32")?.unwrap_or(defaults.tick_ms);
        if tick_ms == 0 {
            return Err(ConfigError::OutOfRange {
                var: "PUYO_TICK_MS",
                value: tick_ms,
                range: "1..",
            });
        }

        let colors: u8 = parse_var(&get, "PUYO_COLORS", "u8")?.unwrap_or(defaults.colors);
        if !(3..=5).contains(&colors) {
            return Err(ConfigError::OutOfRange {
                var: "PUYO_COLORS",
                value: colors as u32,
                range: "3..=5",
            });
        }

        let ready_ticks =
            parse_var(&get, "PUYO_READY_TICKS", "u32")?.unwrap_or(defaults.ready_ticks);

        Ok(Self {
            seed,
            tick_ms,
            colors,
            ready_ticks,
            log_path: get("PUYO_LOG_PATH").map(PathBuf::from),
            summary_path: get("PUYO_SUMMARY_PATH").map(PathBuf::from),
        })
    }
}

fn parse_var<T, G>(
    get: &G,
    var: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    let Some(value) = get(var) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::Parse {
            var,
            value,
            expected,
        })
}
