//! Runtime settings for the background animation.
//!
//! Everything has a default; `Config::from_env` lets a launcher override the
//! enable decision and the pacing without recompiling.

use std::env;
use std::str::FromStr;

use log::warn;

/// Settings consumed by the frame loop and the animation session.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Whether the background runs at all.
    pub enabled: bool,
    /// Delay between frame callbacks.
    pub tick_rate_ms: u64,
    /// Clock advance per frame.
    pub clock_step: f64,
    /// Loops per clock unit along the end-effector path.
    pub speed_factor: f64,
    /// Fixed pixel ratio; `None` derives it from the surface height.
    pub pixel_ratio: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_rate_ms: 16,
            clock_step: 0.01,
            speed_factor: 0.12,
            pixel_ratio: None,
        }
    }
}

/// `delta` forces the background on with "1" and off with "0"; otherwise it
/// runs unless `anim` is "0".
pub fn enable_decision(delta: Option<&str>, anim: Option<&str>) -> bool {
    let allow_motion = anim != Some("0");
    delta == Some("1") || (allow_motion && delta != Some("0"))
}

fn parse_or<T: FromStr + Copy>(key: &str, raw: Option<String>, fallback: T) -> T {
    match raw {
        None => fallback,
        Some(s) => s.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring {}={:?}: not a valid number", key, s);
            fallback
        }),
    }
}

/// Like `parse_or`, but only finite values above zero are kept.
fn positive_or(key: &str, raw: Option<String>, fallback: f64) -> f64 {
    let value = parse_or(key, raw, fallback);
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!("Ignoring {}={}: must be finite and positive", key, value);
        fallback
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let d = Self::default();
        let delta = lookup("DELTA_BG");
        let anim = lookup("DELTA_BG_ANIM");

        let mut config = Self {
            enabled: enable_decision(delta.as_deref(), anim.as_deref()),
            tick_rate_ms: parse_or("DELTA_BG_TICK_MS", lookup("DELTA_BG_TICK_MS"), d.tick_rate_ms),
            clock_step: positive_or("DELTA_BG_STEP", lookup("DELTA_BG_STEP"), d.clock_step),
            speed_factor: positive_or("DELTA_BG_SPEED", lookup("DELTA_BG_SPEED"), d.speed_factor),
            pixel_ratio: lookup("DELTA_BG_DPR")
                .map(|raw| parse_or("DELTA_BG_DPR", Some(raw), f64::NAN))
                .filter(|r| r.is_finite() && *r > 0.0),
        };

        if config.tick_rate_ms == 0 {
            warn!("DELTA_BG_TICK_MS must be positive, using {}", d.tick_rate_ms);
            config.tick_rate_ms = d.tick_rate_ms;
        }
        config
    }
}
