//! Server configuration from environment.

use deconflict_core::EngineConfig;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Minimum separation between missions (meters)
    pub safety_radius_m: f64,
    /// Time step used when a check request omits one (seconds)
    pub default_time_step_s: f64,
    /// Upper bound on samples a single check may take
    pub max_samples_per_check: usize,
    /// Stored check results before the oldest is evicted
    pub max_check_history: usize,
}

impl Default for Config {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            server_port: 3000,
            safety_radius_m: engine.safety_radius,
            default_time_step_s: engine.time_step,
            max_samples_per_check: 200_000,
            max_check_history: 256,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_parse("DECONFLICT_PORT").unwrap_or(defaults.server_port),
            safety_radius_m: env_parse("DECONFLICT_SAFETY_RADIUS_M")
                .filter(|r: &f64| r.is_finite() && *r > 0.0)
                .unwrap_or(defaults.safety_radius_m),
            default_time_step_s: env_parse("DECONFLICT_TIME_STEP_S")
                .filter(|s: &f64| s.is_finite() && *s > 0.0)
                .unwrap_or(defaults.default_time_step_s),
            max_samples_per_check: env_parse("DECONFLICT_MAX_SAMPLES")
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.max_samples_per_check),
            max_check_history: env_parse("DECONFLICT_MAX_HISTORY")
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.max_check_history),
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            safety_radius: self.safety_radius_m,
            time_step: self.default_time_step_s,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}
