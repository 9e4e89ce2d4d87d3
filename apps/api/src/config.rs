use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Below this, text in the exported PDF turns visibly soft.
pub const MIN_RASTER_SCALE: f32 = 2.0;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Root of the key-value store.
    pub data_dir: PathBuf,
    /// Where exported PDFs are saved.
    pub export_dir: PathBuf,
    pub export_settle_delay: Duration,
    pub export_raster_scale: f32,
    /// Sessions unused for this long are dropped.
    pub session_idle_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let settle_ms = var("EXPORT_SETTLE_MS", "500")
            .parse::<u64>()
            .context("EXPORT_SETTLE_MS must be a whole number of milliseconds")?;
        let scale = var("EXPORT_RASTER_SCALE", "2.0")
            .parse::<f32>()
            .context("EXPORT_RASTER_SCALE must be a number")?;
        if !scale.is_finite() || scale < MIN_RASTER_SCALE {
            bail!("EXPORT_RASTER_SCALE must be at least {MIN_RASTER_SCALE}, got {scale}");
        }

        let idle_minutes = var("SESSION_IDLE_MINUTES", "60")
            .parse::<u64>()
            .context("SESSION_IDLE_MINUTES must be a whole number of minutes")?;
        if idle_minutes == 0 {
            bail!("SESSION_IDLE_MINUTES must be at least 1");
        }

        Ok(Config {
            port: var("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
            data_dir: PathBuf::from(var("DATA_DIR", "./data")),
            export_dir: PathBuf::from(var("EXPORT_DIR", "./exports")),
            export_settle_delay: Duration::from_millis(settle_ms),
            export_raster_scale: scale,
            session_idle_ttl: Duration::from_secs(idle_minutes * 60),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.export_dir, PathBuf::from("./exports"));
        assert_eq!(config.export_settle_delay, Duration::from_millis(500));
        assert_eq!(config.export_raster_scale, 2.0);
        assert_eq!(config.session_idle_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PORT", "9000"),
            ("DATA_DIR", "/var/lib/resume"),
            ("EXPORT_SETTLE_MS", "0"),
            ("EXPORT_RASTER_SCALE", "3"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/resume"));
        assert!(config.export_settle_delay.is_zero());
        assert_eq!(config.export_raster_scale, 3.0);
    }

    #[test]
    fn test_low_raster_scale_rejected() {
        assert!(load(&[("EXPORT_RASTER_SCALE", "1.5")]).is_err());
        assert!(load(&[("EXPORT_RASTER_SCALE", "NaN")]).is_err());
    }

    #[test]
    fn test_malformed_values_rejected() {
        assert!(load(&[("PORT", "eighty")]).is_err());
        assert!(load(&[("EXPORT_SETTLE_MS", "-5")]).is_err());
        assert!(load(&[("SESSION_IDLE_MINUTES", "0")]).is_err());
    }
}
