//! Application configuration loaded from environment variables.

use std::env;

use chrono::FixedOffset;

use pilot_core::ports::StoreError;
use pilot_core::scheduler::WallClock;
use pilot_infra::{GenerationConfig, NotifyConfig, StoreConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    pub generation: GenerationConfig,
    pub notify: NotifyConfig,
    /// Wall clock that "noon" is measured on when scheduling.
    pub wall_clock: WallClock,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, StoreError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            store: StoreConfig::from_env()?,
            generation: GenerationConfig::from_env(),
            notify: NotifyConfig::from_env(),
            wall_clock: Self::parse_wall_clock(env::var("SCHEDULE_UTC_OFFSET_HOURS").ok()),
        })
    }

    /// `SCHEDULE_UTC_OFFSET_HOURS=-5` pins scheduling to UTC-5; unset means
    /// the host's local time zone.
    fn parse_wall_clock(raw: Option<String>) -> WallClock {
        let Some(raw) = raw else {
            return WallClock::Local;
        };
        match raw
            .trim()
            .parse::<i32>()
            .ok()
            .and_then(|h| FixedOffset::east_opt(h * 3600))
        {
            Some(offset) => WallClock::Fixed(offset),
            None => {
                tracing::warn!(value = %raw, "Ignoring invalid SCHEDULE_UTC_OFFSET_HOURS");
                WallClock::Local
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_clock_offsets() {
        assert_eq!(AppConfig::parse_wall_clock(None), WallClock::Local);
        assert_eq!(
            AppConfig::parse_wall_clock(Some("-5".to_string())),
            WallClock::Fixed(FixedOffset::west_opt(5 * 3600).unwrap())
        );
        assert_eq!(AppConfig::parse_wall_clock(Some("0".to_string())), WallClock::utc());
        assert_eq!(AppConfig::parse_wall_clock(Some("99".to_string())), WallClock::Local);
        assert_eq!(AppConfig::parse_wall_clock(Some("noon".to_string())), WallClock::Local);
    }
}
