use std::time::Duration as StdDuration;

use chrono::Duration;
use serde::Deserialize;

use crate::error::WatchError;

/// Configuration for the subscription watcher.
///
/// Both knobs are validated at watcher construction; a rejected config
/// means `run` never starts.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatcherConfig {
    /// Width of the fallback query window, in minutes, used when no
    /// usable cursor is stored. Must be in `1..=1440`.
    pub look_behind_minutes: u32,
    /// Sweep cadence, in seconds. Must be in `1..=3600`.
    pub ticker_interval_seconds: u32,
}

impl Default for WatcherConfig {
    /// Matches the shipped CLI defaults of the original collector:
    /// a 1 minute look-behind and a 5 second sweep cadence.
    fn default() -> Self {
        Self {
            look_behind_minutes: 1,
            ticker_interval_seconds: 5,
        }
    }
}

impl WatcherConfig {
    pub fn validate(&self) -> Result<(), WatchError> {
        if self.look_behind_minutes == 0 {
            return Err(WatchError::InvalidConfig {
                reason: "lookBehindMinutes must be greater than 0".into(),
            });
        }
        if self.look_behind_minutes > 1440 {
            return Err(WatchError::InvalidConfig {
                reason: "lookBehindMinutes must be less than or equal to 24 hours".into(),
            });
        }
        if self.ticker_interval_seconds == 0 {
            return Err(WatchError::InvalidConfig {
                reason: "tickerIntervalSeconds must be greater than 0".into(),
            });
        }
        if self.ticker_interval_seconds > 3600 {
            return Err(WatchError::InvalidConfig {
                reason: "tickerIntervalSeconds must be less than or equal to 1 hour".into(),
            });
        }
        Ok(())
    }

    pub(crate) fn look_behind(&self) -> Duration {
        Duration::minutes(i64::from(self.look_behind_minutes))
    }

    pub(crate) fn ticker_interval(&self) -> StdDuration {
        StdDuration::from_secs(u64::from(self.ticker_interval_seconds))
    }
}

/// Client-credential material handed to an OAuth2 token provider.
///
/// Token acquisition itself is a collaborator concern; the watcher only
/// carries the typed bag so configuration files can be deserialized in
/// one place.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub tenant_domain: String,
}
