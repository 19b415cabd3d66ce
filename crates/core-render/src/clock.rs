//! Status line clock.

use chrono::{Local, TimeZone};
use core_config::{ClockConfig, ClockMode};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of wall-clock time in seconds since the Unix epoch.
pub trait Clock: Send {
    fn now_epoch_secs(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_secs(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_epoch_secs(&self) -> i64 {
        self.0
    }
}

/// Seconds the local time zone is ahead of UTC at `epoch_secs`.
fn local_offset_secs(epoch_secs: i64) -> i64 {
    Local
        .timestamp_opt(epoch_secs, 0)
        .single()
        .map(|t| i64::from(t.offset().local_minus_utc()))
        .unwrap_or(0)
}

/// Format `epoch_secs` as time of day in the local time zone, or at the configured fixed
/// offset when one is set.
///
/// 24h: `HH:MM[:SS]`. 12h: `H:MM[:SS] AM|PM` with midnight and noon shown as 12.
pub fn format_clock(epoch_secs: i64, cfg: &ClockConfig) -> String {
    let offset = match cfg.utc_offset_minutes {
        Some(minutes) => i64::from(minutes) * 60,
        None => local_offset_secs(epoch_secs),
    };
    let local = epoch_secs + offset;
    let secs_of_day = local.rem_euclid(86_400);
    let hour = secs_of_day / 3600;
    let minute = (secs_of_day % 3600) / 60;
    let second = secs_of_day % 60;
    let seconds = if cfg.show_seconds {
        format!(":{second:02}")
    } else {
        String::new()
    };
    match cfg.mode {
        ClockMode::TwentyFourHour => format!("{hour:02}:{minute:02}{seconds}"),
        ClockMode::TwelveHour => {
            let suffix = if hour < 12 { "AM" } else { "PM" };
            let h12 = match hour % 12 {
                0 => 12,
                h => h,
            };
            format!("{h12}:{minute:02}{seconds} {suffix}")
        }
    }
}
