use crate::date::add_days;
use crate::error::CliError;
use crate::input::parse_filtered_u32;
use crate::model::Settings;
use std::time::{SystemTime, UNIX_EPOCH};

/// Boot-time fallback schedule, used when no stored settings are available.
pub const BOOT_DEFAULT_HOUR: u32 = 10;
pub const BOOT_DEFAULT_MINUTE: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NextReminder {
    pub date: String,
    pub time: String,
}

/// Parses `HH:MM` with the same digit filtering as other numeric input.
pub fn parse_reminder_time(raw: &str) -> Result<(u32, u32), CliError> {
    let invalid = || CliError::usage(format!("Invalid reminder time: {}", raw));
    let (h, m) = raw.split_once(':').ok_or_else(invalid)?;
    let hour = parse_filtered_u32(h, "reminder hour")?;
    let minute = parse_filtered_u32(m, "reminder minute")?;
    if hour > 23 || minute > 59 {
        return Err(invalid());
    }
    Ok((hour, minute))
}

/// Next daily trigger: today at HH:MM if that is still ahead, else tomorrow.
/// `seconds_of_day` is the current UTC time-of-day; injected so tests can pin
/// the clock.
pub fn next_trigger(
    today: &str,
    seconds_of_day: u32,
    hour: u32,
    minute: u32,
) -> Result<NextReminder, CliError> {
    let fire_at = hour * 3600 + minute * 60;
    let date = if fire_at > seconds_of_day {
        today.to_string()
    } else {
        add_days(today, 1)?
    };
    Ok(NextReminder {
        date,
        time: format!("{:02}:{:02}", hour, minute),
    })
}

pub fn next_trigger_for(
    settings: &Settings,
    today: &str,
    seconds_of_day: u32,
) -> Result<Option<NextReminder>, CliError> {
    if !settings.notifications_enabled {
        return Ok(None);
    }
    next_trigger(
        today,
        seconds_of_day,
        settings.reminder_hour,
        settings.reminder_minute,
    )
    .map(Some)
}

pub fn system_seconds_of_day_utc() -> u32 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    (secs % 86_400) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reminder_time_parsing() {
        assert_eq!(parse_reminder_time("09:30").unwrap(), (9, 30));
        assert_eq!(parse_reminder_time("9:5").unwrap(), (9, 5));
        assert!(parse_reminder_time("24:00").is_err());
        assert!(parse_reminder_time("10:60").is_err());
        assert!(parse_reminder_time("1030").is_err());
        assert!(parse_reminder_time("a:b").is_err());
    }

    #[test]
    fn trigger_today_when_time_is_ahead() {
        // 08:00 now, reminder at 10:00
        let next = next_trigger("2026-08-25", 8 * 3600, 10, 0).unwrap();
        assert_eq!(next.date, "2026-08-25");
        assert_eq!(next.time, "10:00");
    }

    #[test]
    fn trigger_rolls_to_tomorrow_when_passed() {
        // 10:00 exactly counts as passed
        let next = next_trigger("2026-08-25", 10 * 3600, 10, 0).unwrap();
        assert_eq!(next.date, "2026-08-26");
    }

    #[test]
    fn disabled_notifications_yield_no_trigger() {
        let settings = Settings {
            notifications_enabled: false,
            ..Settings::default()
        };
        assert_eq!(next_trigger_for(&settings, "2026-08-25", 0).unwrap(), None);
    }
}
