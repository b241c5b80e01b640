//! Display formatting helpers. Every function is total: a missing input
//! renders as [`PLACEHOLDER`].

use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

/// Shown in place of a missing value.
pub const PLACEHOLDER: &str = "--";

/// One decimal place and a `°C` suffix, e.g. `"21.1°C"`.
pub fn format_temperature(celsius: Option<f64>) -> String {
    format_reading(celsius, "°C")
}

/// One decimal place followed by `unit`, e.g. `"310.0 lx"`.
pub fn format_reading(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| PLACEHOLDER.into(), |v| format!("{v:.1}{unit}"))
}

/// Time of day in the locale's representation (`%X`), e.g. `"14:05:09"`.
pub fn format_time<Tz>(at: Option<&DateTime<Tz>>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.map_or_else(|| PLACEHOLDER.into(), |t| t.format("%X").to_string())
}

/// Elapsed time since `start` as `"4h 23m"`, or `"12m"` under one hour.
///
/// A start in the future counts as zero elapsed.
pub fn format_uptime(start: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(start) = start else {
        return PLACEHOLDER.into();
    };
    let minutes = (now - start).num_minutes().max(0);
    let hours = minutes / 60;
    let minutes = minutes % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// [`format_uptime`] against the current time.
pub fn format_uptime_since(start: Option<DateTime<Utc>>) -> String {
    format_uptime(start, Utc::now())
}

/// Compact one-line sparkline of `values` scaled between their min and max.
///
/// Used by terminal renderers; an empty slice renders as [`PLACEHOLDER`].
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn sparkline(values: &[f64]) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

    if values.is_empty() {
        return PLACEHOLDER.into();
    }
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;

    values
        .iter()
        .map(|v| {
            if span <= f64::EPSILON {
                BARS[3]
            } else {
                let idx = (((v - lo) / span) * 7.0).round() as usize;
                BARS[idx.min(7)]
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, FixedOffset};

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, h, m, s).unwrap()
    }

    #[test]
    fn temperature() {
        assert_eq!(format_temperature(None), "--");
        assert_eq!(format_temperature(Some(21.05)), "21.1°C");
        assert_eq!(format_temperature(Some(0.0)), "0.0°C");
        assert_eq!(format_temperature(Some(-3.0)), "-3.0°C");

        let s = format_temperature(Some(21.05));
        let digits = s.trim_end_matches("°C").split('.').nth(1).unwrap();
        assert_eq!(digits.len(), 1);
    }

    #[test]
    fn reading_with_unit() {
        assert_eq!(format_reading(Some(310.0), " lx"), "310.0 lx");
        assert_eq!(format_reading(None, " lx"), "--");
    }

    #[test]
    fn time_of_day() {
        assert_eq!(format_time(Some(&at(14, 5, 9))), "14:05:09");
        assert_eq!(format_time::<Utc>(None), "--");

        let offset = FixedOffset::east_opt(3600).unwrap();
        let local = at(14, 5, 9).with_timezone(&offset);
        assert_eq!(format_time(Some(&local)), "15:05:09");
    }

    #[test]
    fn uptime() {
        let now = at(12, 0, 0);
        assert_eq!(format_uptime(None, now), "--");
        assert_eq!(format_uptime(Some(now - Duration::minutes(12)), now), "12m");
        assert_eq!(
            format_uptime(Some(now - Duration::minutes(4 * 60 + 23)), now),
            "4h 23m"
        );
        assert_eq!(format_uptime(Some(now - Duration::seconds(59)), now), "0m");
        assert_eq!(format_uptime(Some(now + Duration::minutes(5)), now), "0m");
        assert_eq!(format_uptime(Some(now - Duration::hours(1)), now), "1h 0m");
    }

    #[test]
    fn sparkline_scales() {
        assert_eq!(sparkline(&[]), "--");
        assert_eq!(sparkline(&[1.0, 1.0]), "▄▄");
        assert_eq!(sparkline(&[0.0, 7.0]), "▁█");
        assert_eq!(sparkline(&[0.0, 3.5, 7.0]).chars().count(), 3);
    }
}
