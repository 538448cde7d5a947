// src/format.rs
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

const DISPLAY_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y/%m/%d";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an ISO 8601 timestamp into local wall-clock time.
///
/// Offsets are converted to the local zone. Timestamps without an offset are
/// already local, which is how the backend emits `created_at`.
pub fn parse_local(iso: &str) -> Option<NaiveDateTime> {
    let iso = iso.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(iso, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(iso, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// `2024/05/01 09:03:00` style display string. Unparseable input is returned as-is.
pub fn format_date_time(iso: &str) -> String {
    match parse_local(iso) {
        Some(dt) => dt.format(DISPLAY_FORMAT).to_string(),
        None => iso.to_string(),
    }
}

/// Date part of [`format_date_time`], used for chart axis labels.
pub fn date_label(iso: &str) -> String {
    match parse_local(iso) {
        Some(dt) => dt.format(DATE_FORMAT).to_string(),
        None => iso.to_string(),
    }
}

pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        _ => "N/A".to_string(),
    }
}

pub fn format_tag_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn naive_timestamps_are_local_wall_clock() {
        assert_eq!(format_date_time("2024-05-01T09:03:00"), "2024/05/01 09:03:00");
        assert_eq!(format_date_time("2024-05-01T09:03:00.123456"), "2024/05/01 09:03:00");
        assert_eq!(format_date_time("2024-05-01 23:59:59"), "2024/05/01 23:59:59");
    }

    #[test]
    fn offset_timestamps_convert_to_local() {
        let iso = "2024-05-01T09:03:00+00:00";
        let expected = chrono::Utc
            .with_ymd_and_hms(2024, 5, 1, 9, 3, 0)
            .unwrap()
            .with_timezone(&Local)
            .format(DISPLAY_FORMAT)
            .to_string();
        assert_eq!(format_date_time(iso), expected);
    }

    #[test]
    fn garbage_is_passed_through() {
        assert_eq!(format_date_time("yesterday"), "yesterday");
        assert_eq!(date_label("not a date"), "not a date");
    }

    #[test]
    fn date_label_drops_time() {
        assert_eq!(date_label("2024-12-31T18:00:00"), "2024/12/31");
        assert_eq!(date_label("2024-12-31"), "2024/12/31");
    }

    #[test]
    fn score_formatting() {
        assert_eq!(format_score(Some(0.456)), "0.46");
        assert_eq!(format_score(Some(3.0)), "3.00");
        assert_eq!(format_score(None), "N/A");
        assert_eq!(format_score(Some(f64::NAN)), "N/A");
    }

    #[test]
    fn tag_values_print_like_numbers() {
        assert_eq!(format_tag_value(3.0), "3");
        assert_eq!(format_tag_value(1.5), "1.5");
        assert_eq!(format_percent(66.666), "66.7%");
    }
}
