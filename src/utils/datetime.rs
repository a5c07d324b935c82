use chrono::{DateTime, Days, NaiveDate};

/// Calendar date of a unix timestamp, shifted by the exchange's UTC offset
pub fn date_from_timestamp(secs: i64, gmt_offset_secs: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(secs + gmt_offset_secs, 0).map(|dt| dt.date_naive())
}

pub fn date_to_str(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Inverse of `days_from`, used to map plot coordinates back to dates
pub fn date_from_days(origin: &NaiveDate, days: f64) -> Option<NaiveDate> {
    if days.is_finite() && days >= 0.0 {
        origin.checked_add_days(Days::new(days.round() as u64))
    } else {
        None
    }
}

pub fn days_from(origin: &NaiveDate, date: &NaiveDate) -> f64 {
    (*date - *origin).num_days() as f64
}
