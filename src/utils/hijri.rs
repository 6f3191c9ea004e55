use chrono::{Datelike, Duration, NaiveDate};
use hijri_date::HijriDate;

/// Islamic month names in English (index 0 = Muharram = month 1)
const HIJRI_MONTH_NAMES: &[&str] = &[
    "Muharram",
    "Safar",
    "Rabi' al-Awwal",
    "Rabi' al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

fn hijri_month_name(month: usize) -> &'static str {
    if (1..=12).contains(&month) {
        HIJRI_MONTH_NAMES[month - 1]
    } else {
        "Unknown"
    }
}

/// Hijri rendering of `date`, shifted by `offset_days` for local moon
/// sighting. `None` when the date is outside what the converter supports.
pub fn hijri_string(date: NaiveDate, offset_days: i32) -> Option<String> {
    let adjusted = date.checked_add_signed(Duration::days(offset_days as i64))?;
    let hd = HijriDate::from_gr(
        adjusted.year() as usize,
        adjusted.month() as usize,
        adjusted.day() as usize,
    )
    .ok()?;
    Some(format!(
        "{} {} {}",
        hd.day(),
        hijri_month_name(hd.month()),
        hd.year()
    ))
}
