use anyhow::Context;
use chrono::{DateTime, Datelike, NaiveDate, Utc};

const ICT_OFFSET_SECS: i32 = 7 * 3600;

/// The digest is dated by Bangkok wall clock, whatever host the job runs on.
pub fn run_date(date_arg: Option<&str>, now_utc: DateTime<Utc>) -> anyhow::Result<NaiveDate> {
    if let Some(s) = date_arg {
        return Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?);
    }

    let ict = chrono::FixedOffset::east_opt(ICT_OFFSET_SECS).context("invalid ICT offset")?;
    Ok(now_utc.with_timezone(&ict).date_naive())
}

/// Jan 1 of the date's year: the YTD window start.
pub fn start_of_year(date: NaiveDate) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).context("invalid start-of-year date")
}

/// Header form, e.g. `05/01/2026`.
pub fn short_date_label(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Prompt form, e.g. `05 January 2026`.
pub fn long_date_label(date: NaiveDate) -> String {
    date.format("%d %B %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn explicit_date_arg_wins() {
        let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
        let d = run_date(Some("2026-01-05"), now).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
    }

    #[test]
    fn ict_crosses_midnight_before_utc() {
        // 2026-01-04 18:00 UTC = 2026-01-05 01:00 ICT.
        let now = Utc.with_ymd_and_hms(2026, 1, 4, 18, 0, 0).unwrap();
        let d = run_date(None, now).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
    }

    #[test]
    fn start_of_year_is_jan_first() {
        let d = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        assert_eq!(
            start_of_year(d).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
        );
    }

    #[test]
    fn date_labels() {
        let d = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(short_date_label(d), "05/01/2026");
        assert_eq!(long_date_label(d), "05 January 2026");
    }
}
