use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use chrono_tz::Tz;

/// A single sample of the clock, pinned to the owner's time zone.
///
/// All day boundaries used for categorization are local calendar dates
/// derived from this one instant, so a whole classification pass agrees
/// on what "today" is even if it straddles midnight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalNow {
    instant: DateTime<Utc>,
    zone: Tz,
    today: NaiveDate,
}

impl LocalNow {
    pub fn new(instant: DateTime<Utc>, zone: Tz) -> Self {
        let today = instant.with_timezone(&zone).date_naive();
        Self { instant, zone, today }
    }

    /// Read the wall clock. Only request handlers call this.
    pub fn sample(zone: Tz) -> Self {
        Self::new(Utc::now(), zone)
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn tomorrow(&self) -> Option<NaiveDate> {
        self.today.checked_add_days(Days::new(1))
    }

    pub fn day_after_tomorrow(&self) -> Option<NaiveDate> {
        self.today.checked_add_days(Days::new(2))
    }

    /// First day of next week. Weeks start on Monday, so on a Sunday this
    /// is tomorrow.
    pub fn end_of_week(&self) -> Option<NaiveDate> {
        let remaining = 7 - self.today.weekday().num_days_from_monday();
        self.today.checked_add_days(Days::new(u64::from(remaining)))
    }

    /// Calendar day of `at` in the owner's zone.
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.zone).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorizer::fixtures::{at, local, ZONE};
    use chrono::Weekday;

    #[test]
    fn today_follows_owner_zone_not_utc() {
        // 23:30 UTC on the 10th is already the 11th in Berlin
        let instant = local(2026, 2, 11, 0, 30);
        assert_eq!(instant.date_naive(), NaiveDate::from_ymd_opt(2026, 2, 10).unwrap());

        let now = LocalNow::new(instant, ZONE);
        assert_eq!(now.today(), NaiveDate::from_ymd_opt(2026, 2, 11).unwrap());
    }

    #[test]
    fn end_of_week_is_next_monday() {
        for day in 9..=15 {
            let now = at(2026, 2, day, 12, 0);
            let eow = now.end_of_week().unwrap();
            assert_eq!(eow.weekday(), Weekday::Mon);
            assert!(eow > now.today());
            assert!(eow <= now.today() + Days::new(7));
        }
        // Sunday: next week starts tomorrow
        let sunday = at(2026, 2, 15, 12, 0);
        assert_eq!(sunday.end_of_week(), sunday.tomorrow());
    }

    #[test]
    fn day_arithmetic_saturates_to_none_at_the_end_of_time() {
        let now = LocalNow::new(DateTime::<Utc>::MAX_UTC, chrono_tz::UTC);
        assert_eq!(now.tomorrow(), None);
        assert_eq!(now.end_of_week(), None);
    }
}
