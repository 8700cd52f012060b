use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, Utc, Weekday};
use std::collections::BTreeSet;

/// Upper bound on candidate days examined per lookup.
pub const MAX_LOOKAHEAD_DAYS: usize = 14;

/// Bank business-day calendar used to estimate when funds settle.
#[derive(Debug, Clone)]
pub struct SettlementCalendar {
    holidays: BTreeSet<NaiveDate>,
    offset: FixedOffset,
}

impl SettlementCalendar {
    pub fn new(holidays: impl IntoIterator<Item = NaiveDate>, offset: FixedOffset) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
            offset,
        }
    }

    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }

    /// First business day strictly after `date`.
    ///
    /// Returns `None` only when the holiday list blocks every candidate in
    /// the lookahead window.
    pub fn next_working_day(&self, date: NaiveDate) -> Option<NaiveDate> {
        let mut candidate = date;

        for _ in 0..MAX_LOOKAHEAD_DAYS {
            candidate = candidate.checked_add_days(Days::new(1))?;
            if self.is_business_day(candidate) {
                return Some(candidate);
            }
        }

        None
    }

    /// Settlement date for a transaction created at `created_at`, judged on
    /// the bank's local calendar.
    pub fn settlement_date(&self, created_at: DateTime<Utc>) -> Option<NaiveDate> {
        let local_date = created_at.with_timezone(&self.offset).date_naive();
        self.next_working_day(local_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(330 * 60).unwrap()
    }

    fn calendar() -> SettlementCalendar {
        SettlementCalendar::new([ymd(2025, 1, 1), ymd(2025, 12, 25)], ist())
    }

    #[test]
    fn new_year_holiday_rolls_to_next_day() {
        // 2025-01-01 is a Wednesday.
        assert_eq!(calendar().next_working_day(ymd(2025, 1, 1)), Some(ymd(2025, 1, 2)));
    }

    #[test]
    fn friday_rolls_past_weekend() {
        assert_eq!(calendar().next_working_day(ymd(2025, 1, 3)), Some(ymd(2025, 1, 6)));
    }

    #[test]
    fn skips_holiday_after_weekend() {
        let calendar = SettlementCalendar::new([ymd(2025, 3, 17)], ist());
        // Friday 14th -> Sat, Sun, holiday Monday -> Tuesday.
        assert_eq!(calendar.next_working_day(ymd(2025, 3, 14)), Some(ymd(2025, 3, 18)));
    }

    #[test]
    fn christmas_eve_skips_christmas() {
        assert_eq!(calendar().next_working_day(ymd(2025, 12, 24)), Some(ymd(2025, 12, 26)));
    }

    #[test]
    fn never_lands_on_weekend_or_holiday() {
        let calendar = calendar();
        let mut day = ymd(2024, 12, 1);

        for _ in 0..500 {
            let next = calendar.next_working_day(day).unwrap();
            assert!(next > day);
            assert!(calendar.is_business_day(next));
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn gives_up_on_blocked_calendar() {
        let start = ymd(2025, 6, 1);
        let holidays = (1..=20).map(|d| start + Days::new(d));
        let calendar = SettlementCalendar::new(holidays, ist());

        assert_eq!(calendar.next_working_day(start), None);
    }

    #[test]
    fn uses_local_date_of_creation() {
        // 20:00 UTC on Thursday 2 Jan is already Friday 3 Jan in IST.
        let created = Utc.with_ymd_and_hms(2025, 1, 2, 20, 0, 0).unwrap();
        assert_eq!(calendar().settlement_date(created), Some(ymd(2025, 1, 6)));

        let utc_calendar =
            SettlementCalendar::new([ymd(2025, 1, 1)], FixedOffset::east_opt(0).unwrap());
        assert_eq!(utc_calendar.settlement_date(created), Some(ymd(2025, 1, 3)));
    }
}
