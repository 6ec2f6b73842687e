//! Puzzle calendar: local dates to day offsets.
use crate::Clock;
use crate::record::DayOffset;
use chrono::{Local, NaiveDate};

/// Date of puzzle 0.
#[must_use]
pub fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 6, 19).unwrap_or_default()
}

/// Day offset of `date`, or `None` for the epoch itself and earlier dates.
#[must_use]
pub fn day_offset_for(date: NaiveDate) -> Option<DayOffset> {
    let days = date.signed_duration_since(epoch()).num_days();
    DayOffset::try_from(days).ok().filter(|day| *day >= 1)
}

/// Inverse of [`day_offset_for`].
#[must_use]
pub fn date_for(day: DayOffset) -> Option<NaiveDate> {
    epoch().checked_add_days(chrono::Days::new(u64::from(day)))
}

/// Today's puzzle, never lower than day 1.
#[must_use]
pub fn today_offset(clock: &dyn Clock) -> DayOffset {
    day_offset_for(clock.today()).unwrap_or(1)
}

/// [`Clock`] backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedDay(NaiveDate);

    impl Clock for FixedDay {
        fn now_ms(&self) -> u64 {
            0
        }

        fn today(&self) -> NaiveDate {
            self.0
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn offsets_count_days_since_epoch() {
        assert_eq!(day_offset_for(date(2021, 6, 20)), Some(1));
        assert_eq!(day_offset_for(date(2022, 1, 1)), Some(196));
        assert_eq!(day_offset_for(date(2021, 6, 19)), None);
        assert_eq!(day_offset_for(date(2020, 1, 1)), None);
    }

    #[test]
    fn date_for_inverts_offset() {
        let day = day_offset_for(date(2023, 3, 14)).unwrap();
        assert_eq!(date_for(day), Some(date(2023, 3, 14)));
    }

    #[test]
    fn today_offset_clamps_to_first_day() {
        assert_eq!(today_offset(&FixedDay(date(2019, 5, 5))), 1);
        assert_eq!(today_offset(&FixedDay(date(2021, 6, 25))), 6);
    }
}
