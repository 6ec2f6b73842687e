//! Task spawning and time in the browser.
use chrono::NaiveDate;
use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};
use wordle_score_engine::Clock;

/// Runs spawned futures on the browser's microtask queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSpawner;

impl LocalSpawn for BrowserSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}

/// [`Clock`] reading `Date`, in the user's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_ms(&self) -> u64 {
        num_traits::cast(js_sys::Date::now()).unwrap_or(0)
    }

    fn today(&self) -> NaiveDate {
        let now = js_sys::Date::new_0();
        local_date(now.get_full_year(), now.get_month(), now.get_date())
    }
}

/// `Date` reports months from 0.
fn local_date(year: u32, month0: u32, day: u32) -> NaiveDate {
    i32::try_from(year)
        .ok()
        .and_then(|year| NaiveDate::from_ymd_opt(year, month0 + 1, day))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn months_are_shifted_from_zero_based() {
        assert_eq!(
            local_date(2022, 0, 31),
            NaiveDate::from_ymd_opt(2022, 1, 31).unwrap()
        );
        assert_eq!(
            local_date(2021, 5, 19),
            NaiveDate::from_ymd_opt(2021, 6, 19).unwrap()
        );
    }
}
