use chrono::{DateTime, Local};

/// Represents an entity responsible for providing the current time across the application, so
/// that "today" can be pinned in tests.
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

#[cfg(test)]
pub fn fixed_clock(year: i32, month: u32, day: u32) -> MockClock {
    use chrono::{NaiveDate, NaiveTime, TimeZone};

    let date = NaiveDate::from_ymd_opt(year, month, day).expect("valid test date");
    let moment = Local
        .from_local_datetime(&date.and_time(NaiveTime::from_hms_opt(12, 0, 0).expect("noon")))
        .single()
        .expect("noon is never ambiguous");

    let mut clock = MockClock::new();
    clock.expect_now().return_const(moment);
    clock
}
