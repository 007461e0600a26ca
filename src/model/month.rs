use std::{cmp::Ordering, fmt::Display, str::FromStr};

use anyhow::anyhow;
use chrono::{Datelike, Months, NaiveDate, Weekday};

use crate::utils::clock::Clock;

use super::item::{Item, NumHour, sum_day_hours, sum_of};

/// Compact sortable key of a month: `year * 100 + month`.
pub type MonthId = i32;

pub const INVALID_MONTH_ID: MonthId = 0;

/// Oldest year hours can be booked for.
pub const MIN_YEAR: i32 = 2000;

pub fn make_month_id(year: i32, month: u32) -> MonthId {
    year * 100 + month as MonthId
}

pub fn split_month_id(id: MonthId) -> (i32, u32) {
    (id / 100, u32::try_from(id % 100).unwrap_or(0))
}

/// A calendar month together with the items booked in it.
///
/// Calendar days passed to the helpers are 1-based, while hour slots of the items are 0-based
/// (`slot = day - 1`).
#[derive(Debug, Clone, Default)]
pub struct Month {
    year: i32,
    month: u32,
    pub items: Vec<Item>,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            items: vec![],
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    pub fn from_id(id: MonthId) -> Self {
        let (year, month) = split_month_id(id);
        Self::new(year, month)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn is_valid(&self) -> bool {
        self.year >= MIN_YEAR && (1..=12).contains(&self.month) && self.first_day().is_some()
    }

    pub fn id(&self) -> MonthId {
        if self.is_valid() {
            make_month_id(self.year, self.month)
        } else {
            INVALID_MONTH_ID
        }
    }

    /// Appends `item`, invalid items are refused.
    pub fn add(&mut self, item: Item) -> bool {
        if !item.is_valid() {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Number of calendar days, 0 for an invalid month.
    pub fn days(&self) -> usize {
        let Some(first) = self.first_day() else {
            return 0;
        };
        first
            .checked_add_months(Months::new(1))
            .map(|next| (next - first).num_days() as usize)
            .unwrap_or(0)
    }

    /// Writes `value` into the given item's slot. Slots at or beyond [Month::days] are refused.
    pub fn set_hours(&mut self, row: usize, slot: usize, value: NumHour) -> bool {
        if slot >= self.days() {
            return false;
        }
        match self.items.get_mut(row) {
            Some(item) => item.hours.set(slot, value),
            None => false,
        }
    }

    pub fn sum_day_hours(&self, slot: usize) -> NumHour {
        sum_day_hours(&self.items, slot)
    }

    pub fn sum_hours(&self) -> NumHour {
        sum_of(self.items.iter().map(Item::sum_hours))
    }

    pub fn is_month(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn is_weekend(&self, day: u32) -> bool {
        self.date(day)
            .is_some_and(|d| matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
    }

    pub fn is_monday(&self, day: u32) -> bool {
        self.date(day).is_some_and(|d| d.weekday() == Weekday::Mon)
    }

    /// ISO 8601 week number of the day, 0 when the day does not exist.
    pub fn week_number(&self, day: u32) -> u32 {
        self.date(day).map_or(0, |d| d.iso_week().week())
    }

    pub fn is_current_day(&self, day: u32, clock: &dyn Clock) -> bool {
        self.date(day) == Some(clock.now().date_naive())
    }

    /// Days of this month that fall into the same ISO week as `date`.
    pub fn days_of_week(&self, date: NaiveDate) -> Vec<u32> {
        let week = date.iso_week();
        (1..=self.days() as u32)
            .filter(|day| self.date(*day).is_some_and(|d| d.iso_week() == week))
            .collect()
    }

    /// Long human readable form, e.g. `March 2024`.
    pub fn to_long_string(&self) -> String {
        self.first_day()
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_default()
    }

    fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| anyhow!("Expected a month formatted as YYYY-MM, got {s}"))?;
        let month = Month::new(year.parse()?, month.parse()?);
        if !month.is_valid() {
            return Err(anyhow!("{s} is not a month hours can be booked for"));
        }
        Ok(month)
    }
}

// Invalid months never compare equal or ordered to anything, not even to themselves.
impl PartialEq for Month {
    fn eq(&self, other: &Self) -> bool {
        self.is_valid() && other.is_valid() && self.id() == other.id()
    }
}

impl PartialOrd for Month {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_valid() && other.is_valid() {
            Some(self.id().cmp(&other.id()))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod month_tests {
    use anyhow::Result;
    use chrono::NaiveDate;

    use super::{INVALID_MONTH_ID, Month, make_month_id, split_month_id};
    use crate::{model::item::Item, utils::clock::fixed_clock};

    #[test]
    fn month_id_round_trip() {
        for year in [2000, 2024, 2099, 9999] {
            for month in 1..=12 {
                assert_eq!(split_month_id(make_month_id(year, month)), (year, month));
            }
        }
        assert_eq!(make_month_id(2024, 3), 202403);
    }

    #[test]
    fn validity() {
        assert!(Month::new(2000, 1).is_valid());
        assert!(Month::new(2024, 12).is_valid());
        assert!(!Month::new(1999, 12).is_valid());
        assert!(!Month::new(2024, 0).is_valid());
        assert!(!Month::new(2024, 13).is_valid());
        assert!(!Month::default().is_valid());
        assert_eq!(Month::default().id(), INVALID_MONTH_ID);
        assert_eq!(Month::from_id(202402).id(), 202402);
    }

    #[test]
    fn days_in_month() {
        assert_eq!(Month::new(2024, 2).days(), 29);
        assert_eq!(Month::new(2023, 2).days(), 28);
        assert_eq!(Month::new(2024, 4).days(), 30);
        assert_eq!(Month::new(2024, 12).days(), 31);
        assert_eq!(Month::new(2024, 13).days(), 0);
    }

    #[test]
    fn calendar_helpers() {
        // March 2024 starts on a Friday.
        let month = Month::new(2024, 3);
        assert!(month.is_weekend(2));
        assert!(month.is_weekend(3));
        assert!(!month.is_weekend(4));
        assert!(month.is_monday(4));
        assert!(!month.is_monday(5));
        assert!(!month.is_weekend(32));
        assert_eq!(month.week_number(1), 9);
        assert_eq!(month.week_number(4), 10);
        assert_eq!(month.week_number(0), 0);

        let clock = fixed_clock(2024, 3, 15);
        assert!(month.is_current_day(15, &clock));
        assert!(!month.is_current_day(14, &clock));
        assert!(!Month::new(2024, 4).is_current_day(15, &clock));
    }

    #[test]
    fn days_of_week_stay_in_month() {
        let month = Month::new(2024, 3);
        let date = NaiveDate::from_ymd_opt(2024, 3, 13).unwrap();
        assert_eq!(month.days_of_week(date), vec![11, 12, 13, 14, 15, 16, 17]);

        let date = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        assert_eq!(month.days_of_week(date), vec![1, 2, 3]);
    }

    #[test]
    fn set_hours_respects_days() {
        let mut month = Month::new(2024, 2);
        assert!(month.add(Item::new(1)));
        assert!(!month.add(Item::default()));
        assert_eq!(month.items.len(), 1);

        assert!(month.set_hours(0, 28, 4.));
        assert!(!month.set_hours(0, 29, 4.));
        assert!(!month.set_hours(1, 0, 4.));
        assert!(!month.set_hours(0, 0, f64::NAN));
        assert!(!month.set_hours(0, 0, f64::INFINITY));
        assert!(Month::new(2024, 2).sum_hours().is_sign_positive());
        assert_eq!(month.sum_day_hours(28), 4.);
        assert_eq!(month.sum_day_hours(29), 0.);
        assert_eq!(month.sum_hours(), 4.);
    }

    #[test]
    fn ordering_by_id() {
        assert!(Month::new(2023, 12) < Month::new(2024, 1));
        assert!(Month::new(2024, 2) > Month::new(2024, 1));
        assert_eq!(Month::new(2024, 2), Month::new(2024, 2));

        let invalid = Month::new(2024, 13);
        assert_ne!(invalid, invalid.clone());
        assert!(invalid.partial_cmp(&Month::new(2024, 1)).is_none());
        assert!(!(invalid < Month::new(2024, 1)));
    }

    #[test]
    fn parse_and_format() -> Result<()> {
        let month: Month = "2024-03".parse()?;
        assert_eq!(month.id(), 202403);
        assert_eq!(month.to_string(), "2024-03");
        assert_eq!(month.to_long_string(), "March 2024");

        assert!("2024-13".parse::<Month>().is_err());
        assert!("1999-01".parse::<Month>().is_err());
        assert!("march".parse::<Month>().is_err());
        Ok(())
    }
}
