use super::project::{INVALID_PROJECT_ID, ProjectId};

pub type NumHour = f64;

/// One slot per possible day of a month.
pub const MAX_DAYS: usize = 31;

/// Booked hours of a single item, indexed by zero based day slot (calendar day - 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hours([NumHour; MAX_DAYS]);

impl Default for Hours {
    fn default() -> Self {
        Self([0.; MAX_DAYS])
    }
}

impl Hours {
    /// Slots outside of `0..MAX_DAYS` read as zero.
    pub fn get(&self, slot: usize) -> NumHour {
        self.0.get(slot).copied().unwrap_or(0.)
    }

    /// Returns `false` and leaves the hours untouched when `slot` is out of range or `value` is
    /// not a finite number.
    pub fn set(&mut self, slot: usize, value: NumHour) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self.0.get_mut(slot) {
            Some(v) => {
                *v = value;
                true
            }
            None => false,
        }
    }

    pub fn sum(&self) -> NumHour {
        sum_of(self.0.iter().copied())
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.)
    }

    /// Iterates `(slot, hours)` pairs for every slot, zero or not.
    pub fn iter(&self) -> impl Iterator<Item = (usize, NumHour)> + '_ {
        self.0.iter().copied().enumerate()
    }
}

/// A line of a month: hours spent on an activity for a project.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub project_id: ProjectId,
    pub activity: String,
    pub hours: Hours,
}

impl Default for Item {
    fn default() -> Self {
        Self::new(INVALID_PROJECT_ID)
    }
}

impl Item {
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            activity: String::new(),
            hours: Hours::default(),
        }
    }

    pub fn with_activity(self, activity: impl Into<String>) -> Self {
        Self {
            activity: activity.into(),
            ..self
        }
    }

    pub fn is_valid(&self) -> bool {
        self.project_id != INVALID_PROJECT_ID
    }

    pub fn sum_hours(&self) -> NumHour {
        self.hours.sum()
    }
}

/// Sum of one day slot across `items`. Slots outside of `0..MAX_DAYS` sum to zero.
pub fn sum_day_hours(items: &[Item], slot: usize) -> NumHour {
    if slot >= MAX_DAYS {
        return 0.;
    }
    sum_of(items.iter().map(|item| item.hours.get(slot)))
}

/// Adds up hours starting from positive zero, so an empty sum never prints as `-0.00`.
pub fn sum_of(hours: impl IntoIterator<Item = NumHour>) -> NumHour {
    hours.into_iter().fold(0., |total, value| total + value)
}
