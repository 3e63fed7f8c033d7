use crate::Result;
use anyhow::{ensure, Context};
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// The most months `Period::trailing` will return.
pub const MAX_TRAILING_MONTHS: u32 = 120;

/// Years whose dates are stored as exactly four digits.
pub(crate) const YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// One calendar month of activity for one user. This is the key of every aggregate document.
///
/// A `Period` can only be constructed for a valid month, so the first and last day of the month
/// are always available.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Period {
    user_id: String,
    year: i32,
    month: u32,
    #[serde(skip)]
    first_day: NaiveDate,
    #[serde(skip)]
    last_day: NaiveDate,
}

impl Period {
    /// Creates the period for `month` (1 through 12) of `year` for `user_id`.
    ///
    /// # Errors
    /// - Returns an error if `user_id` is blank.
    /// - Returns an error if `month` is not in `1..=12` or `year` is not in `1..=9999`.
    pub fn new(user_id: impl Into<String>, year: i32, month: u32) -> Result<Self> {
        let user_id = user_id.into();
        ensure!(!user_id.trim().is_empty(), "A period requires a user id");
        ensure!(
            YEARS.contains(&year),
            "Invalid year {year}, expected a value from 1 to 9999"
        );
        ensure!(
            (1..=12).contains(&month),
            "Invalid month {month}, expected a value from 1 to 12"
        );
        let first_day = NaiveDate::from_ymd_opt(year, month, 1)
            .with_context(|| format!("Invalid period {year}-{month:02}"))?;
        let last_day = first_day
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .with_context(|| format!("Unable to find the last day of {year}-{month:02}"))?;
        Ok(Self {
            user_id,
            year,
            month,
            first_day,
            last_day,
        })
    }

    /// Creates the period that contains `date`.
    pub fn containing(user_id: impl Into<String>, date: NaiveDate) -> Result<Self> {
        Self::new(user_id, date.year(), date.month())
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    /// Returns true if `date` falls within this calendar month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day && date <= self.last_day
    }

    /// The month before this one, for the same user.
    pub fn previous(&self) -> Result<Self> {
        let date = self
            .first_day
            .checked_sub_months(Months::new(1))
            .with_context(|| format!("There is no month before {self}"))?;
        Self::containing(self.user_id.clone(), date)
    }

    /// The `count` periods ending with this one, oldest first.
    ///
    /// # Errors
    /// Returns an error if `count` exceeds `MAX_TRAILING_MONTHS` or reaches before year 1.
    pub fn trailing(&self, count: u32) -> Result<Vec<Self>> {
        ensure!(
            count <= MAX_TRAILING_MONTHS,
            "Cannot go back {count} months, the limit is {MAX_TRAILING_MONTHS}"
        );
        let mut periods = Vec::new();
        let mut current = self.clone();
        for ix in 0..count {
            if ix > 0 {
                current = current.previous()?;
            }
            periods.push(current.clone());
        }
        periods.reverse();
        Ok(periods)
    }

    /// The identifier of the aggregate documents stored for this period.
    pub fn document_id(&self) -> String {
        document_id(&self.user_id, self.year, self.month)
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Builds the identifier of an aggregate document, e.g. `user-1_2025-03`.
pub fn document_id(user_id: &str, year: i32, month: u32) -> String {
    format!("{user_id}_{year}-{month:02}")
}
