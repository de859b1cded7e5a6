//! Calendar cursor for the agenda screens.
//!
//! Pure date arithmetic: the selected day, the sliding strip around it,
//! month grids and week runs. Out-of-range day and month values roll
//! over the way a wall calendar would (day 32 of October is 1 November).

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;

/// Abbreviated weekday labels, Sunday first.
pub const WEEKDAY_LABELS: [&str; 7] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];

/// Abbreviated month labels, January first.
pub const MONTH_LABELS: [&str; 12] = [
    "JAN", "FEV", "MAR", "ABR", "MAI", "JUN", "JUL", "AGO", "SET", "OUT", "NOV", "DEZ",
];

/// Full month names for headers.
pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

pub const DAYS_IN_WEEK: u32 = 7;

/// One day as shown in the strip and week cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayDescriptor {
    pub weekday_name: &'static str,
    /// 0 = Sunday.
    pub weekday: u32,
    pub day: u32,
    /// 1-based.
    pub month: u32,
    pub year: i32,
}

impl DayDescriptor {
    pub fn from_date(date: NaiveDate) -> Self {
        let weekday = date.weekday().num_days_from_sunday();
        Self {
            weekday_name: WEEKDAY_LABELS[weekday as usize],
            weekday,
            day: date.day(),
            month: date.month(),
            year: date.year(),
        }
    }

    /// Back to a plain date. Always `Some` for descriptors built here.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// `YYYY-MM-DD`, the same key appointments are grouped by.
    pub fn key(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// What a 7-column month grid needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub month: u32,
    pub year: i32,
    /// Empty cells before day 1 (weekday index of day 1, Sunday = 0).
    pub leading_blanks: u32,
    pub day_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateCursor {
    date: NaiveDate,
}

impl DateCursor {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    pub fn today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Absolute move with calendar rollover on both day and month.
    /// Values outside chrono's representable range leave the cursor as is.
    pub fn set_day(&mut self, day: i64, month: i64, year: i32) {
        match normalize(day, month, year) {
            Some(date) => self.date = date,
            None => tracing::debug!(day, month, year, "date out of range, cursor unchanged"),
        }
    }

    pub fn shift_day(&mut self, delta: i64) {
        if let Some(date) = Duration::try_days(delta).and_then(|d| self.date.checked_add_signed(d)) {
            self.date = date;
        }
    }

    /// Day 1 of `month` in the cursor's year. Rolls over like `set_day`.
    pub fn select_month(&mut self, month: i64) {
        let year = self.year();
        self.set_day(1, month, year);
    }

    /// `2 * radius + 1` consecutive days centred on the cursor.
    /// Empty when the window would reach past chrono's date range; a
    /// shorter, off-centre window is never returned.
    pub fn window_around(&self, radius: u32) -> Vec<DayDescriptor> {
        let Some(count) = radius.checked_mul(2).and_then(|n| n.checked_add(1)) else {
            return Vec::new();
        };
        let span = Duration::days(i64::from(radius));
        match (
            self.date.checked_sub_signed(span),
            self.date.checked_add_signed(span),
        ) {
            (Some(start), Some(_)) => days_from(start, count),
            _ => Vec::new(),
        }
    }

    /// Seven consecutive days starting at the cursor, whatever weekday it is.
    pub fn week_starting(&self) -> Vec<DayDescriptor> {
        self.days_from_cursor(DAYS_IN_WEEK)
    }

    pub fn days_from_cursor(&self, count: u32) -> Vec<DayDescriptor> {
        days_from(self.date, count)
    }

    /// Grid of the cursor's month.
    pub fn current_grid(&self) -> MonthGrid {
        // The cursor's own month is always representable.
        Self::month_grid(i64::from(self.month()), self.year()).unwrap_or(MonthGrid {
            month: self.month(),
            year: self.year(),
            leading_blanks: 0,
            day_count: 0,
        })
    }

    /// Grid for any month; month values outside 1..=12 roll over into
    /// neighbouring years.
    pub fn month_grid(month: i64, year: i32) -> Option<MonthGrid> {
        let first = normalize(1, month, year)?;
        let next = first.checked_add_months(chrono::Months::new(1))?;
        Some(MonthGrid {
            month: first.month(),
            year: first.year(),
            leading_blanks: first.weekday().num_days_from_sunday(),
            day_count: (next - first).num_days() as u32,
        })
    }

    /// "Outubro 2024".
    pub fn header_label(&self) -> String {
        format!("{} {}", month_name(self.month()), self.year())
    }
}

impl Default for DateCursor {
    fn default() -> Self {
        Self::today()
    }
}

/// Full name of a 1-based month; empty for anything else.
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("")
}

/// Abbreviated label of a 1-based month; empty for anything else.
pub fn month_label(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_LABELS.get(i as usize))
        .copied()
        .unwrap_or("")
}

fn days_from(start: NaiveDate, count: u32) -> Vec<DayDescriptor> {
    start
        .iter_days()
        .take(count as usize)
        .map(DayDescriptor::from_date)
        .collect()
}

/// First of the (rolled over) month, then `day - 1` days forward or back.
fn normalize(day: i64, month: i64, year: i32) -> Option<NaiveDate> {
    let months = i64::from(year)
        .checked_mul(12)?
        .checked_add(month.checked_sub(1)?)?;
    let y = i32::try_from(months.div_euclid(12)).ok()?;
    let m = months.rem_euclid(12) as u32 + 1;
    let first = NaiveDate::from_ymd_opt(y, m, 1)?;
    first.checked_add_signed(Duration::try_days(day.checked_sub(1)?)?)
}
