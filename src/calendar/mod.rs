//! Calendar projection: maps the task set into positioned cells for day,
//! week and month layouts, given a pivot date and a view mode.
//!
//! Everything here is a pure function over a task snapshot; the UI recomputes
//! on render. Tasks whose due date fails to parse are excluded from every
//! view, the same fail-open policy the store queries use. Events sharing a
//! cell stack in input order; overlap is the renderer's problem.

use chrono::{Datelike, Days, Local, Months, NaiveDate, NaiveDateTime, Timelike};

use crate::dates::{self, monday_index};
use crate::tasks::types::{StatusFilter, Task};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    Day,
    Week,
    Month,
}

/// Pivot date plus active view mode. Navigation advances by one unit of the
/// view's granularity; month steps follow chrono's arithmetic, which clamps
/// the day (Jan 31 + 1 month = Feb 28/29).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarCursor {
    pub mode: ViewMode,
    pub date: NaiveDate,
}

impl CalendarCursor {
    pub fn new(mode: ViewMode, date: NaiveDate) -> Self {
        Self { mode, date }
    }

    pub fn next(self) -> Self {
        let date = match self.mode {
            ViewMode::Day => self.date.checked_add_days(Days::new(1)),
            ViewMode::Week => self.date.checked_add_days(Days::new(7)),
            ViewMode::Month => self.date.checked_add_months(Months::new(1)),
        };
        Self {
            mode: self.mode,
            date: date.unwrap_or(self.date),
        }
    }

    pub fn prev(self) -> Self {
        let date = match self.mode {
            ViewMode::Day => self.date.checked_sub_days(Days::new(1)),
            ViewMode::Week => self.date.checked_sub_days(Days::new(7)),
            ViewMode::Month => self.date.checked_sub_months(Months::new(1)),
        };
        Self {
            mode: self.mode,
            date: date.unwrap_or(self.date),
        }
    }
}

/// A task placed in calendar time.
#[derive(Clone, Debug)]
pub struct Event {
    pub task_id: u64,
    pub title: String,
    pub at: NaiveDateTime,
    /// Monday-first day index within the event's own week.
    pub day_index: usize,
    pub completed: bool,
    /// For color resolution by the renderer.
    pub list_id: Option<u64>,
}

/// Project tasks into events. Tasks without a due date, or with one no view
/// can place, are dropped; the status filter is applied first.
pub fn project_events(tasks: &[Task], filter: StatusFilter) -> Vec<Event> {
    tasks
        .iter()
        .filter(|t| filter.matches(t))
        .filter_map(|task| {
            let raw = task.due_date.as_deref()?;
            let at = match dates::parse_due_date(raw) {
                Some(at) => at,
                None => {
                    tracing::debug!(
                        target: "calendar",
                        id = task.id,
                        due_date = raw,
                        "Unparseable due date, excluding task from calendar"
                    );
                    return None;
                }
            };
            Some(Event {
                task_id: task.id,
                title: task.todo.clone(),
                at,
                day_index: monday_index(at.weekday()),
                completed: task.completed,
                list_id: task.list_id,
            })
        })
        .collect()
}

/// An event with its vertical offset inside a row or band, as a fraction of
/// the row height (`0.0` = top, approaching `1.0` = bottom).
#[derive(Clone, Debug)]
pub struct Positioned {
    pub event: Event,
    pub offset: f32,
}

// ---------------------------------------------------------------------------
// Day view
// ---------------------------------------------------------------------------

/// One of the 24 hourly rows of the day view.
#[derive(Clone, Debug, Default)]
pub struct HourRow {
    pub events: Vec<Positioned>,
}

/// Partition the events falling on `date` into 24 hourly rows, each event
/// offset by its minute fraction within the hour.
pub fn day_grid(events: &[Event], date: NaiveDate) -> [HourRow; 24] {
    let mut rows: [HourRow; 24] = std::array::from_fn(|_| HourRow::default());
    for event in events.iter().filter(|e| e.at.date() == date) {
        let hour = event.at.hour() as usize;
        let offset = event.at.minute() as f32 / 60.0;
        rows[hour].events.push(Positioned {
            event: event.clone(),
            offset,
        });
    }
    rows
}

// ---------------------------------------------------------------------------
// Week view
// ---------------------------------------------------------------------------

/// A coarse time-of-day band of the week view.
#[derive(Clone, Copy, Debug)]
pub struct TimeBand {
    pub label: &'static str,
    pub period: &'static str,
    pub start_hour: u32,
    pub end_hour: u32,
}

impl TimeBand {
    pub fn contains(&self, hour: u32) -> bool {
        (self.start_hour..=self.end_hour).contains(&hour)
    }

    pub fn hour_span(&self) -> u32 {
        self.end_hour - self.start_hour + 1
    }

    /// Fraction of the band's height for a given time of day.
    fn fraction(&self, hour: u32, minute: u32) -> f32 {
        ((hour - self.start_hour) as f32 + minute as f32 / 60.0) / self.hour_span() as f32
    }
}

/// The five bands of the week view.
pub const TIME_BANDS: [TimeBand; 5] = [
    TimeBand { label: "12-5 AM", period: "Early Morning", start_hour: 0, end_hour: 4 },
    TimeBand { label: "5-10 AM", period: "Morning", start_hour: 5, end_hour: 9 },
    TimeBand { label: "10-3 PM", period: "Midday", start_hour: 10, end_hour: 14 },
    TimeBand { label: "3-8 PM", period: "Evening", start_hour: 15, end_hour: 19 },
    TimeBand { label: "8-12 PM", period: "Night", start_hour: 20, end_hour: 23 },
];

fn band_for(hour: u32) -> usize {
    TIME_BANDS
        .iter()
        .position(|band| band.contains(hour))
        .expect("the bands cover all 24 hours")
}

/// Monday on or before the anchor date.
pub fn week_start(anchor: NaiveDate) -> NaiveDate {
    anchor - Days::new(monday_index(anchor.weekday()) as u64)
}

/// The seven days of the anchor's week, Monday first.
pub fn week_days(anchor: NaiveDate) -> [NaiveDate; 7] {
    let start = week_start(anchor);
    std::array::from_fn(|i| start + Days::new(i as u64))
}

/// One band x day cell of the week view.
#[derive(Clone, Debug, Default)]
pub struct WeekCell {
    pub events: Vec<Positioned>,
}

/// Bucket the anchor week's events into the 5-band x 7-day grid. Each event
/// is offset inside its band by the fraction of the band's hour span.
pub fn week_grid(events: &[Event], anchor: NaiveDate) -> [[WeekCell; 7]; 5] {
    let start = week_start(anchor);
    let end = start + Days::new(7);
    let mut grid: [[WeekCell; 7]; 5] =
        std::array::from_fn(|_| std::array::from_fn(|_| WeekCell::default()));

    for event in events {
        let day = event.at.date();
        if day < start || day >= end {
            continue;
        }
        let band_index = band_for(event.at.hour());
        let band = &TIME_BANDS[band_index];
        let offset = band.fraction(event.at.hour(), event.at.minute());
        grid[band_index][event.day_index].events.push(Positioned {
            event: event.clone(),
            offset,
        });
    }
    grid
}

// ---------------------------------------------------------------------------
// Month view
// ---------------------------------------------------------------------------

/// Number of cells in the fixed month grid (6 rows x 7 columns).
pub const MONTH_GRID_CELLS: usize = 42;

#[derive(Clone, Debug)]
pub struct MonthCell {
    pub date: NaiveDate,
    /// False for the leading/trailing fill cells, which the UI dims but
    /// still populates with events.
    pub in_month: bool,
    pub events: Vec<Event>,
}

/// The fixed 42-cell month grid: starts at the Monday on or before the 1st
/// and always spans six full weeks, filling from the neighboring months.
pub fn month_grid(events: &[Event], anchor: NaiveDate) -> Vec<MonthCell> {
    let first = anchor
        .with_day(1)
        .expect("day 1 exists in every month");
    let start = week_start(first);

    (0..MONTH_GRID_CELLS)
        .map(|i| {
            let date = start + Days::new(i as u64);
            let cell_events = events
                .iter()
                .filter(|e| e.at.date() == date)
                .cloned()
                .collect();
            MonthCell {
                date,
                in_month: date.month() == anchor.month() && date.year() == anchor.year(),
                events: cell_events,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Now marker
// ---------------------------------------------------------------------------

/// Position of the current moment in the day and week layouts, computed
/// independently of tasks. Drives the horizontal "now" line and the
/// scroll-to-now behavior.
#[derive(Clone, Copy, Debug)]
pub struct NowMarker {
    pub day_index: usize,
    pub hour: u32,
    pub minute: u32,
    /// Hour plus minute fraction, for positioning in the 24-row day view.
    pub hour_fraction: f32,
    pub band_index: usize,
    /// Fraction within the band, for positioning in the week view.
    pub band_fraction: f32,
}

impl NowMarker {
    pub fn at(now: NaiveDateTime) -> Self {
        let hour = now.hour();
        let minute = now.minute();
        let band_index = band_for(hour);
        Self {
            day_index: monday_index(now.weekday()),
            hour,
            minute,
            hour_fraction: hour as f32 + minute as f32 / 60.0,
            band_index,
            band_fraction: TIME_BANDS[band_index].fraction(hour, minute),
        }
    }

    pub fn now() -> Self {
        Self::at(Local::now().naive_local())
    }
}
