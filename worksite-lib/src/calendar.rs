//! Calendar view: all-day events per project laid out on a month grid with
//! the day's weather alongside.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use worksite_core::util::month_bounds;
use worksite_core::{ListQuery, Project, ProjectStatus};
use worksite_remote::weather::FUTURE_LIMIT_DAYS;
use worksite_remote::{DailyWeather, Location, Metric, WeatherClient, WeatherMap};

use crate::error::WorksiteError;
use crate::store::{list_all, ProjectStore};

/// An all-day event. `end_exclusive` is the day after the last work day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub project_id: i64,
    pub project_code: String,
    pub title: String,
    pub start: NaiveDate,
    pub end_exclusive: NaiveDate,
    pub status: ProjectStatus,
}

impl CalendarEvent {
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start <= day && day < self.end_exclusive
    }
}

/// Title shown on the calendar: `"{installer} / {stage}"`, with `-` for
/// whichever part is missing.
pub fn event_title(project: &Project) -> String {
    let installer = project.installer.trim();
    let installer = if installer.is_empty() { "-" } else { installer };
    let stage = project.stages.primary().map_or("-", |s| s.label());
    format!("{installer} / {stage}")
}

/// Events for every project with a start date. A missing end date makes a
/// single-day event.
pub fn calendar_events(projects: &[Project]) -> Vec<CalendarEvent> {
    projects
        .iter()
        .filter_map(|p| {
            let start = p.start_date?;
            let last = p.end_date.unwrap_or(start).max(start);
            Some(CalendarEvent {
                project_id: p.id,
                project_code: p.project_code.clone(),
                title: event_title(p),
                start,
                end_exclusive: last + Duration::days(1),
                status: p.status,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// False for the leading and trailing days of neighbouring months.
    pub in_month: bool,
    pub events: Vec<CalendarEvent>,
    #[serde(skip)]
    pub weather: Option<DailyWeather>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGrid {
    /// First day of the month.
    pub month: NaiveDate,
    /// Monday-first weeks covering the whole month.
    pub weeks: Vec<Vec<CalendarDay>>,
}

impl MonthGrid {
    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.weeks.iter().flatten()
    }
}

/// Lay out the month containing `month`. Weather more than
/// [`FUTURE_LIMIT_DAYS`] after `today` is never shown.
pub fn month_grid(
    month: NaiveDate,
    events: &[CalendarEvent],
    weather: &WeatherMap,
    today: NaiveDate,
) -> MonthGrid {
    let (first, _) = month_bounds(month);
    let (grid_start, grid_end) = grid_range(month);
    let weather_limit = today + Duration::days(FUTURE_LIMIT_DAYS);

    let mut weeks = Vec::new();
    let mut week = Vec::with_capacity(7);
    for date in grid_start.iter_days().take_while(|d| *d <= grid_end) {
        let events = events.iter().filter(|e| e.covers(date)).cloned().collect();
        let weather = weather
            .get(&date)
            .filter(|w| date <= weather_limit && !w.is_empty())
            .copied();
        week.push(CalendarDay {
            date,
            in_month: date.month() == first.month(),
            events,
            weather,
        });
        if week.len() == 7 {
            weeks.push(std::mem::replace(&mut week, Vec::with_capacity(7)));
        }
    }

    MonthGrid {
        month: first,
        weeks,
    }
}

/// The visible span of the grid for `month`, used to fetch weather.
pub fn grid_range(month: NaiveDate) -> (NaiveDate, NaiveDate) {
    let (first, last) = month_bounds(month);
    (
        first - Duration::days(first.weekday().num_days_from_monday() as i64),
        last + Duration::days(6 - last.weekday().num_days_from_monday() as i64),
    )
}

/// Load projects and weather for the month containing `month` and lay
/// them out. Weather failures only leave days blank.
pub async fn load_month<S: ProjectStore>(
    store: &S,
    weather: &WeatherClient,
    location: Location,
    metrics: &BTreeSet<Metric>,
    month: NaiveDate,
    today: NaiveDate,
) -> Result<MonthGrid, WorksiteError> {
    let (start, end) = grid_range(month);
    let query = ListQuery {
        start: Some(start),
        end: Some(end),
        ..ListQuery::default()
    };
    let (projects, days) = futures::join!(
        list_all(store, &query),
        weather.fetch(location, metrics, start, end, today)
    );
    let events = calendar_events(&projects?);
    Ok(month_grid(month, &events, &days, today))
}
