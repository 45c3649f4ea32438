use chrono::NaiveDate;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;
use worksite_lib::calendar::load_month;
use worksite_lib::{today, CalendarDay, Location, Metric, MonthGrid, WeatherClient};

use super::Context;
use crate::error::CliError;
use crate::spinner::with_spinner;

fn print_day(day: &CalendarDay, today: NaiveDate) {
    let label = day.date.format("%a %d").to_string();
    let label = if day.date == today {
        label.if_supports_color(Stderr, |t| t.bold()).to_string()
    } else if day.events.is_empty() {
        label.if_supports_color(Stderr, |t| t.dimmed()).to_string()
    } else {
        label
    };
    let weather = day
        .weather
        .map(|w| w.labels().join(" "))
        .unwrap_or_default();

    let mut events = day.events.iter();
    match events.next() {
        Some(first) => {
            log::info!(
                "  {}  {:<18} {} {}",
                label,
                weather.if_supports_color(Stderr, |t| t.blue()),
                first.project_code.if_supports_color(Stderr, |t| t.cyan()),
                first.title
            );
            for event in events {
                log::info!(
                    "  {:6}  {:<18} {} {}",
                    "",
                    "",
                    event.project_code.if_supports_color(Stderr, |t| t.cyan()),
                    event.title
                );
            }
        }
        None => log::info!("  {}  {}", label, weather.if_supports_color(Stderr, |t| t.blue())),
    }
}

pub(crate) fn print_grid(grid: &MonthGrid, today: NaiveDate) {
    log::info!(
        "{}",
        grid.month
            .format("%B %Y")
            .to_string()
            .if_supports_color(Stderr, |t| t.bold()),
    );
    for (i, week) in grid.weeks.iter().enumerate() {
        if i > 0 {
            log::info!("");
        }
        for day in week.iter().filter(|d| d.in_month) {
            print_day(day, today);
        }
    }
}

pub(crate) async fn run_calendar(
    ctx: &Context,
    month: Option<NaiveDate>,
    location: Option<Location>,
    weather: Option<String>,
    no_weather: bool,
) -> Result<(), CliError> {
    let today = today();
    let month = month.unwrap_or(today);
    let location = match location {
        Some(location) => location,
        None => ctx.settings.weather.location.parse()?,
    };
    let metrics = if no_weather {
        Default::default()
    } else {
        Metric::parse_list(weather.as_deref().unwrap_or(&ctx.settings.weather.metrics))?
    };

    let store = ctx.open_store()?;
    let weather = WeatherClient::new()?;
    let grid = with_spinner(
        ctx.quiet,
        "Loading schedule and weather...",
        load_month(&store, &weather, location, &metrics, month, today),
    )
    .await?;
    print_grid(&grid, today);
    Ok(())
}
