//! Facade over the local store and the backend: settings, mode selection,
//! exports, the calendar view and the media cache.

pub mod calendar;
pub mod error;
pub mod export;
pub mod media_cache;
pub mod mode;
pub mod settings;
pub mod store;

pub use calendar::{calendar_events, month_grid, CalendarDay, CalendarEvent, MonthGrid};
pub use error::WorksiteError;
pub use media_cache::{MediaCache, MediaSource};
pub use mode::ApiMode;
pub use settings::Settings;
pub use store::{DataSource, LocalStore, ProjectStore, RemoteStore};

// Re-export the building blocks so frontends need only this crate.
pub use worksite_core::{
    ExportFile, ExportFormat, ExportRange, FieldStyle, ListQuery, MediaKind, MediaRef, Page,
    Project, ProjectDraft, ProjectPatch, ProjectStatus, Stage, Stages,
};
pub use worksite_remote::{DailyWeather, Location, Metric, WeatherClient, WeatherMap};

/// Today's date in the local timezone.
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
