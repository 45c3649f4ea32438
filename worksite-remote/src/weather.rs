//! Daily weather for the calendar, from Open-Meteo.
//!
//! Days before today come from the ERA5 reanalysis archive (hourly values
//! aggregated per day); today onwards comes from the daily forecast, which
//! reaches two weeks out. Nothing is fetched more than a month ahead.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;
use worksite_core::util::{parse_date, round1};

use crate::error::RemoteError;

pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/era5";

/// Last forecast day, counted from today.
pub const FORECAST_HORIZON_DAYS: i64 = 13;
/// Nothing beyond this many days ahead is requested or shown.
pub const FUTURE_LIMIT_DAYS: i64 = 30;

const ARCHIVE_TIMEOUT: Duration = Duration::from_secs(15);
const FORECAST_TIMEOUT: Duration = Duration::from_secs(12);

// ── Locations and metrics ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Location {
    #[default]
    Auckland,
    Wellington,
    Christchurch,
}

impl Location {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Auckland => "auckland",
            Self::Wellington => "wellington",
            Self::Christchurch => "christchurch",
        }
    }

    pub fn latitude(&self) -> f64 {
        match self {
            Self::Auckland => -36.8485,
            Self::Wellington => -41.2865,
            Self::Christchurch => -43.5321,
        }
    }

    pub fn longitude(&self) -> f64 {
        match self {
            Self::Auckland => 174.7633,
            Self::Wellington => 174.7762,
            Self::Christchurch => 172.6365,
        }
    }

    pub fn timezone(&self) -> &'static str {
        "Pacific/Auckland"
    }

    pub fn all() -> &'static [Location] {
        &[Self::Auckland, Self::Wellington, Self::Christchurch]
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Location {
    type Err = RemoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|loc| loc.key() == lower)
            .ok_or_else(|| RemoteError::Api(format!("unknown location '{s}'")))
    }
}

/// A weather value shown per calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    /// Rainfall in mm.
    Rain,
    /// Mean temperature in °C.
    Temp,
    /// Maximum precipitation probability in %. Forecast only.
    Prob,
}

impl Metric {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Rain => "rain",
            Self::Temp => "temp",
            Self::Prob => "prob",
        }
    }

    /// Parse a comma-separated list such as `rain,temp`.
    pub fn parse_list(s: &str) -> Result<BTreeSet<Metric>, RemoteError> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Metric {
    type Err = RemoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rain" | "mm" => Ok(Self::Rain),
            "temp" | "temperature" => Ok(Self::Temp),
            "prob" | "probability" => Ok(Self::Prob),
            _ => Err(RemoteError::Api(format!(
                "unknown weather metric '{s}' (expected rain, temp, or prob)"
            ))),
        }
    }
}

// ── Results ─────────────────────────────────────────────────────────────────

/// Weather for one day. Unrequested or unavailable values are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DailyWeather {
    pub prob: Option<f64>,
    pub rain_mm: Option<f64>,
    pub temp_avg: Option<f64>,
}

impl DailyWeather {
    fn merge(&mut self, other: DailyWeather) {
        self.prob = other.prob.or(self.prob);
        self.rain_mm = other.rain_mm.or(self.rain_mm);
        self.temp_avg = other.temp_avg.or(self.temp_avg);
    }

    pub fn is_empty(&self) -> bool {
        self.prob.is_none() && self.rain_mm.is_none() && self.temp_avg.is_none()
    }

    /// Short labels in display order, e.g. `["40%", "2.5mm", "14.2°"]`.
    pub fn labels(&self) -> Vec<String> {
        let mut parts = Vec::new();
        if let Some(prob) = self.prob {
            parts.push(format!("{prob:.0}%"));
        }
        if let Some(mm) = self.rain_mm {
            parts.push(format!("{mm}mm"));
        }
        if let Some(temp) = self.temp_avg {
            parts.push(format!("{temp}°"));
        }
        parts
    }
}

pub type WeatherMap = BTreeMap<NaiveDate, DailyWeather>;

// ── Windowing ───────────────────────────────────────────────────────────────

/// Which date spans to request from each source for a visible range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeatherWindows {
    pub past: Option<(NaiveDate, NaiveDate)>,
    pub forecast: Option<(NaiveDate, NaiveDate)>,
}

impl WeatherWindows {
    /// Split the inclusive range `[start, end]` around `today`.
    ///
    /// The end is clipped to today + 30 days; a range that starts beyond
    /// that yields no windows at all.
    pub fn plan(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Self {
        let limit = today + chrono::Duration::days(FUTURE_LIMIT_DAYS);
        let horizon = today + chrono::Duration::days(FORECAST_HORIZON_DAYS);
        if start > limit || end < start {
            return Self::default();
        }
        let end = end.min(limit);

        let past = today.pred_opt().and_then(|yesterday| {
            let past_end = end.min(yesterday);
            (start < today && start <= past_end).then_some((start, past_end))
        });

        let forecast_start = start.max(today);
        let forecast_end = end.min(horizon);
        let forecast = (forecast_start <= forecast_end).then_some((forecast_start, forecast_end));

        Self { past, forecast }
    }

    pub fn is_empty(&self) -> bool {
        self.past.is_none() && self.forecast.is_none()
    }
}

// ── Wire shapes ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct HourlySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DailySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub precipitation_probability_max: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    #[serde(default)]
    hourly: HourlySeries,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    daily: DailySeries,
}

fn at(series: &[Option<f64>], idx: usize) -> Option<f64> {
    series.get(idx).copied().flatten()
}

/// Collapse hourly archive values into days: rainfall is summed and
/// temperature averaged, both rounded to one decimal.
pub fn aggregate_hourly(hourly: &HourlySeries, metrics: &BTreeSet<Metric>) -> WeatherMap {
    #[derive(Default)]
    struct Acc {
        temp_sum: f64,
        temp_count: u32,
        rain_sum: f64,
    }

    let want_rain = metrics.contains(&Metric::Rain);
    let want_temp = metrics.contains(&Metric::Temp);
    let mut days: BTreeMap<NaiveDate, Acc> = BTreeMap::new();
    for (idx, ts) in hourly.time.iter().enumerate() {
        let Ok(day) = parse_date(ts) else {
            continue;
        };
        let acc = days.entry(day).or_default();
        if let (true, Some(t)) = (want_temp, at(&hourly.temperature_2m, idx)) {
            acc.temp_sum += t;
            acc.temp_count += 1;
        }
        if let (true, Some(r)) = (want_rain, at(&hourly.precipitation, idx)) {
            acc.rain_sum += r;
        }
    }

    days.into_iter()
        .map(|(day, acc)| {
            let weather = DailyWeather {
                prob: None,
                rain_mm: want_rain.then(|| round1(acc.rain_sum)),
                temp_avg: (want_temp && acc.temp_count > 0)
                    .then(|| round1(acc.temp_sum / f64::from(acc.temp_count))),
            };
            (day, weather)
        })
        .collect()
}

/// Read daily forecast values. Temperature is the midpoint of max and min.
pub fn daily_from_forecast(daily: &DailySeries, metrics: &BTreeSet<Metric>) -> WeatherMap {
    let want_rain = metrics.contains(&Metric::Rain);
    let want_temp = metrics.contains(&Metric::Temp);
    let want_prob = metrics.contains(&Metric::Prob);
    daily
        .time
        .iter()
        .enumerate()
        .filter_map(|(idx, ts)| {
            let day = parse_date(ts).ok()?;
            let temp_avg = match (
                at(&daily.temperature_2m_max, idx),
                at(&daily.temperature_2m_min, idx),
            ) {
                (Some(max), Some(min)) if want_temp => Some(round1((max + min) / 2.0)),
                _ => None,
            };
            let weather = DailyWeather {
                prob: if want_prob {
                    at(&daily.precipitation_probability_max, idx)
                } else {
                    None
                },
                rain_mm: if want_rain {
                    at(&daily.precipitation_sum, idx).map(round1)
                } else {
                    None
                },
                temp_avg,
            };
            Some((day, weather))
        })
        .collect()
}

// ── Client ──────────────────────────────────────────────────────────────────

/// Open-Meteo client.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    forecast_url: String,
    archive_url: String,
}

impl WeatherClient {
    pub fn new() -> Result<Self, RemoteError> {
        Self::with_endpoints(FORECAST_URL, ARCHIVE_URL)
    }

    /// Client against alternative endpoints, e.g. a mirror or a test server.
    pub fn with_endpoints(forecast_url: &str, archive_url: &str) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            forecast_url: forecast_url.to_string(),
            archive_url: archive_url.to_string(),
        })
    }

    /// Weather for each day of `[start, end]` that is in reach.
    ///
    /// The archive and forecast are queried concurrently. A failing source
    /// is logged and skipped; days it would have covered are simply absent.
    pub async fn fetch(
        &self,
        location: Location,
        metrics: &BTreeSet<Metric>,
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> WeatherMap {
        let windows = WeatherWindows::plan(start, end, today);
        if metrics.is_empty() || windows.is_empty() {
            return WeatherMap::new();
        }

        let past = async {
            match windows.past {
                Some((from, to)) => self.fetch_past(location, metrics, from, to).await,
                None => Ok(WeatherMap::new()),
            }
        };
        let forecast = async {
            match windows.forecast {
                Some((from, to)) => self.fetch_forecast(location, metrics, from, to).await,
                None => Ok(WeatherMap::new()),
            }
        };
        let (past, forecast) = futures::join!(past, forecast);

        let mut merged = WeatherMap::new();
        for (source, result) in [("archive", past), ("forecast", forecast)] {
            match result {
                Ok(days) => {
                    for (day, weather) in days {
                        merged.entry(day).or_default().merge(weather);
                    }
                }
                Err(e) => log::warn!("Weather {} unavailable for {}: {}", source, location, e),
            }
        }
        merged
    }

    /// Archive data for `[start, end]`, all before today.
    pub async fn fetch_past(
        &self,
        location: Location,
        metrics: &BTreeSet<Metric>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<WeatherMap, RemoteError> {
        let mut hourly = Vec::new();
        if metrics.contains(&Metric::Temp) {
            hourly.push("temperature_2m");
        }
        if metrics.contains(&Metric::Rain) {
            hourly.push("precipitation");
        }
        if hourly.is_empty() {
            return Ok(WeatherMap::new());
        }

        let params = location_params(location, start, end, "hourly", &hourly);
        let resp = self
            .http
            .get(self.archive_url.as_str())
            .query(&params)
            .timeout(ARCHIVE_TIMEOUT)
            .send()
            .await?;
        let body: ArchiveResponse = decode(resp).await?;
        Ok(aggregate_hourly(&body.hourly, metrics))
    }

    /// Forecast data for `[start, end]`, from today on.
    pub async fn fetch_forecast(
        &self,
        location: Location,
        metrics: &BTreeSet<Metric>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<WeatherMap, RemoteError> {
        let mut daily = Vec::new();
        if metrics.contains(&Metric::Prob) {
            daily.push("precipitation_probability_max");
        }
        if metrics.contains(&Metric::Rain) {
            daily.push("precipitation_sum");
        }
        if metrics.contains(&Metric::Temp) {
            daily.push("temperature_2m_max");
            daily.push("temperature_2m_min");
        }
        if daily.is_empty() {
            return Ok(WeatherMap::new());
        }

        let params = location_params(location, start, end, "daily", &daily);
        let resp = self
            .http
            .get(self.forecast_url.as_str())
            .query(&params)
            .timeout(FORECAST_TIMEOUT)
            .send()
            .await?;
        let body: ForecastResponse = decode(resp).await?;
        Ok(daily_from_forecast(&body.daily, metrics))
    }
}

fn location_params(
    location: Location,
    start: NaiveDate,
    end: NaiveDate,
    series: &'static str,
    variables: &[&str],
) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", location.latitude().to_string()),
        ("longitude", location.longitude().to_string()),
        ("start_date", start.to_string()),
        ("end_date", end.to_string()),
        (series, variables.join(",")),
        ("timezone", location.timezone().to_string()),
    ]
}

async fn decode<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T, RemoteError> {
    let status = resp.status();
    let text = resp.text().await?;
    if !status.is_success() {
        return Err(RemoteError::Status {
            status: status.as_u16(),
            message: crate::backend::error_message(&text),
        });
    }
    serde_json::from_str(&text).map_err(Into::into)
}
