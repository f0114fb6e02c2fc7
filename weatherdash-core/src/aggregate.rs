//! Folding forecast steps into daily summaries and an hourly window.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};

use crate::{
    model::{Condition, DaySummary, ForecastDay, HourlySample},
    normalize::ForecastSample,
    units::celsius_to_fahrenheit,
};

pub const MAX_FORECAST_DAYS: usize = 5;
pub const MAX_HOURLY_SAMPLES: usize = 24;

struct Bucket {
    max_c: f64,
    min_c: f64,
    condition: Condition,
}

/// Groups samples by local calendar date.
///
/// Max and min are running extrema over every sample on the date; the
/// condition is the one of the first sample seen for that date. Dates come
/// out ascending, starting with the earliest date present.
pub fn daily_forecast(samples: &[ForecastSample], offset: FixedOffset) -> Vec<ForecastDay> {
    let mut buckets: BTreeMap<NaiveDate, Bucket> = BTreeMap::new();

    for sample in samples {
        let date = sample.at.with_timezone(&offset).date_naive();
        buckets
            .entry(date)
            .and_modify(|b| {
                b.max_c = b.max_c.max(sample.temp_max_c);
                b.min_c = b.min_c.min(sample.temp_min_c);
            })
            .or_insert_with(|| Bucket {
                max_c: sample.temp_max_c,
                min_c: sample.temp_min_c,
                condition: sample.condition.clone(),
            });
    }

    let days: Vec<ForecastDay> = buckets
        .into_iter()
        .take(MAX_FORECAST_DAYS)
        .map(|(date, b)| ForecastDay {
            date,
            day: DaySummary {
                maxtemp_c: b.max_c,
                maxtemp_f: celsius_to_fahrenheit(b.max_c),
                mintemp_c: b.min_c,
                mintemp_f: celsius_to_fahrenheit(b.min_c),
                condition: b.condition,
            },
        })
        .collect();

    tracing::debug!(samples = samples.len(), days = days.len(), "aggregated daily forecast");
    days
}

/// Samples in `[now, now + 24h]`, ascending, labelled with the local `HH:MM`.
pub fn hourly_forecast(
    samples: &[ForecastSample],
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Vec<HourlySample> {
    let horizon = now + Duration::hours(24);

    let mut window: Vec<&ForecastSample> =
        samples.iter().filter(|s| s.at >= now && s.at <= horizon).collect();
    window.sort_by_key(|s| s.at);

    window
        .into_iter()
        .take(MAX_HOURLY_SAMPLES)
        .map(|s| HourlySample {
            time: s.at.with_timezone(&offset).format("%H:%M").to_string(),
            temp_c: s.temp_c,
            temp_f: celsius_to_fahrenheit(s.temp_c),
            condition: s.condition.clone(),
            humidity: s.humidity,
            wind_kph: s.wind_kph,
        })
        .collect()
}
