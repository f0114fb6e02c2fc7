use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    aggregate::{daily_forecast, hourly_forecast},
    error::WeatherError,
    model::{Query, WeatherReport},
    normalize::{normalize_current, normalize_forecast, utc_offset},
    provider::WeatherProvider,
};

/// Runs both upstream calls for a query and assembles the report.
#[derive(Debug, Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    pub async fn query(&self, query: &Query) -> Result<WeatherReport, WeatherError> {
        self.query_at(query, Utc::now()).await
    }

    /// Same as [`query`](Self::query) with an explicit clock.
    ///
    /// Both calls are always awaited. When they both fail the current
    /// conditions error is returned; call failures are reported before any
    /// normalization failure.
    pub async fn query_at(
        &self,
        query: &Query,
        now: DateTime<Utc>,
    ) -> Result<WeatherReport, WeatherError> {
        let (current, forecast) = tokio::join!(
            self.provider.fetch_current(query),
            self.provider.fetch_forecast(query),
        );

        let (current, forecast) = match (current, forecast) {
            (Ok(c), Ok(f)) => (c, f),
            (Err(e), _) | (Ok(_), Err(e)) => {
                tracing::warn!(locator = %query.locator, error = %e, "weather query failed");
                return Err(e);
            }
        };

        let current = normalize_current(current, query.units, now)?;

        let offset = utc_offset(forecast.city.timezone);
        let samples = normalize_forecast(&forecast, query.units)?;

        let report = WeatherReport {
            current,
            forecast: daily_forecast(&samples, offset),
            hourly: hourly_forecast(&samples, now, offset),
        };

        tracing::debug!(
            locator = %query.locator,
            days = report.forecast.len(),
            hours = report.hourly.len(),
            "weather query succeeded"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::Locator,
        normalize::{CurrentPayload, ForecastPayload},
        units::{Units, celsius_to_fahrenheit},
    };
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const NOW: i64 = 1_780_315_200; // 2026-06-01T12:00:00Z

    #[derive(Debug)]
    struct FakeProvider {
        current: Result<Value, WeatherError>,
        forecast: Result<Value, WeatherError>,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn new(current: Result<Value, WeatherError>, forecast: Result<Value, WeatherError>) -> Self {
            Self { current, forecast, calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn fetch_current(&self, _query: &Query) -> Result<CurrentPayload, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let value = self.current.clone()?;
            Ok(serde_json::from_value(value).expect("fixture must decode"))
        }

        async fn fetch_forecast(&self, _query: &Query) -> Result<ForecastPayload, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let value = self.forecast.clone()?;
            Ok(serde_json::from_value(value).expect("fixture must decode"))
        }
    }

    fn paris_current() -> Value {
        json!({
            "name": "Paris",
            "sys": { "country": "FR" },
            "main": { "temp": 18.0, "feels_like": 17.0, "humidity": 60, "pressure": 1012 },
            "wind": { "speed": 5.0 },
            "weather": [{ "main": "Clear", "icon": "01d" }],
            "timezone": 0
        })
    }

    fn entry(dt: i64, min: f64, max: f64) -> Value {
        json!({
            "dt": dt,
            "main": { "temp": (min + max) / 2.0, "temp_min": min, "temp_max": max, "humidity": 55 },
            "wind": { "speed": 3.0 },
            "weather": [{ "main": "Clouds", "icon": "04d" }]
        })
    }

    /// 3-hourly steps starting at `NOW` covering six calendar days.
    fn paris_forecast() -> Value {
        let list: Vec<Value> = (0..40).map(|i| entry(NOW + i * 3 * 3600, 10.0, 20.0)).collect();
        json!({
            "city": { "name": "Paris", "country": "FR", "timezone": 0 },
            "list": list
        })
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(NOW, 0).unwrap()
    }

    fn paris() -> Query {
        Query::new(Locator::city("Paris").unwrap(), Units::Metric)
    }

    fn service(provider: FakeProvider) -> (WeatherService, Arc<FakeProvider>) {
        let provider = Arc::new(provider);
        (WeatherService::new(provider.clone()), provider)
    }

    #[tokio::test]
    async fn paris_metric_report() {
        let (svc, provider) = service(FakeProvider::new(Ok(paris_current()), Ok(paris_forecast())));

        let report = svc.query_at(&paris(), now()).await.expect("query should succeed");

        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        assert!((report.current.temp_f - 64.4).abs() < 1e-9);
        assert_eq!(report.current.vis_km, 10.0);
        assert_eq!(report.forecast.len(), 5);
        assert!(report.hourly.len() <= 24);
        assert_eq!(report.hourly.len(), 9);
        assert_eq!(report.hourly[0].time, "12:00");
        assert_eq!(report.forecast[0].date, now().date_naive());
    }

    #[tokio::test]
    async fn every_dual_unit_pair_follows_the_conversion_law() {
        let imperial = Query::new(Locator::city("Paris").unwrap(), Units::Imperial);
        let (svc, _) = service(FakeProvider::new(Ok(paris_current()), Ok(paris_forecast())));

        let report = svc.query_at(&imperial, now()).await.unwrap();

        let c = &report.current;
        assert_eq!(c.temp_f, celsius_to_fahrenheit(c.temp_c));
        assert_eq!(c.feelslike_f, celsius_to_fahrenheit(c.feelslike_c));
        for day in &report.forecast {
            assert_eq!(day.day.maxtemp_f, celsius_to_fahrenheit(day.day.maxtemp_c));
            assert_eq!(day.day.mintemp_f, celsius_to_fahrenheit(day.day.mintemp_c));
        }
        for hour in &report.hourly {
            assert_eq!(hour.temp_f, celsius_to_fahrenheit(hour.temp_c));
        }
    }

    #[tokio::test]
    async fn not_found_returns_no_report() {
        let (svc, _) = service(FakeProvider::new(
            Err(WeatherError::NotFound),
            Err(WeatherError::NotFound),
        ));
        let query = Query::new(Locator::city("Qwxyzabc").unwrap(), Units::Metric);

        let result = svc.query_at(&query, now()).await;
        assert_eq!(result, Err(WeatherError::NotFound));
    }

    #[tokio::test]
    async fn current_error_wins_when_both_calls_fail() {
        let (svc, provider) = service(FakeProvider::new(
            Err(WeatherError::NotFound),
            Err(WeatherError::ServiceUnavailable { status: 503 }),
        ));

        let result = svc.query_at(&paris(), now()).await;
        assert_eq!(result, Err(WeatherError::NotFound));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn forecast_failure_fails_the_whole_query() {
        let (svc, _) = service(FakeProvider::new(Ok(paris_current()), Err(WeatherError::RateLimited)));

        assert_eq!(svc.query_at(&paris(), now()).await, Err(WeatherError::RateLimited));
    }

    #[tokio::test]
    async fn call_failure_beats_malformed_current() {
        let mut current = paris_current();
        current["weather"] = json!([]);
        let (svc, _) = service(FakeProvider::new(Ok(current), Err(WeatherError::Unauthorized)));

        assert_eq!(svc.query_at(&paris(), now()).await, Err(WeatherError::Unauthorized));
    }

    #[tokio::test]
    async fn malformed_forecast_fails_the_whole_query() {
        let mut forecast = paris_forecast();
        forecast["list"][3]["weather"] = json!([]);
        let (svc, _) = service(FakeProvider::new(Ok(paris_current()), Ok(forecast)));

        let result = svc.query_at(&paris(), now()).await;
        assert!(matches!(result, Err(WeatherError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn daily_extrema_in_report() {
        let forecast = json!({
            "city": { "name": "Paris", "timezone": 0 },
            "list": [
                entry(NOW, 2.0, 10.0),
                entry(NOW + 3 * 3600, -1.0, 15.0),
                entry(NOW + 6 * 3600, 4.0, 8.0),
            ]
        });
        let (svc, _) = service(FakeProvider::new(Ok(paris_current()), Ok(forecast)));

        let report = svc.query_at(&paris(), now()).await.unwrap();
        assert_eq!(report.forecast.len(), 1);
        assert_eq!(report.forecast[0].day.maxtemp_c, 15.0);
        assert_eq!(report.forecast[0].day.mintemp_c, -1.0);
    }
}
