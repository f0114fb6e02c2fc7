use std::fmt::Write;

use chrono::{Duration, NaiveDate};
use weatherdash_core::{Units, WeatherReport};

fn temp(c: f64, f: f64, units: Units) -> String {
    match units {
        Units::Metric => format!("{:.0}°C", c),
        Units::Imperial => format!("{:.0}°F", f),
    }
}

/// "Today", "Tomorrow", or the weekday name.
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if date == today + Duration::days(1) {
        "Tomorrow".to_string()
    } else {
        date.format("%A").to_string()
    }
}

pub fn render_report(report: &WeatherReport, units: Units) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    let c = &report.current;
    let today = c.localtime.date_naive();

    let place = if c.country.is_empty() { c.name.clone() } else { format!("{}, {}", c.name, c.country) };
    writeln!(out, "{place} ({})", c.localtime.format("%Y-%m-%d %H:%M"))?;
    writeln!(
        out,
        "  {} {}, feels like {}",
        temp(c.temp_c, c.temp_f, units),
        c.condition.text,
        temp(c.feelslike_c, c.feelslike_f, units),
    )?;
    writeln!(
        out,
        "  Humidity {}%  Wind {:.0} km/h  Pressure {:.0} mb  Visibility {:.1} km  UV {:.0}",
        c.humidity, c.wind_kph, c.pressure_mb, c.vis_km, c.uv,
    )?;

    if !report.hourly.is_empty() {
        writeln!(out, "\n24-Hour Forecast")?;
        for h in &report.hourly {
            writeln!(
                out,
                "  {}  {:>5}  {:<12} {:>3}%  {:>3.0} km/h",
                h.time,
                temp(h.temp_c, h.temp_f, units),
                h.condition.text,
                h.humidity,
                h.wind_kph,
            )?;
        }
    }

    if !report.forecast.is_empty() {
        writeln!(out, "\n5-Day Forecast")?;
        for d in &report.forecast {
            writeln!(
                out,
                "  {:<9} {}  {:>5} / {:<5}  {}",
                day_label(d.date, today),
                d.date.format("%b %-d"),
                temp(d.day.maxtemp_c, d.day.maxtemp_f, units),
                temp(d.day.mintemp_c, d.day.mintemp_f, units),
                d.day.condition.text,
            )?;
        }
    }

    Ok(out)
}
