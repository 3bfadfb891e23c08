//! Plain-text output for reports, tables and errors.

use smartweather_core::{
    CurrentReport, ForecastTable, WeatherError, profile::ForecastProfile, report::format_temperature,
};

pub fn print_current(report: &CurrentReport) {
    println!();
    println!("📍 {}", report.place);
    for metric in report.metrics() {
        println!("  {:<18} {}", metric.label, metric.value);
    }
    println!(
        "  {:<18} {}",
        "Observed",
        report.current.snapshot.observed_at.format("%Y-%m-%d %H:%M UTC")
    );
}

pub fn print_attributes(report: &CurrentReport) {
    let attrs = report.attributes();
    let width = attrs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

    println!();
    println!("Full data table");
    for (attribute, value) in attrs {
        println!("  {attribute:<width$}  {value}");
    }
}

pub fn print_forecast(table: &ForecastTable) {
    println!();
    println!("📅 5-Day Weather Forecast (Every 3 Hours)");

    if table.is_empty() {
        println!("  (no forecast entries)");
        return;
    }

    println!(
        "  {:<10} {:<5} {:>8} {:>5} {:>6} {:>6}  {:<22} {:<26} {}",
        "Date", "Time", "Temp", "Hum%", "Wind", "Rain", "Weather", "HVAC", "Irrigation"
    );
    for row in &table.rows {
        let e = &row.entry;
        println!(
            "  {:<10} {:<5} {:>8} {:>5} {:>6.1} {:>6.1}  {:<22} {:<26} {}",
            e.date.format("%Y-%m-%d").to_string(),
            e.time.format("%H:%M").to_string(),
            format_temperature(e.temperature_c),
            e.humidity_pct,
            e.wind_speed_ms,
            e.rainfall_mm_3h,
            e.description,
            row.recommendation.hvac,
            row.recommendation.irrigation,
        );
    }
}

pub fn print_profile(profile: &ForecastProfile) {
    println!();
    println!("Forecast profile ({} rows)", profile.rows);

    for s in &profile.numeric {
        let std_dev = s.std_dev.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<18} count {:>3}  mean {:>7.2}  std {:>6}  min {:>7.2}  max {:>7.2}",
            s.column, s.count, s.mean, std_dev, s.min, s.max
        );
    }

    for s in &profile.text {
        let top = s
            .top
            .as_ref()
            .map(|(v, n)| format!("{v} ({n})"))
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<26} distinct {:>3}  top {}", s.column, s.distinct, top);
    }
}

/// Message shown to the user for a failed cycle.
pub fn error_message(err: &WeatherError) -> String {
    match err {
        WeatherError::Validation(msg) => format!("⚠️  Please enter valid input: {msg}"),
        WeatherError::ProviderStatus { status, body } => format!("🌩️  API Error: {status} - {body}"),
        WeatherError::Connection(msg) => format!("⚠️  Connection Error: {msg}"),
    }
}

pub fn print_error(err: &WeatherError) {
    eprintln!("{}", error_message(err));
}
