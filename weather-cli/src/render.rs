use chrono::{DateTime, TimeZone, Utc};
use std::fmt::{Display, Write};
use weather_core::{Condition, Dashboard, Units, UiState, WeatherReport, round_temp};

pub const HEADLINE: &str = "How's the sky looking today?";

/// Render the screen for `state`. Times are shown in `tz`.
pub fn render<Tz>(state: &UiState, tz: &Tz, units: Units) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match state {
        UiState::Idle => idle_screen(),
        UiState::Loading { query } => format!("Loading weather data for {query}...\n"),
        UiState::Error { message } => format!("{message}\n\n[ Try Again ]\n"),
        UiState::Success(report) => success_screen(report, tz, units),
    }
}

fn idle_screen() -> String {
    format!("Weather Today\n\n{HEADLINE}\n\nSearch for a city to see weather information\n")
}

fn success_screen<Tz>(report: &WeatherReport, tz: &Tz, units: Units) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let dashboard = Dashboard::build(report, tz);
    let current = dashboard.current;
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Weather Now\n");
    let _ = writeln!(out, "{}, {}", current.location_name, current.country);
    let _ = writeln!(out, "{}", format_full_date(current.observation_time, tz));
    let _ = writeln!(
        out,
        "{}{}  {}",
        round_temp(current.temperature),
        units.temperature_symbol(),
        current.condition.description
    );
    if let Some(icon) = icon_line(&current.condition) {
        let _ = writeln!(out, "{icon}");
    }
    out.push('\n');

    let symbol = units.temperature_symbol();
    let _ = writeln!(out, "{:<12}{}{symbol}", "Feels like", round_temp(current.feels_like));
    let _ = writeln!(out, "{:<12}{}%", "Humidity", current.humidity_pct);
    let _ = writeln!(out, "{:<12}{} {}", "Wind", current.wind_speed, units.wind_speed_unit());
    let _ = writeln!(out, "{:<12}{} mb", "Pressure", current.pressure_hpa);
    out.push('\n');

    let _ = writeln!(out, "Daily forecast");
    for day in &dashboard.daily {
        let _ = writeln!(
            out,
            "  {:<4}{:>5}{symbol} {:>5}{symbol}  {}",
            day.weekday, day.max_temp, day.min_temp, day.condition.description
        );
    }
    out.push('\n');

    let _ = writeln!(out, "Hourly forecast ({})", format_weekday(current.observation_time, tz));
    for hour in dashboard.hourly {
        let _ = writeln!(
            out,
            "  {}{:>5}{symbol}  {}",
            format_time(hour.time, tz),
            round_temp(hour.temperature),
            hour.condition.description
        );
    }

    out
}

fn icon_line(condition: &Condition) -> Option<String> {
    condition.has_icon().then(|| format!("Icon: {}", condition.icon_url()))
}

/// e.g. `Monday, January 15`
pub fn format_full_date<Tz>(time: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.with_timezone(tz).format("%A, %B %-d").to_string()
}

pub fn format_weekday<Tz>(time: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.with_timezone(tz).format("%A").to_string()
}

/// 24-hour `HH:MM`.
pub fn format_time<Tz>(time: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.with_timezone(tz).format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::{CurrentConditions, ForecastSample, SearchQuery};

    fn condition(description: &str, icon: &str) -> Condition {
        Condition {
            id: 500,
            main: "Rain".into(),
            description: description.into(),
            icon: icon.into(),
        }
    }

    fn at(ts: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(ts, 0).expect("valid timestamp")
    }

    fn report() -> WeatherReport {
        // 2024-01-15 12:00:00 UTC, a Monday.
        let start = 1_705_320_000;
        WeatherReport {
            current: CurrentConditions {
                location_name: "London".into(),
                country: "GB".into(),
                observation_time: at(start),
                temperature: 12.6,
                feels_like: 11.4,
                humidity_pct: 81,
                wind_speed: 4.63,
                pressure_hpa: 1012,
                condition: condition("broken clouds", "04d"),
            },
            forecast: (0..12)
                .map(|n| ForecastSample {
                    time: at(start + n * 3 * 3600),
                    temperature: n as f64,
                    condition: condition("light rain", "10d"),
                })
                .collect(),
        }
    }

    #[test]
    fn idle_shows_search_prompt() {
        let screen = render(&UiState::Idle, &Utc, Units::Metric);
        assert!(screen.contains(HEADLINE));
        assert!(screen.contains("Search for a city to see weather information"));
    }

    #[test]
    fn loading_names_the_place() {
        let state = UiState::Loading { query: SearchQuery::parse("Oslo").expect("query") };
        assert!(render(&state, &Utc, Units::Metric).starts_with("Loading weather data"));
    }

    #[test]
    fn error_shows_message_and_retry() {
        let state = UiState::Error { message: "City not found. Please try again.".into() };
        let screen = render(&state, &Utc, Units::Metric);

        assert!(screen.contains("City not found. Please try again."));
        assert!(screen.contains("Try Again"));
        assert!(!screen.contains("Feels like"));
    }

    #[test]
    fn success_shows_current_conditions() {
        let state = UiState::Success(Box::new(report()));
        let screen = render(&state, &Utc, Units::Metric);

        assert!(screen.contains("London, GB"));
        assert!(screen.contains("Monday, January 15"));
        assert!(screen.contains("13°C  broken clouds"));
        assert!(screen.contains("https://openweathermap.org/img/wn/04d@2x.png"));
        assert!(screen.contains("81%"));
        assert!(screen.contains("4.63 m/s"));
        assert!(screen.contains("1012 mb"));
        assert!(screen.contains("Hourly forecast (Monday)"));
    }

    #[test]
    fn success_lists_daily_rows_and_eight_hours() {
        let state = UiState::Success(Box::new(report()));
        let screen = render(&state, &Utc, Units::Imperial);

        // Samples 12:00..21:00 fall on Monday (0..=3), 00:00..21:00 on Tuesday (4..=11).
        assert!(screen.contains("Mon     3°F     0°F"));
        assert!(screen.contains("Tue    11°F     4°F"));
        assert!(screen.contains("mph"));

        let hourly_rows = screen
            .split("Hourly forecast")
            .nth(1)
            .map(|section| section.lines().skip(1).filter(|l| !l.is_empty()).count());
        assert_eq!(hourly_rows, Some(8));
        assert!(screen.contains("  12:00    0°F  light rain"));
    }

    #[test]
    fn standard_units_show_kelvin_in_every_row() {
        let state = UiState::Success(Box::new(report()));
        let screen = render(&state, &Utc, Units::Standard);

        assert!(screen.contains("Feels like  11K"));
        assert!(screen.contains("Mon     3K     0K"));
        assert!(screen.contains("  12:00    0K  light rain"));
        assert!(!screen.contains('°'));
    }

    #[test]
    fn missing_icon_is_not_rendered() {
        let mut report = report();
        report.current.condition = Condition::unknown();

        let screen = render(&UiState::Success(Box::new(report)), &Utc, Units::Metric);
        assert!(!screen.contains("Icon:"));
    }

    #[test]
    fn time_formats() {
        let time = at(1_705_320_000 + 9 * 3600);
        assert_eq!(format_time(time, &Utc), "21:00");
        assert_eq!(format_weekday(time, &Utc), "Monday");
        assert_eq!(format_full_date(time, &Utc), "Monday, January 15");
    }
}
