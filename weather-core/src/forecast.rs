//! Reshapes the provider's flat 3-hour forecast into the dashboard's view models.

use chrono::{Datelike, NaiveDate, TimeZone};
use serde::Serialize;

use crate::model::{Condition, CurrentConditions, ForecastSample, WeatherReport};

/// Most days shown in the daily strip.
pub const MAX_DAYS: usize = 7;

/// Samples shown in the hourly strip (one day at 3-hour resolution).
pub const HOURLY_SAMPLES: usize = 8;

/// One calendar date reduced to a summary row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    /// Short weekday label, e.g. `Tue`.
    pub weekday: String,
    pub min_temp: i64,
    pub max_temp: i64,
    /// Condition of the first sample seen for this date.
    pub condition: Condition,
}

struct Bucket {
    date: NaiveDate,
    weekday: String,
    condition: Condition,
    min: f64,
    max: f64,
}

/// Round to the nearest integer with halves going toward +∞ (`-2.5 → -2`).
pub fn round_temp(value: f64) -> i64 {
    // `value + 0.5` can round up in floating point (0.49999999999999994 → 1.0).
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

/// Group samples by their calendar date in `tz`, keeping the first
/// `MAX_DAYS` dates in order of first appearance.
///
/// Samples are expected in chronological order; nothing is re-sorted.
pub fn daily_forecast<Tz: TimeZone>(samples: &[ForecastSample], tz: &Tz) -> Vec<DailyAggregate> {
    let mut buckets: Vec<Bucket> = Vec::with_capacity(MAX_DAYS);

    for sample in samples {
        let local = sample.time.with_timezone(tz);
        let date = local.date_naive();

        if let Some(bucket) = buckets.iter_mut().find(|b| b.date == date) {
            bucket.min = bucket.min.min(sample.temperature);
            bucket.max = bucket.max.max(sample.temperature);
            continue;
        }

        // Dates past the cap are dropped, but later samples of kept dates still count.
        if buckets.len() < MAX_DAYS {
            buckets.push(Bucket {
                date,
                weekday: local.weekday().to_string(),
                condition: sample.condition.clone(),
                min: sample.temperature,
                max: sample.temperature,
            });
        }
    }

    buckets
        .into_iter()
        .map(|b| DailyAggregate {
            date: b.date,
            weekday: b.weekday,
            min_temp: round_temp(b.min),
            max_temp: round_temp(b.max),
            condition: b.condition,
        })
        .collect()
}

/// The first `HOURLY_SAMPLES` samples, untouched.
pub fn hourly_forecast(samples: &[ForecastSample]) -> &[ForecastSample] {
    &samples[..samples.len().min(HOURLY_SAMPLES)]
}

/// Everything the success screen shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard<'a> {
    pub current: &'a CurrentConditions,
    pub daily: Vec<DailyAggregate>,
    pub hourly: &'a [ForecastSample],
}

impl<'a> Dashboard<'a> {
    pub fn build<Tz: TimeZone>(report: &'a WeatherReport, tz: &Tz) -> Self {
        Self {
            current: &report.current,
            daily: daily_forecast(&report.forecast, tz),
            hourly: hourly_forecast(&report.forecast),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, FixedOffset, Utc};

    fn condition(icon: &str) -> Condition {
        Condition {
            id: 800,
            main: "Clear".into(),
            description: "clear sky".into(),
            icon: icon.into(),
        }
    }

    fn sample(time: DateTime<Utc>, temperature: f64, icon: &str) -> ForecastSample {
        ForecastSample { time, temperature, condition: condition(icon) }
    }

    fn day(n: i64, hour: i64) -> DateTime<Utc> {
        // 2024-01-15 00:00:00 UTC, a Monday.
        DateTime::from_timestamp(1_705_276_800, 0).expect("valid timestamp")
            + Duration::days(n)
            + Duration::hours(hour)
    }

    #[test]
    fn groups_three_dates_in_order() {
        let samples = vec![
            sample(day(0, 9), 10.0, "01d"),
            sample(day(0, 12), 20.0, "02d"),
            sample(day(1, 9), 5.0, "10d"),
            sample(day(2, 3), 15.0, "13n"),
            sample(day(2, 9), 25.0, "01d"),
            sample(day(2, 15), 35.0, "01d"),
        ];

        let daily = daily_forecast(&samples, &Utc);

        let summary: Vec<_> = daily.iter().map(|d| (d.min_temp, d.max_temp)).collect();
        assert_eq!(summary, vec![(10, 20), (5, 5), (15, 35)]);
        assert_eq!(daily[0].date, day(0, 0).date_naive());
        assert_eq!(daily[0].weekday, "Mon");
        assert_eq!(daily[2].weekday, "Wed");
    }

    #[test]
    fn first_sample_seeds_condition() {
        let samples = vec![sample(day(0, 0), 1.0, "13n"), sample(day(0, 12), 3.0, "01d")];

        let daily = daily_forecast(&samples, &Utc);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].condition.icon, "13n");
    }

    #[test]
    fn caps_at_seven_earliest_dates() {
        let samples: Vec<_> = (0..10).map(|n| sample(day(n, 12), n as f64, "01d")).collect();

        let daily = daily_forecast(&samples, &Utc);

        assert_eq!(daily.len(), MAX_DAYS);
        let dates: Vec<_> = daily.iter().map(|d| d.date).collect();
        let expected: Vec<_> = (0..7).map(|n| day(n, 0).date_naive()).collect();
        assert_eq!(dates, expected);
    }

    #[test]
    fn keeps_first_seen_order_without_sorting() {
        let samples = vec![sample(day(3, 0), 1.0, "01d"), sample(day(1, 0), 2.0, "01d")];

        let daily = daily_forecast(&samples, &Utc);
        assert_eq!(daily[0].date, day(3, 0).date_naive());
        assert_eq!(daily[1].date, day(1, 0).date_naive());
    }

    #[test]
    fn buckets_by_date_in_given_time_zone() {
        // At UTC+3, 20:00 UTC stays on day 0 and 22:00 UTC moves to day 1.
        let samples = vec![sample(day(0, 20), 1.0, "01d"), sample(day(0, 22), 2.0, "01d")];
        let plus_three = FixedOffset::east_opt(3 * 3600).expect("valid offset");

        assert_eq!(daily_forecast(&samples, &Utc).len(), 1);

        let shifted = daily_forecast(&samples, &plus_three);
        assert_eq!(shifted.len(), 2);
        assert_eq!(shifted[1].date, day(1, 0).date_naive());
    }

    #[test]
    fn rounds_min_and_max() {
        let samples = vec![sample(day(0, 0), -2.5, "01d"), sample(day(0, 3), 20.5, "01d")];

        let daily = daily_forecast(&samples, &Utc);
        assert_eq!((daily[0].min_temp, daily[0].max_temp), (-2, 21));
    }

    #[test]
    fn round_temp_halves_go_up() {
        assert_eq!(round_temp(2.5), 3);
        assert_eq!(round_temp(2.49), 2);
        assert_eq!(round_temp(-2.5), -2);
        assert_eq!(round_temp(-2.51), -3);
        assert_eq!(round_temp(-0.5), 0);
    }

    #[test]
    fn round_temp_just_below_half_goes_down() {
        assert_eq!(round_temp(0.49999999999999994), 0);
        assert_eq!(round_temp(-0.49999999999999994), 0);
    }

    #[test]
    fn empty_forecast_has_no_days() {
        assert!(daily_forecast(&[], &Utc).is_empty());
        assert!(hourly_forecast(&[]).is_empty());
    }

    #[test]
    fn hourly_takes_first_eight_unchanged() {
        let samples: Vec<_> =
            (0..40).map(|n| sample(day(0, 3 * n), n as f64 + 0.3, "01d")).collect();

        let hourly = hourly_forecast(&samples);

        assert_eq!(hourly.len(), HOURLY_SAMPLES);
        assert_eq!(hourly, &samples[..8]);
    }

    #[test]
    fn hourly_returns_all_when_fewer_than_eight() {
        let samples: Vec<_> = (0..3).map(|n| sample(day(0, 3 * n), 1.0, "01d")).collect();
        assert_eq!(hourly_forecast(&samples).len(), 3);
    }
}
