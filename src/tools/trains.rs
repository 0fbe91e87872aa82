//! Train routes and operating calendars.

use chrono::NaiveDate;

use super::{ToolError, ToolOutput, links, parse_train_number};
use crate::format::trains::summarize_train_route;
use crate::koleo::{KoleoApi, types::TrainCalendar};

/// Pick the running date to use for `requested`.
///
/// A date the train runs on is used as is unless `closest` is set. Otherwise
/// the earliest running date on or after `requested` wins, falling back to
/// the last known running date. `None` only for an empty calendar.
pub fn resolve_running_date(dates: &[NaiveDate], requested: NaiveDate, closest: bool) -> Option<NaiveDate> {
    if !closest && dates.contains(&requested) {
        return Some(requested);
    }
    dates
        .iter()
        .filter(|d| **d >= requested)
        .min()
        .or_else(|| dates.iter().max())
        .copied()
}

/// First running date on or after `today`.
pub fn next_running_date(dates: &[NaiveDate], today: NaiveDate) -> Option<NaiveDate> {
    dates.iter().filter(|d| **d >= today).min().copied()
}

/// Train instance id for `requested` on `calendar`.
pub fn resolve_train_instance(
    calendar: &TrainCalendar,
    requested: NaiveDate,
    closest: bool,
    label: &str,
) -> Result<i64, ToolError> {
    let date = resolve_running_date(&calendar.dates, requested, closest).ok_or_else(|| {
        ToolError::NotFound(format!("no running dates known for train {label}"))
    })?;
    calendar.train_id_on(date).ok_or_else(|| {
        ToolError::NotFound(format!(
            "train {label} does not run on {}",
            date.format("%Y-%m-%d")
        ))
    })
}

async fn train_detail(api: &dyn KoleoApi, train_id: i64) -> Result<ToolOutput, ToolError> {
    let detail = api.get_train(train_id).await?;
    let summary = summarize_train_route(&detail.train, &detail.stops);
    ToolOutput::new(&detail, summary, links::train(train_id))
}

/// Route and stops for a train identified by brand and number on `date`.
pub async fn get_train_route(
    api: &dyn KoleoApi,
    brand: &str,
    train_number: &str,
    date: NaiveDate,
    closest: bool,
) -> Result<ToolOutput, ToolError> {
    let brand = brand.to_uppercase();
    let number = parse_train_number(train_number).unwrap_or(0);
    let label = format!("{brand} {train_number}");

    let calendars = api.get_train_calendars(&brand, number).await?;
    let calendar = calendars
        .first()
        .ok_or_else(|| ToolError::NotFound(format!("no train found for {label}")))?;

    let train_id = resolve_train_instance(calendar, date, closest, &label)?;
    tracing::debug!(train_id, %label, "resolved train instance");
    train_detail(api, train_id).await
}

pub async fn get_train_by_id(api: &dyn KoleoApi, train_id: i64) -> Result<ToolOutput, ToolError> {
    train_detail(api, train_id).await
}

/// All calendars for a train plus its next running date from `today`.
pub async fn get_train_calendar(
    api: &dyn KoleoApi,
    brand: &str,
    train_number: &str,
    today: NaiveDate,
) -> Result<ToolOutput, ToolError> {
    let number = parse_train_number(train_number).unwrap_or(0);
    let calendars = api.get_train_calendars(&brand.to_uppercase(), number).await?;

    let Some(calendar) = calendars.first() else {
        return ToolOutput::new(
            &calendars,
            format!("No calendar found for {brand} {train_number}"),
            "",
        );
    };

    let next = next_running_date(&calendar.dates, today)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "no future dates found".to_string());
    let summary = format!(
        "{} ({brand} {train_number}) runs on {} day(s). Next: {next}.",
        calendar.train_name.as_deref().unwrap_or("?"),
        calendar.dates.len()
    );
    ToolOutput::new(&calendars, summary, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::koleo::mock::MockKoleo;
    use crate::tools::ErrorKind;
    use serde_json::json;

    fn day(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    fn calendar() -> TrainCalendar {
        serde_json::from_value(json!({
            "train_name": "SZTYGAR",
            "dates": ["2026-01-10", "2026-01-12", "2026-02-01"],
            "date_train_map": {
                "2026-01-10": 101,
                "2026-01-12": 102,
                "2026-02-01": 103
            }
        }))
        .unwrap()
    }

    #[test]
    fn running_date_resolution() {
        let dates = calendar().dates;
        assert_eq!(
            resolve_running_date(&dates, day("2026-01-11"), false),
            Some(day("2026-01-12"))
        );
        assert_eq!(
            resolve_running_date(&dates, day("2026-03-01"), false),
            Some(day("2026-02-01"))
        );
        assert_eq!(
            resolve_running_date(&dates, day("2026-01-10"), false),
            Some(day("2026-01-10"))
        );
        assert_eq!(
            resolve_running_date(&dates, day("2026-01-10"), true),
            Some(day("2026-01-10"))
        );
        assert_eq!(resolve_running_date(&[], day("2026-01-10"), false), None);
    }

    #[test]
    fn date_without_instance_does_not_run() {
        let mut calendar = calendar();
        calendar.date_train_map.remove("2026-01-12");
        let err = resolve_train_instance(&calendar, day("2026-01-11"), false, "IC 1306").unwrap_err();
        assert_eq!(
            err,
            ToolError::NotFound("train IC 1306 does not run on 2026-01-12".into())
        );
    }

    #[test]
    fn next_date_from_today() {
        let dates = calendar().dates;
        assert_eq!(next_running_date(&dates, day("2026-01-11")), Some(day("2026-01-12")));
        assert_eq!(next_running_date(&dates, day("2026-02-02")), None);
    }

    fn api() -> MockKoleo {
        let detail = serde_json::from_value(json!({
            "train": { "train_full_name": "IC 1306 SZTYGAR", "run_desc": "codziennie" },
            "stops": [
                { "departure": {"hour": 7, "minute": 5}, "station_name": "Kraków Główny", "distance": 0 },
                { "arrival": {"hour": 8, "minute": 20}, "station_name": "Tarnów", "distance": 78000 }
            ]
        }))
        .unwrap();
        MockKoleo {
            calendars: vec![calendar()],
            trains: [(102, detail)].into_iter().collect(),
            ..MockKoleo::default()
        }
    }

    #[tokio::test]
    async fn route_for_nearest_running_day() {
        let api = api();
        let output = get_train_route(&api, "ic", "1306", day("2026-01-11"), false)
            .await
            .unwrap();
        assert_eq!(output.koleo_url, "https://koleo.pl/pl/trains/102");
        assert!(output.summary.starts_with("IC 1306 SZTYGAR\n  Runs: codziennie\n  2 stops:"));
        assert_eq!(
            api.calls(),
            vec!["get_train_calendars IC 1306", "get_train 102"]
        );
    }

    #[tokio::test]
    async fn unknown_train_is_not_found() {
        let api = MockKoleo::default();
        let err = get_train_route(&api, "IC", "9999", day("2026-01-11"), false)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn calendar_summary() {
        let api = api();
        let output = get_train_calendar(&api, "IC", "1306", day("2026-01-11"))
            .await
            .unwrap();
        assert_eq!(
            output.summary,
            "SZTYGAR (IC 1306) runs on 3 day(s). Next: 2026-01-12."
        );
        assert_eq!(output.data.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_calendar_is_not_an_error() {
        let api = MockKoleo::default();
        let output = get_train_calendar(&api, "IC", "1306", day("2026-01-11"))
            .await
            .unwrap();
        assert_eq!(output.data, json!([]));
        assert_eq!(output.summary, "No calendar found for IC 1306");
    }
}
