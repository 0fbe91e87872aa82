use chrono::NaiveDate;

use super::{ToolError, ToolOutput};
use crate::config::Config;
use crate::format::slice;
use crate::koleo::{KoleoApi, types::RealtimeStop};

const REALTIME_SUMMARY_LIMIT: usize = 15;

fn clock(raw: Option<&str>) -> &str {
    match raw {
        Some(raw) if raw.len() >= 16 => slice(raw, 11, 16),
        Some(raw) if !raw.is_empty() => raw,
        _ => "?",
    }
}

/// Planned and actual times shown for a stop, departure preferred.
fn stop_times(stop: &RealtimeStop) -> (Option<&str>, Option<&str>) {
    let aimed = stop
        .aimed_departure
        .as_deref()
        .or(stop.aimed_arrival.as_deref())
        .or(stop.departure.as_deref());
    let actual = stop
        .actual_departure
        .as_deref()
        .or(stop.actual_arrival.as_deref());
    (aimed, actual)
}

/// Late only when an actual time is known and its clock differs from the plan.
pub fn is_delayed(stop: &RealtimeStop) -> bool {
    let (aimed, actual) = stop_times(stop);
    actual.is_some() && clock(actual) != clock(aimed)
}

fn format_stop(stop: &RealtimeStop) -> String {
    let (aimed, actual) = stop_times(stop);
    let delayed = if is_delayed(stop) { " (DELAYED)" } else { "" };
    format!(
        "  {} -> {}  station_id={}{delayed}",
        clock(aimed),
        clock(actual),
        stop.station_id
    )
}

/// Live timetable for a train instance. Needs stored credentials.
pub async fn get_realtime_timetable(
    api: &dyn KoleoApi,
    config: &Config,
    train_id: i64,
    day: NaiveDate,
) -> Result<ToolOutput, ToolError> {
    if !config.has_credentials() {
        return Err(ToolError::AuthRequired);
    }

    let timetable = api.realtime_timetable(train_id, day).await?;

    let name = timetable
        .train_full_name
        .clone()
        .unwrap_or_else(|| train_id.to_string());
    let mut lines = vec![format!(
        "Realtime timetable: {name} on {}",
        day.format("%Y-%m-%d")
    )];
    lines.extend(
        timetable
            .stops
            .iter()
            .take(REALTIME_SUMMARY_LIMIT)
            .map(format_stop),
    );
    if timetable.stops.len() > REALTIME_SUMMARY_LIMIT {
        lines.push(format!(
            "  ... and {} more stops",
            timetable.stops.len() - REALTIME_SUMMARY_LIMIT
        ));
    }

    ToolOutput::new(&timetable, lines.join("\n"), "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::koleo::mock::MockKoleo;
    use serde_json::json;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 10).unwrap()
    }

    fn signed_in() -> Config {
        Config::parse(r#"{"email": "jan@example.com", "password": "hunter2"}"#).unwrap()
    }

    #[tokio::test]
    async fn without_credentials_nothing_is_called() {
        let api = MockKoleo::default();
        let err = get_realtime_timetable(&api, &Config::default(), 42, day())
            .await
            .unwrap_err();
        assert_eq!(err, ToolError::AuthRequired);
        assert!(api.calls().is_empty());
    }

    #[test]
    fn delay_needs_an_actual_time() {
        let stop = |value| serde_json::from_value::<RealtimeStop>(value).unwrap();
        assert!(!is_delayed(&stop(json!({
            "station_id": 1,
            "aimed_departure": "2026-01-10T07:05:00"
        }))));
        assert!(!is_delayed(&stop(json!({
            "station_id": 1,
            "aimed_departure": "2026-01-10T07:05:00",
            "actual_departure": "2026-01-10T07:05:00"
        }))));
        assert!(is_delayed(&stop(json!({
            "station_id": 1,
            "aimed_arrival": "2026-01-10T08:20:00",
            "actual_arrival": "2026-01-10T08:27:00"
        }))));
    }

    #[test]
    fn mixed_arrival_and_departure_times_are_compared_as_shown() {
        let stop: RealtimeStop = serde_json::from_value(json!({
            "station_id": 1,
            "aimed_arrival": "2026-01-10T08:20:00",
            "actual_departure": "2026-01-10T08:40:00"
        }))
        .unwrap();
        assert!(is_delayed(&stop));
        assert_eq!(format_stop(&stop), "  08:20 -> 08:40  station_id=1 (DELAYED)");
    }

    #[tokio::test]
    async fn summary_caps_stops() {
        let stops: Vec<_> = (0..17)
            .map(|i| {
                json!({
                    "station_id": i,
                    "aimed_departure": format!("2026-01-10T07:{i:02}:00"),
                    "actual_departure": format!("2026-01-10T07:{:02}:00", i + 2)
                })
            })
            .collect();
        let api = MockKoleo {
            realtime: serde_json::from_value(json!({
                "train_full_name": "IC 1306 SZTYGAR",
                "stops": stops
            }))
            .unwrap(),
            ..MockKoleo::default()
        };

        let output = get_realtime_timetable(&api, &signed_in(), 42, day())
            .await
            .unwrap();
        let lines: Vec<&str> = output.summary.lines().collect();
        assert_eq!(lines[0], "Realtime timetable: IC 1306 SZTYGAR on 2026-01-10");
        assert_eq!(lines[1], "  07:00 -> 07:02  station_id=0 (DELAYED)");
        assert_eq!(lines.len(), 17);
        assert_eq!(lines[16], "  ... and 2 more stops");
        assert_eq!(output.koleo_url, "");
        assert_eq!(api.calls(), vec!["realtime_timetable 42 2026-01-10"]);
    }
}
