use std::collections::HashSet;

use serde_json::json;

use super::{ToolError, ToolOutput, links};
use crate::format::plain;
use crate::koleo::{KoleoApi, slug::resolve_slug};

const SEARCH_SUMMARY_LIMIT: usize = 15;

/// Station search with optional type (`rail`, `bus`, `group`) and country filters.
pub async fn search_stations(
    api: &dyn KoleoApi,
    query: &str,
    kind: Option<&str>,
    country: Option<&str>,
) -> Result<ToolOutput, ToolError> {
    let mut results = api.find_station(query).await?;

    if let Some(kind) = kind {
        results.retain(|s| {
            s.kind
                .as_deref()
                .is_some_and(|k| k.eq_ignore_ascii_case(kind))
        });
    }

    if let Some(country) = country {
        let in_country: HashSet<i64> = api
            .get_stations()
            .await?
            .into_iter()
            .filter(|s| {
                s.country
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(country))
            })
            .map(|s| s.id)
            .collect();
        results.retain(|s| in_country.contains(&s.id));
    }

    let mut lines = vec![format!(
        "Found {} station(s) matching '{query}':",
        results.len()
    )];
    lines.extend(results.iter().take(SEARCH_SUMMARY_LIMIT).map(|s| {
        format!(
            "  {} (id={}, type={}, slug={})",
            s.name,
            s.id,
            s.kind.as_deref().unwrap_or(""),
            s.name_slug
        )
    }));

    ToolOutput::new(&results, lines.join("\n"), links::station_search(query))
}

/// Station record plus address, opening hours and facilities.
pub async fn get_station_info(api: &dyn KoleoApi, station: &str) -> Result<ToolOutput, ToolError> {
    let slug = resolve_slug(station);
    let (station, info) = tokio::try_join!(
        api.get_station_by_slug(&slug),
        api.get_station_info_by_slug(&slug)
    )?;

    let address = info
        .address
        .as_ref()
        .and_then(|a| a.full.as_deref())
        .unwrap_or("N/A");
    let hours = if info.opening_hours.is_empty() {
        "N/A".to_string()
    } else {
        info.opening_hours
            .iter()
            .take(3)
            .map(|h| format!("day{}: {}-{}", plain(&h.day), h.open, h.close))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let features = info
        .features
        .iter()
        .filter(|f| f.available)
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>();
    let features = if features.is_empty() {
        "none listed".to_string()
    } else {
        features.join(", ")
    };

    let summary = format!(
        "{} (id={}, slug={})\n  Address: {address}\n  Opening hours: {hours}\n  Features: {features}",
        station.name, station.id, station.name_slug
    );

    ToolOutput::new(
        json!({ "station": station, "info": info }),
        summary,
        links::station(&slug),
    )
}
