//! Deep links into the public koleo.pl site.
//!
//! Path segments must match what the website routes on.

use chrono::{NaiveDate, NaiveDateTime};

const SITE: &str = "https://koleo.pl";

pub fn station_search(query: &str) -> String {
    format!("{SITE}/ls?q={query}")
}

pub fn station(slug: &str) -> String {
    format!("{SITE}/dworzec-pkp/{slug}")
}

pub fn departures(slug: &str, date: NaiveDate) -> String {
    format!("{SITE}/dworzec-pkp/{slug}/odjazdy/{}", date.format("%Y-%m-%d"))
}

pub fn arrivals(slug: &str, date: NaiveDate) -> String {
    format!("{SITE}/dworzec-pkp/{slug}/przyjazdy/{}", date.format("%Y-%m-%d"))
}

pub fn timetable(start_slug: &str, end_slug: &str, when: NaiveDateTime, direct: bool) -> String {
    let scope = if direct { "direct" } else { "all" };
    format!(
        "{SITE}/rozklad-pkp/{start_slug}/{end_slug}/{}/{scope}/all",
        when.format("%d-%m-%Y_%H:%M")
    )
}

pub fn train(train_id: i64) -> String {
    format!("{SITE}/pl/trains/{train_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").unwrap()
    }

    #[test]
    fn board_links() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 27).unwrap();
        assert_eq!(
            departures("krakow-glowny", date),
            "https://koleo.pl/dworzec-pkp/krakow-glowny/odjazdy/2026-02-27"
        );
        assert_eq!(
            arrivals("krakow-glowny", date),
            "https://koleo.pl/dworzec-pkp/krakow-glowny/przyjazdy/2026-02-27"
        );
    }

    #[test]
    fn timetable_link() {
        assert_eq!(
            timetable("krakow-glowny", "warszawa-centralna", at("2026-02-27T07:05"), false),
            "https://koleo.pl/rozklad-pkp/krakow-glowny/warszawa-centralna/27-02-2026_07:05/all/all"
        );
        assert_eq!(
            timetable("krakow-glowny", "tarnow", at("2026-02-27T07:05"), true),
            "https://koleo.pl/rozklad-pkp/krakow-glowny/tarnow/27-02-2026_07:05/direct/all"
        );
    }

    #[test]
    fn other_links() {
        assert_eq!(station_search("Krakow"), "https://koleo.pl/ls?q=Krakow");
        assert_eq!(station("krakow-glowny"), "https://koleo.pl/dworzec-pkp/krakow-glowny");
        assert_eq!(train(12345), "https://koleo.pl/pl/trains/12345");
    }
}
