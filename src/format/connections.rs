use std::collections::HashMap;

use super::{plain, prefix};
use crate::koleo::types::{Connection, Price};

pub fn format_connection(connection: &Connection, price: Option<&Price>) -> String {
    let departure = prefix(&connection.departure, 16);
    let arrival = prefix(&connection.arrival, 16);
    let trains = connection
        .legs
        .iter()
        .filter(|leg| leg.is_train())
        .map(|leg| leg.train_full_name.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(", ");
    let changes = match connection.changes {
        0 => "direct".to_string(),
        n => format!("{n} change(s)"),
    };
    let price = price
        .map(|p| format!("  [{}]", plain(&p.price)))
        .unwrap_or_default();

    format!(
        "{departure} -> {arrival}  {}min  {changes}  via {trains}{price}",
        connection.duration
    )
}

pub fn summarize_connections(
    connections: &[Connection],
    start_name: &str,
    end_name: &str,
    prices: &HashMap<String, Price>,
) -> String {
    let mut lines = vec![format!("Connections {start_name} -> {end_name}:")];
    lines.extend(
        connections
            .iter()
            .map(|c| format!("  {}", format_connection(c, prices.get(&c.uuid)))),
    );
    if connections.is_empty() {
        lines.push("  No connections found.".to_string());
    }
    lines.join("\n")
}
