//! Terminal and JSON rendering.

use console::style;
use hub_core::{HubSummary, RouteType};
use hub_route::{RouteResult, RouteView};
use serde::Serialize;

/// Renders command results either as styled text on stdout or as pretty
/// JSON. Errors always go to stderr.
#[derive(Clone)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn info(&self, msg: &str) {
        if !self.json {
            println!("{} {}", style("ℹ").blue(), msg);
        }
    }

    pub fn success(&self, msg: &str) {
        if !self.json {
            println!("{} {}", style("✓").green(), msg);
        }
    }

    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        } else {
            eprintln!("{} {}", style("✗").red(), style(msg).red());
        }
    }

    /// Print `value` as JSON. Returns whether anything was printed, so text
    /// rendering can be skipped.
    pub fn json<T: Serialize>(&self, value: &T) -> bool {
        if !self.json {
            return false;
        }
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => self.error(&format!("Failed to encode output: {e}")),
        }
        true
    }

    pub fn hub_table(&self, hubs: &[HubSummary]) {
        if self.json(&hubs) {
            return;
        }
        title(&format!("Hubs ({})", hubs.len()));
        if hubs.is_empty() {
            self.info("No hubs in the network file.");
            return;
        }
        let widths = [12, 20, 30];
        row(&["ID", "NAME", "ADDRESS"], &widths);
        for hub in hubs {
            row(&[hub.id.as_str(), &hub.name, &hub.address], &widths);
        }
    }

    pub fn route_table(&self, routes: &[RouteView]) {
        if self.json(&routes) {
            return;
        }
        title(&format!("Routes ({})", routes.len()));
        if routes.is_empty() {
            self.info("No routes yet. Add one with `hubroute add`.");
            return;
        }
        let widths = [20, 16, 16, 12, 8];
        row(&["ID", "FROM", "TO", "KM", "TIME"], &widths);
        for route in routes {
            row(
                &[
                    route.id.as_str(),
                    &route.from.name,
                    &route.to.name,
                    &route.distance.display_km(),
                    &format_minutes(route.time_minutes),
                ],
                &widths,
            );
        }
    }

    /// Totals followed by one line per hop.
    pub fn route(&self, heading: &str, route: &RouteResult) {
        if self.json(route) {
            return;
        }
        title(heading);
        field("Type", &route_badge(route.route_type));
        field("Distance", &route.total_distance.to_string());
        field("Time", &format_minutes(route.total_time_minutes));
        field("Hops", &route.hops().to_string());

        for (hub, leg) in route.path.iter().zip(&route.legs) {
            println!(
                "  {} {} {}",
                style("→").dim(),
                hub.name,
                style(format!("({}, {})", leg.distance, format_minutes(leg.time_minutes))).dim()
            );
        }
    }
}

fn title(text: &str) {
    println!("\n{}", style(text).bold().underlined());
}

fn field(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

fn row(cols: &[&str], widths: &[usize]) {
    let cells: Vec<String> = cols
        .iter()
        .zip(widths)
        .map(|(col, &width)| format!("{col:width$}"))
        .collect();
    println!("  {}", cells.join("  ").trim_end());
}

/// Colored badge for a route type.
pub fn route_badge(route_type: RouteType) -> String {
    match route_type {
        RouteType::Direct => style(route_type).green().to_string(),
        RouteType::Relay => style(route_type).cyan().to_string(),
    }
}

/// Travel minutes as `45m` or `2h 15m`.
pub fn format_minutes(minutes: u32) -> String {
    if minutes < 60 {
        format!("{minutes}m")
    } else {
        format!("{}h {}m", minutes / 60, minutes % 60)
    }
}
