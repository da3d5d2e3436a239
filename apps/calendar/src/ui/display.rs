use shared::domain::parse_calendar_date;

pub fn level_icon(level: &str) -> &'static str {
    match level {
        "federal" => "flag",
        "state" => "place",
        "county" => "location_city",
        "municipality" => "business",
        _ => "event",
    }
}

/// Display name of a jurisdiction level; unknown levels are shown as given.
pub fn level_name(level: &str) -> &str {
    match level {
        "federal" => "Federal",
        "state" => "Estadual",
        "county" => "Condado",
        "municipality" => "Municipal",
        other => other,
    }
}

/// Formats a due date as `DD/MM/YYYY`.
pub fn format_date(raw: &str) -> String {
    match parse_calendar_date(raw) {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => raw.to_string(),
    }
}
