use serde::{Deserialize, Serialize};

/// Query parameters for `GET /calendar`. Absent keys are never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<String>,
}

impl CalendarFilters {
    /// Keeps only the fields that are non-empty after trimming.
    pub fn from_selection(state: &str, county: &str, city: &str, date_range: &str) -> Self {
        Self {
            state: non_empty(state),
            county: non_empty(county),
            city: non_empty(city),
            date_range: non_empty(date_range),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_none()
            && self.county.is_none()
            && self.city.is_none()
            && self.date_range.is_none()
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_keeps_only_non_empty_fields() {
        let filters = CalendarFilters::from_selection("CA", "", "  ", "");
        assert_eq!(filters.state.as_deref(), Some("CA"));
        assert!(filters.county.is_none());
        assert!(filters.city.is_none());
        assert!(filters.date_range.is_none());

        let encoded = serde_json::to_value(&filters).expect("encode");
        assert_eq!(encoded, serde_json::json!({ "state": "CA" }));
    }

    #[test]
    fn empty_selection_is_empty() {
        assert!(CalendarFilters::from_selection("", "", "", "").is_empty());
        assert!(!CalendarFilters::from_selection("", "", "", "2024-03").is_empty());
    }
}
