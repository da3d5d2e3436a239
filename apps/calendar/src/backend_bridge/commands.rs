//! Backend commands queued from the UI loop to the backend worker.

use shared::protocol::CalendarFilters;

use crate::controller::events::RequestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    CheckHealth,
    LoadStates,
    LoadCounties {
        request: RequestId,
        state_code: String,
    },
    LoadCities {
        request: RequestId,
        state_code: String,
        county: String,
    },
    LoadObligations {
        request: RequestId,
        filters: CalendarFilters,
    },
    SearchLocations {
        request: RequestId,
        query: String,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CheckHealth => "check_health",
            Self::LoadStates => "load_states",
            Self::LoadCounties { .. } => "load_counties",
            Self::LoadCities { .. } => "load_cities",
            Self::LoadObligations { .. } => "load_obligations",
            Self::SearchLocations { .. } => "search_locations",
        }
    }
}
