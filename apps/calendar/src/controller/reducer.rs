//! Reducer-style state transitions for the calendar view.
//!
//! `reduce` never mutates its input: it returns the next state together with the
//! backend commands the transition requires.

use shared::{
    domain::{
        CitySummary, CountySummary, LocationKind, LocationMatch, ObligationsResponse,
        StateSummary,
    },
    protocol::CalendarFilters,
};
use tracing::{debug, info, warn};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::{RequestId, UiEvent, UiErrorContext},
        merge::{combine_obligations, MergedObligation},
    },
};

pub const CONNECTING_MESSAGE: &str = "Conectando com o servidor...";
pub const CONNECTION_ERROR_MESSAGE: &str =
    "❌ Erro de conexão. Verifique se o backend está rodando.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Loading,
    Success,
    Error,
}

impl ConnectionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Selected filters; an empty string means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub state: String,
    pub county: String,
    pub city: String,
    pub date_range: String,
}

impl FilterSelection {
    pub fn to_filters(&self) -> CalendarFilters {
        CalendarFilters::from_selection(&self.state, &self.county, &self.city, &self.date_range)
    }
}

/// Latest issued request per field. Results carrying any other id are stale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct LatestRequests {
    counties: Option<RequestId>,
    cities: Option<RequestId>,
    obligations: Option<RequestId>,
    search: Option<RequestId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub connection: ConnectionStatus,
    pub status_message: String,
    pub loading: bool,
    pub states: Vec<StateSummary>,
    pub counties: Vec<CountySummary>,
    pub cities: Vec<CitySummary>,
    pub obligations: ObligationsResponse,
    pub merged: Vec<MergedObligation>,
    pub selection: FilterSelection,
    pub search_results: Vec<LocationMatch>,
    latest: LatestRequests,
    next_request: RequestId,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            connection: ConnectionStatus::Loading,
            status_message: CONNECTING_MESSAGE.to_string(),
            loading: false,
            states: Vec::new(),
            counties: Vec::new(),
            cities: Vec::new(),
            obligations: ObligationsResponse::default(),
            merged: Vec::new(),
            selection: FilterSelection::default(),
            search_results: Vec::new(),
            latest: LatestRequests::default(),
            next_request: 1,
        }
    }
}

impl ViewState {
    fn issue_request(&mut self) -> RequestId {
        let request = self.next_request;
        self.next_request += 1;
        request
    }

    fn clear_counties(&mut self) {
        self.selection.county.clear();
        self.counties.clear();
        self.latest.counties = None;
        self.clear_cities();
    }

    fn clear_cities(&mut self) {
        self.selection.city.clear();
        self.cities.clear();
        self.latest.cities = None;
    }

    fn apply_filters(&mut self, commands: &mut Vec<BackendCommand>) {
        let request = self.issue_request();
        self.loading = true;
        self.latest.obligations = Some(request);
        commands.push(BackendCommand::LoadObligations {
            request,
            filters: self.selection.to_filters(),
        });
    }

    fn select_state(&mut self, code: &str, commands: &mut Vec<BackendCommand>) {
        self.selection.state = code.trim().to_string();
        self.clear_counties();
        if self.selection.state.is_empty() {
            return;
        }
        let request = self.issue_request();
        self.latest.counties = Some(request);
        commands.push(BackendCommand::LoadCounties {
            request,
            state_code: self.selection.state.clone(),
        });
    }

    fn select_county(&mut self, name: &str, commands: &mut Vec<BackendCommand>) {
        let name = name.trim();
        if !name.is_empty() && self.selection.state.is_empty() {
            warn!(county = name, "ignoring county selection without a state");
            return;
        }
        self.selection.county = name.to_string();
        self.clear_cities();
        if self.selection.county.is_empty() {
            return;
        }
        let request = self.issue_request();
        self.latest.cities = Some(request);
        commands.push(BackendCommand::LoadCities {
            request,
            state_code: self.selection.state.clone(),
            county: self.selection.county.clone(),
        });
    }

    fn select_city(&mut self, name: &str) {
        let name = name.trim();
        if !name.is_empty() && self.selection.county.is_empty() {
            warn!(city = name, "ignoring city selection without a county");
            return;
        }
        self.selection.city = name.to_string();
    }

    fn pick_location(&mut self, picked: &LocationMatch, commands: &mut Vec<BackendCommand>) {
        self.select_state(&picked.code, commands);
        match picked.kind {
            LocationKind::State => {}
            LocationKind::County => self.select_county(&picked.name, commands),
            LocationKind::City => {
                if let Some(county) = &picked.county {
                    self.select_county(county, commands);
                    self.select_city(&picked.name);
                } else {
                    warn!(city = %picked.name, "search match has no county; keeping state only");
                }
            }
        }
    }

    /// Clears the in-flight marker when `request` is the latest one for `slot`.
    fn settle(slot: &mut Option<RequestId>, request: RequestId) -> bool {
        if *slot == Some(request) {
            *slot = None;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: ViewState,
    pub commands: Vec<BackendCommand>,
}

pub fn reduce(state: &ViewState, event: UiEvent) -> Transition {
    let mut next = state.clone();
    let mut commands = Vec::new();

    match event {
        UiEvent::Init => {
            commands.push(BackendCommand::CheckHealth);
            commands.push(BackendCommand::LoadStates);
            next.apply_filters(&mut commands);
        }
        UiEvent::StateSelected(code) => next.select_state(&code, &mut commands),
        UiEvent::CountySelected(name) => next.select_county(&name, &mut commands),
        UiEvent::CitySelected(name) => next.select_city(&name),
        UiEvent::DateRangeSelected(value) => {
            next.selection.date_range = value.trim().to_string();
        }
        UiEvent::ClearFilters => {
            next.selection = FilterSelection::default();
            next.clear_counties();
            next.apply_filters(&mut commands);
        }
        UiEvent::ApplyFilters => next.apply_filters(&mut commands),
        UiEvent::SearchRequested(query) => {
            let request = next.issue_request();
            next.latest.search = Some(request);
            commands.push(BackendCommand::SearchLocations { request, query });
        }
        UiEvent::LocationPicked(index) => match state.search_results.get(index) {
            Some(picked) => next.pick_location(picked, &mut commands),
            None => warn!(
                index,
                available = state.search_results.len(),
                "no search result at index"
            ),
        },
        UiEvent::HealthLoaded(health) => {
            let count = health.obligations_count.unwrap_or_else(|| {
                warn!("health payload has no obligations_count");
                0
            });
            next.connection = ConnectionStatus::Success;
            next.status_message = format!("✅ Conectado! {count} obrigações no banco");
        }
        UiEvent::HealthFailed(error) => {
            warn!(error = error.message(), "health check failed");
            next.connection = ConnectionStatus::Error;
            next.status_message = CONNECTION_ERROR_MESSAGE.to_string();
        }
        UiEvent::StatesLoaded(states) => {
            info!(count = states.len(), "states loaded");
            next.states = states;
        }
        UiEvent::CountiesLoaded { request, counties } => {
            if ViewState::settle(&mut next.latest.counties, request) {
                next.counties = counties;
            } else {
                debug!(request, "dropping stale counties result");
            }
        }
        UiEvent::CitiesLoaded { request, cities } => {
            if ViewState::settle(&mut next.latest.cities, request) {
                next.cities = cities;
            } else {
                debug!(request, "dropping stale cities result");
            }
        }
        UiEvent::ObligationsLoaded { request, response } => {
            if ViewState::settle(&mut next.latest.obligations, request) {
                next.merged = combine_obligations(&response);
                next.obligations = response;
                next.loading = false;
            } else {
                debug!(request, "dropping stale obligations result");
            }
        }
        UiEvent::SearchCompleted { request, matches } => {
            if ViewState::settle(&mut next.latest.search, request) {
                next.search_results = matches;
            } else {
                debug!(request, "dropping stale search result");
            }
        }
        UiEvent::LoadFailed { request, error } => {
            warn!(
                context = error.context().as_str(),
                error = error.message(),
                "failed to load data"
            );
            let slot = match error.context() {
                UiErrorContext::Counties => Some(&mut next.latest.counties),
                UiErrorContext::Cities => Some(&mut next.latest.cities),
                UiErrorContext::Obligations => Some(&mut next.latest.obligations),
                UiErrorContext::Search => Some(&mut next.latest.search),
                UiErrorContext::Health | UiErrorContext::States => None,
            };
            let settled = match (slot, request) {
                (Some(slot), Some(request)) => ViewState::settle(slot, request),
                _ => false,
            };
            if settled && error.context() == UiErrorContext::Obligations {
                next.loading = false;
            }
        }
    }

    Transition {
        state: next,
        commands,
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
