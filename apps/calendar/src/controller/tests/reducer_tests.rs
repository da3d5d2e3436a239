use super::*;
use crate::controller::events::{UiError, UiErrorCategory};
use crate::test_support::obligation;
use shared::domain::HealthStatus;

fn sample_response() -> ObligationsResponse {
    ObligationsResponse {
        federal: vec![obligation(1, "federal", Some("2024-03-01"))],
        state: vec![obligation(2, "state", None)],
        county: vec![obligation(3, "county", Some("2024-01-15"))],
        municipality: Vec::new(),
    }
}

fn county(name: &str) -> CountySummary {
    CountySummary {
        name: name.to_string(),
        state_code: None,
    }
}

fn city(name: &str) -> CitySummary {
    CitySummary {
        name: name.to_string(),
        county: None,
        state_code: None,
    }
}

fn load_error(context: UiErrorContext) -> UiError {
    UiError::new(UiErrorCategory::Transport, context, "connection refused")
}

fn request_of(command: &BackendCommand) -> RequestId {
    match command {
        BackendCommand::LoadCounties { request, .. }
        | BackendCommand::LoadCities { request, .. }
        | BackendCommand::LoadObligations { request, .. }
        | BackendCommand::SearchLocations { request, .. } => *request,
        other => panic!("command {} carries no request id", other.name()),
    }
}

/// State with CA selected, Los Angeles county selected and both lists loaded.
fn state_with_county_selected() -> ViewState {
    let t = reduce(&ViewState::default(), UiEvent::StateSelected("CA".into()));
    let t = reduce(
        &t.state,
        UiEvent::CountiesLoaded {
            request: request_of(&t.commands[0]),
            counties: vec![county("Los Angeles"), county("Orange")],
        },
    );
    let t = reduce(&t.state, UiEvent::CountySelected("Los Angeles".into()));
    let request = request_of(&t.commands[0]);
    reduce(
        &t.state,
        UiEvent::CitiesLoaded {
            request,
            cities: vec![city("Pasadena")],
        },
    )
    .state
}

#[test]
fn init_checks_health_loads_states_and_fetches_unfiltered() {
    let t = reduce(&ViewState::default(), UiEvent::Init);
    assert_eq!(t.state.connection, ConnectionStatus::Loading);
    assert!(t.state.loading);
    assert_eq!(t.commands.len(), 3);
    assert_eq!(t.commands[0], BackendCommand::CheckHealth);
    assert_eq!(t.commands[1], BackendCommand::LoadStates);
    match &t.commands[2] {
        BackendCommand::LoadObligations { filters, .. } => assert!(filters.is_empty()),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn reduce_leaves_input_state_untouched() {
    let before = state_with_county_selected();
    let snapshot = before.clone();
    let _ = reduce(&before, UiEvent::StateSelected("TX".into()));
    assert_eq!(before, snapshot);
}

#[test]
fn changing_state_clears_descendants_before_fetching_counties() {
    let mut before = state_with_county_selected();
    before.selection.city = "Pasadena".into();

    let t = reduce(&before, UiEvent::StateSelected("TX".into()));
    assert_eq!(t.state.selection.state, "TX");
    assert!(t.state.selection.county.is_empty());
    assert!(t.state.selection.city.is_empty());
    assert!(t.state.counties.is_empty());
    assert!(t.state.cities.is_empty());
    assert_eq!(t.commands.len(), 1);
    assert!(matches!(
        &t.commands[0],
        BackendCommand::LoadCounties { state_code, .. } if state_code == "TX"
    ));
}

#[test]
fn clearing_state_fetches_nothing() {
    let t = reduce(&state_with_county_selected(), UiEvent::StateSelected(String::new()));
    assert!(t.state.selection.state.is_empty());
    assert!(t.state.counties.is_empty());
    assert!(t.commands.is_empty());
}

#[test]
fn changing_county_clears_city_and_fetches_cities() {
    let mut before = state_with_county_selected();
    before.selection.city = "Pasadena".into();

    let t = reduce(&before, UiEvent::CountySelected("Orange".into()));
    assert_eq!(t.state.selection.county, "Orange");
    assert!(t.state.selection.city.is_empty());
    assert!(t.state.cities.is_empty());
    assert_eq!(t.state.counties.len(), 2);
    assert!(matches!(
        &t.commands[0],
        BackendCommand::LoadCities { state_code, county, .. }
            if state_code == "CA" && county == "Orange"
    ));
}

#[test]
fn county_without_state_is_ignored() {
    let t = reduce(&ViewState::default(), UiEvent::CountySelected("Orange".into()));
    assert!(t.state.selection.county.is_empty());
    assert!(t.commands.is_empty());
}

#[test]
fn city_and_date_range_selection_issue_no_fetch() {
    let t = reduce(&state_with_county_selected(), UiEvent::CitySelected("Pasadena".into()));
    assert_eq!(t.state.selection.city, "Pasadena");
    assert!(t.commands.is_empty());

    let t = reduce(&t.state, UiEvent::DateRangeSelected("2024-03".into()));
    assert_eq!(t.state.selection.date_range, "2024-03");
    assert!(t.commands.is_empty());
}

#[test]
fn city_without_county_is_ignored() {
    let t = reduce(&ViewState::default(), UiEvent::CitySelected("Pasadena".into()));
    assert!(t.state.selection.city.is_empty());
}

#[test]
fn apply_filters_sends_only_selected_fields() {
    let t = reduce(&ViewState::default(), UiEvent::StateSelected("CA".into()));
    let t = reduce(&t.state, UiEvent::ApplyFilters);
    assert!(t.state.loading);
    match &t.commands[0] {
        BackendCommand::LoadObligations { filters, .. } => {
            assert_eq!(
                filters,
                &CalendarFilters {
                    state: Some("CA".into()),
                    ..CalendarFilters::default()
                }
            );
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn clear_filters_resets_selection_and_refetches_unfiltered() {
    let mut before = state_with_county_selected();
    before.selection.city = "Pasadena".into();
    before.selection.date_range = "2024-03".into();

    let t = reduce(&before, UiEvent::ClearFilters);
    assert_eq!(t.state.selection, FilterSelection::default());
    assert!(t.state.counties.is_empty());
    assert!(t.state.cities.is_empty());
    assert!(t.state.loading);
    assert!(matches!(
        &t.commands[..],
        [BackendCommand::LoadObligations { filters, .. }] if filters.is_empty()
    ));
}

#[test]
fn obligations_result_merges_and_clears_loading() {
    let t = reduce(&ViewState::default(), UiEvent::ApplyFilters);
    let request = request_of(&t.commands[0]);
    let t = reduce(
        &t.state,
        UiEvent::ObligationsLoaded {
            request,
            response: sample_response(),
        },
    );
    assert!(!t.state.loading);
    assert_eq!(t.state.merged.len(), 3);
    let dates: Vec<_> = t
        .state
        .merged
        .iter()
        .map(|m| m.obligation.due_date.as_deref())
        .collect();
    assert_eq!(dates, vec![Some("2024-01-15"), Some("2024-03-01"), None]);
    assert_eq!(t.state.obligations, sample_response());
}

#[test]
fn failed_fetch_keeps_previous_obligations() {
    let t = reduce(&ViewState::default(), UiEvent::ApplyFilters);
    let t = reduce(
        &t.state,
        UiEvent::ObligationsLoaded {
            request: request_of(&t.commands[0]),
            response: sample_response(),
        },
    );
    let loaded = t.state.clone();

    let t = reduce(&t.state, UiEvent::ApplyFilters);
    let request = request_of(&t.commands[0]);
    let t = reduce(
        &t.state,
        UiEvent::LoadFailed {
            request: Some(request),
            error: load_error(UiErrorContext::Obligations),
        },
    );
    assert!(!t.state.loading);
    assert_eq!(t.state.merged, loaded.merged);
    assert_eq!(t.state.obligations, loaded.obligations);
}

#[test]
fn superseded_obligations_result_is_dropped() {
    let t = reduce(&ViewState::default(), UiEvent::ApplyFilters);
    let first = request_of(&t.commands[0]);
    let t = reduce(&t.state, UiEvent::ApplyFilters);
    let second = request_of(&t.commands[0]);
    assert_ne!(first, second);

    let t = reduce(
        &t.state,
        UiEvent::ObligationsLoaded {
            request: second,
            response: ObligationsResponse::default(),
        },
    );
    assert!(!t.state.loading);

    let t = reduce(
        &t.state,
        UiEvent::ObligationsLoaded {
            request: first,
            response: sample_response(),
        },
    );
    assert!(t.state.merged.is_empty());
    assert_eq!(t.state.obligations.total(), 0);
}

#[test]
fn stale_failure_does_not_clear_loading() {
    let t = reduce(&ViewState::default(), UiEvent::ApplyFilters);
    let first = request_of(&t.commands[0]);
    let t = reduce(&t.state, UiEvent::ApplyFilters);

    let t = reduce(
        &t.state,
        UiEvent::LoadFailed {
            request: Some(first),
            error: load_error(UiErrorContext::Obligations),
        },
    );
    assert!(t.state.loading);
}

#[test]
fn counties_for_previous_state_are_dropped() {
    let t = reduce(&ViewState::default(), UiEvent::StateSelected("CA".into()));
    let ca_request = request_of(&t.commands[0]);
    let t = reduce(&t.state, UiEvent::StateSelected("TX".into()));
    let tx_request = request_of(&t.commands[0]);

    let t = reduce(
        &t.state,
        UiEvent::CountiesLoaded {
            request: tx_request,
            counties: vec![county("Travis")],
        },
    );
    let t = reduce(
        &t.state,
        UiEvent::CountiesLoaded {
            request: ca_request,
            counties: vec![county("Los Angeles")],
        },
    );
    assert_eq!(t.state.counties, vec![county("Travis")]);
}

#[test]
fn health_success_embeds_count_in_banner() {
    let t = reduce(
        &ViewState::default(),
        UiEvent::HealthLoaded(HealthStatus {
            obligations_count: Some(42),
            ..HealthStatus::default()
        }),
    );
    assert_eq!(t.state.connection, ConnectionStatus::Success);
    assert!(t.state.status_message.contains("42"));
}

#[test]
fn health_failure_shows_fixed_error() {
    let t = reduce(
        &ViewState::default(),
        UiEvent::HealthFailed(load_error(UiErrorContext::Health)),
    );
    assert_eq!(t.state.connection, ConnectionStatus::Error);
    assert_eq!(t.state.connection.as_str(), "error");
    assert_eq!(t.state.status_message, CONNECTION_ERROR_MESSAGE);
}

#[test]
fn failed_county_load_keeps_empty_list() {
    let t = reduce(&ViewState::default(), UiEvent::StateSelected("CA".into()));
    let request = request_of(&t.commands[0]);
    let t = reduce(
        &t.state,
        UiEvent::LoadFailed {
            request: Some(request),
            error: load_error(UiErrorContext::Counties),
        },
    );
    assert!(t.state.counties.is_empty());
    assert_eq!(t.state.selection.state, "CA");
    assert!(t.commands.is_empty());
}

#[test]
fn picking_a_city_match_cascades_through_state_and_county() {
    let t = reduce(&ViewState::default(), UiEvent::SearchRequested("kirk".into()));
    let request = request_of(&t.commands[0]);
    let t = reduce(
        &t.state,
        UiEvent::SearchCompleted {
            request,
            matches: vec![LocationMatch {
                kind: LocationKind::City,
                code: "MO".into(),
                name: "Kirkwood".into(),
                county: Some("St. Louis".into()),
                display: "Kirkwood, St. Louis, Missouri".into(),
                count: 3,
            }],
        },
    );
    assert_eq!(t.state.search_results.len(), 1);

    let t = reduce(&t.state, UiEvent::LocationPicked(0));
    assert_eq!(t.state.selection.state, "MO");
    assert_eq!(t.state.selection.county, "St. Louis");
    assert_eq!(t.state.selection.city, "Kirkwood");
    let names: Vec<_> = t.commands.iter().map(BackendCommand::name).collect();
    assert_eq!(names, vec!["load_counties", "load_cities"]);
}

#[test]
fn picking_missing_search_result_is_a_no_op() {
    let before = ViewState::default();
    let t = reduce(&before, UiEvent::LocationPicked(3));
    assert_eq!(t.state, before);
    assert!(t.commands.is_empty());
}

#[test]
fn applying_same_filters_twice_is_idempotent() {
    let t = reduce(&ViewState::default(), UiEvent::ApplyFilters);
    let t = reduce(
        &t.state,
        UiEvent::ObligationsLoaded {
            request: request_of(&t.commands[0]),
            response: sample_response(),
        },
    );
    let first = t.state.merged.clone();

    let t = reduce(&t.state, UiEvent::ApplyFilters);
    let t = reduce(
        &t.state,
        UiEvent::ObligationsLoaded {
            request: request_of(&t.commands[0]),
            response: sample_response(),
        },
    );
    assert_eq!(t.state.merged, first);
}
