use std::sync::Mutex;

use async_trait::async_trait;
use client_core::{CalendarApi, ClientError};
use shared::{
    domain::{
        CitySummary, CountySummary, HealthStatus, JurisdictionLevel, LocationKind,
        LocationMatch, Obligation, ObligationsResponse, StateSummary,
    },
    protocol::CalendarFilters,
};

/// In-memory backend that records every call as `endpoint/args`.
#[derive(Default)]
pub struct FakeCalendarApi {
    fail: bool,
    hang: Option<&'static str>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeCalendarApi {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Calls whose name starts with `endpoint` never complete.
    pub fn hanging(endpoint: &'static str) -> Self {
        Self {
            hang: Some(endpoint),
            ..Self::default()
        }
    }

    /// Recorded calls, sorted since concurrent commands finish in any order.
    pub fn sorted_calls(&self) -> Vec<String> {
        let mut calls = self.calls.lock().expect("calls").clone();
        calls.sort();
        calls
    }

    async fn call(&self, name: String) -> client_core::Result<()> {
        let hangs = self.hang.is_some_and(|endpoint| name.starts_with(endpoint));
        self.calls.lock().expect("calls").push(name);
        if hangs {
            std::future::pending::<()>().await;
        }
        if self.fail {
            return Err(ClientError::Status {
                url: "http://backend/api".into(),
                status: 500,
                message: "Erro interno".into(),
            });
        }
        Ok(())
    }
}

pub fn obligation(id: i64, level: &str, due_date: Option<&str>) -> Obligation {
    Obligation {
        id,
        name: format!("obligation {id}"),
        description: None,
        due_date: due_date.map(str::to_string),
        jurisdiction_level: JurisdictionLevel::from(level),
        jurisdiction: None,
        state: None,
        county: None,
        city: None,
        category: None,
        frequency: None,
        sources: Vec::new(),
    }
}

#[async_trait]
impl CalendarApi for FakeCalendarApi {
    async fn get_health(&self) -> client_core::Result<HealthStatus> {
        self.call("health".into()).await?;
        Ok(HealthStatus {
            obligations_count: Some(42),
            ..HealthStatus::default()
        })
    }

    async fn get_states(&self) -> client_core::Result<Vec<StateSummary>> {
        self.call("states".into()).await?;
        Ok(vec![StateSummary {
            code: "MO".into(),
            name: "Missouri".into(),
        }])
    }

    async fn get_counties(&self, state_code: &str) -> client_core::Result<Vec<CountySummary>> {
        self.call(format!("counties/{state_code}")).await?;
        Ok(vec![CountySummary {
            name: "St. Louis".into(),
            state_code: Some(state_code.into()),
        }])
    }

    async fn get_cities(
        &self,
        state_code: &str,
        county_name: &str,
    ) -> client_core::Result<Vec<CitySummary>> {
        self.call(format!("cities/{state_code}/{county_name}")).await?;
        Ok(vec![CitySummary {
            name: "Kirkwood".into(),
            county: Some(county_name.into()),
            state_code: Some(state_code.into()),
        }])
    }

    async fn get_obligations(
        &self,
        filters: &CalendarFilters,
    ) -> client_core::Result<ObligationsResponse> {
        self.call(format!("calendar/{}", filters.state.as_deref().unwrap_or("*"))).await?;
        Ok(ObligationsResponse {
            federal: vec![obligation(1, "federal", Some("2024-03-01"))],
            state: vec![obligation(2, "state", None)],
            county: vec![obligation(3, "county", Some("2024-01-15"))],
            municipality: Vec::new(),
        })
    }

    async fn search_locations(&self, query: &str) -> client_core::Result<Vec<LocationMatch>> {
        self.call(format!("search/{query}")).await?;
        Ok(vec![LocationMatch {
            kind: LocationKind::City,
            code: "MO".into(),
            name: "Kirkwood".into(),
            county: Some("St. Louis".into()),
            display: "Kirkwood, St. Louis, Missouri".into(),
            count: 3,
        }])
    }
}
