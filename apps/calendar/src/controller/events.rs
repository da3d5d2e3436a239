//! UI/backend events and error modeling for the calendar controller.

use client_core::ClientError;
use shared::domain::{
    CitySummary, CountySummary, HealthStatus, LocationMatch, ObligationsResponse, StateSummary,
};

/// Identifies one issued fetch so superseded results can be dropped.
pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Init,
    StateSelected(String),
    CountySelected(String),
    CitySelected(String),
    DateRangeSelected(String),
    ClearFilters,
    ApplyFilters,
    SearchRequested(String),
    LocationPicked(usize),
    HealthLoaded(HealthStatus),
    HealthFailed(UiError),
    StatesLoaded(Vec<StateSummary>),
    CountiesLoaded {
        request: RequestId,
        counties: Vec<CountySummary>,
    },
    CitiesLoaded {
        request: RequestId,
        cities: Vec<CitySummary>,
    },
    ObligationsLoaded {
        request: RequestId,
        response: ObligationsResponse,
    },
    SearchCompleted {
        request: RequestId,
        matches: Vec<LocationMatch>,
    },
    LoadFailed {
        request: Option<RequestId>,
        error: UiError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Http,
    Decode,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    Health,
    States,
    Counties,
    Cities,
    Obligations,
    Search,
}

impl UiErrorContext {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::States => "states",
            Self::Counties => "counties",
            Self::Cities => "cities",
            Self::Obligations => "obligations",
            Self::Search => "search",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(
        category: UiErrorCategory,
        context: UiErrorContext,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            context,
            message: message.into(),
        }
    }

    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err {
            ClientError::Transport { .. } | ClientError::Setup(_) => UiErrorCategory::Transport,
            ClientError::Status { .. } => UiErrorCategory::Http,
            ClientError::Decode { .. } => UiErrorCategory::Decode,
            ClientError::InvalidArgument(_) | ClientError::InvalidBaseUrl { .. } => {
                UiErrorCategory::Validation
            }
        };
        Self::new(category, context, err.to_string())
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
