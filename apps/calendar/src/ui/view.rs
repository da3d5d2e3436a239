//! Pure page view-model built from controller state.

use shared::domain::{JurisdictionLevel, LocationMatch};

use crate::{
    controller::reducer::{ConnectionStatus, ViewState},
    ui::display::{format_date, level_icon, level_name},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub banner: Banner,
    pub filters: FilterForm,
    pub obligations: ObligationsRegion,
    pub stats: Vec<StatTile>,
    pub search_results: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub status: ConnectionStatus,
    pub icon: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectControl {
    pub label: &'static str,
    pub placeholder: &'static str,
    pub selected: String,
    pub options: Vec<SelectOption>,
    pub enabled: bool,
}

impl SelectControl {
    /// Label of the selected option, falling back to the raw value.
    pub fn selected_label(&self) -> Option<&str> {
        if self.selected.is_empty() {
            return None;
        }
        Some(
            self.options
                .iter()
                .find(|option| option.value == self.selected)
                .map(|option| option.label.as_str())
                .unwrap_or(self.selected.as_str()),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterForm {
    pub state: SelectControl,
    pub county: SelectControl,
    pub city: SelectControl,
    pub date_range: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObligationsRegion {
    Loading,
    Empty,
    Cards(Vec<ObligationCard>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObligationCard {
    pub title: String,
    pub due_date: Option<String>,
    pub description: Option<String>,
    pub level_class: String,
    pub level_icon: &'static str,
    pub level_name: String,
    pub jurisdiction: Option<String>,
    pub category: Option<String>,
    pub frequency: Option<String>,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatTile {
    pub level: JurisdictionLevel,
    pub label: &'static str,
    pub icon: &'static str,
    pub count: usize,
}

pub fn render(state: &ViewState) -> PageView {
    PageView {
        banner: render_banner(state),
        filters: render_filters(state),
        obligations: render_obligations(state),
        stats: JurisdictionLevel::GROUPS
            .iter()
            .map(|level| StatTile {
                level: level.clone(),
                label: stat_label(level),
                icon: level_icon(level.as_str()),
                count: state.obligations.group(level).len(),
            })
            .collect(),
        search_results: state.search_results.iter().map(search_line).collect(),
    }
}

fn render_banner(state: &ViewState) -> Banner {
    let icon = match state.connection {
        ConnectionStatus::Loading => "hourglass_empty",
        ConnectionStatus::Success => "check_circle",
        ConnectionStatus::Error => "error",
    };
    Banner {
        status: state.connection,
        icon,
        text: state.status_message.clone(),
    }
}

fn render_filters(state: &ViewState) -> FilterForm {
    let selection = &state.selection;
    FilterForm {
        state: SelectControl {
            label: "Estado",
            placeholder: "Selecione um estado",
            selected: selection.state.clone(),
            options: state
                .states
                .iter()
                .map(|s| SelectOption {
                    value: s.code.clone(),
                    label: s.name.clone(),
                })
                .collect(),
            enabled: true,
        },
        county: SelectControl {
            label: "Condado",
            placeholder: "Selecione um condado",
            selected: selection.county.clone(),
            options: state.counties.iter().map(|c| name_option(&c.name)).collect(),
            enabled: !selection.state.is_empty(),
        },
        city: SelectControl {
            label: "Cidade",
            placeholder: "Selecione uma cidade",
            selected: selection.city.clone(),
            options: state.cities.iter().map(|c| name_option(&c.name)).collect(),
            enabled: !selection.county.is_empty(),
        },
        date_range: selection.date_range.clone(),
    }
}

fn name_option(name: &str) -> SelectOption {
    SelectOption {
        value: name.to_string(),
        label: name.to_string(),
    }
}

fn render_obligations(state: &ViewState) -> ObligationsRegion {
    if state.loading {
        return ObligationsRegion::Loading;
    }
    if state.merged.is_empty() {
        return ObligationsRegion::Empty;
    }
    ObligationsRegion::Cards(
        state
            .merged
            .iter()
            .map(|merged| {
                let obligation = &merged.obligation;
                let level = obligation.jurisdiction_level.as_str();
                ObligationCard {
                    title: obligation.name.clone(),
                    due_date: obligation.due_date.as_deref().map(format_date),
                    description: obligation.description.clone(),
                    level_class: level.to_string(),
                    level_icon: level_icon(level),
                    level_name: level_name(level).to_string(),
                    jurisdiction: obligation.jurisdiction.clone(),
                    category: obligation.category.clone(),
                    frequency: obligation.frequency.clone(),
                    sources: obligation.sources.clone(),
                }
            })
            .collect(),
    )
}

fn stat_label(level: &JurisdictionLevel) -> &'static str {
    match level {
        JurisdictionLevel::Federal => "Federal",
        JurisdictionLevel::State => "Estadual",
        JurisdictionLevel::County => "Condado",
        JurisdictionLevel::Municipality => "Municipal",
        JurisdictionLevel::Other(_) => "Outros",
    }
}

fn search_line(found: &LocationMatch) -> String {
    format!("{} ({} obrigações)", found.display, found.count)
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
