//! Plain-text rendering of the page view for the terminal.

use std::fmt::{self, Display, Formatter, Write as _};

use crate::{
    controller::reducer::ConnectionStatus,
    ui::view::{ObligationCard, ObligationsRegion, PageView, SelectControl},
};

const TITLE: &str = "Tax Calendar";
const SUBTITLE: &str = "Gerencie suas obrigações fiscais dos EUA";

impl Display for PageView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{TITLE}")?;
        writeln!(f, "{SUBTITLE}")?;
        writeln!(f)?;

        let marker = match self.banner.status {
            ConnectionStatus::Loading => "…",
            ConnectionStatus::Success => "+",
            ConnectionStatus::Error => "!",
        };
        writeln!(f, "[{marker}] {}", self.banner.text)?;
        writeln!(f)?;

        writeln!(f, "Filtros")?;
        write_select(f, &self.filters.state)?;
        write_select(f, &self.filters.county)?;
        write_select(f, &self.filters.city)?;
        if self.filters.date_range.is_empty() {
            writeln!(f, "  Período: -")?;
        } else {
            writeln!(f, "  Período: {}", self.filters.date_range)?;
        }

        if !self.search_results.is_empty() {
            writeln!(f)?;
            writeln!(f, "Resultados da busca")?;
            for (index, line) in self.search_results.iter().enumerate() {
                writeln!(f, "  [{index}] {line}")?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Obrigações")?;
        match &self.obligations {
            ObligationsRegion::Loading => writeln!(f, "  Carregando dados...")?,
            ObligationsRegion::Empty => {
                writeln!(f, "  Nenhuma obrigação encontrada")?;
                writeln!(f, "  Ajuste os filtros para ver as obrigações fiscais")?;
            }
            ObligationsRegion::Cards(cards) => {
                for card in cards {
                    write_card(f, card)?;
                }
            }
        }

        writeln!(f)?;
        writeln!(f, "Estatísticas")?;
        let tiles = self
            .stats
            .iter()
            .map(|tile| format!("{}: {}", tile.label, tile.count))
            .collect::<Vec<_>>()
            .join("  |  ");
        writeln!(f, "  {tiles}")
    }
}

fn write_select(f: &mut Formatter<'_>, control: &SelectControl) -> fmt::Result {
    let value = if !control.enabled {
        "(desabilitado)".to_string()
    } else {
        match control.selected_label() {
            Some(label) if label != control.selected => format!("{label} ({})", control.selected),
            Some(label) => label.to_string(),
            None => control.placeholder.to_string(),
        }
    };
    writeln!(
        f,
        "  {}: {value} [{} opções]",
        control.label,
        control.options.len()
    )
}

fn write_card(f: &mut Formatter<'_>, card: &ObligationCard) -> fmt::Result {
    let mut header = format!("  - {}", card.title);
    if let Some(due_date) = &card.due_date {
        let _ = write!(header, "  [{due_date}]");
    }
    writeln!(f, "{header}")?;
    if let Some(description) = &card.description {
        writeln!(f, "      {description}")?;
    }

    let mut meta = vec![card.level_name.clone()];
    if let Some(jurisdiction) = &card.jurisdiction {
        meta.push(jurisdiction.clone());
    }
    if let Some(category) = &card.category {
        meta.push(category.clone());
    }
    if let Some(frequency) = &card.frequency {
        meta.push(frequency.clone());
    }
    writeln!(f, "      {}", meta.join(" · "))?;

    for source in &card.sources {
        writeln!(f, "      -> {source}")?;
    }
    Ok(())
}

/// One line per option, used by the interactive `list` command.
pub fn option_lines(control: &SelectControl) -> Vec<String> {
    control
        .options
        .iter()
        .map(|option| {
            let marker = if option.value == control.selected { "*" } else { " " };
            if option.value == option.label {
                format!("{marker} {}", option.label)
            } else {
                format!("{marker} {} - {}", option.value, option.label)
            }
        })
        .collect()
}
