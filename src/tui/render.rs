//! Pure frame rendering: model + inventory in, styled text lines out.
//!
//! The runtime maps [`Style`] to terminal colors; tests assert on
//! [`Line::plain`] text.

use super::input::HELP_BINDINGS;
use super::model::{DashboardModel, StatusLevel};
use crate::inventory::layout::{ContainerKind, Layout, SLOTS_PER_FREEZER};
use crate::inventory::stats::{FreezerStats, aggregate, per_freezer};
use crate::inventory::store::SlotStore;

/// Width reserved for the freezer selector column.
const SELECTOR_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    Title,
    Dim,
    Selected,
    Full,
    Empty,
    CursorFull,
    CursorEmpty,
    Good,
    Bad,
    Error,
    Prompt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    fn push(&mut self, text: impl Into<String>, style: Style) -> &mut Self {
        self.spans.push(Span::new(text, style));
        self
    }

    fn of(text: impl Into<String>, style: Style) -> Self {
        let mut line = Self::default();
        line.push(text, style);
        line
    }

    /// Text without styling.
    #[must_use]
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    fn width(&self) -> usize {
        self.spans.iter().map(|s| s.text.chars().count()).sum()
    }
}

/// Build the whole dashboard frame.
#[must_use]
pub fn render_frame(model: &DashboardModel, layout: &Layout, store: &SlotStore) -> Vec<Line> {
    let mut lines = vec![Line::of(" Freezers", Style::Title), Line::default()];

    let left = render_selector(model, layout, store);
    let right = render_active(model, layout, store);
    lines.extend(side_by_side(left, right, SELECTOR_WIDTH));

    lines.push(Line::default());
    lines.extend(render_totals(layout, store));
    lines.push(Line::default());
    lines.push(render_hints());

    if let Some(action) = model.pending {
        lines.push(Line::default());
        let mut prompt = Line::default();
        prompt
            .push(format!(" {} ", action.prompt(layout)), Style::Prompt)
            .push(" [y/N]", Style::Dim);
        lines.push(prompt);
    } else if let Some(status) = &model.status {
        lines.push(Line::default());
        let style = match status.level {
            StatusLevel::Info => Style::Good,
            StatusLevel::Error => Style::Error,
        };
        lines.push(Line::of(format!(" {}", status.text), style));
    }
    lines
}

fn render_selector(model: &DashboardModel, layout: &Layout, store: &SlotStore) -> Vec<Line> {
    per_freezer(layout, store)
        .map(|(config, stats)| {
            let selected = config.id == model.active;
            let marker = if selected { ">" } else { " " };
            let mut line = Line::default();
            line.push(
                format!("{marker}{:>2} {}", config.id + 1, config.label()),
                if selected { Style::Selected } else { Style::Plain },
            );
            if stats.full() > 0 {
                line.push(format!(" ({})", stats.full()), Style::Dim);
            }
            line
        })
        .collect()
}

fn render_active(model: &DashboardModel, layout: &Layout, store: &SlotStore) -> Vec<Line> {
    let (Some(config), Ok(grid)) = (layout.get(model.active), store.grid(model.active)) else {
        return Vec::new();
    };

    let mut lines = vec![Line::of(config.label(), Style::Title)];
    let cols = config.cols.max(1);
    for row in 0..config.rows {
        let mut line = Line::default();
        for col in 0..cols {
            let slot = row * cols + col;
            if slot >= SLOTS_PER_FREEZER {
                break;
            }
            let full = grid.is_full(slot);
            let style = match (slot == model.cursor, full) {
                (true, true) => Style::CursorFull,
                (true, false) => Style::CursorEmpty,
                (false, true) => Style::Full,
                (false, false) => Style::Empty,
            };
            line.push(format!("[{:>2}]", slot + 1), style);
        }
        lines.push(line);
    }

    if let ContainerKind::Split { pote, caixa } = config.kind {
        lines.push(Line::of(
            format!(
                "Potes: {}-{}  Caixas: {}-{}",
                pote.start + 1,
                pote.end,
                caixa.start + 1,
                caixa.end
            ),
            Style::Dim,
        ));
    }

    let stats = FreezerStats::of(config.kind, grid);
    lines.push(Line::of(
        format!(
            "Cheios: {}  Vazios: {}",
            stats.full(),
            SLOTS_PER_FREEZER - stats.full()
        ),
        Style::Plain,
    ));
    lines
}

fn render_totals(layout: &Layout, store: &SlotStore) -> Vec<Line> {
    let stats = aggregate(layout, store);
    let group = |title: &str, full: usize, empty: usize| {
        let mut line = Line::default();
        line.push(format!(" {title:<8}"), Style::Title)
            .push(format!("Cheias {full:>4}"), Style::Good)
            .push("   ", Style::Plain)
            .push(format!("Vazias {empty:>4}"), Style::Bad);
        line
    };
    vec![
        group("Potes", stats.potes_cheios, stats.potes_vazios),
        group("Caixas", stats.caixas_cheias, stats.caixas_vazias),
    ]
}

fn render_hints() -> Line {
    let mut line = Line::default();
    for binding in &HELP_BINDINGS {
        line.push(format!(" [{}]", binding.keys), Style::Title)
            .push(format!(" {}", binding.description), Style::Dim);
    }
    line
}

fn side_by_side(left: Vec<Line>, right: Vec<Line>, left_width: usize) -> Vec<Line> {
    let rows = left.len().max(right.len());
    let mut left = left.into_iter();
    let mut right = right.into_iter();
    (0..rows)
        .map(|_| {
            let mut line = left.next().unwrap_or_default();
            let pad = left_width.saturating_sub(line.width()).max(1);
            line.push(" ".repeat(pad), Style::Plain);
            if let Some(r) = right.next() {
                line.spans.extend(r.spans);
            }
            line
        })
        .collect()
}
