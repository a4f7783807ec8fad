//! Dashboard event loop: read input, update the model, execute commands
//! against the inventory, repaint.

#![allow(missing_docs)]

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event};
use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{Clear, ClearType};

use super::haptics::Haptics;
use super::model::{CmdOutcome, DashboardCmd, DashboardModel, DashboardMsg};
use super::render::{Line, Style, render_frame};
use super::terminal_guard::TerminalGuard;
use super::update::update;
use crate::inventory::controller::InventoryController;
use crate::inventory::persistence::StateRepository;
use crate::inventory::share::ShareSink;

/// Settings the dashboard needs from the loaded config.
#[derive(Debug, Clone)]
pub struct DashboardRuntimeConfig {
    pub share_base_url: String,
    pub confirm_destructive: bool,
    pub color: bool,
}

/// Run the interactive dashboard until the user quits.
///
/// # Errors
/// Returns I/O errors from terminal setup, event reading, or painting.
/// Inventory failures are shown in the status line instead.
pub fn run_dashboard<R: StateRepository>(
    inventory: &mut InventoryController<R>,
    haptics: &mut dyn Haptics,
    share: &mut dyn ShareSink,
    config: &DashboardRuntimeConfig,
) -> io::Result<()> {
    let _guard = TerminalGuard::new()?;
    inventory.set_journal_stderr(false);
    let result = event_loop(inventory, haptics, share, config);
    inventory.set_journal_stderr(true);
    result
}

fn event_loop<R: StateRepository>(
    inventory: &mut InventoryController<R>,
    haptics: &mut dyn Haptics,
    share: &mut dyn ShareSink,
    config: &DashboardRuntimeConfig,
) -> io::Result<()> {
    let mut stdout = io::stdout();
    let mut model = DashboardModel::new(inventory.layout(), config.confirm_destructive);
    model.terminal_size = TerminalGuard::terminal_size();

    while !model.quit {
        paint(&mut stdout, &model, inventory, config.color)?;
        let msg = match event::read()? {
            Event::Key(key) => DashboardMsg::Key(key),
            Event::Resize(cols, rows) => DashboardMsg::Resize { cols, rows },
            _ => continue,
        };
        let cmd = update(&mut model, msg);
        if let Some(outcome) = execute_command(cmd, inventory, haptics, share, config) {
            update(&mut model, DashboardMsg::Outcome(outcome));
        }
    }
    Ok(())
}

/// Perform one command. Returns the status to feed back into the model.
pub fn execute_command<R: StateRepository>(
    cmd: DashboardCmd,
    inventory: &mut InventoryController<R>,
    haptics: &mut dyn Haptics,
    share: &mut dyn ShareSink,
    config: &DashboardRuntimeConfig,
) -> Option<CmdOutcome> {
    match cmd {
        DashboardCmd::None | DashboardCmd::Quit => None,
        DashboardCmd::Toggle { freezer, slot } => Some(match inventory.toggle(freezer, slot) {
            Ok(full) => {
                haptics.pulse();
                let name = freezer_name(inventory, freezer);
                let state = if full { "cheio" } else { "vazio" };
                CmdOutcome::Done(format!("{name} #{}: {state}", slot + 1))
            }
            Err(err) => CmdOutcome::Failed(err.to_string()),
        }),
        DashboardCmd::Clear(freezer) => Some(match inventory.clear(freezer) {
            Ok(()) => CmdOutcome::Done(format!("{} limpo", freezer_name(inventory, freezer))),
            Err(err) => CmdOutcome::Failed(err.to_string()),
        }),
        DashboardCmd::ResetAll => Some(match inventory.reset_all() {
            Ok(()) => CmdOutcome::Done("Todos os freezers zerados".to_string()),
            Err(err) => CmdOutcome::Failed(err.to_string()),
        }),
        DashboardCmd::Share => {
            let link = inventory.share_link(&config.share_base_url);
            Some(match share.share(&link) {
                Ok(()) => CmdOutcome::Done("Relatório compartilhado".to_string()),
                Err(err) => CmdOutcome::Failed(format!("falha ao compartilhar: {err}")),
            })
        }
    }
}

fn freezer_name<R: StateRepository>(inventory: &InventoryController<R>, index: usize) -> String {
    inventory
        .layout()
        .get(index)
        .map_or_else(|| format!("Freezer {}", index + 1), |f| f.name.clone())
}

fn paint<R: StateRepository, W: Write>(
    out: &mut W,
    model: &DashboardModel,
    inventory: &InventoryController<R>,
    color: bool,
) -> io::Result<()> {
    let lines = render_frame(model, inventory.layout(), inventory.store());
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    let max_rows = usize::from(model.terminal_size.1);
    for (row, line) in lines.iter().take(max_rows).enumerate() {
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        queue!(out, MoveTo(0, row))?;
        write_line(out, line, color)?;
    }
    out.flush()
}

fn write_line<W: Write>(out: &mut W, line: &Line, color: bool) -> io::Result<()> {
    for span in &line.spans {
        if color {
            apply_style(out, span.style)?;
        }
        queue!(out, Print(&span.text))?;
        if color {
            queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
        }
    }
    Ok(())
}

fn apply_style<W: Write>(out: &mut W, style: Style) -> io::Result<()> {
    match style {
        Style::Plain => Ok(()),
        Style::Title => queue!(
            out,
            SetForegroundColor(Color::Cyan),
            SetAttribute(Attribute::Bold)
        ),
        Style::Dim | Style::Empty => queue!(out, SetForegroundColor(Color::DarkGrey)),
        Style::Selected => queue!(
            out,
            SetForegroundColor(Color::White),
            SetAttribute(Attribute::Bold)
        ),
        Style::Full | Style::Good => queue!(out, SetForegroundColor(Color::Green)),
        Style::CursorFull => queue!(
            out,
            SetBackgroundColor(Color::Green),
            SetForegroundColor(Color::Black)
        ),
        Style::CursorEmpty => queue!(out, SetAttribute(Attribute::Reverse)),
        Style::Bad => queue!(out, SetForegroundColor(Color::Yellow)),
        Style::Error => queue!(
            out,
            SetForegroundColor(Color::Red),
            SetAttribute(Attribute::Bold)
        ),
        Style::Prompt => queue!(
            out,
            SetForegroundColor(Color::Yellow),
            SetAttribute(Attribute::Bold)
        ),
    }
}
