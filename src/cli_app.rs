//! Top-level CLI definition and dispatch.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use serde_json::{Value, json};
use thiserror::Error;

use freezer_tracker::core::config::Config;
use freezer_tracker::core::errors::FrzError;
use freezer_tracker::inventory::controller::InventoryController;
use freezer_tracker::inventory::layout::{ContainerKind, FreezerConfig, SLOTS_PER_FREEZER};
use freezer_tracker::inventory::persistence::{JsonFileRepository, LoadSource};
use freezer_tracker::inventory::report::percent_encode;
use freezer_tracker::inventory::share::{CommandShare, ShareSink};
use freezer_tracker::inventory::stats::per_freezer;
use freezer_tracker::logger::jsonl::{JsonlConfig, JsonlWriter};

type Inventory = InventoryController<JsonFileRepository>;

/// Freezer Tracker: slot-level inventory for pots and boxes across freezers.
#[derive(Debug, Parser)]
#[command(
    name = "frz",
    author,
    version,
    about = "Freezer Tracker - slot inventory for freezers",
    long_about = None
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override the slot state file path.
    #[arg(long, global = true, value_name = "PATH")]
    state_file: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Subcommand to execute (interactive dashboard when omitted on a TTY).
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Print slot grids.
    Show(ShowArgs),
    /// Flip one or more slots between empty and full.
    Toggle(ToggleArgs),
    /// Empty every slot of one freezer.
    Clear(ClearArgs),
    /// Empty every slot of every freezer.
    Reset(ResetArgs),
    /// Full/empty totals by container type.
    Stats,
    /// Print the stock report.
    Report(ReportArgs),
    /// Build the share link for the stock report.
    Share(ShareArgs),
    /// List configured freezers.
    Freezers,
    /// Inspect configuration.
    Config(ConfigArgs),
    /// Interactive terminal dashboard.
    #[cfg(feature = "tui")]
    Dashboard,
    /// Generate shell completions.
    Completions(CompletionsArgs),
    /// Show version and optional build metadata.
    Version(VersionArgs),
}

#[derive(Debug, Clone, Args, Default)]
struct ShowArgs {
    /// Only this freezer (1-based).
    #[arg(long, short, value_name = "N")]
    freezer: Option<usize>,
}

#[derive(Debug, Clone, Args)]
struct ToggleArgs {
    /// Freezer number (1-based).
    freezer: usize,
    /// Slot numbers (1-based).
    #[arg(required = true)]
    slots: Vec<usize>,
}

#[derive(Debug, Clone, Args)]
struct ClearArgs {
    /// Freezer number (1-based).
    freezer: usize,
    /// Skip confirmation prompt.
    #[arg(long, short)]
    yes: bool,
}

#[derive(Debug, Clone, Args, Default)]
struct ResetArgs {
    /// Skip confirmation prompt.
    #[arg(long, short)]
    yes: bool,
}

#[derive(Debug, Clone, Args, Default)]
struct ReportArgs {
    /// Print the percent-encoded form.
    #[arg(long)]
    encoded: bool,
}

#[derive(Debug, Clone, Args, Default)]
struct ShareArgs {
    /// Hand the link to the configured opener instead of printing it.
    #[arg(long)]
    open: bool,
}

#[derive(Debug, Clone, Args, Default)]
struct ConfigArgs {
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Subcommand)]
enum ConfigCommand {
    /// Print the config file path.
    Path,
    /// Print the effective configuration.
    Show,
    /// Validate the configuration.
    Validate,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Shell to generate completion script for.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Args, Default)]
struct VersionArgs {
    /// Include build metadata.
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input at runtime.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Json(_) => 3,
        }
    }
}

impl From<FrzError> for CliError {
    fn from(err: FrzError) -> Self {
        if err.is_user_input() {
            Self::User(err.to_string())
        } else {
            Self::Runtime(err.to_string())
        }
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        None => run_default(cli),
        Some(Command::Show(args)) => run_show(cli, args),
        Some(Command::Toggle(args)) => run_toggle(cli, args),
        Some(Command::Clear(args)) => run_clear(cli, args),
        Some(Command::Reset(args)) => run_reset(cli, args),
        Some(Command::Stats) => run_stats(cli),
        Some(Command::Report(args)) => run_report(cli, args),
        Some(Command::Share(args)) => run_share(cli, args),
        Some(Command::Freezers) => run_freezers(cli),
        Some(Command::Config(args)) => run_config(cli, args),
        #[cfg(feature = "tui")]
        Some(Command::Dashboard) => run_dashboard(cli),
        Some(Command::Completions(args)) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
        Some(Command::Version(args)) => emit_version(cli, args),
    }
}

fn run_default(cli: &Cli) -> Result<(), CliError> {
    if dashboard_is_default(cli) {
        #[cfg(feature = "tui")]
        return run_dashboard(cli);
    }
    run_show(cli, &ShowArgs::default())
}

#[cfg(feature = "tui")]
fn dashboard_is_default(cli: &Cli) -> bool {
    !cli.json && io::stdin().is_terminal() && io::stdout().is_terminal()
}

#[cfg(not(feature = "tui"))]
const fn dashboard_is_default(_cli: &Cli) -> bool {
    false
}

// ──────────────────── session setup ────────────────────

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = &cli.state_file {
        config.paths.state_file.clone_from(path);
    }
    Ok(config)
}

fn open_inventory(config: &Config, mode: OutputMode) -> Result<Inventory, CliError> {
    let layout = config.build_layout()?;
    let repo = JsonFileRepository::new(config.paths.state_file.clone());
    let journal = JsonlWriter::open(JsonlConfig::new(config.paths.activity_log.clone()));
    let inventory = InventoryController::open(layout, repo).with_journal(journal);

    if let LoadSource::Discarded { reason } = inventory.load_source()
        && mode == OutputMode::Human
    {
        eprintln!(
            "{} saved state ignored ({reason}); starting with empty freezers",
            "warning:".yellow().bold()
        );
    }
    Ok(inventory)
}

/// Translate a 1-based freezer number into an index.
fn freezer_index(number: usize, count: usize) -> Result<usize, CliError> {
    if number == 0 || number > count {
        return Err(CliError::User(format!(
            "freezer {number} out of range (1-{count})"
        )));
    }
    Ok(number - 1)
}

/// Translate a 1-based slot number into an index.
fn slot_index(number: usize) -> Result<usize, CliError> {
    if number == 0 || number > SLOTS_PER_FREEZER {
        return Err(CliError::User(format!(
            "slot {number} out of range (1-{SLOTS_PER_FREEZER})"
        )));
    }
    Ok(number - 1)
}

// ──────────────────── inventory commands ────────────────────

fn run_show(cli: &Cli, args: &ShowArgs) -> Result<(), CliError> {
    let mode = output_mode(cli);
    let config = load_config(cli)?;
    let inventory = open_inventory(&config, mode)?;
    let layout = inventory.layout();

    let indices: Vec<usize> = match args.freezer {
        Some(number) => vec![freezer_index(number, layout.len())?],
        None => (0..layout.len()).collect(),
    };

    match mode {
        OutputMode::Human => {
            for (n, &index) in indices.iter().enumerate() {
                let (freezer, grid) = inventory.freezer(index)?;
                if n > 0 {
                    println!();
                }
                println!(
                    "{} {} {}",
                    format!("{:>2}.", index + 1).dimmed(),
                    freezer.label().bold(),
                    format!("{}/{SLOTS_PER_FREEZER} cheios", grid.full_count()).dimmed()
                );
                print_grid(freezer, grid.as_slice());
            }
        }
        OutputMode::Json => {
            let mut freezers = Vec::with_capacity(indices.len());
            for &index in &indices {
                let (freezer, grid) = inventory.freezer(index)?;
                freezers.push(json!({
                    "number": index + 1,
                    "name": freezer.name,
                    "type": freezer.kind.label(),
                    "cols": freezer.cols,
                    "rows": freezer.rows,
                    "full": grid.full_count(),
                    "slots": grid.as_slice(),
                }));
            }
            write_json_line(&json!({
                "command": "show",
                "freezers": freezers,
            }))?;
        }
    }
    Ok(())
}

fn print_grid(freezer: &FreezerConfig, slots: &[bool]) {
    for row in slots.chunks(freezer.cols.max(1)) {
        let cells: Vec<String> = row
            .iter()
            .map(|&full| {
                if full {
                    "■".green().to_string()
                } else {
                    "·".dimmed().to_string()
                }
            })
            .collect();
        println!("    {}", cells.join(" "));
    }
}

fn run_toggle(cli: &Cli, args: &ToggleArgs) -> Result<(), CliError> {
    let mode = output_mode(cli);
    let config = load_config(cli)?;
    let mut inventory = open_inventory(&config, mode)?;

    let freezer = freezer_index(args.freezer, inventory.layout().len())?;
    let slots = args
        .slots
        .iter()
        .map(|&n| slot_index(n))
        .collect::<Result<Vec<_>, _>>()?;

    let mut results = Vec::with_capacity(slots.len());
    for slot in slots {
        let full = inventory.toggle(freezer, slot)?;
        results.push((slot, full));
    }

    let name = inventory.layout().freezer(freezer)?.name.clone();
    match mode {
        OutputMode::Human => {
            for (slot, full) in &results {
                let state = if *full {
                    "cheio".green()
                } else {
                    "vazio".dimmed()
                };
                println!("{name} #{}: {state}", slot + 1);
            }
        }
        OutputMode::Json => {
            let slots: Vec<Value> = results
                .iter()
                .map(|(slot, full)| json!({ "slot": slot + 1, "full": full }))
                .collect();
            write_json_line(&json!({
                "command": "toggle",
                "freezer": freezer + 1,
                "name": name,
                "slots": slots,
            }))?;
        }
    }
    Ok(())
}

fn run_clear(cli: &Cli, args: &ClearArgs) -> Result<(), CliError> {
    let mode = output_mode(cli);
    let config = load_config(cli)?;
    let mut inventory = open_inventory(&config, mode)?;

    let freezer = freezer_index(args.freezer, inventory.layout().len())?;
    let name = inventory.layout().freezer(freezer)?.name.clone();

    let confirmed = args.yes
        || !config.ui.confirm_destructive
        || confirm_on_terminal(&format!("Tem certeza que deseja limpar {name}?"))?;
    if confirmed {
        inventory.clear(freezer)?;
    }

    match mode {
        OutputMode::Human => {
            if confirmed {
                println!("{} limpo.", name.bold());
            } else {
                println!("Cancelado.");
            }
        }
        OutputMode::Json => write_json_line(&json!({
            "command": "clear",
            "freezer": freezer + 1,
            "name": name,
            "cleared": confirmed,
        }))?,
    }
    Ok(())
}

fn run_reset(cli: &Cli, args: &ResetArgs) -> Result<(), CliError> {
    let mode = output_mode(cli);
    let config = load_config(cli)?;
    let mut inventory = open_inventory(&config, mode)?;

    let confirmed = args.yes
        || !config.ui.confirm_destructive
        || confirm_on_terminal("Tem certeza que deseja zerar TODOS os freezers?")?;
    if confirmed {
        inventory.reset_all()?;
    }

    match mode {
        OutputMode::Human => {
            if confirmed {
                println!("Todos os freezers zerados.");
            } else {
                println!("Cancelado.");
            }
        }
        OutputMode::Json => write_json_line(&json!({
            "command": "reset",
            "reset": confirmed,
        }))?,
    }
    Ok(())
}

fn run_stats(cli: &Cli) -> Result<(), CliError> {
    let mode = output_mode(cli);
    let config = load_config(cli)?;
    let inventory = open_inventory(&config, mode)?;
    let totals = inventory.stats();

    match mode {
        OutputMode::Human => {
            println!("{}", "Potes".bold());
            println!(
                "  Cheias {:>4}   Vazias {:>4}",
                totals.potes_cheios.to_string().green(),
                totals.potes_vazios.to_string().yellow()
            );
            println!("{}", "Caixas".bold());
            println!(
                "  Cheias {:>4}   Vazias {:>4}",
                totals.caixas_cheias.to_string().green(),
                totals.caixas_vazias.to_string().yellow()
            );
            println!();
            for (freezer, stats) in per_freezer(inventory.layout(), inventory.store()) {
                let detail = match freezer.kind {
                    ContainerKind::Pote => format!("{} potes", stats.pote_full),
                    ContainerKind::Caixa => format!("{} caixas", stats.caixa_full),
                    ContainerKind::Split { .. } => format!(
                        "{} potes / {} caixas",
                        stats.pote_full, stats.caixa_full
                    ),
                };
                println!("  {:<24} {detail}", freezer.label());
            }
        }
        OutputMode::Json => {
            let freezers: Vec<Value> = per_freezer(inventory.layout(), inventory.store())
                .map(|(freezer, stats)| {
                    json!({
                        "number": freezer.id + 1,
                        "name": freezer.name,
                        "type": freezer.kind.label(),
                        "stats": stats,
                    })
                })
                .collect();
            write_json_line(&json!({
                "command": "stats",
                "totals": totals,
                "freezers": freezers,
            }))?;
        }
    }
    Ok(())
}

fn run_report(cli: &Cli, args: &ReportArgs) -> Result<(), CliError> {
    let mode = output_mode(cli);
    let config = load_config(cli)?;
    let inventory = open_inventory(&config, mode)?;
    let report = inventory.report();

    match mode {
        OutputMode::Human => {
            if args.encoded {
                println!("{}", percent_encode(&report));
            } else {
                println!("{report}");
            }
        }
        OutputMode::Json => write_json_line(&json!({
            "command": "report",
            "report": report,
            "encoded": percent_encode(&report),
        }))?,
    }
    Ok(())
}

fn run_share(cli: &Cli, args: &ShareArgs) -> Result<(), CliError> {
    let mode = output_mode(cli);
    let config = load_config(cli)?;
    let mut inventory = open_inventory(&config, mode)?;
    let link = inventory.share_link(&config.share.base_url);

    let opener = if args.open {
        let mut sink = share_opener(&config);
        sink.share(&link)
            .map_err(|e| CliError::Runtime(format!("failed to run {}: {e}", sink.program())))?;
        Some(sink.program().to_string())
    } else {
        None
    };

    match mode {
        OutputMode::Human => {
            println!("{link}");
            if let Some(program) = &opener {
                eprintln!("{} {program}", "opened with".dimmed());
            }
        }
        OutputMode::Json => write_json_line(&json!({
            "command": "share",
            "link": link,
            "opened_with": opener,
        }))?,
    }
    Ok(())
}

fn share_opener(config: &Config) -> CommandShare {
    config
        .share
        .opener
        .as_deref()
        .map_or_else(CommandShare::platform_default, CommandShare::new)
}

fn run_freezers(cli: &Cli) -> Result<(), CliError> {
    let mode = output_mode(cli);
    let config = load_config(cli)?;
    let layout = config.build_layout()?;

    match mode {
        OutputMode::Human => {
            println!(
                "Layout: {}",
                if config.layout.freezers.is_empty() {
                    config.layout.preset.as_str()
                } else {
                    "custom"
                }
            );
            for freezer in layout.iter() {
                let zones = match freezer.kind {
                    ContainerKind::Split { pote, caixa } => format!(
                        "  potes {}-{}, caixas {}-{}",
                        pote.start + 1,
                        pote.end,
                        caixa.start + 1,
                        caixa.end
                    ),
                    ContainerKind::Pote | ContainerKind::Caixa => String::new(),
                };
                println!(
                    "  {:>2}  {:<24} {}x{}{}",
                    freezer.id + 1,
                    freezer.label(),
                    freezer.cols,
                    freezer.rows,
                    zones.dimmed()
                );
            }
        }
        OutputMode::Json => {
            let freezers: Vec<Value> = layout
                .iter()
                .map(|freezer| {
                    let mut entry = json!({
                        "number": freezer.id + 1,
                        "name": freezer.name,
                        "type": freezer.kind.label(),
                        "cols": freezer.cols,
                        "rows": freezer.rows,
                    });
                    if let ContainerKind::Split { pote, caixa } = freezer.kind {
                        entry["zones"] = json!({
                            "pote": [pote.start + 1, pote.end],
                            "caixa": [caixa.start + 1, caixa.end],
                        });
                    }
                    entry
                })
                .collect();
            write_json_line(&json!({
                "command": "freezers",
                "preset": config.layout.preset.as_str(),
                "custom": !config.layout.freezers.is_empty(),
                "freezers": freezers,
            }))?;
        }
    }
    Ok(())
}

#[cfg(feature = "tui")]
fn run_dashboard(cli: &Cli) -> Result<(), CliError> {
    use freezer_tracker::tui::{self, DashboardRuntimeConfig};

    let config = load_config(cli)?;
    let mut inventory = open_inventory(&config, OutputMode::Human)?;
    let mut haptics = tui::haptics::for_setting(config.ui.haptics);
    let mut share = share_opener(&config);
    let runtime_config = DashboardRuntimeConfig {
        share_base_url: config.share.base_url.clone(),
        confirm_destructive: config.ui.confirm_destructive,
        color: !cli.no_color && std::env::var_os("NO_COLOR").is_none(),
    };
    tui::run_dashboard(
        &mut inventory,
        haptics.as_mut(),
        &mut share,
        &runtime_config,
    )?;
    Ok(())
}

// ──────────────────── config / version ────────────────────

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    match &args.command {
        None | Some(ConfigCommand::Path) => {
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            let exists = path.exists();

            match output_mode(cli) {
                OutputMode::Human => {
                    println!("{}", path.display());
                    if !exists {
                        println!("  (file does not exist; defaults will be used)");
                    }
                }
                OutputMode::Json => {
                    write_json_line(&json!({
                        "command": "config path",
                        "path": path.to_string_lossy(),
                        "exists": exists,
                    }))?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Show) => {
            let config = load_config(cli)?;

            match output_mode(cli) {
                OutputMode::Human => {
                    let toml_str = toml::to_string_pretty(&config)
                        .map_err(|e| CliError::Runtime(format!("serialize config: {e}")))?;
                    println!("{toml_str}");
                }
                OutputMode::Json => {
                    write_json_line(&json!({
                        "command": "config show",
                        "config": serde_json::to_value(&config)?,
                    }))?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Validate) => match load_config(cli) {
            Ok(config) => {
                let freezers = config.build_layout()?.len();
                match output_mode(cli) {
                    OutputMode::Human => {
                        println!("Configuration is valid.");
                        println!("  Source: {}", config.paths.config_file.display());
                        println!("  Freezers: {freezers}");
                    }
                    OutputMode::Json => {
                        write_json_line(&json!({
                            "command": "config validate",
                            "valid": true,
                            "path": config.paths.config_file.to_string_lossy(),
                            "freezers": freezers,
                        }))?;
                    }
                }
                Ok(())
            }
            Err(e) => {
                match output_mode(cli) {
                    OutputMode::Human => eprintln!("Configuration is INVALID: {e}"),
                    OutputMode::Json => write_json_line(&json!({
                        "command": "config validate",
                        "valid": false,
                        "error": e.to_string(),
                    }))?,
                }
                Err(CliError::User(format!("invalid config: {e}")))
            }
        },
    }
}

fn emit_version(cli: &Cli, args: &VersionArgs) -> Result<(), CliError> {
    let version = env!("CARGO_PKG_VERSION");
    let package = env!("CARGO_PKG_NAME");
    let target = option_env!("TARGET").unwrap_or("unknown");
    let profile = option_env!("PROFILE").unwrap_or("unknown");
    let git_sha = option_env!("GIT_SHA").unwrap_or("unknown");

    match output_mode(cli) {
        OutputMode::Human => {
            println!("frz {version}");
            if args.verbose {
                println!("package: {package}");
                println!("target: {target}");
                println!("profile: {profile}");
                println!("git_sha: {git_sha}");
                println!(
                    "features: {}",
                    if cfg!(feature = "tui") { "cli, tui" } else { "cli" }
                );
            }
        }
        OutputMode::Json => {
            write_json_line(&json!({
                "binary": "frz",
                "version": version,
                "package": package,
                "build": {
                    "target": target,
                    "profile": profile,
                    "git_sha": git_sha,
                    "tui": cfg!(feature = "tui"),
                }
            }))?;
        }
    }
    Ok(())
}

// ──────────────────── output helpers ────────────────────

/// Ask on stderr, read the answer from stdin.
fn confirm_on_terminal(message: &str) -> Result<bool, CliError> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut stderr = io::stderr();
    Ok(prompt_confirm(&mut reader, &mut stderr, message)?)
}

/// `[y/N]` prompt; anything but an explicit yes declines. EOF declines.
fn prompt_confirm<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    message: &str,
) -> io::Result<bool> {
    write!(writer, "{message} [y/N]: ")?;
    writer.flush()?;

    let mut input = String::new();
    reader.read_line(&mut input)?;
    let answer = input.trim().to_ascii_lowercase();
    Ok(matches!(answer.as_str(), "y" | "yes" | "s" | "sim"))
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("FRZ_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    let fallback = if stdout_is_tty {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        _ => fallback,
    }
}
