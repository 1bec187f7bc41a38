use clap::{Args, Parser, Subcommand, ValueEnum};
use fantasy_mvp::columns::{sort_rows, ColumnKey};
use fantasy_mvp::filter::{PositionFilter, YearFilter};
use fantasy_mvp::pipeline::{derive, DeriveRequest};
use fantasy_mvp::scoring::{
    score_breakdown, PartialScoringConfig, Preset, ScoringField, ScoringSettings,
};
use fantasy_mvp::state::{get_state_path, load_user_state, save_user_state, UserState};
use fantasy_mvp::stats::{load_dataset, CacheConfig, DataSource};
use std::path::{Path, PathBuf};
use std::time::Instant;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a ranked table of player-seasons
    List(ListArgs),
    /// Interactive rankings (default if no subcommand)
    Tui,
    /// Show or change the scoring rules
    Scoring {
        #[command(subcommand)]
        action: ScoringAction,
    },
    /// Convert a season-stats CSV export into the dataset JSON
    Convert {
        /// Input CSV file
        input: PathBuf,
        /// Output JSON file
        output: PathBuf,
    },
    /// Remove downloaded datasets from the HTTP cache
    ClearCache,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Position filter (All, QB, RB, WR, TE)
    #[arg(short, long)]
    position: Option<PositionFilter>,

    /// Year filter (a season, a decade like 1990s, Last35 or All)
    #[arg(short, long)]
    year: Option<YearFilter>,

    /// Maximum rows to show (defaults to max_results from config)
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Re-order the ranked rows by a column (e.g. recYds, player); ranks stay
    #[arg(short, long)]
    sort: Option<ColumnKey>,

    /// Flip the sort direction
    #[arg(long, requires = "sort")]
    reverse: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Don't remember the filters given on the command line
    #[arg(long)]
    no_save: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum ScoringAction {
    /// Print the current scoring rules
    Show,
    /// Change one or more scoring values
    #[command(allow_negative_numbers = true)]
    Set(ScoringValues),
    /// Apply a common league format (standard, half-ppr, ppr)
    Preset { preset: Preset },
    /// Restore the default scoring rules
    Reset,
}

#[derive(Args, Debug)]
struct ScoringValues {
    /// Passing yards per point
    #[arg(long)]
    passing_yards_per_point: Option<f64>,
    /// Points per passing touchdown
    #[arg(long)]
    passing_td: Option<f64>,
    /// Points per interception
    #[arg(long)]
    interception: Option<f64>,
    /// Rushing yards per point
    #[arg(long)]
    rushing_yards_per_point: Option<f64>,
    /// Points per rushing touchdown
    #[arg(long)]
    rushing_td: Option<f64>,
    /// Points per carry
    #[arg(long)]
    rushing_carry: Option<f64>,
    /// Receiving yards per point
    #[arg(long)]
    receiving_yards_per_point: Option<f64>,
    /// Points per receiving touchdown
    #[arg(long)]
    receiving_td: Option<f64>,
    /// Points per reception
    #[arg(long)]
    reception: Option<f64>,
    /// Points per lost fumble
    #[arg(long)]
    fumble_lost: Option<f64>,
}

impl ScoringValues {
    fn to_partial(&self) -> PartialScoringConfig {
        let values = [
            (ScoringField::PassingYardsPerPoint, self.passing_yards_per_point),
            (ScoringField::PassingTd, self.passing_td),
            (ScoringField::Interception, self.interception),
            (ScoringField::RushingYardsPerPoint, self.rushing_yards_per_point),
            (ScoringField::RushingTd, self.rushing_td),
            (ScoringField::RushingCarry, self.rushing_carry),
            (ScoringField::ReceivingYardsPerPoint, self.receiving_yards_per_point),
            (ScoringField::ReceivingTd, self.receiving_td),
            (ScoringField::Reception, self.reception),
            (ScoringField::FumbleLost, self.fumble_lost),
        ];
        values
            .into_iter()
            .fold(PartialScoringConfig::default(), |partial, (field, value)| match value {
                Some(v) => partial.with(field, v),
                None => partial,
            })
    }
}

#[derive(Parser, Debug)]
#[command(name = "fantasy-mvp")]
#[command(about = "Historical NFL fantasy rankings under your own scoring rules")]
#[command(long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/fantasy-mvp/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Dataset file or http(s) URL (overrides config)
    #[arg(long, global = true)]
    data: Option<String>,

    /// Bypass the HTTP cache for this run
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();
    fantasy_mvp::logging::init(cli.verbose);
    let command = cli.command.unwrap_or(Commands::Tui);

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match fantasy_mvp::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let source = cli
        .data
        .as_deref()
        .or(config.data.as_deref())
        .map(DataSource::parse)
        .unwrap_or_default();
    let cache_config = CacheConfig {
        enabled: !cli.no_cache,
    };
    tracing::debug!("Dataset source: {}", source);

    let state_path = get_state_path();
    let state = load_user_state(&state_path);

    match command {
        Commands::List(args) => {
            run_list(
                args,
                &source,
                &cache_config,
                config.max_results,
                state,
                &state_path,
                cli.verbose,
            )
            .await
        }
        Commands::Tui => {
            let theme = fantasy_mvp::tui::resolve_theme(config.theme);
            let colors = fantasy_mvp::tui::ThemeColors::for_theme(theme);
            let app = fantasy_mvp::tui::App::new_loading(
                state,
                state_path,
                config.max_results,
                colors,
                source.to_string(),
            );
            if let Err(e) = fantasy_mvp::tui::run_tui(app, source, cache_config).await {
                eprintln!("TUI error: {:#}", e);
                std::process::exit(EXIT_DATA);
            }
        }
        Commands::Scoring { action } => run_scoring(action, state, &state_path),
        Commands::Convert { input, output } => {
            match fantasy_mvp::stats::convert::convert_file(&input, &output) {
                Ok(summary) => {
                    println!(
                        "Converted {} of {} rows ({}-{}) to {}",
                        summary.records_kept,
                        summary.rows_read,
                        summary.earliest_year.map_or("-".to_string(), |y| y.to_string()),
                        summary.latest_year.map_or("-".to_string(), |y| y.to_string()),
                        output.display()
                    );
                }
                Err(e) => {
                    eprintln!("Conversion failed: {:#}", e);
                    std::process::exit(EXIT_DATA);
                }
            }
        }
        Commands::ClearCache => {
            let cache_path = fantasy_mvp::stats::cache::get_cache_path();
            match fantasy_mvp::stats::cache::clear_cache(&cache_path) {
                Ok(()) => println!("Cache cleared: {}", cache_path.display()),
                Err(e) => {
                    eprintln!("Failed to clear cache: {:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

async fn run_list(
    args: ListArgs,
    source: &DataSource,
    cache_config: &CacheConfig,
    max_results: usize,
    mut state: UserState,
    state_path: &Path,
    verbose: bool,
) {
    let start_time = Instant::now();

    // Filters given on the command line become the remembered ones
    let changed = args.position.is_some() || args.year.is_some();
    if let Some(position) = args.position {
        state.position_filter = position;
    }
    if let Some(year) = args.year {
        state.year_filter = year;
    }
    if changed && !args.no_save {
        if let Err(e) = save_user_state(state_path, &state) {
            tracing::warn!("Failed to save filters: {:#}", e);
        }
    }

    let dataset = match load_dataset(source, cache_config).await {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Failed to load data from {}: {:#}", source, e);
            std::process::exit(EXIT_DATA);
        }
    };

    let request =
        DeriveRequest::new(state.position_filter, state.year_filter, &state.scoring_config)
            .with_max_results(args.limit.unwrap_or(max_results));
    let mut rows = match derive(&dataset, &request) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Scoring error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    if let Some(key) = args.sort {
        sort_rows(&mut rows, key, key.default_descending() != args.reverse);
    }

    let use_colors = fantasy_mvp::output::should_use_colors();
    match args.format {
        OutputFormat::Table if verbose && !rows.is_empty() => {
            // Verbose mode: per-term breakdown for every row
            for row in &rows {
                let breakdown = score_breakdown(&row.season, &state.scoring_config);
                println!("{}", fantasy_mvp::output::format_breakdown(row, &breakdown, use_colors));
                println!();
            }
        }
        OutputFormat::Table => {
            let table = fantasy_mvp::output::format_table(&rows, state.position_filter, use_colors);
            println!("{}", table);
        }
        OutputFormat::Tsv => {
            println!("{}", fantasy_mvp::output::format_tsv(&rows, state.position_filter));
        }
        OutputFormat::Json => match fantasy_mvp::output::format_json(&rows) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to encode results: {:#}", e);
                std::process::exit(EXIT_DATA);
            }
        },
    }

    if verbose {
        eprintln!();
        eprintln!(
            "Total: {} of {} seasons ({}, {}) in {:?}",
            rows.len(),
            dataset.len(),
            state.position_filter,
            state.year_filter.label(),
            start_time.elapsed()
        );
    }
}

fn run_scoring(action: ScoringAction, mut state: UserState, state_path: &Path) {
    let use_colors = fantasy_mvp::output::should_use_colors();
    let mut settings = ScoringSettings::from_config(state.scoring_config).unwrap_or_default();

    let result = match action {
        ScoringAction::Show => {
            println!("{}", fantasy_mvp::output::format_scoring(settings.get(), use_colors));
            return;
        }
        ScoringAction::Set(values) => {
            let partial = values.to_partial();
            if partial.is_empty() {
                eprintln!("No scoring values given. See `fantasy-mvp scoring set --help`.");
                std::process::exit(EXIT_CONFIG);
            }
            settings.set(&partial).map(|_| ())
        }
        ScoringAction::Preset { preset } => settings.set(&preset.partial()).map(|_| ()),
        ScoringAction::Reset => {
            settings.reset();
            Ok(())
        }
    };

    if let Err(errors) = result {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    state.scoring_config = *settings.get();
    if let Err(e) = save_user_state(state_path, &state) {
        eprintln!("Failed to save scoring: {:#}", e);
        std::process::exit(EXIT_CONFIG);
    }
    println!("{}", fantasy_mvp::output::format_scoring(settings.get(), use_colors));
}
