//! CLI argument definitions for signalcast.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `briefing` | Plain-text market briefing grounded on live web data |
//! | `signal` | Generate a trading signal and save it to history |
//! | `news` | Sentiment-tagged news batch for a category |
//! | `chat` | Ask a follow-up question about a saved signal |
//! | `history` | Saved signals, newest first |
//! | `watchlist` | List, add or remove watched assets |
//! | `profile` | Show or update the trading profile |
//! | `assets` | Browse the asset catalog |
//! | `symbol` | Charting symbol for an asset |
//! | `sources` | Featured sources collected from saved signals |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--verbose` | `false` | Log at info level to stderr |
//! | `--max-retries` | env / `3` | Retries after the first attempt |
//! | `--timeout-ms` | env / `60000` | Per-attempt HTTP timeout |
//! | `--data-dir` | `$SIGNALCAST_HOME` or `~/.signalcast` | Local state directory |
//!
//! # Examples
//!
//! ```bash
//! signalcast signal "Gold (XAU/USD)" --pretty
//! signalcast news --category crypto --format table
//! signalcast chat 0 "Where would you place the stop?"
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Signalcast - AI market briefings, trading signals and news from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "signalcast",
    author,
    version,
    about = "AI market briefings, trading signals and news",
    long_about = "Signalcast asks a generative model with live web search for market \
briefings, trading signals, sentiment-tagged news and follow-up answers.\n\
\n\
Set SIGNALCAST_API_KEY (or GEMINI_API_KEY) before running network commands.\n\
Output is informational only and is not financial advice."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Log at info level (overridden by RUST_LOG).
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    /// Retries after the first attempt of each AI request.
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Per-attempt HTTP timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Directory holding history, watchlist, profile and chat transcripts.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable layout for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a market briefing for the last 12 hours.
    Briefing,
    /// Generate a trading signal for an asset.
    Signal(SignalArgs),
    /// Fetch sentiment-tagged news.
    News(NewsArgs),
    /// Ask a follow-up question about a saved signal.
    Chat(ChatArgs),
    /// Show saved signals, newest first.
    History(HistoryArgs),
    /// Manage the watchlist.
    Watchlist(WatchlistArgs),
    /// Show or update the trading profile.
    Profile(ProfileArgs),
    /// List catalog assets.
    Assets(AssetsArgs),
    /// Resolve the charting symbol of an asset.
    Symbol(SymbolArgs),
    /// List featured sources collected from saved signals.
    Sources,
}

#[derive(Debug, Args)]
pub struct SignalArgs {
    /// Asset name as listed by `signalcast assets`, e.g. "Gold (XAU/USD)".
    pub asset: String,

    /// Do not save the signal to history.
    #[arg(long, default_value_t = false)]
    pub no_save: bool,
}

#[derive(Debug, Args)]
pub struct NewsArgs {
    /// News category: all, stocks, forex, commodities, indices or crypto.
    #[arg(long, default_value = "all")]
    pub category: String,
}

#[derive(Debug, Args)]
pub struct ChatArgs {
    /// History index (0 = newest) or signal id.
    pub signal: String,

    /// Question to ask.
    pub message: String,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Show at most this many signals.
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Args)]
pub struct WatchlistArgs {
    #[command(subcommand)]
    pub action: Option<WatchlistAction>,
}

#[derive(Debug, Subcommand)]
pub enum WatchlistAction {
    /// List watched assets.
    List,
    /// Watch an asset.
    Add { asset: String },
    /// Stop watching an asset.
    Remove { asset: String },
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// Trading style: Scalper, Day Trader, Swing Trader or Position Trader.
    #[arg(long)]
    pub style: Option<String>,

    /// Risk tolerance: Low, Medium or High.
    #[arg(long)]
    pub risk: Option<String>,
}

#[derive(Debug, Args)]
pub struct AssetsArgs {
    /// Restrict to one category.
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Debug, Args)]
pub struct SymbolArgs {
    pub asset: String,
}
