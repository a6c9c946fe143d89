//! Command-line interface for openvalve.
//!
//! Provides commands for building the shared library from several
//! accounts, showing account cards and label distributions, querying the
//! game database, and running the command console.

use std::io::Write;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::adapters::{ApiClient, CatalogApi};
use crate::config;
use crate::console::Console;
use crate::core::{Dashboard, FriendsOutcome, MyAccount};
use crate::domain::{CatalogEntry, RawEntry};
use crate::library::{self, GraphMode, GraphSource};

/// openvalve - shared game-library dashboard
#[derive(Parser, Debug)]
#[command(name = "openvalve")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the API is online
    Status,

    /// Build and print the merged library of several accounts
    Library {
        #[command(flatten)]
        accounts: AccountArgs,

        /// Maximum number of games to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print the library as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show account cards with presence and game counts
    Users {
        #[command(flatten)]
        accounts: AccountArgs,
    },

    /// Show the label distribution of the merged library
    Graph {
        #[command(flatten)]
        accounts: AccountArgs,

        /// Classification to count
        #[arg(short, long, value_enum, default_value = "tags")]
        source: SourceArg,

        /// How to draw the distribution
        #[arg(short, long, value_enum, default_value = "bar")]
        mode: ModeArg,
    },

    /// Look up a game in the database by App ID
    Game {
        /// Steam App ID
        appid: String,
    },

    /// Show a random sample of games from the database
    Random {
        /// Number of games to fetch
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Interactive command console (reads commands from stdin)
    Console,

    /// Manage your own saved account
    Me {
        #[command(subcommand)]
        command: MeCommands,
    },

    /// Show resolved configuration (debug)
    Config,
}

#[derive(Subcommand, Debug)]
pub enum MeCommands {
    /// Resolve and save your account
    Set {
        /// Steam ID or vanity URL name
        identifier: String,
    },

    /// Show the saved account
    Show,

    /// Forget the saved account
    Clear,
}

/// Accounts to load; falls back to the saved account when empty
#[derive(Args, Debug, Clone)]
pub struct AccountArgs {
    /// Steam IDs or vanity URL names
    pub accounts: Vec<String>,

    /// Also add the public friends of each account
    #[arg(short, long)]
    pub friends: bool,
}

/// Graph source for CLI (maps to GraphSource)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SourceArg {
    Tags,
    Genres,
    Categories,
}

impl From<SourceArg> for GraphSource {
    fn from(s: SourceArg) -> Self {
        match s {
            SourceArg::Tags => GraphSource::Tags,
            SourceArg::Genres => GraphSource::Genres,
            SourceArg::Categories => GraphSource::Categories,
        }
    }
}

/// Graph mode for CLI (maps to GraphMode)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Bar,
    Pie,
    Radar,
}

impl From<ModeArg> for GraphMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Bar => GraphMode::Bar,
            ModeArg::Pie => GraphMode::Pie,
            ModeArg::Radar => GraphMode::Radar,
        }
    }
}

/// Width of the histogram bars
const GRAPH_WIDTH: usize = 40;

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Status => show_status().await,
            Commands::Library {
                accounts,
                limit,
                json,
            } => show_library(&accounts, limit, json).await,
            Commands::Users { accounts } => show_users(&accounts).await,
            Commands::Graph {
                accounts,
                source,
                mode,
            } => show_graph(&accounts, source.into(), mode.into()).await,
            Commands::Game { appid } => show_game(&appid).await,
            Commands::Random { limit } => show_random(limit).await,
            Commands::Console => run_console().await,
            Commands::Me { command } => execute_me(command).await,
            Commands::Config => show_config(),
        }
    }
}

fn api_client() -> Result<ApiClient> {
    ApiClient::from_config(config::config()?).context("Failed to create API client")
}

/// Register the requested accounts (and optionally their friends)
async fn load_dashboard(args: &AccountArgs) -> Result<Dashboard<ApiClient>> {
    let identifiers = if args.accounts.is_empty() {
        match MyAccount::load().await? {
            Some(me) => vec![me.steamid],
            None => anyhow::bail!(
                "No accounts given. Pass Steam IDs or save yours with 'openvalve me set <ID>'"
            ),
        }
    } else {
        args.accounts.clone()
    };

    let mut dashboard = Dashboard::new(api_client()?);
    let mut added = Vec::new();

    for identifier in &identifiers {
        match dashboard.add_account(identifier).await {
            Ok(profile) => {
                eprintln!("Added {} ({})", profile.personaname, profile.steamid);
                added.push(profile.steamid.clone());
            }
            Err(e) => eprintln!("Could not add {}: {}", identifier, e),
        }
    }

    if args.friends {
        for steamid in &added {
            match dashboard.add_friends(steamid).await {
                Ok(FriendsOutcome::NoFriends) => eprintln!("No friends found for {}.", steamid),
                Ok(FriendsOutcome::AllAlreadyAdded) => {
                    eprintln!("All public friends of {} are already added.", steamid)
                }
                Ok(FriendsOutcome::Added { added: count, with_games }) => eprintln!(
                    "Added {} friends of {} ({} with readable libraries)",
                    count, steamid, with_games
                ),
                Err(e) => eprintln!("Failed to add friends of {}: {}", steamid, e),
            }
        }
    }

    if dashboard.accounts().is_empty() {
        anyhow::bail!("No accounts could be added");
    }

    Ok(dashboard)
}

/// Check the API is up
async fn show_status() -> Result<()> {
    let api = api_client()?;
    let status = api
        .status()
        .await
        .with_context(|| format!("API at {} is not reachable", api.base_url()))?;

    println!("API {}: {} ({})", api.base_url(), status.status, status.backend);
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max - 3).collect::<String>())
    } else {
        text.to_string()
    }
}

fn price_label(game: &RawEntry) -> String {
    game.price
        .as_ref()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn print_game_table(games: &[&RawEntry], owners: Option<&[CatalogEntry]>) {
    println!(
        "{:<9} {:<40} {:<14} {:<6} {:<8} {}",
        "APPID",
        "NAME",
        "RELEASED",
        "SCORE",
        "PRICE",
        if owners.is_some() { "OWNERS" } else { "" }
    );
    println!("{}", "-".repeat(100));

    for (i, game) in games.iter().enumerate() {
        let owner_list = owners
            .and_then(|entries| entries.get(i))
            .map(|entry| entry.owners.join(", "))
            .unwrap_or_default();
        println!(
            "{:<9} {:<40} {:<14} {:<6} {:<8} {}",
            game.appid,
            truncate(&game.name, 40),
            game.release_date_text().unwrap_or_else(|| "-".to_string()),
            game.user_score_text().unwrap_or_else(|| "-".to_string()),
            price_label(game),
            owner_list
        );
    }
}

/// Print the merged library
async fn show_library(args: &AccountArgs, limit: Option<usize>, json: bool) -> Result<()> {
    let dashboard = load_dashboard(args).await?;
    let library = dashboard.library();
    let shown = &library[..limit.unwrap_or(library.len()).min(library.len())];

    if json {
        println!("{}", serde_json::to_string_pretty(shown)?);
        return Ok(());
    }

    if library.is_empty() {
        println!("Library is empty. The added accounts may have private libraries.");
        return Ok(());
    }

    let games: Vec<&RawEntry> = shown.iter().map(|e| &e.game).collect();
    print_game_table(&games, Some(shown));
    println!(
        "\nTotal: {} games across {} accounts",
        library.len(),
        dashboard.accounts().len()
    );

    Ok(())
}

/// Print one card per account
async fn show_users(args: &AccountArgs) -> Result<()> {
    let dashboard = load_dashboard(args).await?;

    for account in dashboard.accounts() {
        println!("╔══ {}", account.personaname);
        println!("  Steam ID:     {}", account.steamid);
        println!("  Status:       {}", account.status_label());
        if let Some(country) = account.loccountrycode.as_deref() {
            println!("  Country:      {}", country);
        }
        if let Some(realname) = account.realname.as_deref() {
            println!("  Real name:    {}", realname);
        }
        println!("  Member since: {}", account.member_since());
        println!("  Last logoff:  {}", crate::domain::format_date(account.lastlogoff));
        println!("  Games:        {}", dashboard.game_count(&account.steamid));
        if let Some(url) = account.profileurl.as_deref() {
            println!("  Profile:      {}", url);
        }
        println!();
    }

    Ok(())
}

/// Print the label distribution
async fn show_graph(args: &AccountArgs, source: GraphSource, mode: GraphMode) -> Result<()> {
    let dashboard = load_dashboard(args).await?;
    let buckets = library::distribution(dashboard.library(), source);

    if buckets.is_empty() {
        println!("No data. Add users to generate graph.");
        return Ok(());
    }

    for line in library::render(&buckets, mode, GRAPH_WIDTH) {
        println!("{}", line);
    }
    println!("\n{}", library::footer(source, dashboard.library().len()));

    Ok(())
}

/// Look up a single game through the console search
async fn show_game(appid: &str) -> Result<()> {
    let api = api_client()?;
    let mut console = Console::new();

    // Skip the echoed command line
    for line in console.submit(&api, &format!("search {}", appid)).await.iter().skip(1) {
        println!("{}", line);
    }

    Ok(())
}

/// Print a random sample of the database
async fn show_random(limit: usize) -> Result<()> {
    let api = api_client()?;
    let games = api
        .random_games(limit)
        .await
        .context("Failed to fetch games")?;

    if games.is_empty() {
        println!("No games returned.");
        return Ok(());
    }

    let rows: Vec<&RawEntry> = games.iter().collect();
    print_game_table(&rows, None);
    Ok(())
}

/// Read console commands from stdin until EOF
async fn run_console() -> Result<()> {
    let api = api_client()?;
    let mut console = Console::new();

    for line in console.history() {
        println!("{}", line);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        eprint!("] ");
        std::io::stderr().flush().ok();

        let Some(input) = lines.next_line().await.context("Failed to read from stdin")? else {
            break;
        };

        // The echo is already on screen as typed input
        for line in console.submit(&api, &input).await.iter().skip(1) {
            println!("{}", line);
        }
    }

    Ok(())
}

/// Execute `me` subcommands
async fn execute_me(command: MeCommands) -> Result<()> {
    match command {
        MeCommands::Set { identifier } => {
            let api = api_client()?;
            let profile = api
                .user_summary(identifier.trim())
                .await
                .with_context(|| format!("Could not resolve account '{}'", identifier))?;

            let me = MyAccount::from(&profile);
            me.save().await?;
            println!("Saved {} ({}) as your account", me.personaname, me.steamid);
        }
        MeCommands::Show => match MyAccount::load().await? {
            Some(me) => println!("{} ({})", me.personaname, me.steamid),
            None => println!("No account saved. Use 'openvalve me set <ID>'."),
        },
        MeCommands::Clear => {
            if MyAccount::clear().await? {
                println!("Saved account cleared");
            } else {
                println!("No account saved");
            }
        }
    }

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("OpenValve Configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:       {}", cfg.home.display());
    println!("  My account: {}", cfg.my_account_path().display());
    println!();
    println!("API:");
    println!("  Base URL: {}", cfg.api.base_url);
    println!("  Timeout:  {}s", cfg.api.timeout_seconds);

    Ok(())
}
