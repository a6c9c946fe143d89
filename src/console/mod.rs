//! Command console.
//!
//! Keeps a scrollback history. Each submitted line is echoed as `] <input>`
//! and followed by the command's output lines.

pub mod command;

use crate::adapters::{ApiError, CatalogApi};
use crate::domain::RawEntry;

pub use command::Command;

const BANNER: [&str; 2] = ["OpenValve Console Started", "Type 'help' for commands."];

const HELP: [&str; 6] = [
    "OPENVALVE CONSOLE v1.0",
    "----------------------",
    "help           : Displays this list of commands.",
    "search <appid> : Fetches game data from the DB by Steam App ID.",
    "sql \"<query>\"  : Executes a read-only SQL query against the database.",
    "gpt <prompt>   : [NOT IMPLEMENTED]",
];

const RULE: &str = "----------------------------------------";

/// Characters of the description shown by `search`
const DESCRIPTION_PREVIEW: usize = 100;

/// Console scrollback and command execution
#[derive(Debug, Clone)]
pub struct Console {
    history: Vec<String>,
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Console {
    pub fn new() -> Self {
        Self {
            history: BANNER.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Everything printed so far
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Run one line of input and return the lines it added to the history.
    ///
    /// Blank input is ignored and adds nothing.
    pub async fn submit<A>(&mut self, api: &A, input: &str) -> &[String]
    where
        A: CatalogApi + ?Sized,
    {
        let start = self.history.len();
        let input = input.trim();
        if input.is_empty() {
            return &self.history[start..];
        }

        self.history.push(format!("] {}", input));

        let output = match Command::parse(input) {
            Command::Help => HELP.iter().map(|s| s.to_string()).collect(),
            Command::Search(Some(appid)) => search(api, &appid).await,
            Command::Search(None) => vec!["Usage: search <appid> (e.g., 'search 440')".to_string()],
            Command::Sql(Some(query)) => sql(api, &query).await,
            Command::Sql(None) => {
                vec!["Usage: sql \"select * from games where price = 0\"".to_string()]
            }
            Command::Gpt => {
                vec!["System.NotImplementedException: AI module not connected.".to_string()]
            }
            Command::Unknown(command) => vec![format!(
                "Unknown command: '{}'. Type 'help' for valid commands.",
                command
            )],
        };

        self.history.extend(output);
        &self.history[start..]
    }
}

async fn search<A: CatalogApi + ?Sized>(api: &A, appid: &str) -> Vec<String> {
    let mut lines = vec![format!("Searching database for AppID: {}...", appid)];

    match api.game_by_appid(appid).await {
        Ok(games) => match games.first() {
            Some(game) => lines.extend(describe_game(game)),
            None => lines.push("ERROR: Game not found.".to_string()),
        },
        Err(e) => lines.push(failure_line("ERROR", &e)),
    }

    lines
}

async fn sql<A: CatalogApi + ?Sized>(api: &A, query: &str) -> Vec<String> {
    let mut lines = vec![format!("Executing SQL: {}...", query)];

    match api.run_sql(query).await {
        Ok(rows) => {
            lines.push("STATUS: SUCCESS [200 OK]".to_string());
            let pretty = serde_json::to_string_pretty(&rows).unwrap_or_else(|_| rows.to_string());
            lines.extend(pretty.lines().map(str::to_string));
        }
        Err(e) => lines.push(failure_line("SQL ERROR", &e)),
    }

    lines
}

/// API refusals are reported under `prefix`; anything else is a network error
fn failure_line(prefix: &str, error: &ApiError) -> String {
    match error.api_message() {
        Some(message) => format!("{}: {}", prefix, message),
        None => format!("NETWORK ERROR: {}", error),
    }
}

/// The framed block printed for a found game
pub fn describe_game(game: &RawEntry) -> Vec<String> {
    let price = game
        .price
        .as_ref()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    let tags = game
        .tags
        .as_ref()
        .map(|t| t.labels().join(", "))
        .unwrap_or_else(|| "None".to_string());

    let description = match game.description_text() {
        Some(d) => format!("{}...", d.chars().take(DESCRIPTION_PREVIEW).collect::<String>()),
        None => "No description".to_string(),
    };

    vec![
        "STATUS: FOUND [200 OK]".to_string(),
        RULE.to_string(),
        format!("ID:    {}", game.appid),
        format!("NAME:  {}", game.name),
        format!("PRICE: {}", price),
        format!("TAGS:  {}", tags),
        format!("DESC:  {}", description),
        RULE.to_string(),
    ]
}
