//! Parsing of console input lines.

use std::sync::OnceLock;

use regex::Regex;

/// A parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// `search <appid>`; `None` when the argument is missing
    Search(Option<String>),
    /// `sql "<query>"`; `None` when the input is not in that form
    Sql(Option<String>),
    Gpt,
    /// Anything else, with the lowercased command word
    Unknown(String),
}

fn sql_pattern() -> &'static Regex {
    static SQL: OnceLock<Regex> = OnceLock::new();
    SQL.get_or_init(|| Regex::new(r#"(?i)^sql\s+"([^"]+)"$"#).expect("Invalid sql command regex"))
}

impl Command {
    /// Parse trimmed, non-empty input. The command word is case-insensitive.
    pub fn parse(input: &str) -> Self {
        let mut parts = input.split_whitespace();
        let command = parts.next().unwrap_or_default().to_lowercase();

        match command.as_str() {
            "help" => Command::Help,
            "search" => Command::Search(parts.next().map(str::to_string)),
            "sql" => Command::Sql(
                sql_pattern()
                    .captures(input)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().to_string()),
            ),
            "gpt" => Command::Gpt,
            _ => Command::Unknown(command),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("help"), Command::Help);
        assert_eq!(Command::parse("HELP"), Command::Help);
        assert_eq!(Command::parse("gpt tell me a joke"), Command::Gpt);
        assert_eq!(Command::parse("Dance now"), Command::Unknown("dance".to_string()));
    }

    #[test]
    fn test_parse_search() {
        assert_eq!(Command::parse("search 440"), Command::Search(Some("440".to_string())));
        assert_eq!(Command::parse("search"), Command::Search(None));
    }

    #[test]
    fn test_parse_sql() {
        assert_eq!(
            Command::parse(r#"sql "select * from games where price = 0""#),
            Command::Sql(Some("select * from games where price = 0".to_string()))
        );
        assert_eq!(
            Command::parse(r#"SQL   "select 1""#),
            Command::Sql(Some("select 1".to_string()))
        );
        assert_eq!(Command::parse("sql select 1"), Command::Sql(None));
        assert_eq!(Command::parse(r#"sql """#), Command::Sql(None));
    }
}
