use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List tasks
    ///
    /// Example: taskboard list --filter urgent
    /// Example: taskboard list --search budget
    List {
        /// One of all, urgent, today, pending
        #[arg(long)]
        filter: Option<String>,
        /// Case-insensitive match on title or description
        #[arg(long)]
        search: Option<String>,
    },
    /// Show total, completed, pending and urgent counts
    ///
    /// Example: taskboard stats
    Stats,
    /// Show details of a task
    ///
    /// Example: taskboard show 1
    Show { id: String },
    /// Create a task
    ///
    /// Example: taskboard add "Pay rent" --priority urgent --deadline 2025-12-31
    /// Example: taskboard add "Groceries" --tag home --item milk --item eggs
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// One of low, medium, high, urgent
        #[arg(long)]
        priority: Option<String>,
        #[arg(long = "category-id")]
        category_id: Option<i64>,
        /// RFC 3339 date-time or YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Checklist item text
        #[arg(long = "item")]
        items: Vec<String>,
    },
    /// Edit a task's fields
    ///
    /// Example: taskboard edit 1 --title "Pay rent today" --priority urgent
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        deadline: Option<String>,
    },
    /// Advance a task's status (pending, in-progress, completed, pending)
    ///
    /// Example: taskboard cycle 1
    Cycle { id: String },
    /// Toggle a checklist item
    ///
    /// Example: taskboard toggle 1 3
    Toggle { id: String, item_id: String },
    /// Delete a task
    ///
    /// Example: taskboard delete 1
    Delete { id: String },
    /// List categories
    ///
    /// Example: taskboard categories
    Categories,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    ApiBaseUrl,
    Theme,
    DefaultFilter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let field =
        canonicalize_flag_name(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match field.as_str() {
        "api_base_url" | "api_url" | "base_url" => ConfigOverrideTarget::ApiBaseUrl,
        "theme" => ConfigOverrideTarget::Theme,
        "default_filter" | "filter" => ConfigOverrideTarget::DefaultFilter,
        other => return Err(format!("unknown config field '{other}'")),
    };

    if value.is_empty() {
        return Err(format!("{field} override requires a value"));
    }

    Ok(ParsedConfigOverride { target, value })
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, ConfigOverrideTarget, parse_config_override};
    use clap::Parser;

    #[test]
    fn parse_config_override_canonicalizes_field_names() {
        let parsed = parse_config_override(" THEME = Noir ").unwrap();
        assert_eq!(parsed.target, ConfigOverrideTarget::Theme);
        assert_eq!(parsed.value, "Noir");

        let parsed = parse_config_override("api-base-url=http://tasks.local/api").unwrap();
        assert_eq!(parsed.target, ConfigOverrideTarget::ApiBaseUrl);
        assert_eq!(parsed.value, "http://tasks.local/api");

        let parsed = parse_config_override("Default Filter=urgent").unwrap();
        assert_eq!(parsed.target, ConfigOverrideTarget::DefaultFilter);
    }

    #[test]
    fn parse_config_override_keeps_equals_in_value() {
        let parsed = parse_config_override("api_base_url=http://h/api?x=1").unwrap();
        assert_eq!(parsed.value, "http://h/api?x=1");
    }

    #[test]
    fn parse_config_override_rejects_unknown_fields() {
        let err = parse_config_override("aliases.ls=value").unwrap_err();
        assert!(err.contains("unknown config field"));
    }

    #[test]
    fn parse_config_override_rejects_missing_equals() {
        let err = parse_config_override("theme").unwrap_err();
        assert!(err.contains("KEY=VALUE"));
    }

    #[test]
    fn parse_config_override_rejects_empty_key_and_value() {
        let err = parse_config_override(" = noir").unwrap_err();
        assert!(err.contains("cannot be empty"));

        let err = parse_config_override("theme=  ").unwrap_err();
        assert!(err.contains("requires a value"));
    }

    #[test]
    fn add_collects_repeated_tags_and_items() {
        let cli = Cli::try_parse_from([
            "taskboard", "add", "Groceries", "--tag", "home", "--tag", "errand", "--item",
            "milk", "--item", "eggs", "--json",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Command::Add {
                title, tags, items, ..
            } => {
                assert_eq!(title, "Groceries");
                assert_eq!(tags, vec!["home", "errand"]);
                assert_eq!(items, vec!["milk", "eggs"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn toggle_requires_item_id() {
        let err = Cli::try_parse_from(["taskboard", "toggle", "1"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
