use clap::{Parser, Subcommand};
use tasklist_core::config::ConfigOverrides;
use tasklist_core::error::AppError;
use tasklist_core::model::Filter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Answer yes to confirmation prompts
    #[arg(long, global = true)]
    pub yes: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: tasklist add "Buy milk"
    Add {
        text: Option<String>,
    },
    /// Toggle a task between pending and completed
    ///
    /// Example: tasklist toggle 1
    Toggle {
        id: u64,
    },
    /// Delete a task
    ///
    /// Example: tasklist delete 1 --yes
    Delete {
        id: u64,
    },
    /// Delete every completed task
    ///
    /// Example: tasklist clear --yes
    Clear,
    /// Set the current filter (all, pending or completed)
    ///
    /// Example: tasklist filter pending
    Filter {
        filter: Filter,
    },
    /// List tasks matching the current filter
    ///
    /// Example: tasklist list
    /// Example: tasklist list completed
    List {
        filter: Option<Filter>,
    },
    /// Show task counters
    ///
    /// Example: tasklist stats
    Stats,
}

/// Flag name used to identify config override arguments in error messages.
pub const CONFIG_OVERRIDE_FLAG: &str = "--config-override";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    Notifications,
    Alias(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let (field, remainder) = match key_raw.split_once('.') {
        Some((field, rest)) => (field.trim(), Some(rest.trim())),
        None => (key_raw.trim(), None),
    };

    match field.to_ascii_lowercase().as_str() {
        "theme" => match remainder {
            Some(_) => Err("theme override cannot have subfields".to_string()),
            None => Ok(ParsedConfigOverride {
                target: ConfigOverrideTarget::Theme,
                value,
            }),
        },
        "notifications" => match remainder {
            Some(_) => Err("notifications override cannot have subfields".to_string()),
            None => Ok(ParsedConfigOverride {
                target: ConfigOverrideTarget::Notifications,
                value,
            }),
        },
        "aliases" | "alias" => {
            let alias_name = remainder
                .filter(|segment| !segment.is_empty())
                .ok_or_else(|| "aliases override requires an alias name".to_string())?;
            Ok(ParsedConfigOverride {
                target: ConfigOverrideTarget::Alias(alias_name.to_string()),
                value,
            })
        }
        "" => Err("override key cannot be empty".to_string()),
        other => Err(format!("unknown config field '{other}'")),
    }
}

/// Fold every `--config-override` occurrence into a single overrides value.
pub fn collect_overrides(raw_overrides: &[String]) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();

    for raw in raw_overrides {
        let parsed = parse_config_override(raw).map_err(|err| {
            AppError::invalid_input(format!("{CONFIG_OVERRIDE_FLAG} {raw}: {err}"))
        })?;

        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::Notifications => {
                let enabled = parse_bool_value(&parsed.value).map_err(|err| {
                    AppError::invalid_input(format!("{CONFIG_OVERRIDE_FLAG} {raw}: {err}"))
                })?;
                overrides.notifications = Some(enabled);
            }
            ConfigOverrideTarget::Alias(name) => {
                overrides.aliases.insert(name, parsed.value);
            }
        }
    }

    Ok(overrides)
}

fn parse_bool_value(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Ok(true),
        "false" | "off" | "0" | "no" => Ok(false),
        other => Err(format!("expected a boolean, got '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigOverrideTarget, collect_overrides, parse_config_override};

    #[test]
    fn parse_config_override_reads_theme() {
        let parsed = parse_config_override(" THEME = Ocean ").unwrap();

        assert_eq!(parsed.target, ConfigOverrideTarget::Theme);
        assert_eq!(parsed.value, "Ocean");
    }

    #[test]
    fn parse_config_override_reads_alias_names() {
        let parsed = parse_config_override("aliases. ls = list completed").unwrap();

        match parsed.target {
            ConfigOverrideTarget::Alias(alias) => assert_eq!(alias, "ls"),
            other => panic!("unexpected target: {other:?}"),
        }
        assert_eq!(parsed.value, "list completed");
    }

    #[test]
    fn parse_config_override_rejects_empty_alias_name() {
        let err = parse_config_override("aliases. = foo").unwrap_err();
        assert!(err.contains("aliases override requires an alias name"));
    }

    #[test]
    fn parse_config_override_rejects_unknown_fields() {
        let err = parse_config_override("unknown.field=value").unwrap_err();
        assert!(err.contains("unknown config field"));
    }

    #[test]
    fn parse_config_override_rejects_missing_equals() {
        let err = parse_config_override("themeocean").unwrap_err();
        assert!(err.contains("KEY=VALUE"));
    }

    #[test]
    fn collect_overrides_folds_every_flag() {
        let raw = [
            "theme=amber".to_string(),
            "notifications=off".to_string(),
            "alias.ls=list".to_string(),
        ];

        let overrides = collect_overrides(&raw).unwrap();

        assert_eq!(overrides.theme.as_deref(), Some("amber"));
        assert_eq!(overrides.notifications, Some(false));
        assert_eq!(overrides.aliases.get("ls").map(String::as_str), Some("list"));
    }

    #[test]
    fn collect_overrides_rejects_non_boolean_notifications() {
        let raw = ["notifications=loud".to_string()];
        let err = collect_overrides(&raw).unwrap_err();

        assert_eq!(err.code(), "invalid_input");
    }
}
