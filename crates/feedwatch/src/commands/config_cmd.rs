//! Config subcommand handlers.

use std::path::Path;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Helpers ─────────────────────────────────────────────────────────

fn render_toml(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# failed to render config: {e}"))
}

/// Read the file as a raw TOML table, or the defaults when it is missing.
fn read_table(path: &Path) -> Result<toml::Table, CliError> {
    if path.exists() {
        let contents = std::fs::read_to_string(path)?;
        return contents
            .parse::<toml::Table>()
            .map_err(|e| CliError::ConfigInvalid {
                field: "file".into(),
                reason: e.to_string(),
                path: path.display().to_string(),
            });
    }
    match toml::Value::try_from(Config::default()) {
        Ok(toml::Value::Table(table)) => Ok(table),
        Ok(_) => Ok(toml::Table::new()),
        Err(e) => Err(CliError::ConfigWrite(e.to_string())),
    }
}

/// Interpret a CLI string as the most specific TOML scalar.
fn parse_value(raw: &str) -> toml::Value {
    if let Ok(b) = raw.parse::<bool>() {
        return toml::Value::Boolean(b);
    }
    if let Ok(n) = raw.parse::<i64>() {
        return toml::Value::Integer(n);
    }
    toml::Value::String(raw.to_owned())
}

/// Write `value` at the dot-separated `key`, creating sections on the way.
fn set_key(table: &mut toml::Table, key: &str, value: toml::Value) -> Result<(), CliError> {
    let invalid = |reason: &str| CliError::Validation {
        field: key.into(),
        reason: reason.into(),
    };

    let mut parts: Vec<&str> = key.split('.').collect();
    let Some(leaf) = parts.pop().filter(|leaf| !leaf.is_empty()) else {
        return Err(invalid("key must not be empty"));
    };

    let mut current = table;
    for part in parts {
        let entry = current
            .entry(part)
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        current = entry
            .as_table_mut()
            .ok_or_else(|| invalid(&format!("'{part}' is not a section")))?;
    }
    current.insert(leaf.to_owned(), value);
    Ok(())
}

/// Apply `key = value` to `table` and check the result is a valid config.
fn apply_set(mut table: toml::Table, key: &str, raw: &str) -> Result<Config, CliError> {
    set_key(&mut table, key, parse_value(raw))?;
    let cfg: Config = toml::Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| CliError::Validation {
            field: key.into(),
            reason: e.to_string(),
        })?;
    cfg.validate()?;
    Ok(cfg)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let path = config::config_path();
            if path.exists()
                && !util::confirm(
                    &format!("{} exists. Overwrite with defaults?", path.display()),
                    "config init",
                    global.yes,
                )?
            {
                return Ok(());
            }
            config::save_config(&Config::default())?;
            if !global.quiet {
                eprintln!("Wrote default configuration to {}", path.display());
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::resolve_config()?;
            let out = output::render_single(&global.output, &cfg, render_toml, render_toml);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let path = config::config_path();
            let cfg = apply_set(read_table(&path)?, &key, &value)?;
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Set {key} = {value}");
            }
            Ok(())
        }
    }
}
