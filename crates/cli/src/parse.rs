//! ArgMatches → KvCommand/MetaCommand conversion.
//!
//! Translates clap's parsed arguments into the appropriate action:
//! - Keyspace commands → `CliAction::Execute(KvCommand)`
//! - REPL meta-commands → `CliAction::Meta`
//!
//! Keys and values are taken as UTF-8 text. An argument starting with
//! `b64:` is decoded as base64 so binary data can be entered too.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::ArgMatches;

use crate::commands::build_repl_cmd;

/// A keyspace operation ready to run against the facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvCommand {
    Set {
        key: Vec<u8>,
        value: Vec<u8>,
        ttl_ms: i64,
    },
    MSet {
        pairs: Vec<(Vec<u8>, Vec<u8>)>,
    },
    Get {
        key: Vec<u8>,
    },
    MGet {
        keys: Vec<Vec<u8>>,
    },
    Del {
        keys: Vec<Vec<u8>>,
    },
    Scan {
        prefix: Vec<u8>,
        offset: Vec<u8>,
        include_offset: bool,
        keys_only: bool,
        limit: Option<usize>,
    },
    Purge,
    Stats,
}

/// The result of parsing user input.
#[derive(Debug)]
pub enum CliAction {
    /// A keyspace command to execute.
    Execute(KvCommand),
    /// A REPL-only meta-command.
    Meta(MetaCommand),
}

/// REPL meta-commands.
#[derive(Debug, PartialEq, Eq)]
pub enum MetaCommand {
    Help { command: Option<String> },
    Quit,
    Clear,
}

/// Check for REPL meta-commands before delegating to clap.
///
/// Returns `Some(MetaCommand)` if the line is a meta-command, `None` otherwise.
pub fn check_meta_command(line: &str) -> Option<MetaCommand> {
    let mut parts = line.split_whitespace();
    let cmd = parts.next()?;

    match cmd {
        "quit" | "exit" => Some(MetaCommand::Quit),
        "clear" => Some(MetaCommand::Clear),
        "help" => {
            let command = parts.next().map(str::to_string);
            Some(MetaCommand::Help { command })
        }
        _ => None,
    }
}

/// Parse one REPL or pipe line.
///
/// Meta-commands are recognized first; anything else is split with shell
/// quoting rules and handed to clap.
pub fn parse_line(line: &str) -> Result<CliAction, String> {
    if let Some(meta) = check_meta_command(line) {
        return Ok(CliAction::Meta(meta));
    }
    let args = shlex::split(line).ok_or_else(|| "Unbalanced quotes".to_string())?;
    let matches = build_repl_cmd()
        .try_get_matches_from(args)
        .map_err(|e| e.to_string())?;
    matches_to_action(&matches)
}

/// Decode one key or value argument.
pub fn parse_bytes(raw: &str) -> Result<Vec<u8>, String> {
    match raw.strip_prefix("b64:") {
        Some(encoded) => STANDARD
            .decode(encoded)
            .map_err(|e| format!("Invalid base64 in {:?}: {}", raw, e)),
        None => Ok(raw.as_bytes().to_vec()),
    }
}

/// Convert clap ArgMatches into a CliAction.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let (sub, m) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;

    let cmd = match sub {
        "set" => {
            let ttl_ms = m
                .get_one::<String>("ttl")
                .map(|s| s.parse::<i64>())
                .transpose()
                .map_err(|e| format!("Invalid ttl: {}", e))?
                .unwrap_or(0);
            KvCommand::Set {
                key: required_bytes(m, "key")?,
                value: required_bytes(m, "value")?,
                ttl_ms,
            }
        }
        "mset" => {
            let flat = many_bytes(m, "pairs")?;
            if flat.len() % 2 != 0 {
                return Err("mset expects KEY VALUE pairs".to_string());
            }
            let mut pairs = Vec::with_capacity(flat.len() / 2);
            let mut it = flat.into_iter();
            while let (Some(key), Some(value)) = (it.next(), it.next()) {
                pairs.push((key, value));
            }
            KvCommand::MSet { pairs }
        }
        "get" => KvCommand::Get {
            key: required_bytes(m, "key")?,
        },
        "mget" => KvCommand::MGet {
            keys: many_bytes(m, "keys")?,
        },
        "del" => KvCommand::Del {
            keys: many_bytes(m, "keys")?,
        },
        "scan" => {
            let limit = m
                .get_one::<String>("limit")
                .map(|s| s.parse::<usize>())
                .transpose()
                .map_err(|e| format!("Invalid limit: {}", e))?;
            KvCommand::Scan {
                prefix: optional_bytes(m, "prefix")?,
                offset: optional_bytes(m, "offset")?,
                include_offset: m.get_flag("include-offset"),
                keys_only: m.get_flag("keys-only"),
                limit,
            }
        }
        "purge" => KvCommand::Purge,
        "stats" => KvCommand::Stats,
        other => return Err(format!("Unknown command: {}", other)),
    };
    Ok(CliAction::Execute(cmd))
}

fn required_bytes(m: &ArgMatches, name: &str) -> Result<Vec<u8>, String> {
    let raw = m
        .get_one::<String>(name)
        .ok_or_else(|| format!("Missing argument: {}", name))?;
    parse_bytes(raw)
}

fn optional_bytes(m: &ArgMatches, name: &str) -> Result<Vec<u8>, String> {
    m.get_one::<String>(name)
        .map(|raw| parse_bytes(raw))
        .transpose()
        .map(Option::unwrap_or_default)
}

fn many_bytes(m: &ArgMatches, name: &str) -> Result<Vec<Vec<u8>>, String> {
    m.get_many::<String>(name)
        .into_iter()
        .flatten()
        .map(|raw| parse_bytes(raw))
        .collect()
}
