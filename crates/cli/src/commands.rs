//! clap command tree shared by shell, REPL and pipe modes.

use clap::{Arg, ArgAction, Command};

/// Top-level command with global flags, used for shell mode.
pub fn build_cli() -> Command {
    let cmd = Command::new("kvf")
        .about("Command shell for a kvfacade keyspace")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print results as JSON"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("PATH")
                .help("TOML configuration file"),
        );
    add_subcommands(cmd)
}

/// Command used to parse one REPL or pipe line (no binary name).
pub fn build_repl_cmd() -> Command {
    let cmd = Command::new("kvf")
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true);
    add_subcommands(cmd)
}

fn add_subcommands(cmd: Command) -> Command {
    cmd.subcommand(
        Command::new("set")
            .about("Write a value, optionally expiring after --ttl milliseconds")
            .arg(Arg::new("key").required(true))
            .arg(Arg::new("value").required(true))
            .arg(
                Arg::new("ttl")
                    .long("ttl")
                    .value_name("MS")
                    .allow_negative_numbers(true)
                    .help("Expiry in milliseconds; zero or negative never expires"),
            ),
    )
    .subcommand(
        Command::new("mset")
            .about("Write several key/value pairs atomically")
            .arg(
                Arg::new("pairs")
                    .required(true)
                    .num_args(2..)
                    .value_name("KEY VALUE"),
            ),
    )
    .subcommand(
        Command::new("get")
            .about("Read one key")
            .arg(Arg::new("key").required(true)),
    )
    .subcommand(
        Command::new("mget")
            .about("Read several keys; missing keys print as empty")
            .arg(Arg::new("keys").required(true).num_args(1..)),
    )
    .subcommand(
        Command::new("del")
            .about("Delete keys")
            .arg(Arg::new("keys").required(true).num_args(1..)),
    )
    .subcommand(
        Command::new("scan")
            .about("List entries in key order")
            .arg(Arg::new("prefix").long("prefix").short('p'))
            .arg(Arg::new("offset").long("offset").short('o'))
            .arg(
                Arg::new("include-offset")
                    .long("include-offset")
                    .action(ArgAction::SetTrue)
                    .help("Also list the entry equal to --offset"),
            )
            .arg(
                Arg::new("keys-only")
                    .long("keys-only")
                    .short('k')
                    .action(ArgAction::SetTrue),
            )
            .arg(Arg::new("limit").long("limit").short('n')),
    )
    .subcommand(Command::new("purge").about("Reclaim expired and deleted entries"))
    .subcommand(Command::new("stats").about("Show engine counters"))
}
