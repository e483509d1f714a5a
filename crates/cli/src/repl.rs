//! Interactive REPL and line-by-line pipe mode.

use std::io::{self, BufRead};
use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::commands::build_repl_cmd;
use crate::format::{format_error, format_output, OutputMode};
use crate::parse::{parse_line, CliAction, MetaCommand};
use crate::state::SessionState;

const PROMPT: &str = "kvf> ";

fn history_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".kvf_history"))
}

/// Run one line. Returns `false` when the session should end.
///
/// `failed` is set when the line could not be parsed or executed.
fn run_line(state: &SessionState, line: &str, mode: OutputMode, failed: &mut bool) -> bool {
    match parse_line(line) {
        Ok(CliAction::Execute(cmd)) => match state.execute(cmd) {
            Ok(output) => {
                let formatted = format_output(&output, mode);
                if !formatted.is_empty() {
                    println!("{}", formatted);
                }
            }
            Err(e) => {
                *failed = true;
                eprintln!("{}", format_error(&e, mode));
            }
        },
        Ok(CliAction::Meta(MetaCommand::Quit)) => return false,
        Ok(CliAction::Meta(MetaCommand::Clear)) => {
            print!("\x1B[2J\x1B[1;1H");
        }
        Ok(CliAction::Meta(MetaCommand::Help { command })) => print_help(command.as_deref()),
        Err(e) => {
            *failed = true;
            eprintln!("(error) {}", e.trim_end());
        }
    }
    true
}

fn print_help(command: Option<&str>) {
    let mut cmd = build_repl_cmd();
    match command {
        Some(name) => match cmd.find_subcommand_mut(name) {
            Some(sub) => {
                let _ = sub.print_help();
            }
            None => eprintln!("(error) Unknown command: {}", name),
        },
        None => {
            let _ = cmd.print_help();
            println!("\nMeta-commands: help [COMMAND], clear, quit");
        }
    }
}

/// Interactive prompt with history.
pub fn run_repl(state: &SessionState, mode: OutputMode) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("(error) Failed to start line editor: {}", e);
            return;
        }
    };
    let history = history_path();
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    let mut failed = false;
    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);
                if !run_line(state, line, mode, &mut failed) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("(error) {}", e);
                break;
            }
        }
    }

    if let Some(path) = &history {
        let _ = editor.save_history(path);
    }
}

/// Execute stdin line by line. Returns the process exit code: 1 if any
/// line failed, 0 otherwise.
pub fn run_pipe(state: &SessionState, mode: OutputMode) -> i32 {
    let mut failed = false;
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("(error) {}", e);
                return 1;
            }
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if !run_line(state, line, mode, &mut failed) {
            break;
        }
    }
    i32::from(failed)
}
