//! Output rendering: redis-style human text or one JSON document per result.
//!
//! Bytes that are valid UTF-8 print as text. Anything else prints as
//! `b64:<base64>`, the same form the parser accepts, so output can be pasted
//! back in as input.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use kvfacade::Error;
use serde_json::{json, Value};

use crate::state::Output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Text form of raw bytes.
pub fn display_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => format!("b64:{}", STANDARD.encode(bytes)),
    }
}

fn quoted(bytes: &[u8]) -> String {
    format!("{:?}", display_bytes(bytes))
}

pub fn format_output(output: &Output, mode: OutputMode) -> String {
    match mode {
        OutputMode::Human => format_human(output),
        OutputMode::Json => to_json(output).to_string(),
    }
}

pub fn format_error(err: &Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Human => format!("(error) {}", err),
        OutputMode::Json => json!({ "error": err.to_string() }).to_string(),
    }
}

fn format_human(output: &Output) -> String {
    match output {
        Output::Ok => "OK".to_string(),
        Output::Nil => "(nil)".to_string(),
        Output::Value(v) => quoted(v),
        Output::Values(values) => {
            if values.is_empty() {
                return "(empty)".to_string();
            }
            values
                .iter()
                .enumerate()
                .map(|(i, v)| format!("{}) {}", i + 1, quoted(v)))
                .collect::<Vec<_>>()
                .join("\n")
        }
        Output::Entries {
            entries, keys_only, ..
        } => {
            if entries.is_empty() {
                return "(empty)".to_string();
            }
            entries
                .iter()
                .map(|e| {
                    if *keys_only {
                        quoted(&e.key)
                    } else {
                        format!("{} => {}", quoted(&e.key), quoted(&e.value))
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
        Output::Purged(n) => format!("(integer) {}", n),
        Output::Stats(m) => format!(
            "version: {}\ncommitted: {}\naborted: {}\nactive_transactions: {}\nlive_keys: {}",
            m.version, m.committed, m.aborted, m.active_transactions, m.live_keys
        ),
    }
}

fn to_json(output: &Output) -> Value {
    match output {
        Output::Ok => json!({ "ok": true }),
        Output::Nil => Value::Null,
        Output::Value(v) => json!(display_bytes(v)),
        Output::Values(values) => {
            Value::Array(values.iter().map(|v| json!(display_bytes(v))).collect())
        }
        Output::Entries {
            entries,
            outcome,
            keys_only,
        } => {
            let entries: Vec<Value> = entries
                .iter()
                .map(|e| {
                    if *keys_only {
                        json!({ "key": display_bytes(&e.key) })
                    } else {
                        json!({ "key": display_bytes(&e.key), "value": display_bytes(&e.value) })
                    }
                })
                .collect();
            json!({
                "entries": entries,
                "visited": outcome.visited,
                "stop": format!("{:?}", outcome.stop).to_lowercase(),
            })
        }
        Output::Purged(n) => json!({ "purged": n }),
        Output::Stats(m) => serde_json::to_value(m).unwrap_or(Value::Null),
    }
}
