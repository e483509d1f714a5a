//! Session state: the facade a shell, REPL or pipe session runs against.

use kvfacade::{Entry, Error, KvFacade, ScanOutcome, StorageMetrics, Ttl};

use crate::parse::KvCommand;

/// Result of one executed command, before formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Ok,
    Nil,
    Value(Vec<u8>),
    Values(Vec<Vec<u8>>),
    Entries {
        entries: Vec<Entry>,
        outcome: ScanOutcome,
        keys_only: bool,
    },
    Purged(usize),
    Stats(StorageMetrics),
}

pub struct SessionState {
    kv: KvFacade,
}

impl SessionState {
    pub fn new(kv: KvFacade) -> Self {
        Self { kv }
    }

    pub fn execute(&self, cmd: KvCommand) -> Result<Output, Error> {
        tracing::trace!(?cmd, "executing");
        match cmd {
            KvCommand::Set { key, value, ttl_ms } => {
                self.kv.set(key, value, Ttl::from_millis(ttl_ms))?;
                Ok(Output::Ok)
            }
            KvCommand::MSet { pairs } => {
                self.kv.mset(pairs)?;
                Ok(Output::Ok)
            }
            KvCommand::Get { key } => match self.kv.get(key) {
                Ok(value) => Ok(Output::Value(value)),
                Err(e) if e.is_not_found() => Ok(Output::Nil),
                Err(e) => Err(e),
            },
            KvCommand::MGet { keys } => Ok(Output::Values(self.kv.mget(&keys))),
            KvCommand::Del { keys } => {
                self.kv.del(&keys)?;
                Ok(Output::Ok)
            }
            KvCommand::Scan {
                prefix,
                offset,
                include_offset,
                keys_only,
                limit,
            } => {
                let mut options = self
                    .kv
                    .scan_options()
                    .prefix(prefix)
                    .offset(offset)
                    .include_offset(include_offset);
                if keys_only {
                    options = options.keys_only();
                }
                if let Some(limit) = limit {
                    options = options.limit(limit);
                }

                let mut entries = Vec::new();
                let outcome = self.kv.scan(&options, |key, value| {
                    entries.push(Entry { key, value });
                    true
                })?;
                Ok(Output::Entries {
                    entries,
                    outcome,
                    keys_only: !options.fetch_values,
                })
            }
            KvCommand::Purge => Ok(Output::Purged(self.kv.purge_expired())),
            KvCommand::Stats => Ok(Output::Stats(self.kv.metrics())),
        }
    }
}
