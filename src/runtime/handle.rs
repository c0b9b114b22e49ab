use std::sync::Arc;

use tokio::sync::{Mutex, broadcast, mpsc, oneshot};

use crate::{
    attendee::{AttendeeRecord, RosterCounts},
    checkin::Resolution,
    core::store::{RosterStore, StoreError},
    persist::{PersistError, RosterSink},
    sheet::{
        ExportError, ImportError,
        export::{self, ExportOutput},
        import,
    },
};

use super::events::RosterEvent;

#[derive(Debug)]
pub enum RuntimeError {
    Store(StoreError),
    Import(ImportError),
    Export(ExportError),
    ChannelClosed,
}

impl From<StoreError> for RuntimeError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ImportError> for RuntimeError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<ExportError> for RuntimeError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Bound of the save queue between the command loop and the save worker.
    /// A full queue rejects the incoming save; every save carries the full
    /// roster, so any later save covers whatever was rejected.
    pub persist_queue_bound: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            persist_queue_bound: 64,
        }
    }
}

pub struct RollcallHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<RosterEvent>,
}

impl Clone for RollcallHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    Import {
        bytes: Vec<u8>,
        resp: oneshot::Sender<Result<usize, RuntimeError>>,
    },
    Attempt {
        key: String,
        resp: oneshot::Sender<Resolution>,
    },
    Confirm {
        timestamp: String,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    Counts {
        resp: oneshot::Sender<RosterCounts>,
    },
    Records {
        resp: oneshot::Sender<Vec<AttendeeRecord>>,
    },
    Export {
        resp: oneshot::Sender<Result<ExportOutput, RuntimeError>>,
    },
    Shutdown {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
}

enum PersistMsg {
    Save { records: Vec<AttendeeRecord> },
    Shutdown { resp: oneshot::Sender<()> },
}

/// Spawns the single-writer roster loop and returns its handle.
///
/// The command queue is the serialization point: one import, check-in
/// attempt, confirm, or export executes at a time, so no race exists on the
/// present flag. Saves are fire-and-forget relative to the in-memory
/// mutation; the roster is updated synchronously and is never rolled back on
/// save failure.
pub fn spawn_rollcall(
    store: RosterStore,
    sink: Option<Box<dyn RosterSink>>,
    config: RuntimeConfig,
) -> RollcallHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(256);
    let (events_tx, _) = broadcast::channel::<RosterEvent>(1024);

    let (persist_tx_opt, mut durable_rx) = if let Some(sink) = sink {
        let (persist_tx, persist_rx) = mpsc::channel::<PersistMsg>(config.persist_queue_bound);
        let (durable_tx, durable_rx) = mpsc::unbounded_channel::<Result<(), PersistError>>();
        spawn_save_worker(sink, persist_rx, durable_tx);
        (Some(persist_tx), Some(durable_rx))
    } else {
        (None, None)
    };

    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut store = store;

        loop {
            if let Some(rx) = durable_rx.as_mut() {
                tokio::select! {
                    cmd = cmd_rx.recv() => {
                        let Some(cmd) = cmd else { break; };
                        if handle_command(cmd, &mut store, &events_tx_loop, persist_tx_opt.as_ref()).await {
                            break;
                        }
                    }
                    durable = rx.recv() => {
                        match durable {
                            Some(Ok(())) => {
                                let _ = events_tx_loop.send(RosterEvent::Saved);
                            }
                            Some(Err(err)) => {
                                log::warn!("roster save failed; in-memory state unaffected: {err:?}");
                                let _ = events_tx_loop.send(RosterEvent::SaveFailed);
                            }
                            None => {}
                        }
                    }
                }
            } else {
                let Some(cmd) = cmd_rx.recv().await else { break; };
                if handle_command(cmd, &mut store, &events_tx_loop, persist_tx_opt.as_ref()).await {
                    break;
                }
            }
        }
    });

    RollcallHandle { cmd_tx, events_tx }
}

impl RollcallHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<RosterEvent> {
        self.events_tx.subscribe()
    }

    /// Parses `bytes` and replaces the canonical roster with the result.
    ///
    /// Destructive: any previous check-in progress is discarded. On parse
    /// failure nothing is installed and the previous roster stays canonical.
    pub async fn import_roster(&self, bytes: Vec<u8>) -> Result<usize, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Import { bytes, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Classifies a scanned or typed key against the roster without mutating.
    pub async fn attempt_check_in(&self, key: impl Into<String>) -> Result<Resolution, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Attempt {
                key: key.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Marks the record for `timestamp` present and schedules a save.
    ///
    /// Idempotent: confirming an already-present record is an accepted no-op.
    pub async fn confirm_check_in(&self, timestamp: impl Into<String>) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Confirm {
                timestamp: timestamp.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Attendance totals for the canonical roster.
    pub async fn counts(&self) -> Result<RosterCounts, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Counts { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Clone of the canonical roster in insertion order.
    pub async fn records(&self) -> Result<Vec<AttendeeRecord>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Records { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Serializes the canonical roster to sheet bytes plus a summary.
    pub async fn export_roster(&self) -> Result<ExportOutput, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Export { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Drains pending saves and stops the loop.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }
}

async fn handle_command(
    cmd: Command,
    store: &mut RosterStore,
    events_tx: &broadcast::Sender<RosterEvent>,
    persist_tx: Option<&mpsc::Sender<PersistMsg>>,
) -> bool {
    match cmd {
        Command::Import { bytes, resp } => {
            let res = match import::read_roster(&bytes) {
                Ok(records) => {
                    let total = records.len();
                    store.replace_all(records);
                    enqueue_save(persist_tx, store);
                    let _ = events_tx.send(RosterEvent::Imported { total });
                    Ok(total)
                }
                Err(err) => Err(RuntimeError::Import(err)),
            };
            let _ = resp.send(res);
        }
        Command::Attempt { key, resp } => {
            let _ = resp.send(store.resolve(key.trim()));
        }
        Command::Confirm { timestamp, resp } => {
            let res = match store.confirm_check_in(&timestamp) {
                Ok(true) => {
                    enqueue_save(persist_tx, store);
                    let _ = events_tx.send(RosterEvent::CheckedIn { timestamp });
                    Ok(())
                }
                // Already present: same end state, nothing to persist.
                Ok(false) => Ok(()),
                Err(err) => Err(RuntimeError::Store(err)),
            };
            let _ = resp.send(res);
        }
        Command::Counts { resp } => {
            let _ = resp.send(store.counts());
        }
        Command::Records { resp } => {
            let _ = resp.send(store.records_cloned());
        }
        Command::Export { resp } => {
            let _ = resp.send(export::write_roster(store.records()).map_err(RuntimeError::Export));
        }
        Command::Shutdown { resp } => {
            let out = if let Some(tx) = persist_tx {
                let (done_tx, done_rx) = oneshot::channel();
                if tx.send(PersistMsg::Shutdown { resp: done_tx }).await.is_err() {
                    Err(RuntimeError::ChannelClosed)
                } else {
                    done_rx.await.map_err(|_| RuntimeError::ChannelClosed)
                }
            } else {
                Ok(())
            };
            let _ = resp.send(out);
            return true;
        }
    }

    false
}

fn spawn_save_worker(
    sink: Box<dyn RosterSink>,
    mut rx: mpsc::Receiver<PersistMsg>,
    durable_tx: mpsc::UnboundedSender<Result<(), PersistError>>,
) {
    let sink = Arc::new(Mutex::new(sink));
    tokio::spawn(async move {
        loop {
            let Some(msg) = rx.recv().await else { break };

            match msg {
                PersistMsg::Save { mut records } => {
                    // Coalesce queued saves: each carries the full roster, so
                    // only the newest needs to reach disk.
                    let mut pending_shutdown = None;
                    while let Ok(next) = rx.try_recv() {
                        match next {
                            PersistMsg::Save { records: newer } => records = newer,
                            PersistMsg::Shutdown { resp } => {
                                pending_shutdown = Some(resp);
                                break;
                            }
                        }
                    }

                    let sink_ref = Arc::clone(&sink);
                    let result = match tokio::task::spawn_blocking(move || {
                        let mut sink = sink_ref.blocking_lock();
                        sink.write_roster(&records)?;
                        sink.flush()
                    })
                    .await
                    {
                        Ok(inner) => inner,
                        Err(err) => Err(PersistError::Message(format!("join error: {err}"))),
                    };
                    let _ = durable_tx.send(result);

                    if let Some(resp) = pending_shutdown {
                        let _ = resp.send(());
                        break;
                    }
                }
                PersistMsg::Shutdown { resp } => {
                    let _ = resp.send(());
                    break;
                }
            }
        }
    });
}

/// Queues a best-effort save of the current roster.
///
/// A full or closed queue is logged and otherwise ignored: losing one save
/// must not fail an in-progress check-in, and in-memory state stays ahead of
/// whatever the store last accepted.
fn enqueue_save(persist_tx: Option<&mpsc::Sender<PersistMsg>>, store: &RosterStore) {
    let Some(tx) = persist_tx else {
        return;
    };
    let records = store.records_cloned();
    if let Err(err) = tx.try_send(PersistMsg::Save { records }) {
        log::warn!("roster save not queued; continuing without it: {err}");
    }
}
