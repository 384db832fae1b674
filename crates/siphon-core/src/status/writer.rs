use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use chrono::{DateTime, Utc};
use crossbeam_channel::Receiver;

use crate::chunk::WaitReason;
use crate::error::SiphonError;
use crate::types::Result;

/// Timestamp layout for persisted rows: fixed width, descending
/// precision, so offline tooling can sort rows chronologically with a
/// plain string sort.
const STATE_START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

const CHUNK_LOG_HEADER: &str = "Name,Offset,State,StateStartTime";

/// One observed transition awaiting persistence. Written once, never
/// mutated.
#[derive(Debug, Clone)]
pub(crate) struct ChunkWaitState {
    pub(crate) name: String,
    pub(crate) offset: i64,
    pub(crate) reason: WaitReason,
    pub(crate) wait_start: DateTime<Utc>,
}

/// Messages consumed by the writer thread.
pub(crate) enum LogMessage {
    Transition(ChunkWaitState),
    Close,
}

/// Creates the chunk log file and spawns the thread that owns it.
///
/// The file is created eagerly so that a job which explicitly asked for
/// chunk logging fails at startup when the log cannot be opened, instead
/// of silently degrading to no output.
pub(crate) fn spawn(log_path: PathBuf, pending: Receiver<LogMessage>) -> Result<JoinHandle<()>> {
    let file = File::create(&log_path).map_err(|source| SiphonError::LogCreate {
        path: log_path.clone(),
        source,
    })?;

    let handle = thread::Builder::new()
        .name("chunk-log-writer".to_string())
        .spawn(move || run(log_path, file, pending))
        .map_err(SiphonError::Io)?;
    Ok(handle)
}

/// Writer loop: sole writer to the log file for the job's lifetime.
/// Drains the queue until the close sentinel, then flushes and exits.
fn run(log_path: PathBuf, file: File, pending: Receiver<LogMessage>) {
    tracing::debug!(path = %log_path.display(), "chunk log writer started");

    let mut writer = BufWriter::new(file);
    if let Err(error) = writeln!(writer, "{CHUNK_LOG_HEADER}") {
        tracing::error!(%error, path = %log_path.display(), "failed to write chunk log header");
        return;
    }

    let mut rows: u64 = 0;
    for message in pending.iter() {
        match message {
            LogMessage::Transition(state) => {
                if let Err(error) = writeln!(
                    writer,
                    "{},{},{},{}",
                    state.name,
                    state.offset,
                    state.reason,
                    state.wait_start.format(STATE_START_TIME_FORMAT),
                ) {
                    tracing::error!(%error, path = %log_path.display(), "failed to append chunk log row");
                    return;
                }
                rows += 1;
            }
            LogMessage::Close => break,
        }
    }

    if let Err(error) = writer.flush() {
        tracing::error!(%error, path = %log_path.display(), "failed to flush chunk log");
    }
    tracing::debug!(path = %log_path.display(), rows, "chunk log writer stopped");
}
