use std::io::BufRead;

use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Forward stdin lines into `line_tx` from a dedicated OS thread.
///
/// A plain thread rather than `spawn_blocking`: a read blocked on stdin
/// would otherwise hold up runtime shutdown. The thread ends on EOF or when
/// the receiver is dropped (the next `blocking_send` fails).
pub(crate) fn spawn_stdin_forwarder(line_tx: mpsc::Sender<String>) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("stdin-forwarder".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if line_tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = ?e, "Failed to read stdin");
                        break;
                    }
                }
            }
            debug!("Stdin forwarder stopped");
        })?;

    Ok(())
}
