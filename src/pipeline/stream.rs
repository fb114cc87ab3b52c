// NDJSON event stream driver — one change event per line.
//
// This is the adapter that owns the connection to the event source when
// tiffin runs as a sidecar: something tails the store's change feed and
// pipes events in, one JSON object per line. Events for different
// documents carry no ordering requirement, so we process them with a
// bounded number of in-flight handlers rather than strictly in sequence.

use anyhow::Result;
use futures::stream::{self, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use super::handler::{handle_event, Outcome};
use crate::notify::Dispatcher;
use crate::store::ChangeEvent;

/// Default cap on concurrent handler invocations, matching the instance
/// cap the original deployment ran with.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Counters for one run of the stream driver.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamStats {
    pub processed: usize,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Lines that didn't parse as a ChangeEvent (logged and dropped).
    pub malformed: usize,
}

enum LineOutcome {
    Handled(Outcome),
    Malformed,
}

/// Consume NDJSON change events from `reader` until EOF, handling up to
/// `concurrency` events in flight at once. Blank lines are ignored;
/// malformed lines are logged and counted, never fatal.
pub async fn run_stream<R>(
    reader: R,
    topic: &str,
    dispatcher: &dyn Dispatcher,
    concurrency: usize,
) -> Result<StreamStats>
where
    R: AsyncBufRead + Unpin,
{
    let concurrency = concurrency.max(1);
    let lines = reader.lines();

    let line_stream = stream::unfold(lines, |mut lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((line, lines)),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Error reading event stream, stopping");
                None
            }
        }
    });

    let outcomes = line_stream
        .filter(|line| futures::future::ready(!line.trim().is_empty()))
        .map(|line| async move {
            match serde_json::from_str::<ChangeEvent>(&line) {
                Ok(event) => LineOutcome::Handled(handle_event(&event, topic, dispatcher).await),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed event line");
                    LineOutcome::Malformed
                }
            }
        })
        .buffer_unordered(concurrency);

    futures::pin_mut!(outcomes);

    let mut stats = StreamStats::default();
    while let Some(outcome) = outcomes.next().await {
        stats.processed += 1;
        match outcome {
            LineOutcome::Handled(Outcome::Sent(_)) => stats.sent += 1,
            LineOutcome::Handled(Outcome::Skipped) => stats.skipped += 1,
            LineOutcome::Handled(Outcome::Failed) => stats.failed += 1,
            LineOutcome::Malformed => stats.malformed += 1,
        }
    }

    info!(
        processed = stats.processed,
        sent = stats.sent,
        skipped = stats.skipped,
        failed = stats.failed,
        malformed = stats.malformed,
        "Event stream drained"
    );

    Ok(stats)
}
