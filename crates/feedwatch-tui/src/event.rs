//! Terminal input pump.
//!
//! A background task turns crossterm's event stream into [`Event`]s and
//! interleaves a housekeeping tick. Redraws are driven by the app loop,
//! so there is no separate render timer.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Toast expiry and data-age labels.
    Tick,
}

pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    /// Start reading under `parent`; cancelling it stops the reader too.
    pub fn new(tick_rate: Duration, parent: &CancellationToken) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = parent.child_token();
        tokio::spawn(pump(tx, tick_rate, cancel.clone()));
        Self { rx, cancel }
    }

    /// `None` once the reader has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn pump(tx: mpsc::UnboundedSender<Event>, tick_rate: Duration, cancel: CancellationToken) {
    let mut stream = EventStream::new();
    let mut tick = tokio::time::interval(tick_rate);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,
            _ = tick.tick() => Event::Tick,
            next = stream.next() => match next {
                Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                    Event::Key(key)
                }
                Some(Ok(CrosstermEvent::Resize(cols, rows))) => Event::Resize(cols, rows),
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    debug!(error = %e, "terminal event read failed");
                    continue;
                }
                None => break,
            },
        };

        if tx.send(event).is_err() {
            break;
        }
    }
    debug!("event reader stopped");
}
