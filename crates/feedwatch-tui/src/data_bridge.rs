//! Data bridge: connects the feed backend to TUI actions.
//!
//! Each visible screen owns one poller; its results arrive as actions on
//! the app's channel. Acknowledgments run as one-shot tasks.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use feedwatch_core::{
    DashboardData, FeedApi, MockFeedApi, PollConfig, PollGuard, PolledView, spawn_poller,
};

use crate::action::Action;

/// Start polling the data behind `view`. Dropping the guard stops it.
pub fn spawn_view_poller(
    view: PolledView,
    api: &MockFeedApi,
    poll: &PollConfig,
    root: &CancellationToken,
    action_tx: mpsc::UnboundedSender<Action>,
) -> PollGuard {
    let settings = poll.settings_for(view);
    let api = api.clone();
    debug!(view = view.name(), interval = ?settings.interval, "starting view poller");

    match view {
        PolledView::Dashboard => spawn_poller(
            view.name(),
            settings,
            root,
            move || {
                let api = api.clone();
                async move { DashboardData::fetch(&api).await.map(Arc::new) }
            },
            move |update| action_tx.send(Action::DashboardUpdated(update)).is_ok(),
        ),
        PolledView::Feeds => spawn_poller(
            view.name(),
            settings,
            root,
            move || {
                let api = api.clone();
                async move { api.get_feeds().await.map(Arc::new) }
            },
            move |update| action_tx.send(Action::FeedsUpdated(update)).is_ok(),
        ),
        PolledView::Alerts => spawn_poller(
            view.name(),
            settings,
            root,
            move || {
                let api = api.clone();
                async move { api.get_alerts().await.map(Arc::new) }
            },
            move |update| action_tx.send(Action::AlertsUpdated(update)).is_ok(),
        ),
    }
}

/// Acknowledge `alert_id` in the background and report the outcome.
pub fn spawn_acknowledge(
    api: &MockFeedApi,
    alert_id: String,
    root: &CancellationToken,
    action_tx: mpsc::UnboundedSender<Action>,
) {
    let api = api.clone();
    let cancel = root.clone();
    tokio::spawn(async move {
        let result = tokio::select! {
            () = cancel.cancelled() => return,
            result = api.acknowledge_alert(&alert_id) => result,
        };
        let error = match result {
            Ok(_) => {
                info!(alert_id = %alert_id, "alert acknowledged");
                None
            }
            Err(e) => {
                warn!(alert_id = %alert_id, error = %e, "acknowledge failed");
                Some(e.to_string())
            }
        };
        let _ = action_tx.send(Action::AcknowledgeFinished { alert_id, error });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedwatch_core::{ApiConfig, LatencyProfile, PollUpdate};

    fn api() -> MockFeedApi {
        MockFeedApi::new(&ApiConfig {
            latency: LatencyProfile::instant(),
            seed: Some(3),
            ..ApiConfig::default()
        })
    }

    #[tokio::test]
    async fn feeds_poller_delivers_loaded_update() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let root = CancellationToken::new();
        let _guard = spawn_view_poller(
            PolledView::Feeds,
            &api(),
            &PollConfig::default(),
            &root,
            tx,
        );

        match rx.recv().await {
            Some(Action::FeedsUpdated(PollUpdate::Loaded { data, .. })) => {
                assert_eq!(data.len(), 25);
            }
            other => panic!("unexpected {other:?}"),
        }
        root.cancel();
    }

    #[tokio::test]
    async fn acknowledge_reports_success() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let root = CancellationToken::new();
        spawn_acknowledge(&api(), "alert-004".into(), &root, tx);

        match rx.recv().await {
            Some(Action::AcknowledgeFinished { alert_id, error }) => {
                assert_eq!(alert_id, "alert-004");
                assert_eq!(error, None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
