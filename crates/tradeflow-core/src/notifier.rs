//! Forwards workflow events to a running web server.
//!
//! CLI processes have their own event channel; this notifier relays what
//! they produce to `tradeflow serve` so connected dashboards refresh.

use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, warn};

use crate::config::DEFAULT_WEB_URL;
use tradeflow_store::{BroadcastReceiver, WorkflowEvent};

/// Notifies the web server of changes via HTTP.
#[derive(Clone)]
pub struct WebNotifier {
    client: reqwest::Client,
    base_url: String,
}

impl WebNotifier {
    /// Uses `TRADEFLOW_WEB_URL` if set, otherwise `http://127.0.0.1:3040`.
    pub fn new() -> Self {
        let base_url =
            std::env::var("TRADEFLOW_WEB_URL").unwrap_or_else(|_| DEFAULT_WEB_URL.to_string());
        Self::with_url(&base_url)
    }

    pub fn with_url(base_url: &str) -> Self {
        debug!(base_url = %base_url, "WebNotifier initialized");
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(2))
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/internal/notify", self.base_url)
    }

    /// POST one event to `/internal/notify`. Returns whether the server took it.
    pub async fn forward(&self, event: &WorkflowEvent) -> bool {
        let url = self.endpoint();
        debug!(url = %url, event = event.name(), "Forwarding workflow event");

        match self.client.post(&url).json(event).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(event = event.name(), "Workflow event forwarded");
                true
            }
            Ok(response) => {
                warn!(
                    event = event.name(),
                    status_code = %response.status(),
                    "Workflow event forward failed with status"
                );
                false
            }
            Err(e) => {
                debug!(
                    event = event.name(),
                    error = %e,
                    url = %url,
                    "Failed to forward workflow event (tradeflow serve may not be running)"
                );
                false
            }
        }
    }

    /// Forward everything queued on a receiver without waiting for more.
    pub async fn drain(&self, rx: &mut BroadcastReceiver) -> usize {
        let mut forwarded = 0;
        loop {
            match rx.try_recv() {
                Ok(event) => {
                    if self.forward(&event).await {
                        forwarded += 1;
                    } else {
                        // Server unreachable, skip the rest
                        break;
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event receiver lagged; sending a full refresh");
                    if self.forward(&WorkflowEvent::StoreRefresh).await {
                        forwarded += 1;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        forwarded
    }
}

impl Default for WebNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradeflow_store::create_broadcast_channel;

    #[test]
    fn test_endpoint() {
        let notifier = WebNotifier::with_url("http://localhost:3040/");
        assert_eq!(notifier.endpoint(), "http://localhost:3040/internal/notify");
    }

    #[tokio::test]
    async fn test_drain_stops_when_server_is_down() {
        // Port 9 (discard) is never an HTTP server
        let notifier = WebNotifier::with_url("http://127.0.0.1:9");
        let tx = create_broadcast_channel();
        let mut rx = tx.subscribe();
        tx.send(WorkflowEvent::StoreRefresh).unwrap();
        tx.send(WorkflowEvent::NotificationsChanged).unwrap();

        assert_eq!(notifier.drain(&mut rx).await, 0);
    }
}
