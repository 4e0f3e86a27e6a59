// herald-core/src/services/dispatch/service.rs
//
// Bridges the event bus to the dispatcher: subscribes, spawns one dispatch
// task per received event, and on shutdown stops taking events while letting
// in-flight dispatches run to completion. An action performs a single remote
// mutation, so it is never aborted mid-flight.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::eventbus::EventBus;
use crate::services::dispatch::dispatcher::ActionDispatcher;

pub struct DispatchService {
    event_bus: Arc<EventBus>,
    dispatcher: Arc<ActionDispatcher>,
}

impl DispatchService {
    pub fn new(event_bus: Arc<EventBus>, dispatcher: Arc<ActionDispatcher>) -> Self {
        Self {
            event_bus,
            dispatcher,
        }
    }

    /// Consume fired events until the bus shuts down or closes. Events from
    /// distinct channels dispatch concurrently; nothing is shared between
    /// their tasks but the dispatcher itself.
    pub async fn start(&self) {
        let mut rx = self.event_bus.subscribe(None).await;
        let mut shutdown_rx = self.event_bus.shutdown_rx.clone();
        let mut in_flight = Vec::new();

        info!("DispatchService: started, listening for channel events");

        loop {
            tokio::select! {
                maybe_event = rx.recv() => {
                    match maybe_event {
                        Some(event) => {
                            let dispatcher = Arc::clone(&self.dispatcher);
                            in_flight.push(tokio::spawn(async move {
                                match dispatcher.dispatch(&event).await {
                                    Ok(report) => {
                                        let failed = report.failures().count();
                                        if failed > 0 {
                                            warn!(
                                                "DispatchService: {}/{} action(s) failed for {} {} on channel {}",
                                                failed,
                                                report.len(),
                                                event.platform,
                                                event.kind,
                                                event.channel_id
                                            );
                                        }
                                    }
                                    Err(e) => {
                                        error!(
                                            "DispatchService: could not dispatch {} {} on channel {}: {:?}",
                                            event.platform, event.kind, event.channel_id, e
                                        );
                                    }
                                }
                            }));
                            in_flight.retain(|handle| !handle.is_finished());
                        }
                        None => {
                            info!("DispatchService: event channel closed");
                            break;
                        }
                    }
                },
                Ok(_) = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("DispatchService: shutdown signal received");
                        break;
                    }
                },
            }
        }

        // Let dispatches that already started finish.
        for handle in in_flight {
            let _ = handle.await;
        }
        info!("DispatchService: stopped");
    }
}
