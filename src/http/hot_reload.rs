//! Hot-reload notifications.
//!
//! Browsers subscribe with `EventSource`; every published renderer produces a
//! `reload` event carrying its generation, and a heartbeat comment keeps idle
//! connections open.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::{self, Stream};
use tokio::sync::watch;

use crate::http::server::AppState;

/// One SSE event per renderer generation published after subscribing.
pub fn reload_events(
    changes: watch::Receiver<u64>,
) -> impl Stream<Item = Result<Event, Infallible>> + Send + 'static {
    stream::unfold(changes, |mut changes| async move {
        changes.changed().await.ok()?;
        let generation = *changes.borrow_and_update();
        let event = Event::default()
            .event("reload")
            .data(generation.to_string());
        Some((Ok(event), changes))
    })
}

pub async fn hot_reload_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!(generation = state.renderer.generation(), "Hot-reload client connected");
    Sse::new(reload_events(state.renderer.subscribe())).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_millis(state.heartbeat_ms))
            .text("heartbeat"),
    )
}
