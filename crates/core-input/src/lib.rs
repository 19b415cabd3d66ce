//! Terminal input: translates crossterm events into editor [`Event`]s and
//! forwards them from a background task.

mod async_service;
mod translate;

pub use async_service::AsyncInputShutdown;
pub use translate::{translate_event, translate_key};

use async_service::spawn_async_event_task;
use core_events::Event;
use tokio::task::JoinHandle;

/// Spawn the async input service backed by `crossterm::EventStream`.
///
/// Returns the `JoinHandle` for the background task alongside a shutdown handle
/// that can be used to request immediate termination.
pub fn spawn_async_input(
    sender: tokio::sync::mpsc::Sender<Event>,
) -> (JoinHandle<()>, AsyncInputShutdown) {
    spawn_async_event_task(sender)
}
