use crate::translate::translate_event;
use core_events::{Event, InputEvent, KeyEvent};
use crossterm::event::{Event as CEvent, EventStream};
use std::io;
use std::sync::Arc;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task;
use tokio_stream::StreamExt;
use tracing::{Instrument, info, trace, warn};

#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

#[derive(Clone, Debug)]
struct ShutdownListener {
    notify: Arc<Notify>,
}

impl ShutdownListener {
    fn new_pair() -> (AsyncInputShutdown, Self) {
        let notify = Arc::new(Notify::new());
        (
            AsyncInputShutdown {
                notify: notify.clone(),
            },
            ShutdownListener { notify },
        )
    }

    async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// Spawn a Tokio task that forwards terminal events from `EventStream`.
pub(crate) fn spawn_async_event_task(
    sender: Sender<Event>,
) -> (task::JoinHandle<()>, AsyncInputShutdown) {
    let (shutdown, listener) = ShutdownListener::new_pair();
    let handle = spawn_in_span(AsyncEventStreamTask::new(sender, EventStream::new(), listener));
    (handle, shutdown)
}

fn spawn_in_span<S>(task: AsyncEventStreamTask<S>) -> task::JoinHandle<()>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    let span = tracing::debug_span!(target: "input.thread", "input_async_task");
    task::spawn(task.run().instrument(span))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitReason {
    ShutdownSignal,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl ExitReason {
    fn as_str(&self) -> &'static str {
        match self {
            ExitReason::ShutdownSignal => "shutdown_signal",
            ExitReason::ChannelClosed => "channel_closed",
            ExitReason::StreamEnded => "stream_ended",
            ExitReason::StreamError => "stream_error",
        }
    }
}

struct AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    sender: Sender<Event>,
    stream: S,
    shutdown: ShutdownListener,
}

impl<S> AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    fn new(sender: Sender<Event>, stream: S, shutdown: ShutdownListener) -> Self {
        Self {
            sender,
            stream,
            shutdown,
        }
    }

    async fn run(mut self) {
        info!(target: "input.thread", "async_input_task_started");
        let reason = loop {
            let result = tokio::select! {
                biased;
                _ = self.shutdown.wait() => break ExitReason::ShutdownSignal,
                result = self.stream.next() => result,
            };

            let event = match result {
                None => break ExitReason::StreamEnded,
                Some(Err(err)) => {
                    warn!(target: "input.thread", error_kind = ?err.kind(), "async_input_task_stream_error");
                    break ExitReason::StreamError;
                }
                Some(Ok(raw)) => raw,
            };

            let Some(event) = translate_event(event) else {
                continue;
            };
            log_event(&event);
            if self.sender.send(event).await.is_err() {
                break ExitReason::ChannelClosed;
            }
        };
        info!(target: "input.thread", reason = reason.as_str(), "async_input_task_stopped");
    }
}

/// Key contents are never logged here; the engine decides whether they may be.
fn log_event(event: &Event) {
    match event {
        Event::Input(InputEvent::Key(key)) => {
            let kind = match key {
                KeyEvent::Printable(_) => "printable",
                KeyEvent::Special(_) => "special",
                KeyEvent::ControlCode(_) => "control",
            };
            trace!(target: "input.event", kind, "key");
        }
        Event::Input(InputEvent::Resize(w, h)) => {
            trace!(target: "input.event", w, h, "resize");
        }
        _ => {}
    }
}
