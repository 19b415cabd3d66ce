//! vedit entrypoint.
use anyhow::Result;
use clap::Parser;
use core_actions::Engine;
use core_config::{Config, load_from};
use core_events::{EVENT_CHANNEL_CAP, Event, EventSourceRegistry, InputEvent, TickEventSource};
use core_terminal::{CrosstermBackend, CrosstermScreen, TerminalBackend};
use core_text::Buffer;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{Instrument, error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE_NAME: &str = "vedit.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "vedit", version, about = "A small modal text editor")]
struct Args {
    /// File to open at startup. A missing file is created on first write.
    pub path: Option<PathBuf>,
    /// Configuration file path (overrides discovery of `vedit.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

struct RuntimeContext<'a> {
    args: Args,
    config: Config,
    terminal_guard: core_terminal::TerminalGuard<'a>,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
    }

    fn run<'a>(&'a mut self) -> Result<RuntimeContext<'a>> {
        self.configure_logging()?;
        Self::install_panic_hook();

        let args = Args::parse();
        let config = load_from(args.config.clone())?;
        info!(
            target: "runtime",
            path = args.path.as_ref().map(|p| p.display().to_string()).as_deref(),
            config = config.source.as_ref().map(|p| p.display().to_string()).as_deref(),
            "startup"
        );

        self.backend.set_title("vedit")?;
        let terminal_guard = self.backend.enter_guard()?;
        Ok(RuntimeContext {
            args,
            config,
            terminal_guard,
        })
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE_NAME);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .with_ansi(false)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    StopRequested,
    ShutdownEvent,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::StopRequested => "stop_requested",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn log_shutdown_stage(reason: ShutdownReason, stage: &'static str) {
    info!(
        target: "runtime.shutdown",
        reason = reason.as_str(),
        stage = stage,
        "shutdown_stage"
    );
}

struct EditorRuntime<'a> {
    engine: Engine<Buffer, CrosstermScreen>,
    rx: mpsc::Receiver<Event>,
    tx: Option<mpsc::Sender<Event>>,
    source_handles: Vec<tokio::task::JoinHandle<()>>,
    input_task: Option<tokio::task::JoinHandle<()>>,
    input_shutdown: Option<core_input::AsyncInputShutdown>,
    _terminal_guard: core_terminal::TerminalGuard<'a>,
}

impl<'a> EditorRuntime<'a> {
    fn new(context: RuntimeContext<'a>) -> Self {
        let RuntimeContext {
            args,
            config,
            terminal_guard,
        } = context;

        let (cols, rows) = CrosstermBackend::size();
        let tick_interval = config.tick_interval();
        let mut engine = Engine::new(Buffer::new(), CrosstermScreen::new(cols, rows), config);
        engine.handle_load(args.path.as_deref());

        let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
        let mut registry = EventSourceRegistry::new();
        registry.register(TickEventSource::new(tick_interval));
        let source_handles = registry.spawn_all(&tx);
        let (input_task, input_shutdown) = core_input::spawn_async_input(tx.clone());

        Self {
            engine,
            rx,
            tx: Some(tx),
            source_handles,
            input_task: Some(input_task),
            input_shutdown: Some(input_shutdown),
            _terminal_guard: terminal_guard,
        }
    }

    async fn run(&mut self) -> Result<()> {
        let loop_span = tracing::debug_span!(target: "runtime", "event_loop");
        let shutdown_reason = self.event_loop().instrument(loop_span).await;
        self.rx.close();
        self.finalize_shutdown(shutdown_reason).await;
        Ok(())
    }

    async fn event_loop(&mut self) -> ShutdownReason {
        while let Some(event) = self.rx.recv().await {
            match event {
                Event::Input(InputEvent::Key(key)) => self.engine.handle_key_event(key),
                Event::Input(InputEvent::Resize(cols, rows)) => {
                    self.engine.handle_resize(cols, rows)
                }
                Event::Tick => self.engine.handle_tick(),
                Event::Shutdown => return ShutdownReason::ShutdownEvent,
            }
            if self.engine.stop_requested() {
                return ShutdownReason::StopRequested;
            }
        }
        ShutdownReason::ChannelClosed
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        log_shutdown_stage(reason, "begin");
        if let Some(tx) = self.tx.take() {
            trace!(target: "runtime.shutdown", %reason, "dropping_runtime_sender");
            drop(tx);
        }

        while let Some(handle) = self.source_handles.pop() {
            match tokio::time::timeout(Duration::from_millis(200), handle).await {
                Ok(Ok(_)) => trace!(target: "runtime.shutdown", %reason, "event_source_task_stopped"),
                Ok(Err(err)) if err.is_cancelled() => {
                    trace!(target: "runtime.shutdown", %reason, "event_source_task_cancelled")
                }
                Ok(Err(err)) => {
                    error!(target: "runtime.shutdown", %reason, ?err, "event_source_task_error")
                }
                Err(_) => warn!(target: "runtime.shutdown", %reason, "event_source_task_timeout"),
            }
        }

        if let Some(shutdown) = self.input_shutdown.take() {
            trace!(target: "runtime.shutdown", %reason, "input_task_shutdown_signal");
            shutdown.signal();
        }

        if let Some(handle) = self.input_task.take() {
            match handle.await {
                Ok(_) => trace!(target: "runtime.shutdown", %reason, "input_task_joined"),
                Err(err) if err.is_cancelled() => {
                    trace!(target: "runtime.shutdown", %reason, "input_task_cancelled")
                }
                Err(err) => error!(target: "runtime.shutdown", %reason, ?err, "input_task_join_failed"),
            }
        }

        log_shutdown_stage(reason, "complete");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    let context = startup.run()?;
    let mut runtime = EditorRuntime::new(context);
    let result = runtime.run().await;
    drop(runtime);
    info!(target: "runtime", "exit");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_accept_path_and_config() {
        let args = Args::try_parse_from(["vedit", "notes.txt", "--config", "alt.toml"]).unwrap();
        assert_eq!(args.path, Some(PathBuf::from("notes.txt")));
        assert_eq!(args.config, Some(PathBuf::from("alt.toml")));
    }

    #[test]
    fn args_allow_no_file() {
        let args = Args::try_parse_from(["vedit"]).unwrap();
        assert!(args.path.is_none());
        assert!(args.config.is_none());
    }

    #[test]
    fn shutdown_reasons_have_stable_names() {
        assert_eq!(ShutdownReason::StopRequested.to_string(), "stop_requested");
        assert_eq!(ShutdownReason::ChannelClosed.as_str(), "channel_closed");
    }
}
