//! Core event types and async event sources for vedit.
//!
//! Keys are resolved once at the input boundary into the [`KeyEvent`] tagged
//! union; everything downstream matches on it instead of probing raw terminal
//! codes.

use std::fmt;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

// -------------------------------------------------------------------------------------------------
// Channel Policy
// -------------------------------------------------------------------------------------------------
// The event loop consumes a bounded mpsc channel sized by `EVENT_CHANNEL_CAP`. Producers (input
// task, tick source) await on `send`, so a slow consumer applies backpressure instead of dropping
// keystrokes.
// -------------------------------------------------------------------------------------------------
pub const EVENT_CHANNEL_CAP: usize = 8192;

pub const CTRL_A: u8 = 1;
pub const CTRL_C: u8 = 3;
pub const CTRL_E: u8 = 5;
pub const BACKSPACE_BS: u8 = 8;
pub const TAB: u8 = 9;
pub const CTRL_L: u8 = 12;
pub const ENTER: u8 = 13;
pub const CTRL_S: u8 = 19;
pub const ESCAPE: u8 = 27;
pub const BACKSPACE_DEL: u8 = 127;

/// Top-level event enum consumed by the central event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Input(InputEvent),
    /// Periodic tick used to refresh the status line clock.
    Tick,
    Shutdown,
}

/// Normalized input events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
}

/// Named keys that have no printable representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialKey {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
    Insert,
    Delete,
    F(u8),
}

impl SpecialKey {
    /// Numeric code reported for keys without a printable form. Values follow the classic
    /// curses `KEY_*` numbering so log lines and warnings stay stable across terminals.
    pub fn code(self) -> u32 {
        match self {
            SpecialKey::Down => 258,
            SpecialKey::Up => 259,
            SpecialKey::Left => 260,
            SpecialKey::Right => 261,
            SpecialKey::Home => 262,
            SpecialKey::Backspace => 263,
            SpecialKey::F(n) => 264 + u32::from(n),
            SpecialKey::Delete => 330,
            SpecialKey::Insert => 331,
            SpecialKey::PageDown => 338,
            SpecialKey::PageUp => 339,
            SpecialKey::End => 360,
        }
    }
}

/// A single discrete key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEvent {
    Printable(char),
    Special(SpecialKey),
    /// ASCII control code (Enter = 13, Escape = 27, Ctrl-C = 3, ...).
    ControlCode(u8),
}

impl KeyEvent {
    /// Numeric key code: the scalar value for printable keys, the control byte for control
    /// codes, and the curses-style code for special keys.
    pub fn code(&self) -> u32 {
        match self {
            KeyEvent::Printable(c) => u32::from(*c),
            KeyEvent::Special(k) => k.code(),
            KeyEvent::ControlCode(b) => u32::from(*b),
        }
    }

    /// Digit value for `0`-`9` printable keys.
    pub fn digit(&self) -> Option<u8> {
        match self {
            KeyEvent::Printable(c) => c.to_digit(10).map(|d| d as u8),
            _ => None,
        }
    }

    /// Human readable name used by "not implemented" warnings: printable keys quoted,
    /// everything else by numeric code.
    pub fn describe(&self) -> String {
        match self {
            KeyEvent::Printable(c) => format!("'{c}'"),
            other => format!("keycode {}", other.code()),
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyEvent::Printable(c) => write!(f, "{c}"),
            KeyEvent::Special(k) => write!(f, "<{k:?}>"),
            KeyEvent::ControlCode(ESCAPE) => write!(f, "<Esc>"),
            KeyEvent::ControlCode(ENTER) => write!(f, "<CR>"),
            KeyEvent::ControlCode(b) if *b < 32 => write!(f, "<C-{}>", char::from(b + b'@')),
            KeyEvent::ControlCode(b) => write!(f, "<0x{b:02x}>"),
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Async Event Sources
// -------------------------------------------------------------------------------------------------
// Every producer registers uniformly. Each source owns its task lifecycle and must terminate
// promptly once the channel is closed (consumer dropped).

/// Trait implemented by any async event producer. Implementors usually hold configuration and
/// spawn one background task that pushes `Event`s into the shared channel.
pub trait AsyncEventSource: Send + 'static {
    /// Stable identifier used for logging.
    fn name(&self) -> &'static str;
    /// Consume self and spawn the background task. Implementors stop when
    /// `tx.send(..).await` returns Err (channel closed).
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()>;
}

/// Registry of event sources spawned together at startup.
pub struct EventSourceRegistry {
    sources: Vec<Box<dyn AsyncEventSource>>,
}

impl Default for EventSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn register<S: AsyncEventSource>(&mut self, src: S) {
        self.sources.push(Box::new(src));
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Spawn all registered sources, returning their JoinHandles. Each source receives its own
    /// clone of `tx`; the caller drops its sender during shutdown so sources observe the closed
    /// channel and exit.
    pub fn spawn_all(&mut self, tx: &Sender<Event>) -> Vec<JoinHandle<()>> {
        // Drain so a second call cannot spawn duplicates.
        let mut out = Vec::with_capacity(self.sources.len());
        for src in self.sources.drain(..) {
            let name = src.name();
            tracing::info!(target: "runtime.events", source = name, "spawning event source");
            out.push(src.spawn(tx.clone()));
        }
        out
    }
}

/// Emits `Event::Tick` every configured interval (status line clock refresh).
pub struct TickEventSource {
    interval: std::time::Duration,
}

impl TickEventSource {
    pub fn new(interval: std::time::Duration) -> Self {
        Self { interval }
    }
}

impl AsyncEventSource for TickEventSource {
    fn name(&self) -> &'static str {
        "tick"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let dur = self.interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(dur);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(Event::Tick).await.is_err() {
                    break;
                }
            }
        })
    }
}


#[cfg(test)]
mod tests_async_sources {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::sync::mpsc;

    struct MockOnceSource;

    impl AsyncEventSource for MockOnceSource {
        fn name(&self) -> &'static str {
            "mock_once"
        }
        fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
            tokio::spawn(async move {
                let _ = tx
                    .send(Event::Input(InputEvent::Key(KeyEvent::Printable('j'))))
                    .await;
            })
        }
    }

    #[tokio::test]
    async fn registry_spawns_and_emits() {
        let (tx, mut rx) = mpsc::channel::<Event>(8);
        let mut reg = EventSourceRegistry::new();
        reg.register(MockOnceSource);
        reg.register(TickEventSource::new(Duration::from_millis(10)));
        assert_eq!(reg.len(), 2);
        let handles = reg.spawn_all(&tx);
        assert!(reg.is_empty(), "spawn_all drains the registry");

        let mut got_key = false;
        let mut got_tick = false;
        let start = std::time::Instant::now();
        while start.elapsed() < Duration::from_millis(200) && (!got_key || !got_tick) {
            if let Ok(Some(ev)) = tokio::time::timeout(Duration::from_millis(5), rx.recv()).await {
                match ev {
                    Event::Input(InputEvent::Key(_)) => got_key = true,
                    Event::Tick => got_tick = true,
                    _ => {}
                }
            }
        }
        assert!(got_key, "expected mock source to produce a key");
        assert!(got_tick, "expected tick source to emit tick events");

        drop(tx);
        drop(rx);
        for handle in handles {
            let _ = tokio::time::timeout(Duration::from_millis(20), handle).await;
        }
    }

    struct MockCloseSource {
        flag: Arc<AtomicBool>,
    }

    impl AsyncEventSource for MockCloseSource {
        fn name(&self) -> &'static str {
            "mock_close"
        }

        fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
            let flag = self.flag;
            tokio::spawn(async move {
                tx.closed().await;
                flag.store(true, Ordering::SeqCst);
            })
        }
    }

    #[tokio::test]
    async fn registry_sources_exit_on_channel_drop() {
        let (tx, rx) = mpsc::channel::<Event>(8);
        let mut reg = EventSourceRegistry::new();
        let flag = Arc::new(AtomicBool::new(false));
        reg.register(MockCloseSource { flag: flag.clone() });
        let handles = reg.spawn_all(&tx);

        drop(tx);
        drop(rx);

        for handle in handles {
            match tokio::time::timeout(Duration::from_millis(50), handle).await {
                Ok(join_res) => join_res.expect("source task should exit cleanly"),
                Err(_) => panic!("source task did not observe channel closure"),
            }
        }

        assert!(flag.load(Ordering::SeqCst));
    }
}
