//! Configuration loading and parsing.
//!
//! Parses `vedit.toml` (or an override path provided by the binary). Every
//! section and field is optional; missing values take their defaults. Unknown
//! fields are ignored so older binaries tolerate newer files.
//!
//! ```toml
//! [clock]
//! mode = "24"          # "12" (default) or "24"
//! show_seconds = true
//! utc_offset_minutes = 120   # omit to follow the local time zone
//!
//! [editor]
//! log_contents = false
//!
//! [tick]
//! interval_ms = 1000
//! ```

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf, time::Duration};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "vedit.toml";
pub const MIN_TICK_INTERVAL_MS: u64 = 50;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockMode {
    #[default]
    #[serde(rename = "12")]
    TwelveHour,
    #[serde(rename = "24")]
    TwentyFourHour,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct ClockConfig {
    #[serde(default)]
    pub mode: ClockMode,
    #[serde(default)]
    pub show_seconds: bool,
    /// Fixed offset from UTC. When unset the local time zone is used.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct EditorConfig {
    /// When false, typed characters and line contents never reach the log.
    #[serde(default)]
    pub log_contents: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TickConfig {
    #[serde(default = "TickConfig::default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            interval_ms: Self::default_interval_ms(),
        }
    }
}

impl TickConfig {
    const fn default_interval_ms() -> u64 {
        1000
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub tick: TickConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
    pub source: Option<PathBuf>,
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    // Working directory first, then the platform config dir.
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("vedit").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                file,
                source: Some(path),
            })
        }
        Err(e) => {
            // Malformed file: keep running on defaults.
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    pub fn clock(&self) -> &ClockConfig {
        &self.file.clock
    }

    pub fn log_contents(&self) -> bool {
        self.file.editor.log_contents
    }

    /// Tick interval, clamped to [`MIN_TICK_INTERVAL_MS`].
    pub fn tick_interval(&self) -> Duration {
        let raw = self.file.tick.interval_ms;
        let ms = raw.max(MIN_TICK_INTERVAL_MS);
        if ms != raw {
            info!(target: "config", raw, clamped = ms, "tick_interval_clamped");
        }
        Duration::from_millis(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn capture<F: FnOnce()>(f: F) -> String {
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();
        with_default(subscriber, f);
        String::from_utf8(buffer.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.file, ConfigFile::default());
        assert_eq!(cfg.clock().mode, ClockMode::TwelveHour);
        assert_eq!(cfg.clock().utc_offset_minutes, None);
        assert!(!cfg.clock().show_seconds);
        assert!(!cfg.log_contents());
        assert_eq!(cfg.tick_interval(), Duration::from_millis(1000));
        assert!(cfg.source.is_none());
    }

    #[test]
    fn parses_all_sections() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "[clock]\nmode = \"24\"\nshow_seconds = true\nutc_offset_minutes = -300\n\
             [editor]\nlog_contents = true\n[tick]\ninterval_ms = 250\n",
        )
        .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.clock().mode, ClockMode::TwentyFourHour);
        assert!(cfg.clock().show_seconds);
        assert_eq!(cfg.clock().utc_offset_minutes, Some(-300));
        assert!(cfg.log_contents());
        assert_eq!(cfg.tick_interval(), Duration::from_millis(250));
        assert_eq!(cfg.source.as_deref(), Some(tmp.path()));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[clock]\nshow_seconds = true\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert!(cfg.clock().show_seconds);
        assert_eq!(cfg.clock().mode, ClockMode::TwelveHour);
        assert_eq!(cfg.file.tick, TickConfig::default());
    }

    #[test]
    fn malformed_file_falls_back_and_warns() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[clock\nmode = 7").unwrap();
        let path = tmp.path().to_path_buf();
        let mut cfg = None;
        let logs = capture(|| cfg = Some(load_from(Some(path)).unwrap()));
        assert_eq!(cfg.unwrap().file, ConfigFile::default());
        assert!(logs.contains("WARN config:"));
        assert!(logs.contains("config_parse_failed"));
    }

    #[test]
    fn invalid_clock_mode_is_a_parse_error() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[clock]\nmode = \"13\"\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert!(cfg.raw.is_none(), "falls back to defaults");
    }

    #[test]
    fn tick_interval_is_clamped_and_logged() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[tick]\ninterval_ms = 5\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let mut interval = Duration::ZERO;
        let logs = capture(|| interval = cfg.tick_interval());
        assert_eq!(interval, Duration::from_millis(MIN_TICK_INTERVAL_MS));
        assert!(logs.contains("INFO config:"));
        assert!(logs.contains("tick_interval_clamped"));
    }
}
