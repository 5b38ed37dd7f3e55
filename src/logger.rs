//! Logging setup and boxed banner output.
//!
//! Log lines go through `tracing`; [`setup_logging`] installs a formatter that
//! tags every event with the file and line it came from. The `box_*` helpers
//! build the framed banners printed between build stages:
//!
//! ```text
//! ╔═══════════════╗
//! ║ STAGE: clone  ║
//! ╚═══════════════╝
//! ```

use anyhow::Result;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer as _;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Smallest box that still has room for its borders
const MIN_BOX_WIDTH: usize = 4;

/// Log levels as named in build configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Verbose,
    Debug,
    Silly,
}

impl LogLevel {
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::ERROR,
            Self::Warn => LevelFilter::WARN,
            Self::Info => LevelFilter::INFO,
            Self::Verbose | Self::Debug => LevelFilter::DEBUG,
            Self::Silly => LevelFilter::TRACE,
        }
    }
}

/// Install the global subscriber. `RUST_LOG` overrides `level`.
pub fn setup_logging(level: LogLevel, use_color: bool) -> Result<()> {
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let format = tracing_subscriber::fmt::format()
        .with_timer(timer)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(use_color);
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(level.level_filter().into())
        .from_env()?;
    let subscriber = tracing_subscriber::fmt::layer()
        .with_ansi(use_color)
        .event_format(format)
        .with_filter(filter);
    tracing_subscriber::registry().with(subscriber).try_init()?;
    tracing::info!("Log level set to {level:?}, color: {use_color}");
    Ok(())
}

// -----------------------------------------------------------------------------
// Boxes

pub fn box_top(width: usize) -> String {
    border('╔', '═', '╗', width)
}

pub fn box_separator(width: usize) -> String {
    border('╟', '─', '╢', width)
}

pub fn box_bottom(width: usize) -> String {
    border('╚', '═', '╝', width)
}

/// Word-wrap `text` into framed rows, padding each row with `padchar`.
pub fn boxed_lines(text: &str, width: usize, padchar: char) -> Vec<String> {
    let content_width = width.max(MIN_BOX_WIDTH) - 4;

    let mut rows = Vec::new();
    let mut row = String::new();
    for word in text.split(' ') {
        let row_len = row.chars().count();
        if row_len > 0 && row_len + word.chars().count() + 1 > content_width {
            rows.push(std::mem::take(&mut row));
        }
        row.push_str(word);
        row.push(' ');
    }
    rows.push(row);

    rows.iter()
        .map(|row| format!("║ {} ║", pad(row.trim_end(), content_width, padchar)))
        .collect()
}

/// A complete box around `text`. A width of 0 sizes the box to fit.
pub fn render_box(text: &str, width: usize) -> Vec<String> {
    let width = if width == 0 {
        text.chars().count() + 5
    } else {
        width.max(MIN_BOX_WIDTH)
    };
    let mut lines = vec![box_top(width)];
    lines.extend(boxed_lines(text, width, ' '));
    lines.push(box_bottom(width));
    lines
}

/// Log a box around `text`, one event per line.
pub fn write_box(text: &str, width: usize, level: LogLevel) {
    for line in render_box(text, width) {
        emit(level, &line);
    }
}

fn emit(level: LogLevel, line: &str) {
    match level {
        LogLevel::Error => tracing::error!("{line}"),
        LogLevel::Warn => tracing::warn!("{line}"),
        LogLevel::Info => tracing::info!("{line}"),
        LogLevel::Verbose | LogLevel::Debug => tracing::debug!("{line}"),
        LogLevel::Silly => tracing::trace!("{line}"),
    }
}

fn border(left: char, fill: char, right: char, width: usize) -> String {
    let inner = width.max(MIN_BOX_WIDTH) - 2;
    let mut line = String::with_capacity((inner + 2) * fill.len_utf8());
    line.push(left);
    line.extend(std::iter::repeat_n(fill, inner));
    line.push(right);
    line
}

fn pad(value: &str, width: usize, padchar: char) -> String {
    let len = value.chars().count();
    let mut padded = value.to_string();
    padded.extend(std::iter::repeat_n(padchar, width.saturating_sub(len)));
    padded
}
