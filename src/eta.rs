//! Progress line with a smoothed ETA, drawn on stderr.
//!
//! The line looks like
//! `  42.0% / 1:05 [========>           ] ETA: 1:30 | Downloading 21/50`.
//! [`Eta`] is the entry point: it is either a live [`Tracker`] or a no-op,
//! depending on the [`EtaOptions`] it was built with.

use std::{io, time::Duration};

mod board;
mod lines;
mod source;
mod terminal;
mod time;
mod tracker;
mod window;

pub use board::{Status, StatusBoard};
pub use lines::EtaLines;
pub use source::{ByteOffset, CountingReader, ProgressSource};
pub use terminal::{ConsoleMetrics, FixedSize, TerminalMetrics};
pub use time::pretty_time;
pub use tracker::Tracker;

/// How an [`Eta`] behaves. Build it once at startup and pass it down.
#[derive(Debug, Clone)]
pub struct EtaOptions {
    /// Produce no output at all.
    pub hidden: bool,
    /// Redraws closer together than this are skipped.
    pub min_interval: Duration,
    /// Number of samples the ETA is averaged over.
    pub window: usize,
    /// Cells in the `[===>   ]` bar, 0 for no bar.
    pub bar_width: usize,
    /// Only draw on every Nth call.
    pub modulo: Option<u64>,
    /// Redraw in place instead of printing one line per update.
    pub overwrite: bool,
}

impl Default for EtaOptions {
    fn default() -> Self {
        Self {
            hidden: false,
            min_interval: Duration::from_millis(200),
            window: 50,
            bar_width: 20,
            modulo: None,
            overwrite: true,
        }
    }
}

impl EtaOptions {
    /// `interactive` is whether stderr is attached to a terminal. Output is
    /// hidden when `hide` is set, or when nobody is watching and `show` was
    /// not asked for.
    pub fn resolve(hide: bool, show: bool, interactive: bool) -> Self {
        Self {
            hidden: hide || (!interactive && !show),
            min_interval: if interactive {
                Duration::from_millis(200)
            } else {
                Duration::from_millis(10_000)
            },
            ..Self::default()
        }
    }
}

/// A progress tracker that may be switched off.
pub enum Eta {
    Hidden,
    Shown(Box<Tracker>),
}

impl Eta {
    pub fn new(total: u64, options: EtaOptions) -> Self {
        if options.hidden {
            Eta::Hidden
        } else {
            Eta::Shown(Box::new(Tracker::new(total, options)))
        }
    }

    pub fn report(&mut self, current: Option<u64>, extra: &str) -> io::Result<()> {
        match self {
            Eta::Hidden => Ok(()),
            Eta::Shown(tracker) => tracker.report(current, extra),
        }
    }

    pub fn finish(self) -> io::Result<()> {
        match self {
            Eta::Hidden => Ok(()),
            Eta::Shown(tracker) => tracker.finish(),
        }
    }

    /// Only affects a shown tracker.
    pub fn with_source(self, source: ProgressSource) -> Self {
        match self {
            Eta::Hidden => Eta::Hidden,
            Eta::Shown(tracker) => Eta::Shown(Box::new(tracker.with_source(source))),
        }
    }
}

impl From<Tracker> for Eta {
    fn from(tracker: Tracker) -> Self {
        Eta::Shown(Box::new(tracker))
    }
}
