use super::{
    source::ProgressSource,
    terminal::{ConsoleMetrics, TerminalMetrics},
    time::{pretty_eta, pretty_time},
    window::EtaWindow,
    EtaOptions,
};
use console::{measure_text_width, truncate_str};
use std::{
    io::{self, Write},
    time::{Duration, Instant},
};

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Single-line progress meter with a smoothed time-remaining estimate.
pub struct Tracker {
    total: u64,
    options: EtaOptions,
    source: ProgressSource,
    started: Instant,
    history: EtaWindow,
    last_render: Option<Instant>,
    last_len: usize,
    spinner_pos: usize,
    calls: u64,
    last_step: u64,
    out: Box<dyn Write + Send>,
    terminal: Box<dyn TerminalMetrics>,
}

impl Tracker {
    /// Draws to stderr and sizes itself against the real terminal.
    pub fn new(total: u64, options: EtaOptions) -> Self {
        Self {
            total,
            history: EtaWindow::new(options.window),
            options,
            source: ProgressSource::default(),
            started: Instant::now(),
            last_render: None,
            last_len: 0,
            spinner_pos: 0,
            calls: 0,
            last_step: 0,
            out: Box::new(io::stderr()),
            terminal: Box::new(ConsoleMetrics),
        }
    }

    pub fn with_source(mut self, source: ProgressSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_output(mut self, out: impl Write + Send + 'static) -> Self {
        self.out = Box::new(out);
        self
    }

    pub fn with_terminal(mut self, terminal: impl TerminalMetrics + 'static) -> Self {
        self.terminal = Box::new(terminal);
        self
    }

    /// Fraction of the work done, clamped to `1.0`. An empty job counts as
    /// finished.
    pub fn pct(&self, current: u64) -> f64 {
        if current >= self.total {
            1.0
        } else {
            current as f64 / self.total as f64
        }
    }

    /// Records progress and redraws the line unless the call is skipped by
    /// `modulo` or falls inside the refresh-suppression window. Counters are
    /// advanced either way.
    pub fn report(&mut self, current: Option<u64>, extra: &str) -> io::Result<()> {
        self.calls += 1;
        let current = match (current, &self.source) {
            (Some(current), _) => current,
            (None, ProgressSource::Manual { step }) => self.last_step + step,
            (None, ProgressSource::Offset(offset)) => offset.get(),
        };
        self.last_step = current;

        if let Some(modulo) = self.options.modulo.filter(|&m| m > 0) {
            if self.calls % modulo != 0 {
                return Ok(());
            }
        }

        let now = Instant::now();
        let elapsed = match self.last_render {
            Some(last) if now.duration_since(last) < self.options.min_interval => {
                return Ok(());
            }
            Some(_) => now.duration_since(self.started),
            None => Duration::ZERO,
        };
        self.last_render = Some(now);

        let pct = self.pct(current);
        if let Some(remaining) = sample(elapsed, pct) {
            self.history.push(remaining);
        }

        let line = self.render_line(pct, elapsed, extra);
        let width = self.terminal.width();
        let line = truncate_str(&line, width, "");

        if self.options.overwrite {
            self.erase()?;
        }
        self.out.write_all(line.as_bytes())?;
        if self.options.overwrite {
            self.last_len = measure_text_width(&line);
        } else {
            self.out.write_all(b"\n")?;
        }

        self.spinner_pos = (self.spinner_pos + 1) % SPINNER.len();
        self.out.flush()
    }

    /// Clears the progress line and prints `Done! (<elapsed>)`.
    pub fn finish(mut self) -> io::Result<()> {
        if self.options.overwrite {
            self.erase()?;
        }
        let elapsed = self.started.elapsed();
        writeln!(self.out, "Done! ({})", pretty_time(elapsed))?;
        self.out.flush()
    }

    fn erase(&mut self) -> io::Result<()> {
        write!(self.out, "\r{}\r", " ".repeat(self.last_len))
    }

    fn render_line(&self, pct: f64, elapsed: Duration, extra: &str) -> String {
        let bar = match self.options.bar_width {
            0 => String::new(),
            width => {
                let completed = (width as f64 * pct) as usize;
                let left = width.saturating_sub(completed).saturating_sub(1);
                format!("[{}>{}] ", "=".repeat(completed), " ".repeat(left))
            }
        };
        let extra = if extra.is_empty() {
            String::new()
        } else {
            format!(" | {}", extra)
        };

        format!(
            "{:6.1}% {} {} {}ETA: {}{}",
            pct * 100.0,
            SPINNER[self.spinner_pos],
            pretty_time(elapsed),
            bar,
            pretty_eta(self.history.average()),
            extra
        )
    }
}

/// Instantaneous remaining-time estimate, only when it says something.
fn sample(elapsed: Duration, pct: f64) -> Option<Duration> {
    if pct <= 0.0 {
        return None;
    }
    let elapsed = elapsed.as_secs_f64();
    let remaining = elapsed / pct - elapsed;
    (remaining > 0.0).then(|| Duration::from_secs_f64(remaining))
}
