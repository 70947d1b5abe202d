use console::Term;
use std::env;

/// Used when every probe fails.
pub const DEFAULT_SIZE: (usize, usize) = (80, 25);

/// Something that can tell the renderer how wide the terminal is right now.
pub trait TerminalMetrics: Send {
    /// Returns `(width, height)` in character cells. Never fails.
    fn size(&self) -> (usize, usize);

    fn width(&self) -> usize {
        self.size().0
    }
}

/// Probes stderr, then stdout, then the `COLUMNS`/`LINES` variables, and
/// finally falls back to [`DEFAULT_SIZE`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleMetrics;

impl TerminalMetrics for ConsoleMetrics {
    fn size(&self) -> (usize, usize) {
        Term::stderr()
            .size_checked()
            .or_else(|| Term::stdout().size_checked())
            .map(|(rows, cols)| (cols as usize, rows as usize))
            .or_else(from_env)
            .unwrap_or(DEFAULT_SIZE)
    }
}

fn from_env() -> Option<(usize, usize)> {
    let cols = env::var("COLUMNS").ok()?.trim().parse().ok()?;
    let lines = env::var("LINES").ok()?.trim().parse().ok()?;
    (cols > 0 && lines > 0).then_some((cols, lines))
}

/// A terminal that never changes size.
#[derive(Debug, Clone, Copy)]
pub struct FixedSize(pub usize, pub usize);

impl TerminalMetrics for FixedSize {
    fn size(&self) -> (usize, usize) {
        (self.0, self.1)
    }
}
