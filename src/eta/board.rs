use super::Eta;
use console::style;
use std::{io, time::Duration};
use tokio::{sync::watch, task::JoinHandle};

/// Latest state published by the download loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub ticks: u64,
    pub label: String,
    pub detail: Option<String>,
}

impl Status {
    pub fn text(&self) -> String {
        match &self.detail {
            Some(detail) => format!("{} - {}", self.label, detail),
            None => self.label.clone(),
        }
    }
}

/// Decouples producing progress from drawing it.
///
/// The producer overwrites a single [`Status`] slot; a background task polls
/// that slot on a fixed interval and feeds it to an [`Eta`] until `ticks`
/// reaches `total`, then prints the done line.
pub struct StatusBoard {
    tx: watch::Sender<Status>,
    total: u64,
    renderer: JoinHandle<io::Result<()>>,
}

impl StatusBoard {
    pub const POLL: Duration = Duration::from_millis(100);

    pub fn spawn(total: u64, eta: Eta) -> Self {
        Self::spawn_with(total, eta, Self::POLL)
    }

    pub fn spawn_with(total: u64, eta: Eta, poll: Duration) -> Self {
        let (tx, rx) = watch::channel(Status::default());
        let renderer = tokio::spawn(render(eta, total, rx, poll));
        Self {
            tx,
            total,
            renderer,
        }
    }

    /// Moves to a new unit of work, clearing any detail text.
    pub fn start(&self, ticks: u64, label: impl Into<String>) {
        let label = label.into();
        self.tx.send_modify(|status| {
            status.ticks = ticks;
            status.label = label;
            status.detail = None;
        });
    }

    pub fn detail(&self, detail: impl Into<String>) {
        let detail = detail.into();
        self.tx.send_modify(|status| status.detail = Some(detail));
    }

    pub fn status(&self) -> Status {
        self.tx.borrow().clone()
    }

    /// Marks all work done and waits for the renderer to print its last line.
    pub async fn finish(self) -> io::Result<()> {
        let StatusBoard {
            tx,
            total,
            renderer,
        } = self;
        tx.send_modify(|status| status.ticks = total);
        match renderer.await {
            Ok(result) => result,
            Err(err) => Err(io::Error::new(io::ErrorKind::Other, err)),
        }
    }
}

async fn render(
    mut eta: Eta,
    total: u64,
    mut rx: watch::Receiver<Status>,
    poll: Duration,
) -> io::Result<()> {
    let mut interval = tokio::time::interval(poll);
    loop {
        interval.tick().await;
        let status = rx.borrow_and_update().clone();
        if status.ticks >= total {
            break;
        }
        let text = style(status.text()).green().for_stderr().to_string();
        if let Err(err) = eta.report(Some(status.ticks), &text) {
            tracing::debug!("could not draw progress: {}", err);
        }
        if rx.has_changed().is_err() {
            // The producer went away without finishing.
            return Ok(());
        }
    }
    eta.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eta::{terminal::FixedSize, tracker::tests::Captured, EtaOptions, Tracker};

    fn board(total: u64) -> (StatusBoard, Captured) {
        let out = Captured::default();
        let tracker = Tracker::new(
            total,
            EtaOptions {
                min_interval: Duration::ZERO,
                ..EtaOptions::default()
            },
        )
        .with_output(out.clone())
        .with_terminal(FixedSize(200, 50));
        let board = StatusBoard::spawn_with(total, tracker.into(), Duration::from_millis(5));
        (board, out)
    }

    #[test]
    fn status_text() {
        let mut status = Status {
            ticks: 0,
            label: "Downloading 1/4".into(),
            detail: None,
        };
        assert_eq!(status.text(), "Downloading 1/4");
        status.detail = Some("Extracting info".into());
        assert_eq!(status.text(), "Downloading 1/4 - Extracting info");
    }

    #[tokio::test]
    async fn start_clears_detail() {
        let (board, _) = board(3);
        board.start(0, "Downloading 1/3");
        board.detail("Extracting info");
        board.start(1, "Downloading 2/3");
        assert_eq!(
            board.status(),
            Status {
                ticks: 1,
                label: "Downloading 2/3".into(),
                detail: None,
            }
        );
    }

    #[tokio::test]
    async fn renders_until_finished() -> anyhow::Result<()> {
        let (board, out) = board(3);
        board.start(1, "Downloading 2/3");
        board.detail("Extracting info");
        tokio::time::sleep(Duration::from_millis(50)).await;
        board.finish().await?;

        let text = out.text();
        assert!(text.contains("33.3%"));
        assert!(text.contains("Downloading 2/3 - Extracting info"));
        assert!(text.ends_with("Done! (0:00)\n"));
        Ok(())
    }

    #[tokio::test]
    async fn empty_job_finishes_straight_away() -> anyhow::Result<()> {
        let (board, out) = board(0);
        board.finish().await?;
        assert_eq!(out.text(), "\r\rDone! (0:00)\n");
        Ok(())
    }
}
