use super::{source::CountingReader, Eta, EtaOptions, ProgressSource};
use std::{
    fs::File,
    io::{self, BufRead, BufReader, Read},
    path::Path,
};

/// Reads a file line by line while the progress line tracks how far into
/// the file we are. Prints the done line once the input is exhausted.
pub struct EtaLines<R> {
    reader: BufReader<CountingReader<R>>,
    eta: Option<Eta>,
}

impl EtaLines<File> {
    pub fn open(path: impl AsRef<Path>, options: EtaOptions) -> io::Result<Self> {
        let file = File::open(path)?;
        let total = file.metadata()?.len();
        Ok(Self::new(file, Eta::new(total, options)))
    }
}

impl<R: Read> EtaLines<R> {
    /// `eta` should have been sized to the number of bytes `reader` will
    /// yield.
    pub fn new(reader: R, eta: Eta) -> Self {
        let reader = CountingReader::new(reader);
        let eta = eta.with_source(ProgressSource::Offset(reader.offset()));
        Self {
            reader: BufReader::new(reader),
            eta: Some(eta),
        }
    }
}

impl<R: Read> Iterator for EtaLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => self.eta.take().and_then(|eta| eta.finish().err()).map(Err),
            Ok(_) => {
                if let Some(eta) = self.eta.as_mut() {
                    if let Err(err) = eta.report(None, "") {
                        return Some(Err(err));
                    }
                }
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Some(Ok(line))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eta::{terminal::FixedSize, tracker::tests::Captured, Tracker};
    use std::{io::Write, time::Duration};

    #[test]
    fn yields_lines_and_finishes() -> anyhow::Result<()> {
        let data = b"first\r\nsecond\nthird";
        let out = Captured::default();
        let tracker = Tracker::new(
            data.len() as u64,
            EtaOptions {
                min_interval: Duration::ZERO,
                ..EtaOptions::default()
            },
        )
        .with_output(out.clone())
        .with_terminal(FixedSize(200, 50));

        let lines = EtaLines::new(&data[..], tracker.into()).collect::<io::Result<Vec<_>>>()?;
        assert_eq!(lines, ["first", "second", "third"]);

        let text = out.text();
        // The whole input fits in one buffer fill, so every report sees the end.
        assert!(text.contains("100.0%"));
        assert!(text.ends_with("Done! (0:00)\n"));
        Ok(())
    }

    #[test]
    fn opens_files() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "a")?;
        writeln!(file, "b")?;
        file.flush()?;

        let options = EtaOptions {
            hidden: true,
            ..EtaOptions::default()
        };
        let lines = EtaLines::open(file.path(), options)?.collect::<io::Result<Vec<_>>>()?;
        assert_eq!(lines, ["a", "b"]);
        Ok(())
    }
}
