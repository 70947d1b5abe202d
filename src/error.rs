use std::{fmt, io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not reach {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The page did not have the markup we expected, usually because the
    /// site changed its layout.
    #[error("missing {what} on {url}")]
    Scrape { what: &'static str, url: String },

    #[error("invalid selector {0}")]
    Selector(String),

    #[error("filesystem error at {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("chapter at {:?} is incomplete, failed pages: {}", .dir, PageList(.failed))]
    ChapterIncomplete {
        dir: PathBuf,
        failed: Vec<PageFailure>,
    },
}

impl Error {
    pub fn filesystem(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Error {
        let path = path.into();
        move |source| Error::Filesystem { path, source }
    }
}

/// A single image of a chapter that could not be fetched.
#[derive(Debug)]
pub struct PageFailure {
    /// 1-based position of the page, the same number its file would have had.
    pub page: usize,
    pub url: String,
    pub reason: String,
}

struct PageList<'a>(&'a [PageFailure]);

impl fmt::Display for PageList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", failure.page)?;
        }
        Ok(())
    }
}
