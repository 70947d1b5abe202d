use crate::{
    error::{Error, PageFailure, Result},
    eta::StatusBoard,
    naming::sanitize,
    scrape,
    site::Fetch,
};
use futures::future::join_all;
use std::{
    fs::{self, create_dir_all},
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Instant,
};

/// Left in a chapter directory when some of its pages could not be fetched.
pub const INCOMPLETE_MARKER: &str = ".incomplete";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// 1-based position in the title's chapter list, oldest first.
    pub number: usize,
    pub title: String,
    pub link: String,
}

impl Chapter {
    pub fn new(number: usize, title: String, link: String) -> Self {
        Self {
            number,
            title,
            link,
        }
    }

    /// `0007 - Some title`
    pub fn dir_name(&self) -> String {
        format!("{:04} - {}", self.number, sanitize(&self.title))
    }

    pub async fn download(
        &self,
        site: &impl Fetch,
        root: &Path,
        board: &StatusBoard,
    ) -> Result<PathBuf> {
        let path = root.join(self.dir_name());
        create_dir(&path)?;
        fetch_chapter_images(site, &self.link, &path, board).await?;
        Ok(path)
    }
}

/// Creates `path` and its parents. Fine if it already exists.
pub fn create_dir(path: &Path) -> Result<()> {
    create_dir_all(path).map_err(Error::filesystem(path))
}

/// `003.jpg` for the third page of a chapter served from `.../whatever.jpg`.
fn page_file_name(page: usize, url: &str) -> PathBuf {
    let mut result = PathBuf::from(format!("{:03}", page));
    let extension = reqwest::Url::parse(url).ok().and_then(|url| {
        Path::new(url.path())
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
    });
    if let Some(ext) = extension {
        result.set_extension(ext);
    }
    result
}

/// Downloads every page of the chapter at `page_url` into `dest`.
///
/// All images are requested at once. Files are numbered by their position on
/// the page, whatever order the requests finish in. If any image fails the
/// rest are still saved, a marker listing the missing pages is written and
/// [`Error::ChapterIncomplete`] is returned.
pub async fn fetch_chapter_images(
    site: &impl Fetch,
    page_url: &str,
    dest: &Path,
    board: &StatusBoard,
) -> Result<usize> {
    board.detail("Extracting info");
    let html = site.text(page_url).await?;
    let urls = scrape::image_urls(&html, page_url)?;
    create_dir(dest)?;

    board.detail(format!("Extracting image contents ({} files)", urls.len()));
    let started = Instant::now();
    let responses = join_all(urls.iter().map(|url| site.image(url))).await;
    board.detail(format!(
        "Done ({:.3}s) - Saving...",
        started.elapsed().as_secs_f64()
    ));

    let mut failed = Vec::new();
    for (index, (url, response)) in urls.iter().zip(responses).enumerate() {
        let page = index + 1;
        match response {
            Ok(bytes) => {
                let path = dest.join(page_file_name(page, url));
                fs::write(&path, &bytes).map_err(Error::filesystem(&path))?;
                tracing::debug!("saved page {} to {:?}", page, path);
            }
            Err(err) => {
                tracing::warn!("page {} of {} failed: {}", page, page_url, err);
                failed.push(PageFailure {
                    page,
                    url: url.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    let marker = dest.join(INCOMPLETE_MARKER);
    if failed.is_empty() {
        match fs::remove_file(&marker) {
            Err(err) if err.kind() != ErrorKind::NotFound => {
                return Err(Error::filesystem(&marker)(err));
            }
            _ => {}
        }
        return Ok(urls.len());
    }

    let report: String = failed
        .iter()
        .map(|f| format!("{}\t{}\t{}\n", f.page, f.url, f.reason))
        .collect();
    fs::write(&marker, report).map_err(Error::filesystem(&marker))?;
    Err(Error::ChapterIncomplete {
        dir: dest.to_path_buf(),
        failed,
    })
}
