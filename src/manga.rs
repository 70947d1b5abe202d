use crate::{
    error::Result as SiteResult,
    eta::{Eta, EtaOptions, StatusBoard},
    naming::{sanitize, strip_common_prefix},
    scrape::{self, SearchResult},
    site::{Fetch, Site},
};
use anyhow::{Context, Result};
use std::{env, path::PathBuf};

pub mod chapter;
pub mod get;

use chapter::{create_dir, Chapter};

#[derive(Debug)]
pub struct Manga<F = Site> {
    site: F,
    pub title: String,
    pub link: String,
    pub chapters: Vec<Chapter>,
    pub path: PathBuf,
    eta: EtaOptions,
}

/// Searches the site for titles matching `query`, best match first.
pub async fn search_titles(site: &impl Fetch, query: &str) -> SiteResult<Vec<SearchResult>> {
    let url = site.search_url(query);
    let html = site.text(&url).await?;
    scrape::search_results(&html, &url)
}

/// Chapters of the title at `url`, oldest first, with the words every
/// chapter title starts with removed.
pub async fn list_chapters(site: &impl Fetch, url: &str) -> SiteResult<Vec<Chapter>> {
    let html = site.text(url).await?;
    chapters_from_page(&html, url)
}

fn chapters_from_page(html: &str, url: &str) -> SiteResult<Vec<Chapter>> {
    let links = scrape::chapter_links(html, url)?;
    let titles: Vec<&str> = links.iter().map(|link| link.title.as_str()).collect();
    let titles = strip_common_prefix(&titles);

    Ok(links
        .into_iter()
        .zip(titles)
        .enumerate()
        .map(|(index, (link, title))| Chapter::new(index + 1, title, link.link))
        .collect())
}

/// `<cwd>/<sanitized title>`
pub fn default_path(title: &str) -> Result<PathBuf> {
    let cwd = env::current_dir().context("Unable to read the current directory")?;
    Ok(cwd.join(sanitize(title)))
}

impl<F: Fetch> Manga<F> {
    /// Loads the title page at `link`. Without an explicit `path` the
    /// chapters go into a directory named after the title.
    pub async fn open(site: F, link: &str, path: Option<PathBuf>, eta: EtaOptions) -> Result<Self> {
        let html = site
            .text(link)
            .await
            .with_context(|| format!("Unable to load the title page {}", link))?;
        let title = scrape::story_title(&html, link)?;
        let chapters = chapters_from_page(&html, link)?;
        let path = match path {
            Some(path) => path,
            None => default_path(&title)?,
        };
        tracing::info!("{} has {} chapters", title, chapters.len());

        Ok(Self {
            site,
            title,
            link: link.to_string(),
            chapters,
            path,
            eta,
        })
    }

    /// Downloads every chapter in order while the progress line runs in the
    /// background.
    pub async fn download(&self) -> Result<()> {
        println!("Downloading to {}", self.path.display());
        create_dir(&self.path)?;

        let total = self.chapters.len() as u64;
        let board = StatusBoard::spawn(total, Eta::new(total, self.eta.clone()));

        for (num, chapter) in self.chapters.iter().enumerate() {
            board.start(num as u64, format!("Downloading {}/{}", num + 1, total));
            chapter
                .download(&self.site, &self.path, &board)
                .await
                .with_context(|| {
                    format!(
                        "Attempting to download chapter {} ({}) from {}",
                        chapter.number, chapter.title, chapter.link
                    )
                })?;
        }

        board.finish().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Error,
        scrape::tests::{reader_page, SEARCH, TITLE_PAGE},
        site::fake::FakeSite,
    };
    use std::fs;
    use tempfile::tempdir;

    const TITLE: &str = "https://manganelo.com/manga/solo";

    fn hidden() -> EtaOptions {
        EtaOptions {
            hidden: true,
            ..EtaOptions::default()
        }
    }

    fn site() -> FakeSite {
        let mut site = FakeSite::default().with_page(TITLE, TITLE_PAGE);
        for chapter in 1..=3 {
            let pages: Vec<String> = (1..=2)
                .map(|page| format!("https://img.example/{}/{}.jpg", chapter, page))
                .collect();
            let refs: Vec<&str> = pages.iter().map(String::as_str).collect();
            site = site.with_page(
                &format!("https://manganelo.com/chapter/solo/{}", chapter),
                &reader_page(&refs),
            );
            for (index, page) in pages.iter().enumerate() {
                let body = format!("{}-{}", chapter, index + 1);
                site = site.with_image(page, 0, Some(body.as_bytes()));
            }
        }
        site
    }

    #[tokio::test]
    async fn searches_by_slug() -> anyhow::Result<()> {
        let site =
            FakeSite::default().with_page("https://manganelo.com/search/story/Solo_Leveling", SEARCH);
        let results = search_titles(&site, "Solo: Leveling").await?;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Solo Leveling");
        Ok(())
    }

    #[tokio::test]
    async fn lists_chapters_oldest_first_without_shared_prefix() -> anyhow::Result<()> {
        let chapters = list_chapters(&site(), TITLE).await?;
        assert_eq!(
            chapters,
            [
                Chapter::new(1, "1".into(), "https://manganelo.com/chapter/solo/1".into()),
                Chapter::new(2, "2".into(), "https://manganelo.com/chapter/solo/2".into()),
                Chapter::new(
                    3,
                    "3: The End".into(),
                    "https://manganelo.com/chapter/solo/3".into()
                ),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn listing_a_missing_page_fails() {
        let err = list_chapters(&FakeSite::default(), TITLE).await.unwrap_err();
        assert!(matches!(err, Error::HttpStatus { .. }));
    }

    #[tokio::test]
    async fn open_defaults_path_to_the_title() -> anyhow::Result<()> {
        let manga = Manga::open(site(), TITLE, None, hidden()).await?;
        assert_eq!(manga.title, "Solo Leveling");
        assert_eq!(manga.path, env::current_dir()?.join("Solo Leveling"));
        assert_eq!(manga.chapters.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn downloads_the_whole_tree() -> anyhow::Result<()> {
        let root = tempdir()?;
        let path = root.path().join("Solo Leveling");
        let manga = Manga::open(site(), TITLE, Some(path.clone()), hidden()).await?;
        manga.download().await?;

        for (chapter, dir) in ["0001 - 1", "0002 - 2", "0003 - 3 The End"].iter().enumerate() {
            for page in 1..=2 {
                let saved = fs::read_to_string(path.join(dir).join(format!("{:03}.jpg", page)))?;
                assert_eq!(saved, format!("{}-{}", chapter + 1, page));
            }
        }
        Ok(())
    }

    #[tokio::test]
    async fn a_broken_chapter_stops_the_run() -> anyhow::Result<()> {
        let root = tempdir()?;
        let site = site().with_image("https://img.example/2/2.jpg", 0, None);
        let manga = Manga::open(site, TITLE, Some(root.path().to_path_buf()), hidden()).await?;
        let err = manga.download().await.unwrap_err();

        assert!(format!("{:#}", err).contains("failed pages: 2"));
        assert!(root.path().join("0001 - 1").join("002.jpg").exists());
        assert!(root.path().join("0002 - 2").join("001.jpg").exists());
        assert!(!root.path().join("0003 - 3 The End").exists());
        Ok(())
    }
}
