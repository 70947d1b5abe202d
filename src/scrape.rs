//! Pulling data out of the three page shapes the site serves: search
//! results, a title page with its chapter list, and a chapter reader page.

use crate::error::{Error, Result};
use scraper::{ElementRef, Html, Selector};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub author: String,
    pub updated: String,
    pub views: String,
}

impl SearchResult {
    /// How the result is shown in the selection menu.
    pub fn label(&self) -> String {
        format!("{} | {} views", self.title, self.views.replace(" - ", " "))
    }
}

/// A chapter as listed on the title page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterLink {
    pub title: String,
    pub link: String,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|err| Error::Selector(format!("{}: {:?}", css, err)))
}

fn text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn attr(element: ElementRef, name: &str, what: &'static str, url: &str) -> Result<String> {
    element
        .value()
        .attr(name)
        .map(|value| value.trim().to_string())
        .ok_or_else(|| missing(what, url))
}

fn missing(what: &'static str, url: &str) -> Error {
    Error::Scrape {
        what,
        url: url.to_string(),
    }
}

/// Finds the one container the rest of the page is read from.
fn container<'a>(document: &'a Html, css: &str, what: &'static str, url: &str) -> Result<ElementRef<'a>> {
    document
        .select(&selector(css)?)
        .next()
        .ok_or_else(|| missing(what, url))
}

pub fn search_results(html: &str, url: &str) -> Result<Vec<SearchResult>> {
    let document = Html::parse_document(html);
    let panel = container(&document, "div.panel-search-story", "search results panel", url)?;

    let item_selector = selector("div.search-story-item")?;
    let title_selector = selector("a.a-h.text-nowrap.item-title")?;
    let author_selector = selector("span.text-nowrap.item-author")?;
    let time_selector = selector("span.text-nowrap.item-time")?;

    panel
        .select(&item_selector)
        .map(|item| -> Result<SearchResult> {
            let heading = item
                .select(&title_selector)
                .next()
                .ok_or_else(|| missing("search result title", url))?;
            let author = item
                .select(&author_selector)
                .next()
                .map(text)
                .ok_or_else(|| missing("search result author", url))?;
            let mut times = item.select(&time_selector).map(text);
            let updated = times
                .next()
                .ok_or_else(|| missing("search result update time", url))?;
            let views = times
                .next()
                .ok_or_else(|| missing("search result view count", url))?;

            Ok(SearchResult {
                title: attr(heading, "title", "search result title", url)?,
                link: attr(heading, "href", "search result link", url)?,
                author,
                updated: updated.replace("Updated :", "").trim().to_string(),
                views: views.replace("View :", "").trim().to_string(),
            })
        })
        .collect()
}

/// The manga's name from the header of its title page.
pub fn story_title(html: &str, url: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let heading = container(&document, "div.story-info-right h1", "story title", url)?;
    Ok(text(heading))
}

/// Chapters from a title page, oldest first. The site lists newest first.
pub fn chapter_links(html: &str, url: &str) -> Result<Vec<ChapterLink>> {
    let document = Html::parse_document(html);
    let list = container(&document, "div.panel-story-chapter-list", "chapter list", url)?;
    let link_selector = selector("a.chapter-name.text-nowrap")?;

    let mut chapters = list
        .select(&link_selector)
        .map(|link| -> Result<ChapterLink> {
            Ok(ChapterLink {
                title: attr(link, "title", "chapter title", url)?,
                link: attr(link, "href", "chapter link", url)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    chapters.reverse();
    Ok(chapters)
}

/// Page image URLs of a chapter, in reading order.
pub fn image_urls(html: &str, url: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let reader = container(&document, "div.container-chapter-reader", "chapter reader", url)?;
    let image_selector = selector("img")?;

    let images = reader
        .select(&image_selector)
        .map(|image| attr(image, "src", "image source", url))
        .collect::<Result<Vec<_>>>()?;
    if images.is_empty() {
        return Err(missing("chapter images", url));
    }
    Ok(images)
}
