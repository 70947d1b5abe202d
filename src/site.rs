use crate::{
    error::{Error, Result},
    naming::url_slug,
};
use bytes::Bytes;
use reqwest::{
    header::{ACCEPT, REFERER},
    Client,
};

pub const BASE_URL: &str = "https://manganelo.com/";

/// The two kinds of request the downloader makes.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    /// Fetches an HTML page.
    async fn text(&self, url: &str) -> Result<String>;

    /// Fetches one page image.
    async fn image(&self, url: &str) -> Result<Bytes>;

    fn search_url(&self, query: &str) -> String {
        format!("{}search/story/{}", BASE_URL, url_slug(query))
    }
}

/// manganelo over HTTP.
#[derive(Debug, Clone)]
pub struct Site {
    client: Client,
}

impl Site {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| Error::Network {
                url: BASE_URL.to_string(),
                source,
            })?;
        Ok(Self { client })
    }

    async fn send(&self, url: &str, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        tracing::debug!("GET {}", url);
        let network = |source| Error::Network {
            url: url.to_string(),
            source,
        };
        let response = request.send().await.map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }
}

impl Fetch for Site {
    async fn text(&self, url: &str) -> Result<String> {
        let response = self.send(url, self.client.get(url)).await?;
        response.text().await.map_err(|source| Error::Network {
            url: url.to_string(),
            source,
        })
    }

    async fn image(&self, url: &str) -> Result<Bytes> {
        let request = self
            .client
            .get(url)
            .header(ACCEPT, "image/webp,*/*")
            .header(REFERER, BASE_URL);
        let response = self.send(url, request).await?;
        response.bytes().await.map_err(|source| Error::Network {
            url: url.to_string(),
            source,
        })
    }
}

/// In-memory stand-in for the site.
#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::{collections::HashMap, time::Duration};

    #[derive(Default)]
    pub(crate) struct FakeSite {
        pages: HashMap<String, String>,
        images: HashMap<String, (Duration, Option<Bytes>)>,
    }

    impl FakeSite {
        pub(crate) fn with_page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }

        /// `body` of `None` answers 404. `delay` lets tests decide the order
        /// in which concurrent fetches complete.
        pub(crate) fn with_image(mut self, url: &str, delay_ms: u64, body: Option<&[u8]>) -> Self {
            self.images.insert(
                url.to_string(),
                (
                    Duration::from_millis(delay_ms),
                    body.map(Bytes::copy_from_slice),
                ),
            );
            self
        }
    }

    fn not_found(url: &str) -> Error {
        Error::HttpStatus {
            url: url.to_string(),
            status: reqwest::StatusCode::NOT_FOUND,
        }
    }

    impl Fetch for FakeSite {
        async fn text(&self, url: &str) -> Result<String> {
            self.pages.get(url).cloned().ok_or_else(|| not_found(url))
        }

        async fn image(&self, url: &str) -> Result<Bytes> {
            let (delay, body) = self.images.get(url).ok_or_else(|| not_found(url))?;
            tokio::time::sleep(*delay).await;
            body.clone().ok_or_else(|| not_found(url))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{fake::FakeSite, *};

    #[test]
    fn search_url_uses_slug() {
        assert_eq!(
            FakeSite::default().search_url("Kaguya-sama: Love is War"),
            "https://manganelo.com/search/story/Kaguya_sama_Love_is_War"
        );
    }

    #[tokio::test]
    async fn fake_answers_404_for_unknown_urls() {
        let site = FakeSite::default();
        let err = site.text("https://nowhere").await.unwrap_err();
        assert!(matches!(
            err,
            Error::HttpStatus { status, .. } if status == reqwest::StatusCode::NOT_FOUND
        ));
    }
}
