//! Best-effort page metadata extraction.
//!
//! Fetches one page, reads a bounded prefix of the body and scrapes head tags
//! for title, description, favicon and preview image. Every failure is an
//! [`ExtractError`] internally; [`MetadataExtractor::extract`] collapses them
//! to `None` so bookmark creation never fails because of the target site.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::types::errors::ExtractError;
use crate::types::metadata::PageMetadata;
use crate::types::settings::MetadataSettings;

const MAX_REDIRECTS: usize = 5;

/// Fetches and scrapes page metadata within a fixed time bound.
pub struct MetadataExtractor {
    client: Client,
    enabled: bool,
    timeout: Duration,
    user_agent: String,
    max_body_bytes: usize,
}

impl MetadataExtractor {
    pub fn new(settings: &MetadataSettings) -> Self {
        let client = Client::builder()
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            enabled: settings.enabled,
            timeout: Duration::from_millis(settings.timeout_ms),
            user_agent: settings.user_agent.clone(),
            max_body_bytes: settings.max_body_bytes,
        }
    }

    /// Extracts metadata from `url`, or `None` if anything goes wrong.
    ///
    /// Resolves within the configured timeout whatever the remote end does.
    pub async fn extract(&self, url: &str) -> Option<PageMetadata> {
        match self.try_extract(url).await {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                tracing::debug!(url, error = %e, "metadata extraction skipped");
                None
            }
        }
    }

    /// Same as [`extract`](Self::extract) but reports why nothing was produced.
    pub async fn try_extract(&self, url: &str) -> Result<PageMetadata, ExtractError> {
        if !self.enabled {
            return Err(ExtractError::Disabled);
        }

        let target = Url::parse(url).map_err(|e| ExtractError::InvalidUrl(e.to_string()))?;
        if !matches!(target.scheme(), "http" | "https") {
            return Err(ExtractError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                target.scheme()
            )));
        }

        // Dropping the future on timeout cancels the in-flight request.
        let (page_url, html) = tokio::time::timeout(self.timeout, self.fetch(target))
            .await
            .map_err(|_| ExtractError::Timeout(self.timeout.as_millis() as u64))??;

        Ok(parse_metadata(&html, &page_url))
    }

    /// GETs `target` and returns the final URL after redirects with the body prefix.
    async fn fetch(&self, target: Url) -> Result<(Url, String), ExtractError> {
        let mut response = self
            .client
            .get(target)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::Status(status.as_u16()));
        }

        // A missing Content-Type is given the benefit of the doubt.
        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_html(content_type) {
                return Err(ExtractError::NotHtml(content_type.to_string()));
            }
        }

        let page_url = response.url().clone();
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let room = self.max_body_bytes.saturating_sub(body.len());
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok((page_url, String::from_utf8_lossy(&body).into_owned()))
    }
}

fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

/// Scrapes metadata out of an HTML document.
///
/// Per field the first non-blank candidate wins. Favicon and image are made
/// absolute against `page_url`; the favicon falls back to `/favicon.ico`.
pub fn parse_metadata(html: &str, page_url: &Url) -> PageMetadata {
    let document = Html::parse_document(html);

    let title = meta_property(&document, "og:title")
        .or_else(|| meta_name(&document, "twitter:title"))
        .or_else(|| title_text(&document));

    let description =
        meta_property(&document, "og:description").or_else(|| meta_name(&document, "description"));

    let favicon = link_href(&document, "icon")
        .or_else(|| link_href(&document, "shortcut icon"))
        .and_then(|href| resolve(page_url, &href))
        .or_else(|| resolve(page_url, "/favicon.ico"));

    let image = meta_property(&document, "og:image")
        .or_else(|| meta_name(&document, "twitter:image"))
        .and_then(|src| resolve(page_url, &src));

    PageMetadata {
        title,
        description,
        favicon,
        image,
    }
}

fn resolve(base: &Url, reference: &str) -> Option<String> {
    base.join(reference).ok().map(String::from)
}

fn first_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr(attr))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn meta_property(document: &Html, property: &str) -> Option<String> {
    first_attr(document, &format!("meta[property=\"{}\"]", property), "content")
}

fn meta_name(document: &Html, name: &str) -> Option<String> {
    first_attr(document, &format!("meta[name=\"{}\"]", name), "content")
}

fn link_href(document: &Html, rel: &str) -> Option<String> {
    first_attr(document, &format!("link[rel=\"{}\"]", rel), "href")
}

fn title_text(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .find(|text| !text.is_empty())
}
