use serp_search::{ResultSet, SearchResultItem};

use super::DEFAULT_TITLE;
use super::document::{Document, FontStyle, RasterImage, Rgb};
use super::layout::Layout;
use super::pdf;
use crate::error::Result;
use crate::thumbnail::{TempAssets, ThumbnailFetcher};

/// Printed instead of result blocks when the search found nothing.
pub const NO_RESULTS_MESSAGE: &str = "Your search yields no results!";

const LINE_HEIGHT: f32 = 5.0;
const HEADER_GAP: f32 = 10.0;
const THUMBNAIL_X: f32 = 150.0;
const THUMBNAIL_WIDTH: f32 = 16.0;
const LINK_INDENT: &str = "        ";
const SNIPPET_INDENT: &str = "    ";

/// What goes into the header.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    pub query: String,
    /// Requested result count, printed as the limit.
    pub requested: u32,
    /// Draw thumbnails when a fetcher is attached.
    pub thumbnails: bool,
}

impl ReportOptions {
    pub fn new(query: impl Into<String>, requested: u32) -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            query: query.into(),
            requested,
            thumbnails: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_thumbnails(mut self, thumbnails: bool) -> Self {
        self.thumbnails = thumbnails;
        self
    }
}

/// Encoded report.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// Lays out and renders one report.
///
/// The header goes on the first page only. Each result becomes a numbered
/// block: title link, URL line, indented snippet. With thumbnails enabled
/// the picture is drawn at the right edge of the block's first line, and the
/// text cursor is left where the block text ended.
#[derive(Debug)]
pub struct ReportEngine {
    options: ReportOptions,
    fetcher: Option<ThumbnailFetcher>,
    assets: TempAssets,
}

impl ReportEngine {
    pub fn new(options: ReportOptions) -> Self {
        Self {
            options,
            fetcher: None,
            assets: TempAssets::new(),
        }
    }

    /// Attach the fetcher used when thumbnails are enabled.
    pub fn with_fetcher(mut self, fetcher: ThumbnailFetcher) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Temporary image files created so far and not yet drained.
    pub fn assets(&self) -> &TempAssets {
        &self.assets
    }

    /// Lay out `results` into pages, footers included.
    pub async fn layout(&mut self, results: &ResultSet) -> Document {
        let mut layout = Layout::new();
        self.write_header(&mut layout);

        if results.is_empty() {
            layout.set_font(FontStyle::Regular, 12.0);
            layout.write(LINE_HEIGHT, NO_RESULTS_MESSAGE, None);
            layout.ln(LINE_HEIGHT);
        } else {
            for (index, item) in results.iter().enumerate() {
                self.write_item(&mut layout, index + 1, item).await;
            }
        }

        layout.finish()
    }

    /// Lay out and encode `results`, then remove temporary image files.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ReportError::Render`] if the document cannot be encoded.
    pub async fn render(&mut self, results: &ResultSet) -> Result<RenderedReport> {
        let document = self.layout(results).await;
        let encoded = pdf::encode(&document, &self.options.title);
        let removed = self.assets.drain();
        tracing::debug!(removed, "temporary thumbnails cleaned up");

        Ok(RenderedReport {
            bytes: encoded?,
            pages: document.page_count(),
        })
    }

    fn write_header(&self, layout: &mut Layout) {
        layout.set_color(Rgb::BLACK);
        layout.set_font(FontStyle::Bold, 12.0);
        layout.write(LINE_HEIGHT, &self.options.title, None);
        layout.ln(LINE_HEIGHT);

        layout.set_font(FontStyle::Bold, 10.0);
        layout.write(LINE_HEIGHT, "Search Term: ", None);
        layout.set_font(FontStyle::Regular, 9.0);
        layout.write(LINE_HEIGHT, &self.options.query, None);
        layout.ln(LINE_HEIGHT);

        layout.set_font(FontStyle::Bold, 10.0);
        layout.write(LINE_HEIGHT, "Results Count Limit: ", None);
        layout.set_font(FontStyle::Regular, 9.0);
        layout.write(LINE_HEIGHT, &self.options.requested.to_string(), None);
        layout.ln(HEADER_GAP);
    }

    async fn write_item(&mut self, layout: &mut Layout, number: usize, item: &SearchResultItem) {
        let thumbnail = match item.thumbnail_url() {
            Some(url) if self.options.thumbnails => self.fetch_thumbnail(url).await,
            _ => None,
        };

        // The block starts where both its first line and its picture fit.
        let reserved = thumbnail.as_ref().map_or(LINE_HEIGHT, |image| {
            image.height_for_width(THUMBNAIL_WIDTH).max(LINE_HEIGHT)
        });
        layout.ensure_room(reserved);
        let anchor = layout.anchor();

        layout.set_font(FontStyle::Regular, 9.0);
        layout.write(LINE_HEIGHT, &format!("{number}.  "), None);

        layout.set_font(FontStyle::Regular, 10.0);
        layout.set_underline(true);
        layout.set_color(Rgb::LINK_BLUE);
        layout.write(LINE_HEIGHT, &item.title, Some(&item.link));
        layout.set_underline(false);
        layout.set_color(Rgb::BLACK);
        layout.ln(LINE_HEIGHT);

        layout.set_font(FontStyle::Regular, 7.0);
        layout.write(LINE_HEIGHT, &format!("{LINK_INDENT}{}", item.link), None);
        layout.ln(LINE_HEIGHT);

        layout.set_font(FontStyle::Regular, 8.0);
        layout.write(LINE_HEIGHT, &indent_lines(&item.snippet), None);
        layout.ln(LINE_HEIGHT);
        layout.ln(LINE_HEIGHT);

        if let Some(image) = thumbnail {
            layout.place_image(anchor, THUMBNAIL_X, THUMBNAIL_WIDTH, image, Some(&item.link));
        }
    }

    async fn fetch_thumbnail(&mut self, url: &str) -> Option<RasterImage> {
        let fetcher = self.fetcher.as_ref()?;
        match fetcher.fetch(url, &mut self.assets).await {
            Some(fetched) => Some(fetched.image),
            None => {
                tracing::debug!(url, "thumbnail skipped");
                None
            }
        }
    }
}

/// Prefix every line of `text`, including an empty one.
fn indent_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| format!("{SNIPPET_INDENT}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
