//! Flowing text layout on A4 pages.
//!
//! [`Layout`] keeps a write cursor and a current font. [`Layout::write`]
//! appends text at the cursor, wrapping at word boundaries against the right
//! margin and breaking onto a new page when a line would cross the bottom
//! trigger. Page footers are added by [`Layout::finish`] once the total page
//! count is known.

use super::document::{Document, DrawOp, FontStyle, LinkArea, Page, RasterImage, Rgb};
use super::{metrics, winansi};

/// A4 width in mm.
pub const PAGE_WIDTH: f32 = 210.0;
/// A4 height in mm.
pub const PAGE_HEIGHT: f32 = 297.0;
/// Left, top and right margin in mm.
pub const MARGIN: f32 = 10.0;
/// A line starting below this y goes to the next page.
pub const BREAK_TRIGGER: f32 = PAGE_HEIGHT - 2.0 * MARGIN;
/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

const FOOTER_OFFSET: f32 = 15.0;
const FOOTER_HEIGHT: f32 = 10.0;
const FOOTER_SIZE: f32 = 8.0;

/// Where a block began: page index and y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub page: usize,
    pub y: f32,
}

/// Cursor-driven page builder.
#[derive(Debug)]
pub struct Layout {
    pages: Vec<Page>,
    images: Vec<RasterImage>,
    x: f32,
    y: f32,
    style: FontStyle,
    size: f32,
    underline: bool,
    color: Rgb,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout {
    /// Start with one empty page and the cursor at the top-left margin.
    pub fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            images: Vec::new(),
            x: MARGIN,
            y: MARGIN,
            style: FontStyle::Regular,
            size: 12.0,
            underline: false,
            color: Rgb::BLACK,
        }
    }

    pub fn set_font(&mut self, style: FontStyle, size: f32) {
        self.style = style;
        self.size = size;
    }

    pub fn set_underline(&mut self, underline: bool) {
        self.underline = underline;
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Current page and y.
    pub fn anchor(&self) -> Anchor {
        Anchor {
            page: self.pages.len() - 1,
            y: self.y,
        }
    }

    /// Move to the start of the next line, `h` mm down.
    pub fn ln(&mut self, h: f32) {
        self.x = MARGIN;
        self.y += h;
    }

    /// Start a new page now if a line of height `h` would not fit.
    pub fn ensure_room(&mut self, h: f32) {
        if self.y + h > BREAK_TRIGGER {
            self.add_page();
            self.x = MARGIN;
        }
    }

    /// Width of `text` in mm at the current font.
    pub fn string_width(&self, text: &str) -> f32 {
        metrics::text_width(self.style, text) as f32 * self.size / 1000.0 / PT_PER_MM
    }

    fn char_width(&self, c: char) -> f32 {
        f32::from(metrics::char_width(self.style, c)) * self.size / 1000.0 / PT_PER_MM
    }

    /// Write `text` at the cursor in lines of height `h`.
    ///
    /// Wraps at the last space that fits. A word wider than a full line is
    /// split between characters. Embedded newlines start a new line. When
    /// `link` is set every emitted run becomes a clickable area.
    pub fn write(&mut self, h: f32, text: &str, link: Option<&str>) {
        let chars: Vec<char> = winansi::normalize(text).chars().collect();
        let full_width = PAGE_WIDTH - 2.0 * MARGIN;
        let mut available = PAGE_WIDTH - MARGIN - self.x;
        let mut start = 0;
        let mut i = 0;
        let mut last_space: Option<usize> = None;
        let mut width = 0.0f32;

        while i < chars.len() {
            let c = chars[i];
            if c == '\n' {
                self.emit(h, &chars[start..i], link);
                self.ln(h);
                i += 1;
                start = i;
                last_space = None;
                width = 0.0;
                available = full_width;
                continue;
            }
            if c == ' ' {
                last_space = Some(i);
            }
            width += self.char_width(c);
            if width <= available {
                i += 1;
                continue;
            }

            match last_space {
                Some(space) => {
                    self.emit(h, &chars[start..space], link);
                    i = space + 1;
                }
                None if self.x > MARGIN => {
                    // Nothing fits after the previous run; retry on a fresh line.
                    i = start;
                }
                None => {
                    if i == start {
                        i += 1;
                    }
                    self.emit(h, &chars[start..i], link);
                }
            }
            self.ln(h);
            start = i;
            last_space = None;
            width = 0.0;
            available = full_width;
        }

        if start < chars.len() {
            self.emit(h, &chars[start..], link);
        }
    }

    fn emit(&mut self, h: f32, run: &[char], link: Option<&str>) {
        if run.is_empty() {
            return;
        }
        if self.y + h > BREAK_TRIGGER {
            let x = self.x;
            self.add_page();
            self.x = x;
        }

        let text: String = run.iter().collect();
        let width = self.string_width(&text);
        let size_mm = self.size / PT_PER_MM;
        let baseline = self.y + 0.5 * h + 0.3 * size_mm;
        let (x, y) = (self.x, self.y);
        let (style, size, color, underline) = (self.style, self.size, self.color, self.underline);
        let page = self.current_page();

        page.ops.push(DrawOp::Text {
            x,
            baseline,
            style,
            size,
            color,
            text,
        });
        if underline {
            page.ops.push(DrawOp::Rule {
                x,
                y: baseline + 0.1 * size_mm,
                width,
                height: 0.05 * size_mm,
                color,
            });
        }
        if let Some(uri) = link {
            page.links.push(LinkArea {
                x,
                y,
                width,
                height: h,
                uri: uri.to_owned(),
            });
        }
        self.x += width;
    }

    fn current_page(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn add_page(&mut self) {
        self.pages.push(Page::default());
        self.y = MARGIN;
    }

    /// Draw `image` at `x`, `width` mm wide, at the page and y of `anchor`.
    ///
    /// The cursor does not move. The image is pulled up if it would run past
    /// the bottom trigger. Returns the drawn height.
    pub fn place_image(
        &mut self,
        anchor: Anchor,
        x: f32,
        width: f32,
        image: RasterImage,
        link: Option<&str>,
    ) -> f32 {
        let height = image.height_for_width(width);
        let y = anchor.y.min(BREAK_TRIGGER - height).max(MARGIN);
        let index = self.images.len();
        self.images.push(image);

        let Some(page) = self.pages.get_mut(anchor.page) else {
            return 0.0;
        };
        page.ops.push(DrawOp::Image {
            x,
            y,
            width,
            height,
            image: index,
        });
        if let Some(uri) = link {
            page.links.push(LinkArea {
                x,
                y,
                width,
                height,
                uri: uri.to_owned(),
            });
        }
        height
    }

    /// Add a centred "Page X of N" footer to every page and return the document.
    pub fn finish(mut self) -> Document {
        let total = self.pages.len();
        let style = FontStyle::Italic;
        let y = PAGE_HEIGHT - FOOTER_OFFSET;
        let size_mm = FOOTER_SIZE / PT_PER_MM;
        let baseline = y + 0.5 * FOOTER_HEIGHT + 0.3 * size_mm;

        for (index, page) in self.pages.iter_mut().enumerate() {
            let text = format!("Page {} of {}", index + 1, total);
            let width =
                metrics::text_width(style, &text) as f32 * FOOTER_SIZE / 1000.0 / PT_PER_MM;
            page.ops.push(DrawOp::Text {
                x: MARGIN + (PAGE_WIDTH - 2.0 * MARGIN - width) / 2.0,
                baseline,
                style,
                size: FOOTER_SIZE,
                color: Rgb::BLACK,
                text,
            });
        }

        Document {
            pages: self.pages,
            images: self.images,
        }
    }
}
