//! Laid-out document model.
//!
//! Coordinates are millimetres from the top-left corner of the page. The
//! PDF encoder converts to points and flips the y axis.

/// Core font variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Helvetica.
    Regular,
    /// Helvetica-Bold.
    Bold,
    /// Helvetica-Oblique.
    Italic,
}

impl FontStyle {
    /// Every style, in resource order.
    pub const ALL: [FontStyle; 3] = [FontStyle::Regular, FontStyle::Bold, FontStyle::Italic];

    /// PostScript name of the standard font.
    pub fn base_font(self) -> &'static str {
        match self {
            FontStyle::Regular => "Helvetica",
            FontStyle::Bold => "Helvetica-Bold",
            FontStyle::Italic => "Helvetica-Oblique",
        }
    }

    /// Name under which the font is registered in page resources.
    pub fn resource_name(self) -> &'static str {
        match self {
            FontStyle::Regular => "F1",
            FontStyle::Bold => "F2",
            FontStyle::Italic => "F3",
        }
    }
}

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const LINK_BLUE: Rgb = Rgb(0, 0, 255);

    /// Components scaled to 0.0..=1.0.
    pub fn unit(self) -> [f32; 3] {
        [
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        ]
    }
}

/// A single drawing instruction on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// A run of text starting at `x` on the given baseline.
    Text {
        x: f32,
        baseline: f32,
        style: FontStyle,
        size: f32,
        color: Rgb,
        text: String,
    },
    /// A filled rectangle, used for underlines.
    Rule {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    /// An embedded image, indexing [`Document::images`].
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        image: usize,
    },
}

/// Clickable rectangle pointing at an external URL.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkArea {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub uri: String,
}

/// One page of drawing operations and link annotations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
    pub links: Vec<LinkArea>,
}

impl Page {
    /// Text runs on this page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Number of images drawn on this page.
    pub fn image_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Image { .. }))
            .count()
    }
}

/// Decoded raster ready for embedding, 8-bit RGB without alpha.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width_px: u32,
    pub height_px: u32,
    pub rgb: Vec<u8>,
}

impl RasterImage {
    /// Height for a given display width, keeping the aspect ratio.
    pub fn height_for_width(&self, width: f32) -> f32 {
        if self.width_px == 0 {
            return 0.0;
        }
        width * self.height_px as f32 / self.width_px as f32
    }
}

/// A fully laid-out report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub pages: Vec<Page>,
    pub images: Vec<RasterImage>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All text runs across every page, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(Page::texts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_resources_are_distinct() {
        let names: Vec<_> = FontStyle::ALL.iter().map(|s| s.resource_name()).collect();
        assert_eq!(names, vec!["F1", "F2", "F3"]);
        assert_eq!(FontStyle::Italic.base_font(), "Helvetica-Oblique");
    }

    #[test]
    fn rgb_unit_scale() {
        assert_eq!(Rgb::LINK_BLUE.unit(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn aspect_ratio_is_kept() {
        let image = RasterImage {
            width_px: 200,
            height_px: 100,
            rgb: vec![0; 200 * 100 * 3],
        };
        assert!((image.height_for_width(16.0) - 8.0).abs() < f32::EPSILON);
    }

    #[test]
    fn texts_skip_non_text_ops() {
        let page = Page {
            ops: vec![
                DrawOp::Rule {
                    x: 0.0,
                    y: 0.0,
                    width: 1.0,
                    height: 1.0,
                    color: Rgb::BLACK,
                },
                DrawOp::Text {
                    x: 10.0,
                    baseline: 12.0,
                    style: FontStyle::Regular,
                    size: 9.0,
                    color: Rgb::BLACK,
                    text: "hello".into(),
                },
            ],
            links: Vec::new(),
        };
        assert_eq!(page.texts().collect::<Vec<_>>(), vec!["hello"]);
        assert_eq!(page.image_count(), 0);
    }
}
