//! PDF serialization of a laid-out [`Document`].
//!
//! Text uses the standard Helvetica fonts with WinAnsiEncoding, so nothing
//! is embedded except thumbnails, which go in as Flate-compressed RGB image
//! XObjects.

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, ObjectId, Stream, StringFormat, dictionary};

use super::document::{Document, DrawOp, LinkArea, Page, RasterImage};
use super::layout::{PAGE_HEIGHT, PAGE_WIDTH, PT_PER_MM};
use super::winansi;
use crate::error::{ReportError, Result};

const PRODUCER: &str = concat!("serp-report ", env!("CARGO_PKG_VERSION"));

/// Encode `document` into PDF bytes.
///
/// # Errors
///
/// Returns [`ReportError::Render`] if a content stream or image cannot be
/// encoded or the file cannot be serialized.
pub fn encode(document: &Document, title: &str) -> Result<Vec<u8>> {
    let mut pdf = lopdf::Document::with_version("1.4");
    let pages_id = pdf.new_object_id();

    let mut fonts = Dictionary::new();
    for style in super::document::FontStyle::ALL {
        let font_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => style.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(style.resource_name(), font_id);
    }

    let mut xobjects = Dictionary::new();
    for (index, image) in document.images.iter().enumerate() {
        let image_id = pdf.add_object(image_stream(image)?);
        xobjects.set(image_name(index), image_id);
    }

    let resources_id = pdf.add_object(dictionary! {
        "Font" => fonts,
        "XObject" => xobjects,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(document.pages.len());
    for page in &document.pages {
        let content = page_content(page)
            .encode()
            .map_err(|e| ReportError::Render(format!("content stream: {e}")))?;
        let content_id = pdf.add_object(Stream::new(dictionary! {}, content));

        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        };
        if !page.links.is_empty() {
            let annots: Vec<Object> = page
                .links
                .iter()
                .map(|link| Object::Dictionary(link_annotation(link)))
                .collect();
            page_dict.set("Annots", annots);
        }
        kids.push(pdf.add_object(page_dict).into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(document.pages.len() as i64),
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(PAGE_WIDTH * PT_PER_MM),
            Object::Real(PAGE_HEIGHT * PT_PER_MM),
        ],
    };
    pdf.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id: ObjectId = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = pdf.add_object(dictionary! {
        "Title" => Object::String(winansi::encode(title), StringFormat::Literal),
        "Producer" => Object::string_literal(PRODUCER),
    });
    pdf.trailer.set("Root", catalog_id);
    pdf.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    pdf.save_to(&mut bytes)
        .map_err(|e| ReportError::Render(format!("serialize: {e}")))?;
    Ok(bytes)
}

fn image_name(index: usize) -> String {
    format!("Im{index}")
}

/// Top-left mm y to bottom-left pt y.
fn flip(y: f32) -> f32 {
    (PAGE_HEIGHT - y) * PT_PER_MM
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

fn page_content(page: &Page) -> Content {
    let mut operations = Vec::new();
    for op in &page.ops {
        match op {
            DrawOp::Text {
                x,
                baseline,
                style,
                size,
                color,
                text,
            } => {
                let [r, g, b] = color.unit();
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec![name(style.resource_name()), real(*size)],
                ));
                operations.push(Operation::new("rg", vec![real(r), real(g), real(b)]));
                operations.push(Operation::new(
                    "Td",
                    vec![real(x * PT_PER_MM), real(flip(*baseline))],
                ));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::String(winansi::encode(text), StringFormat::Literal)],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
            DrawOp::Rule {
                x,
                y,
                width,
                height,
                color,
            } => {
                let [r, g, b] = color.unit();
                operations.push(Operation::new("rg", vec![real(r), real(g), real(b)]));
                operations.push(Operation::new(
                    "re",
                    vec![
                        real(x * PT_PER_MM),
                        real(flip(y + height)),
                        real(width * PT_PER_MM),
                        real(height * PT_PER_MM),
                    ],
                ));
                operations.push(Operation::new("f", vec![]));
            }
            DrawOp::Image {
                x,
                y,
                width,
                height,
                image,
            } => {
                operations.push(Operation::new("q", vec![]));
                operations.push(Operation::new(
                    "cm",
                    vec![
                        real(width * PT_PER_MM),
                        real(0.0),
                        real(0.0),
                        real(height * PT_PER_MM),
                        real(x * PT_PER_MM),
                        real(flip(y + height)),
                    ],
                ));
                operations.push(Operation::new("Do", vec![name(&image_name(*image))]));
                operations.push(Operation::new("Q", vec![]));
            }
        }
    }
    Content { operations }
}

fn link_annotation(link: &LinkArea) -> Dictionary {
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => vec![
            real(link.x * PT_PER_MM),
            real(flip(link.y + link.height)),
            real((link.x + link.width) * PT_PER_MM),
            real(flip(link.y)),
        ],
        "Border" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
        "A" => dictionary! {
            "S" => "URI",
            "URI" => Object::string_literal(link.uri.as_str()),
        },
    }
}

fn image_stream(image: &RasterImage) -> Result<Stream> {
    let compression_error =
        |e: std::io::Error| ReportError::Render(format!("image compression: {e}"));
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&image.rgb).map_err(compression_error)?;
    let data = encoder.finish().map_err(compression_error)?;

    Ok(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(i64::from(image.width_px)),
            "Height" => Object::Integer(i64::from(image.height_px)),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => Object::Integer(8),
            "Filter" => "FlateDecode",
        },
        data,
    ))
}
