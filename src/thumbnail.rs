//! Thumbnail download and decoding.
//!
//! Downloaded bytes are written to a temporary file per candidate format
//! (PNG first, then JPEG) and decoded from there. Every temporary file is
//! registered in [`TempAssets`] and removed when the registry is drained or
//! dropped, whether or not the image was usable.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use image::ImageFormat;
use tempfile::TempPath;

use crate::error::{ReportError, Result};
use crate::report::RasterImage;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("serp-report/", env!("CARGO_PKG_VERSION"));

/// Image container tried when decoding a thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// Decode attempts, in order.
    pub const CANDIDATES: [ImageKind; 2] = [ImageKind::Png, ImageKind::Jpeg];

    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpg",
        }
    }

    fn format(self) -> ImageFormat {
        match self {
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// Registry of temporary image files created during one render.
#[derive(Debug, Default)]
pub struct TempAssets {
    paths: Vec<TempPath>,
}

impl TempAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `bytes` to a new temporary file with the extension of `kind`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created or written.
    pub fn create(&mut self, kind: ImageKind, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let suffix = format!(".{}", kind.extension());
        let mut file = tempfile::Builder::new()
            .prefix("serp-thumb-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;

        let temp_path = file.into_temp_path();
        let path = temp_path.to_path_buf();
        self.paths.push(temp_path);
        Ok(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Paths currently registered.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(|p| &**p)
    }

    /// Delete every registered file. Returns how many were registered.
    pub fn drain(&mut self) -> usize {
        let count = self.paths.len();
        for path in self.paths.drain(..) {
            let shown = path.display().to_string();
            if let Err(e) = path.close() {
                tracing::warn!(
                    path = %shown,
                    error = %e,
                    "failed to remove temporary thumbnail"
                );
            }
        }
        count
    }
}

impl Drop for TempAssets {
    fn drop(&mut self) {
        self.drain();
    }
}

/// A decoded thumbnail and the container it decoded as.
#[derive(Debug, Clone)]
pub struct FetchedThumbnail {
    pub image: RasterImage,
    pub kind: ImageKind,
}

/// Downloads thumbnails with a client built once per run.
///
/// Certificate verification is relaxed for thumbnail hosts; thumbnails are
/// decorative and a failure only drops the picture.
#[derive(Debug, Clone)]
pub struct ThumbnailFetcher {
    client: reqwest::Client,
}

impl ThumbnailFetcher {
    /// Create a fetcher with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Config`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a fetcher with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Config`] if the HTTP client cannot be built.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| ReportError::Config(format!("failed to build thumbnail client: {e}")))?;
        Ok(Self { client })
    }

    /// Download the raw bytes at `url`. `None` on any transport or status failure.
    pub async fn download(&self, url: &str) -> Option<Vec<u8>> {
        if url.trim().is_empty() {
            return None;
        }
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(url, error = %e.without_url(), "thumbnail request failed");
                return None;
            }
        };
        if !response.status().is_success() {
            tracing::debug!(url, status = %response.status(), "thumbnail not available");
            return None;
        }
        match response.bytes().await {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(e) => {
                tracing::debug!(url, error = %e.without_url(), "thumbnail body unreadable");
                None
            }
        }
    }

    /// Fetch and decode the thumbnail at `url`.
    ///
    /// Temporary files are registered in `assets`. Returns `None` when the
    /// payload is empty or decodes as neither PNG nor JPEG.
    pub async fn fetch(&self, url: &str, assets: &mut TempAssets) -> Option<FetchedThumbnail> {
        let bytes = self.download(url).await?;

        for kind in ImageKind::CANDIDATES {
            let path = match assets.create(kind, &bytes) {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!(error = %e, "could not create temporary thumbnail file");
                    return None;
                }
            };
            let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            if size == 0 {
                tracing::debug!(url, kind = kind.extension(), "empty thumbnail payload");
                continue;
            }
            match decode_file(&path, kind) {
                Ok(image) => {
                    tracing::debug!(
                        url,
                        kind = kind.extension(),
                        width = image.width_px,
                        height = image.height_px,
                        "thumbnail decoded"
                    );
                    return Some(FetchedThumbnail { image, kind });
                }
                Err(e) => {
                    tracing::debug!(
                        url,
                        kind = kind.extension(),
                        error = %e,
                        "thumbnail not decodable"
                    )
                }
            }
        }
        None
    }
}

/// Decode the file at `path` as `kind`, flattening any alpha onto white.
fn decode_file(
    path: &Path,
    kind: ImageKind,
) -> std::result::Result<RasterImage, image::ImageError> {
    let bytes = std::fs::read(path)?;
    let decoded = image::load_from_memory_with_format(&bytes, kind.format())?;
    let rgba = decoded.to_rgba8();
    let (width_px, height_px) = rgba.dimensions();

    let mut rgb = Vec::with_capacity(width_px as usize * height_px as usize * 3);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = u16::from(a);
        for channel in [r, g, b] {
            let blended = (u16::from(channel) * alpha + 255 * (255 - alpha)) / 255;
            rgb.push(blended as u8);
        }
    }

    Ok(RasterImage {
        width_px,
        height_px,
        rgb,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn encoded(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
        let pixels = RgbImage::from_pixel(width, height, Rgb([200, 10, 10]));
        let image = DynamicImage::ImageRgb8(pixels);
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, format).expect("encode test image");
        out.into_inner()
    }

    async fn serve(body: Vec<u8>) -> (MockServer, String) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/thumb"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .mount(&server)
            .await;
        let url = format!("{}/thumb", server.uri());
        (server, url)
    }

    #[test]
    fn temp_assets_removed_on_drain() {
        let mut assets = TempAssets::new();
        let png = assets.create(ImageKind::Png, b"abc").expect("create");
        let jpg = assets.create(ImageKind::Jpeg, b"abc").expect("create");
        assert!(png.exists() && jpg.exists());
        assert_eq!(png.extension().and_then(|e| e.to_str()), Some("png"));
        assert_eq!(jpg.extension().and_then(|e| e.to_str()), Some("jpg"));

        assert_eq!(assets.drain(), 2);
        assert!(assets.is_empty());
        assert!(!png.exists() && !jpg.exists());
    }

    #[test]
    fn temp_assets_removed_on_drop() {
        let path = {
            let mut assets = TempAssets::new();
            assets.create(ImageKind::Png, b"x").expect("create")
        };
        assert!(!path.exists());
    }

    #[test]
    fn alpha_is_flattened_onto_white() {
        let transparent = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0])));
        let mut out = Cursor::new(Vec::new());
        transparent.write_to(&mut out, ImageFormat::Png).expect("encode");

        let mut assets = TempAssets::new();
        let path = assets.create(ImageKind::Png, out.get_ref()).expect("create");
        let image = decode_file(&path, ImageKind::Png).expect("decode");
        assert_eq!(image.rgb, vec![255, 255, 255]);
    }

    #[tokio::test]
    async fn png_decodes_on_first_candidate() {
        let (_server, url) = serve(encoded(ImageFormat::Png, 4, 2)).await;
        let fetcher = ThumbnailFetcher::new().expect("fetcher");
        let mut assets = TempAssets::new();

        let fetched = fetcher.fetch(&url, &mut assets).await.expect("image");
        assert_eq!(fetched.kind, ImageKind::Png);
        let image = fetched.image;
        assert_eq!((image.width_px, image.height_px), (4, 2));
        assert_eq!(image.rgb.len(), 4 * 2 * 3);
        assert_eq!(assets.len(), 1);
    }

    #[tokio::test]
    async fn jpeg_decodes_after_png_attempt() {
        let (_server, url) = serve(encoded(ImageFormat::Jpeg, 8, 8)).await;
        let fetcher = ThumbnailFetcher::new().expect("fetcher");
        let mut assets = TempAssets::new();

        let fetched = fetcher.fetch(&url, &mut assets).await.expect("image");
        assert_eq!(fetched.kind, ImageKind::Jpeg);
        assert_eq!((fetched.image.width_px, fetched.image.height_px), (8, 8));
        assert_eq!(assets.len(), 2, "png then jpg temp file");
        let extensions: Vec<_> = assets
            .paths()
            .filter_map(|p| p.extension().and_then(|e| e.to_str()).map(str::to_owned))
            .collect();
        assert_eq!(extensions, vec!["png", "jpg"]);
    }

    #[tokio::test]
    async fn zero_byte_payload_yields_none() {
        let (_server, url) = serve(Vec::new()).await;
        let fetcher = ThumbnailFetcher::new().expect("fetcher");
        let mut assets = TempAssets::new();

        assert!(fetcher.fetch(&url, &mut assets).await.is_none());
        assert_eq!(assets.len(), 2);
        assert_eq!(assets.drain(), 2);
    }

    #[tokio::test]
    async fn garbage_payload_yields_none() {
        let (_server, url) = serve(b"<html>not an image</html>".to_vec()).await;
        let fetcher = ThumbnailFetcher::new().expect("fetcher");
        let mut assets = TempAssets::new();
        assert!(fetcher.fetch(&url, &mut assets).await.is_none());
    }

    #[tokio::test]
    async fn http_error_yields_none_without_temp_files() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let fetcher = ThumbnailFetcher::new().expect("fetcher");
        let mut assets = TempAssets::new();

        let url = format!("{}/missing.png", server.uri());
        assert!(fetcher.fetch(&url, &mut assets).await.is_none());
        assert!(assets.is_empty());
    }

    #[tokio::test]
    async fn blank_url_is_skipped() {
        let fetcher = ThumbnailFetcher::new().expect("fetcher");
        assert!(fetcher.download("  ").await.is_none());
    }
}
