//! Image payloads and content-type inference.

use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;

/// Content type used when nothing better can be inferred.
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Filename used when a URI has no usable last segment.
const FALLBACK_FILENAME: &str = "image.jpg";

/// Trailing `.ext` on a filename.
static EXTENSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.(\w+)$").unwrap());

/// A single image ready to be uploaded to the prediction endpoint.
///
/// Built at submit time and dropped once the request completes.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Raw image bytes
    pub bytes: Vec<u8>,
    /// Filename sent in the multipart part
    pub filename: String,
    /// MIME type sent in the multipart part
    pub content_type: String,
}

impl ImageUpload {
    /// Create an upload, inferring the content type from the filename.
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        let filename = filename.into();
        let content_type = infer_content_type(&filename).to_string();
        Self {
            bytes,
            filename,
            content_type,
        }
    }

    /// Create an upload whose content type was declared by the source
    /// (a browser `File`, for example). Non-image declarations fall back to
    /// inference from the filename.
    pub fn with_declared_type(
        bytes: Vec<u8>,
        filename: impl Into<String>,
        declared: Option<&str>,
    ) -> Self {
        let filename = filename.into();
        let content_type = resolve_content_type(declared, &filename);
        Self {
            bytes,
            filename,
            content_type,
        }
    }

    /// Create an upload from a device URI or path, using its last segment
    /// as the filename.
    pub fn from_uri(bytes: Vec<u8>, uri: &str) -> Self {
        Self::new(bytes, filename_from_uri(uri))
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Bytes are elided so logging an upload never dumps the payload.
impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Infer an image MIME type from a filename's extension.
///
/// Unknown or missing extensions default to `image/jpeg`.
pub fn infer_content_type(filename: &str) -> &'static str {
    known_image_type(filename).unwrap_or(DEFAULT_CONTENT_TYPE)
}

/// MIME type for a recognised image extension, `None` otherwise.
pub fn known_image_type(filename: &str) -> Option<&'static str> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let ext = EXTENSION.captures(name)?.get(1)?;

    match ext.as_str().to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" | "jpe" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}

/// Pick the content type for an upload: a declared `image/*` type wins,
/// otherwise infer from the filename.
pub fn resolve_content_type(declared: Option<&str>, filename: &str) -> String {
    match declared.map(str::trim) {
        Some(mime) if is_image_mime(mime) => mime.to_ascii_lowercase(),
        _ => infer_content_type(filename).to_string(),
    }
}

/// Whether a MIME type names an image.
pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// Last path segment of a device URI or filesystem path.
pub fn filename_from_uri(uri: &str) -> String {
    let without_query = uri.split(['?', '#']).next().unwrap_or(uri);
    match without_query.rsplit(['/', '\\']).next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => FALLBACK_FILENAME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_png() {
        assert_eq!(infer_content_type("photo.png"), "image/png");
    }

    #[test]
    fn test_infer_without_extension_defaults_to_jpeg() {
        assert_eq!(infer_content_type("image"), "image/jpeg");
    }

    #[test]
    fn test_infer_is_case_insensitive() {
        assert_eq!(infer_content_type("LEAF.JPG"), "image/jpeg");
        assert_eq!(infer_content_type("leaf.WebP"), "image/webp");
    }

    #[test]
    fn test_infer_unknown_extension_defaults_to_jpeg() {
        assert_eq!(infer_content_type("scan.xyz"), "image/jpeg");
        assert_eq!(infer_content_type("archive.tar.gz"), "image/jpeg");
    }

    #[test]
    fn test_infer_ignores_dots_in_directories() {
        assert_eq!(infer_content_type("/data/v1.2/leaf"), "image/jpeg");
        assert_eq!(infer_content_type("/data/v1.2/leaf.gif"), "image/gif");
    }

    #[test]
    fn test_known_image_type_is_strict() {
        assert_eq!(known_image_type("leaf.tiff"), Some("image/tiff"));
        assert_eq!(known_image_type("notes.txt"), None);
        assert_eq!(known_image_type("README"), None);
    }

    #[test]
    fn test_declared_type_wins() {
        assert_eq!(resolve_content_type(Some("image/png"), "leaf.jpg"), "image/png");
        assert_eq!(
            resolve_content_type(Some("application/octet-stream"), "leaf.png"),
            "image/png"
        );
        assert_eq!(resolve_content_type(None, "leaf"), "image/jpeg");
    }

    #[test]
    fn test_is_image_mime() {
        assert!(is_image_mime("image/jpeg"));
        assert!(is_image_mime("Image/PNG"));
        assert!(!is_image_mime("text/plain"));
        assert!(!is_image_mime(""));
    }

    #[test]
    fn test_filename_from_uri() {
        assert_eq!(
            filename_from_uri("file:///data/user/0/cache/ImagePicker/abc.jpeg"),
            "abc.jpeg"
        );
        assert_eq!(filename_from_uri("leaf.png"), "leaf.png");
        assert_eq!(filename_from_uri("content://media/photo.png?x=1"), "photo.png");
        assert_eq!(filename_from_uri("file:///tmp/"), "image.jpg");
    }

    #[test]
    fn test_upload_from_uri() {
        let upload = ImageUpload::from_uri(vec![1, 2, 3], "file:///tmp/leaf.png");
        assert_eq!(upload.filename, "leaf.png");
        assert_eq!(upload.content_type, "image/png");
        assert_eq!(upload.len(), 3);
    }

    #[test]
    fn test_debug_elides_bytes() {
        let upload = ImageUpload::new(vec![0; 4096], "leaf.jpg");
        let debug = format!("{:?}", upload);
        assert!(debug.contains("len: 4096"));
        assert!(!debug.contains("0, 0, 0"));
    }
}
