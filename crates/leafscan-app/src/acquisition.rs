//! Image acquisition.
//!
//! Two surfaces feed the same screen flow:
//! - Web: drag-and-drop or a file input hands over a file with a declared
//!   MIME type.
//! - Mobile: camera capture or gallery selection behind permission prompts,
//!   yielding a device URI.
//!
//! Every path ends in an [`Acquisition`], which keeps "nothing happened"
//! apart from "input was rejected".

use std::future::Future;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use leafscan_models::{is_image_mime, known_image_type, ImageUpload};

use crate::error::{AcquireError, AcquireResult};

/// Where the bytes of a selected image live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Bytes already in memory (web file input, drop)
    Upload(ImageUpload),
    /// Device URI or local path, read at submit time
    Uri(String),
}

/// An image the user picked, with a reference suitable for previewing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub source: ImageSource,
    /// Object URL, device URI or filename shown as the preview
    pub preview: String,
}

impl SelectedImage {
    pub fn from_upload(upload: ImageUpload) -> Self {
        let preview = upload.filename.clone();
        Self {
            source: ImageSource::Upload(upload),
            preview,
        }
    }

    pub fn from_uri(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        Self {
            preview: uri.clone(),
            source: ImageSource::Uri(uri),
        }
    }

    /// Build the upload payload, reading URI-backed images through `loader`.
    pub async fn to_upload<L: AssetLoader>(&self, loader: &L) -> AcquireResult<ImageUpload> {
        match &self.source {
            ImageSource::Upload(upload) => Ok(upload.clone()),
            ImageSource::Uri(uri) => {
                let bytes = loader.load(uri).await?;
                Ok(ImageUpload::from_uri(bytes, uri))
            }
        }
    }
}

/// Why an acquisition produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// Drop or file input carried no file
    NoFile,
    /// The user dismissed the camera or gallery
    Cancelled,
}

/// Outcome of one acquisition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    Accepted(SelectedImage),
    Rejected(AcquireError),
    NoOp(NoOpReason),
}

// =============================================================================
// Web surface
// =============================================================================

/// Drag events over the drop zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
}

impl DragEvent {
    /// Highlight state of the drop zone after this event.
    pub fn drag_active(self) -> bool {
        matches!(self, DragEvent::Enter | DragEvent::Over)
    }
}

/// A file handed over by a drop or the file input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    /// MIME type as declared by the source, if any
    pub declared_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, declared_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.map(str::to_string),
            bytes,
        }
    }

    /// Read a file from disk. The declared type comes from its extension,
    /// the way a browser would report it.
    pub async fn from_path(path: impl AsRef<Path>) -> AcquireResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AcquireError::unreadable(path.display().to_string(), e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let declared_type = known_image_type(&name);

        Ok(Self::new(name, declared_type, bytes))
    }
}

/// Accept the first dropped or chosen file if it is an image.
pub fn accept_file(candidate: Option<FileCandidate>) -> Acquisition {
    let Some(file) = candidate else {
        return Acquisition::NoOp(NoOpReason::NoFile);
    };

    let is_image = file.declared_type.as_deref().is_some_and(is_image_mime);
    if !is_image {
        warn!("Rejected non-image file {}", file.name);
        return Acquisition::Rejected(AcquireError::InvalidFileType {
            name: file.name,
            declared: file.declared_type,
        });
    }

    debug!("Accepted {} ({:?})", file.name, file.declared_type);
    let upload =
        ImageUpload::with_declared_type(file.bytes, file.name, file.declared_type.as_deref());
    Acquisition::Accepted(SelectedImage::from_upload(upload))
}

/// Read a file from disk and run it through [`accept_file`].
pub async fn accept_file_from_path(path: impl AsRef<Path>) -> Acquisition {
    match FileCandidate::from_path(path).await {
        Ok(candidate) => accept_file(Some(candidate)),
        Err(e) => Acquisition::Rejected(e),
    }
}

// =============================================================================
// Mobile surface
// =============================================================================

/// Result of a permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// Platform permission prompts.
pub trait PermissionProvider {
    fn request_camera(&self) -> impl Future<Output = PermissionStatus> + Send;
    fn request_media_library(&self) -> impl Future<Output = PermissionStatus> + Send;
}

/// Which picker to launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSource {
    Camera,
    Library,
}

/// Options passed to the platform picker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    pub images_only: bool,
    pub allows_editing: bool,
    /// Crop aspect (width, height) when editing
    pub aspect: (u32, u32),
    /// Compression quality applied at the source, `0.0..=1.0`
    pub quality: f32,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            images_only: true,
            allows_editing: true,
            aspect: (4, 3),
            quality: 0.8,
        }
    }
}

/// What the picker returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerResult {
    Cancelled,
    Asset { uri: String },
}

/// Platform camera and gallery.
pub trait ImagePicker {
    fn launch_camera(
        &self,
        options: &CaptureOptions,
    ) -> impl Future<Output = AcquireResult<PickerResult>> + Send;

    fn launch_library(
        &self,
        options: &CaptureOptions,
    ) -> impl Future<Output = AcquireResult<PickerResult>> + Send;
}

/// Reads the bytes behind a device URI.
pub trait AssetLoader {
    fn load(&self, uri: &str) -> impl Future<Output = AcquireResult<Vec<u8>>> + Send;
}

/// Capture or pick an image.
///
/// Both permissions are requested before every action; if either is not
/// granted nothing else happens.
pub async fn capture<P, K>(permissions: &P, picker: &K, source: CaptureSource) -> Acquisition
where
    P: PermissionProvider,
    K: ImagePicker,
{
    let camera = permissions.request_camera().await;
    let library = permissions.request_media_library().await;
    if !camera.is_granted() || !library.is_granted() {
        warn!(
            "Permissions not granted (camera: {:?}, library: {:?})",
            camera, library
        );
        return Acquisition::Rejected(AcquireError::PermissionDenied);
    }

    let options = CaptureOptions::default();
    let picked = match source {
        CaptureSource::Camera => picker.launch_camera(&options).await,
        CaptureSource::Library => picker.launch_library(&options).await,
    };

    match picked {
        Ok(PickerResult::Asset { uri }) => {
            info!("Picked image {}", uri);
            Acquisition::Accepted(SelectedImage::from_uri(uri))
        }
        Ok(PickerResult::Cancelled) => Acquisition::NoOp(NoOpReason::Cancelled),
        Err(e) => {
            warn!("Image {:?} failed: {}", source, e);
            Acquisition::Rejected(e)
        }
    }
}

// =============================================================================
// Filesystem-backed providers
// =============================================================================

/// Desktop stand-in for the permission prompts: there is nothing to ask.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopPermissions;

impl PermissionProvider for DesktopPermissions {
    async fn request_camera(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    async fn request_media_library(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }
}

/// "Gallery" backed by a path on disk. There is no camera.
#[derive(Debug, Clone)]
pub struct FsPicker {
    path: Option<PathBuf>,
}

impl FsPicker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A picker the user dismissed without choosing anything.
    pub fn cancelled() -> Self {
        Self { path: None }
    }
}

impl ImagePicker for FsPicker {
    async fn launch_camera(&self, _options: &CaptureOptions) -> AcquireResult<PickerResult> {
        Err(AcquireError::capture_failed("no camera available"))
    }

    async fn launch_library(&self, _options: &CaptureOptions) -> AcquireResult<PickerResult> {
        let Some(path) = &self.path else {
            return Ok(PickerResult::Cancelled);
        };

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| AcquireError::unreadable(path.display().to_string(), e))?;
        if !metadata.is_file() {
            return Err(AcquireError::unreadable(
                path.display().to_string(),
                "not a regular file",
            ));
        }

        Ok(PickerResult::Asset {
            uri: format!("file://{}", path.display()),
        })
    }
}

/// Loads `file://` URIs and plain paths from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssetLoader;

impl AssetLoader for FsAssetLoader {
    async fn load(&self, uri: &str) -> AcquireResult<Vec<u8>> {
        let path = uri.strip_prefix("file://").unwrap_or(uri);
        tokio::fs::read(path)
            .await
            .map_err(|e| AcquireError::unreadable(uri, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_events() {
        assert!(DragEvent::Enter.drag_active());
        assert!(DragEvent::Over.drag_active());
        assert!(!DragEvent::Leave.drag_active());
    }

    #[test]
    fn test_accept_image_file() {
        let file = FileCandidate::new("leaf.jpg", Some("image/jpeg"), vec![1, 2, 3]);
        match accept_file(Some(file)) {
            Acquisition::Accepted(image) => {
                assert_eq!(image.preview, "leaf.jpg");
                match image.source {
                    ImageSource::Upload(upload) => assert_eq!(upload.content_type, "image/jpeg"),
                    other => panic!("Unexpected source: {:?}", other),
                }
            }
            other => panic!("Unexpected acquisition: {:?}", other),
        }
    }

    #[test]
    fn test_reject_non_image_file() {
        let file = FileCandidate::new("notes.txt", Some("text/plain"), b"hello".to_vec());
        assert_eq!(
            accept_file(Some(file)),
            Acquisition::Rejected(AcquireError::InvalidFileType {
                name: "notes.txt".to_string(),
                declared: Some("text/plain".to_string()),
            })
        );
    }

    #[test]
    fn test_reject_undeclared_type() {
        let file = FileCandidate::new("blob", None, vec![0]);
        assert!(matches!(
            accept_file(Some(file)),
            Acquisition::Rejected(AcquireError::InvalidFileType { .. })
        ));
    }

    #[test]
    fn test_no_file_is_noop() {
        assert_eq!(accept_file(None), Acquisition::NoOp(NoOpReason::NoFile));
    }

    #[test]
    fn test_capture_options_defaults() {
        let options = CaptureOptions::default();
        assert!(options.images_only);
        assert!(options.allows_editing);
        assert_eq!(options.aspect, (4, 3));
        assert_eq!(options.quality, 0.8);
    }

    #[tokio::test]
    async fn test_fs_picker_cancelled() {
        let acquisition = capture(
            &DesktopPermissions,
            &FsPicker::cancelled(),
            CaptureSource::Library,
        )
        .await;
        assert_eq!(acquisition, Acquisition::NoOp(NoOpReason::Cancelled));
    }

    #[tokio::test]
    async fn test_fs_picker_has_no_camera() {
        let acquisition = capture(
            &DesktopPermissions,
            &FsPicker::new("/tmp/leaf.jpg"),
            CaptureSource::Camera,
        )
        .await;
        assert!(matches!(
            acquisition,
            Acquisition::Rejected(AcquireError::CaptureFailed(_))
        ));
    }
}
