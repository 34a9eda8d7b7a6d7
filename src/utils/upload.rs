use chrono::Utc;
use log::{error, info, warn};
use rand::Rng;
use std::path::{Path, PathBuf};

use crate::errors::AppError;

pub const PROFILE_IMAGE_FIELD: &str = "profileImage";
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const ALLOWED_IMAGE_TYPES: [&str; 2] = ["image/jpeg", "image/png"];
/// Prefix of stored paths, and the URL prefix the upload directory is served under.
pub const PUBLIC_PREFIX: &str = "uploads";

/// An accepted image held in memory until the rest of the form has been validated.
#[derive(Debug, Clone)]
pub struct PendingImage {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PendingImage {
    /// Starts receiving a file part, rejecting disallowed content types up front.
    pub fn begin(original_name: &str, content_type: Option<&str>) -> Result<Self, AppError> {
        let content_type = content_type.unwrap_or_default().to_ascii_lowercase();
        if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
            return Err(AppError::Upload("Only JPEG or PNG images are allowed".to_string()));
        }
        Ok(PendingImage {
            original_name: original_name.to_string(),
            content_type,
            bytes: Vec::new(),
        })
    }

    pub fn push_chunk(&mut self, chunk: &[u8]) -> Result<(), AppError> {
        if self.bytes.len() + chunk.len() > MAX_IMAGE_BYTES {
            return Err(AppError::Upload("File too large".to_string()));
        }
        self.bytes.extend_from_slice(chunk);
        Ok(())
    }
}

/// Local directory holding uploaded profile images.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Opens the store, creating the directory if it does not exist yet.
    pub async fn init(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        if !tokio::fs::try_exists(&dir).await.unwrap_or(false) {
            info!("Creating upload directory {}", dir.display());
        }
        tokio::fs::create_dir_all(&dir).await?;
        Ok(UploadStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes the image under a fresh name and returns its relative path.
    pub async fn persist(&self, image: &PendingImage) -> Result<String, AppError> {
        let file_name = generate_file_name(&image.original_name);
        let path = self.dir.join(&file_name);

        tokio::fs::write(&path, &image.bytes).await.map_err(|e| {
            error!("Failed to store upload {}: {:?}", path.display(), e);
            AppError::InternalServerError(e.to_string())
        })?;

        info!(
            "Stored {} ({} bytes, {})",
            file_name,
            image.bytes.len(),
            image.content_type
        );
        Ok(format!("{}/{}", PUBLIC_PREFIX, file_name))
    }

    /// Removes a file previously returned by `persist`. Failures are only logged.
    pub async fn discard(&self, stored_path: &str) {
        let Some(file_name) = stored_path
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
        else {
            return;
        };
        if let Err(e) = tokio::fs::remove_file(self.dir.join(file_name)).await {
            warn!("Failed to remove orphaned upload {}: {:?}", stored_path, e);
        }
    }
}

/// `<millis>-<9 random digits>-<client file name>`
pub fn generate_file_name(original_name: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(100_000_000..1_000_000_000);
    format!(
        "{}-{}-{}",
        Utc::now().timestamp_millis(),
        suffix,
        sanitize_file_name(original_name)
    )
}

fn sanitize_file_name(original_name: &str) -> String {
    // Clients may send full paths; keep the last component only.
    let base = original_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();
    match base {
        "" | "." | ".." => "image".to_string(),
        name => truncate_file_name(name, MAX_CLIENT_NAME_BYTES),
    }
}

/// Room left for the client part once the timestamp, the random digits and
/// `uploads/` are accounted for. Keeps both the on-disk name (255 bytes) and
/// the stored path (`VARCHAR(255)`) in range.
const MAX_CLIENT_NAME_BYTES: usize = 200;
const MAX_EXTENSION_BYTES: usize = 16;

/// Shortens `name` to at most `max` bytes on a char boundary, keeping a short
/// extension intact.
fn truncate_file_name(name: &str, max: usize) -> String {
    if name.len() <= max {
        return name.to_string();
    }
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 && name.len() - dot <= MAX_EXTENSION_BYTES => name.split_at(dot),
        _ => (name, ""),
    };
    let mut end = max - ext.len();
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &stem[..end], ext)
}
