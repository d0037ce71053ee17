use std::{
    collections::HashMap,
    io::Cursor,
    path::{Path, PathBuf},
};

use axum::{body::Bytes, extract::Multipart};
use image::{DynamicImage, GenericImageView, ImageFormat};
use uuid::Uuid;

use crate::{
    config::UploadConfig,
    error::{AppError, Result},
};

/// Allowed image extensions
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Bytes,
}

/// A drained multipart body. File parts that arrive without a name or
/// without content count as "no file chosen".
#[derive(Debug, Default)]
pub struct MultipartForm {
    texts: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Upload(format!("Could not read form data: {}", e.body_text())))?
        {
            let name = field.name().unwrap_or("").to_string();

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Upload(format!("Could not read upload: {}", e.body_text())))?;
                    if !file_name.is_empty() && !data.is_empty() {
                        form.files.insert(name, UploadedFile { file_name, data });
                    }
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::Upload(format!("Could not read form data: {}", e.body_text())))?;
                    form.texts.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> String {
        self.texts.get(name).cloned().unwrap_or_default()
    }

    /// Trimmed value, `None` when absent or blank.
    pub fn opt_text(&self, name: &str) -> Option<String> {
        self.texts
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }
}

/// Writes uploaded images under the uploads directory, shrinking anything
/// larger than the configured bounds.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    max_width: u32,
    max_height: u32,
}

impl ImageStore {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.dir),
            max_width: config.max_width,
            max_height: config.max_height,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stores the image and returns the generated file name.
    pub async fn save(&self, original_name: &str, data: Bytes) -> Result<String> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::Upload(format!(
                "Invalid file type. Allowed: {}",
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::Internal(format!("Failed to create uploads directory: {}", e))
        })?;

        let stem = safe_stem(original_name);
        let store = self.clone();

        tokio::task::spawn_blocking(move || store.write_image(&stem, &data))
            .await
            .map_err(|e| AppError::Internal(format!("Image task failed: {}", e)))?
    }

    fn write_image(&self, stem: &str, data: &[u8]) -> Result<String> {
        let format = image::guess_format(data)
            .ok()
            .filter(|f| matches!(f, ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Gif | ImageFormat::WebP))
            .ok_or_else(|| AppError::Upload("Uploaded file is not a supported image.".to_string()))?;

        let img = image::load_from_memory_with_format(data, format)
            .map_err(|_| AppError::Upload("Uploaded file is not a supported image.".to_string()))?;

        let prefix = Uuid::new_v4().simple().to_string();
        let ext = format.extensions_str().first().copied().unwrap_or("img");
        let file_name = format!("{}_{}.{}", &prefix[..8], stem, ext);
        let path = self.dir.join(&file_name);

        let (width, height) = img.dimensions();
        if width <= self.max_width && height <= self.max_height {
            std::fs::write(&path, data)
                .map_err(|e| AppError::Internal(format!("Failed to write file: {}", e)))?;
        } else {
            let resized = img.thumbnail(self.max_width, self.max_height);
            let resized = match format {
                ImageFormat::Jpeg => DynamicImage::ImageRgb8(resized.to_rgb8()),
                _ => DynamicImage::ImageRgba8(resized.to_rgba8()),
            };
            let mut buf = Cursor::new(Vec::new());
            resized
                .write_to(&mut buf, format)
                .map_err(|e| AppError::Internal(format!("Failed to encode image: {}", e)))?;
            std::fs::write(&path, buf.into_inner())
                .map_err(|e| AppError::Internal(format!("Failed to write file: {}", e)))?;
        }

        tracing::debug!(file = %file_name, width, height, "stored upload");
        Ok(file_name)
    }

    /// Best-effort delete of a previously stored image.
    pub async fn remove(&self, file_name: &str) {
        let safe = sanitize_filename::sanitize(file_name);
        if safe.is_empty() || safe != file_name {
            return;
        }
        if let Err(e) = tokio::fs::remove_file(self.dir.join(&safe)).await {
            tracing::warn!(file = %safe, "could not remove old upload: {}", e);
        }
    }

    /// Removes a just-saved image when the row that should reference it
    /// failed to write.
    pub async fn keep_if_stored<T>(&self, saved: Option<&str>, result: Result<T>) -> Result<T> {
        if let (Err(e), Some(name)) = (&result, saved) {
            tracing::warn!(file = %name, "dropping upload after failed write: {}", e);
            self.remove(name).await;
        }
        result
    }
}

fn safe_stem(original_name: &str) -> String {
    let sanitized = sanitize_filename::sanitize(original_name);
    let stem: String = Path::new(&sanitized)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    let stem = stem.trim_matches('.');

    if stem.is_empty() {
        "image".to_string()
    } else {
        stem.to_string()
    }
}
