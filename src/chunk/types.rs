use std::path::{Path, PathBuf};

use super::error::{ChunkError, Result};

/// A path-backed file queued for upload.
///
/// Carries the metadata the upload endpoint needs (name, content type,
/// size); the bytes themselves are read lazily, one slice at a time.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    file_name: String,
    content_type: String,
    size: u64,
}

impl FileSource {
    /// Open a file and capture its metadata.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await?;

        let file_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let content_type = content_type_for(&file_name).to_string();

        Ok(Self {
            path,
            file_name,
            content_type,
            size: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// A window over `[offset, offset + len)` of this file.
    pub fn slice(&self, offset: u64, len: u64) -> Result<FileSlice<'_>> {
        let end = offset + len;
        if end > self.size {
            return Err(ChunkError::SliceOutOfBounds {
                offset,
                end,
                size: self.size,
            });
        }
        Ok(FileSlice {
            source: self,
            offset,
            len,
        })
    }

    /// A slice covering the whole file (the direct-upload path).
    pub fn whole(&self) -> FileSlice<'_> {
        FileSlice {
            source: self,
            offset: 0,
            len: self.size,
        }
    }
}

/// A byte range of a [`FileSource`].
#[derive(Debug, Clone, Copy)]
pub struct FileSlice<'a> {
    source: &'a FileSource,
    offset: u64,
    len: u64,
}

impl<'a> FileSlice<'a> {
    pub fn source(&self) -> &'a FileSource {
        self.source
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Content type by file extension, for the document types the platform
/// handles. Everything else ships as an opaque octet stream.
pub fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}
