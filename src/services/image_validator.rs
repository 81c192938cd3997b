use std::path::Path;

use bytesize::ByteSize;
use image::ImageFormat;

use crate::errors::FieldViolation;

const FILE_FIELD: &str = "file";

struct AcceptedFormat {
    format: ImageFormat,
    mime_type: &'static str,
    extensions: &'static [&'static str],
}

const ACCEPTED_FORMATS: &[AcceptedFormat] = &[
    AcceptedFormat {
        format: ImageFormat::Jpeg,
        mime_type: "image/jpeg",
        extensions: &["jpg", "jpeg"],
    },
    AcceptedFormat {
        format: ImageFormat::Png,
        mime_type: "image/png",
        extensions: &["png"],
    },
    AcceptedFormat {
        format: ImageFormat::Gif,
        mime_type: "image/gif",
        extensions: &["gif"],
    },
    AcceptedFormat {
        format: ImageFormat::WebP,
        mime_type: "image/webp",
        extensions: &["webp"],
    },
];

/// A file received in a multipart upload.
///
/// `size` is the number of bytes sent by the client. Bytes past the
/// configured maximum are counted but not kept, so `bytes` may be shorter
/// than `size` for oversized uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub original_name: Option<String>,
    pub content_type: Option<String>,
    pub size: u64,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ImageValidator {
    max_size: u64,
}

impl ImageValidator {
    pub fn new(max_size: u64) -> Self {
        Self { max_size }
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Checks `file` against the upload policy. Every violation is reported;
    /// an empty list means the file is acceptable.
    pub fn validate(&self, file: Option<&UploadedFile>) -> Vec<FieldViolation> {
        let Some(file) = file else {
            return vec![FieldViolation::new(FILE_FIELD, "Please upload a file.")];
        };

        let mut violations = Vec::new();

        if file.size == 0 {
            violations.push(FieldViolation::new(FILE_FIELD, "An empty file is not allowed."));
        }

        if file.size > self.max_size {
            violations.push(FieldViolation::new(
                FILE_FIELD,
                format!(
                    "The file is too large ({}). Allowed maximum size is {}.",
                    ByteSize::b(file.size),
                    ByteSize::b(self.max_size)
                ),
            ));
        }

        let content_type = file.content_type.as_deref().unwrap_or_default();
        if !ACCEPTED_FORMATS.iter().any(|f| f.mime_type == content_type) {
            violations.push(FieldViolation::new(
                FILE_FIELD,
                format!(
                    "The mime type of the file is invalid (\"{}\"). Allowed mime types are {}.",
                    content_type,
                    quoted_list(ACCEPTED_FORMATS.iter().map(|f| f.mime_type))
                ),
            ));
        }

        let extension = file_extension(file).unwrap_or_default();
        if !ACCEPTED_FORMATS
            .iter()
            .any(|f| f.extensions.contains(&extension.as_str()))
        {
            violations.push(FieldViolation::new(
                FILE_FIELD,
                format!(
                    "The extension of the file is invalid (\"{}\"). Allowed extensions are {}.",
                    extension,
                    quoted_list(ACCEPTED_FORMATS.iter().flat_map(|f| f.extensions.iter().copied()))
                ),
            ));
        }

        if !file.bytes.is_empty() && detect_format(&file.bytes).is_none() {
            violations.push(FieldViolation::new(
                FILE_FIELD,
                "The file content is not a valid image.",
            ));
        }

        violations
    }

    /// Extension to store a validated file under, taken from its content.
    pub fn storage_extension(file: &UploadedFile) -> &'static str {
        detect_format(&file.bytes)
            .and_then(|f| f.extensions_str().first().copied())
            .unwrap_or("bin")
    }
}

fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
    let format = image::guess_format(bytes).ok()?;
    ACCEPTED_FORMATS
        .iter()
        .any(|f| f.format == format)
        .then_some(format)
}

fn file_extension(file: &UploadedFile) -> Option<String> {
    let name = file.original_name.as_deref()?;
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

fn quoted_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items
        .map(|item| format!("\"{}\"", item))
        .collect::<Vec<_>>()
        .join(", ")
}
