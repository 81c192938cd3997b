use actix_multipart::{Multipart, MultipartError};
use actix_web::{HttpMessage, HttpRequest};
use futures::TryStreamExt;

use crate::{errors::AppError, services::UploadedFile};

/// Reading an oversized file stops once it passes this multiple of the limit.
const READ_LIMIT_FACTOR: u64 = 2;
/// Combined size allowed for every part other than the file.
const OTHER_PARTS_LIMIT: u64 = 64 * 1024;

fn malformed(err: MultipartError) -> AppError {
    AppError::ValidationError(format!("Malformed multipart body: {}", err))
}

/// Reads the part named `field_name` out of a multipart body.
///
/// Returns `None` when the request is not multipart, when no such part was
/// sent, or when the part is an empty file input. Bytes past `max_size` are
/// counted but dropped, and reading gives up once the file is twice the limit,
/// so `size` of an oversized file is a lower bound. Other parts are drained
/// and ignored up to a small budget.
pub async fn read_file_field(
    req: &HttpRequest,
    mut payload: Multipart,
    field_name: &str,
    max_size: u64,
) -> Result<Option<UploadedFile>, AppError> {
    if !req.content_type().starts_with("multipart/") {
        return Ok(None);
    }

    let read_limit = max_size.saturating_mul(READ_LIMIT_FACTOR);
    let mut other_bytes: u64 = 0;
    let mut file = None;

    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        if file.is_some() || field.name() != Some(field_name) {
            while let Some(chunk) = field.try_next().await.map_err(malformed)? {
                other_bytes += chunk.len() as u64;
                if other_bytes > OTHER_PARTS_LIMIT {
                    return Err(AppError::ValidationError(format!(
                        "Multipart parts other than '{}' exceed {} bytes",
                        field_name, OTHER_PARTS_LIMIT
                    )));
                }
            }
            continue;
        }

        let original_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|m| m.essence_str().to_string());

        let mut size: u64 = 0;
        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(malformed)? {
            size += chunk.len() as u64;
            if size <= max_size {
                bytes.extend_from_slice(&chunk);
            } else if size > read_limit {
                log::debug!("Stopped reading '{}' after {} bytes", field_name, size);
                return Ok(Some(UploadedFile {
                    original_name,
                    content_type,
                    size,
                    bytes,
                }));
            }
        }

        if size == 0 && original_name.as_deref().unwrap_or_default().is_empty() {
            log::debug!("Ignoring empty file input '{}'", field_name);
            continue;
        }

        file = Some(UploadedFile {
            original_name,
            content_type,
            size,
            bytes,
        });
    }

    Ok(file)
}
