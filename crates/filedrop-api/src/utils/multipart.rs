//! Multipart extraction helpers.

use axum::extract::Multipart;
use filedrop_core::models::PendingUpload;
use filedrop_core::AppError;

/// Collect all file parts from a multipart request, in the order they appear
/// on the wire.
///
/// Parts without a filename (plain form fields) are skipped. Each file body
/// is read fully into memory; the body limit layer bounds how much that can
/// be.
pub async fn collect_file_parts(mut multipart: Multipart) -> Result<Vec<PendingUpload>, AppError> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid multipart request: {}", e)))?
    {
        let Some(file_name) = field.file_name().map(sanitize_file_name) else {
            continue;
        };

        let field_name = field.name().unwrap_or("file").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read file part: {}", e)))?;

        uploads.push(PendingUpload {
            field_name,
            file_name,
            content_type,
            data,
        });
    }

    Ok(uploads)
}

/// Strip any client-supplied path prefix, keeping the final component only.
/// Browsers normally send a bare filename, but IE and some tools send full
/// Windows paths.
pub fn sanitize_file_name(name: &str) -> String {
    name.rsplit(['/', '\\']).next().unwrap_or(name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_names_pass_through() {
        assert_eq!(sanitize_file_name("photo.png"), "photo.png");
    }

    #[test]
    fn windows_paths_are_stripped() {
        assert_eq!(sanitize_file_name("C:\\Users\\me\\photo.png"), "photo.png");
    }

    #[test]
    fn unix_paths_are_stripped() {
        assert_eq!(sanitize_file_name("/home/me/photo.png"), "photo.png");
    }

    #[test]
    fn mixed_separators_keep_final_component() {
        assert_eq!(sanitize_file_name("a/b\\c.png"), "c.png");
    }
}
