// Component C: ZIP extractor (spec §4.C).
//
// Runs synchronously; callers (the connection layer, per spec §5) are
// expected to dispatch this onto `tokio::task::spawn_blocking` so it never
// blocks the frame dispatcher. Writes are write-then-rename where the
// filesystem allows it, same convention as the teacher's fallback static
// file serving (`tower_http::services::ServeDir`/`ServeFile` swap), adapted
// here to a plain write-then-rename since there is no `tower-http` pull for
// what is otherwise a two-call `std::fs` operation.

use std::io::Read;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZipExtractError {
    #[error("malformed ZIP archive")]
    Malformed,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Default)]
pub struct ExtractedZip {
    pub written: Vec<PathBuf>,
    pub skipped_unsafe: Vec<String>,
}

fn is_unsafe_entry_name(name: &str) -> bool {
    let path = Path::new(name);
    path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, Component::ParentDir))
}

/// Extract every non-directory entry of `bytes` into `dest_dir`, rejecting
/// path-traversal entry names silently (spec §4.C "Safety").
pub fn extract_resource_zip(bytes: &[u8], dest_dir: &Path) -> Result<ExtractedZip, ZipExtractError> {
    let reader = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(reader).map_err(|_| ZipExtractError::Malformed)?;
    let mut result = ExtractedZip::default();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|_| ZipExtractError::Malformed)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_owned();
        if is_unsafe_entry_name(&name) {
            result.skipped_unsafe.push(name);
            continue;
        }
        let dest_path = dest_dir.join(&name);
        if let Some(parent) = dest_path.parent() {
            std::fs::create_dir_all(parent).map_err(ZipExtractError::Io)?;
        }
        let mut buf = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut buf).map_err(ZipExtractError::Io)?;

        let tmp_path = PathBuf::from(format!("{}.tmp", dest_path.display()));
        std::fs::write(&tmp_path, &buf).map_err(ZipExtractError::Io)?;
        std::fs::rename(&tmp_path, &dest_path).map_err(ZipExtractError::Io)?;
        result.written.push(dest_path);
    }
    Ok(result)
}

/// Translations ZIPs carry exactly one entry, `translations.json` (spec §4.C).
pub fn extract_translations_json(bytes: &[u8]) -> Result<Vec<u8>, ZipExtractError> {
    let reader = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(reader).map_err(|_| ZipExtractError::Malformed)?;
    let mut entry = archive
        .by_name("translations.json")
        .map_err(|_| ZipExtractError::Malformed)?;
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf).map_err(ZipExtractError::Io)?;
    Ok(buf)
}
