use std::io::Write;
use std::path::Path;

use ia_core::error::ConvertError;
use ia_core::pixel::AsciiArt;

/// Write the artifact to a UTF-8 text file with a trailing newline.
///
/// A failed write never affects the in-memory artifact; the caller keeps it
/// and may retry with another path.
///
/// # Errors
/// `ConvertError::Io` on any filesystem failure.
///
/// # Example
/// ```no_run
/// use ia_core::pixel::AsciiArt;
/// use ia_export::text::save_text;
/// use std::path::Path;
/// let art = AsciiArt::new(vec!["@@".into()]);
/// save_text(&art, Path::new("out.txt")).unwrap();
/// ```
pub fn save_text(art: &AsciiArt, path: &Path) -> Result<(), ConvertError> {
    let mut file = std::fs::File::create(path)?;
    for line in art.lines() {
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")?;
    }
    file.flush()?;
    log::info!("saved {}×{} chars to {}", art.cols(), art.rows(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_file_matches_artifact_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.txt");
        let art = AsciiArt::new(vec!["ab".into(), "cd".into()]);
        save_text(&art, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "ab\ncd\n");
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let art = AsciiArt::new(vec!["x".into()]);
        let err = save_text(&art, Path::new("/nonexistent/dir/art.txt")).unwrap_err();
        assert!(matches!(err, ConvertError::Io(_)));
    }
}
