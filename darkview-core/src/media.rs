use std::fmt;
use std::path::Path;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Extensions offered by the file picker: PDFs plus the usual image formats.
/// Images are accepted by the picker but reported as unsupported.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg", "gif", "webp", "bmp", "svg"];

/// Declared media type of a selected file, derived from its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType(String);

impl MediaType {
    pub fn new(media_type: impl Into<String>) -> Self {
        Self(media_type.into())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let guessed = mime_guess::from_path(path).first_raw().unwrap_or(UNKNOWN_MEDIA_TYPE);
        Self::new(guessed)
    }

    pub fn is_pdf(&self) -> bool {
        self.0.eq_ignore_ascii_case(PDF_MEDIA_TYPE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_extension_is_pdf() {
        assert!(MediaType::from_path("papers/report.pdf").is_pdf());
        assert!(MediaType::from_path("REPORT.PDF").is_pdf());
    }

    #[test]
    fn images_and_unknown_files_are_not_pdf() {
        let png = MediaType::from_path("scan.png");
        assert_eq!(png.as_str(), "image/png");
        assert!(!png.is_pdf());

        let unknown = MediaType::from_path("notes");
        assert_eq!(unknown.as_str(), UNKNOWN_MEDIA_TYPE);
        assert!(!unknown.is_pdf());
    }

    #[test]
    fn declared_type_comparison_ignores_case() {
        assert!(MediaType::new("Application/PDF").is_pdf());
    }
}
