//! Collect-all field validation and upload constraints.
//!
//! Form-style input is validated with a [`FieldErrors`] accumulator so the
//! caller can show the user everything wrong at once, instead of failing on
//! the first bad field. Infrastructure failures stay on the error channel;
//! only user input flows through here.
//!
//! File type checks sniff content rather than trusting the client-supplied
//! MIME type, which is attacker-controlled.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Upload limits
// ---------------------------------------------------------------------------

/// Default maximum PDF upload size in megabytes.
pub const DEFAULT_MAX_PDF_MB: u64 = 50;

/// Default maximum cover image upload size in megabytes.
pub const DEFAULT_MAX_COVER_MB: u64 = 5;

/// Maximum category name length.
pub const MAX_CATEGORY_NAME_LEN: usize = 50;

/// Maximum title/author field length.
pub const MAX_TEXT_FIELD_LEN: usize = 255;

// ---------------------------------------------------------------------------
// Field error accumulator
// ---------------------------------------------------------------------------

/// Accumulates field-level validation failures.
///
/// Checks append messages instead of returning early; [`FieldErrors::into_result`]
/// converts the batch into a single error once every field has been looked at.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for one field.
    pub fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.errors
    }

    /// `Ok(())` if clean, otherwise all messages joined into one
    /// [`CoreError::Validation`].
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(self.errors.join("; ")))
        }
    }

    pub fn into_messages(self) -> Vec<String> {
        self.errors
    }
}

// ---------------------------------------------------------------------------
// Field checks
// ---------------------------------------------------------------------------

/// Require a non-blank text field, bounded to [`MAX_TEXT_FIELD_LEN`].
pub fn check_required_text(errors: &mut FieldErrors, field: &str, value: &str) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(format!("{field} is required"));
    } else if trimmed.len() > MAX_TEXT_FIELD_LEN {
        errors.push(format!(
            "{field} must be at most {MAX_TEXT_FIELD_LEN} characters"
        ));
    }
}

/// Require a selected category (positive id).
pub fn check_category_selected(errors: &mut FieldErrors, category_id: Option<i64>) {
    match category_id {
        Some(id) if id > 0 => {}
        _ => errors.push("A category must be selected".to_string()),
    }
}

/// Validate an optional published year, if supplied.
pub fn check_published_year(errors: &mut FieldErrors, year: Option<i32>) {
    if let Some(y) = year {
        // Plausible print-era bounds; the form sends a free-text year.
        if !(1400..=2100).contains(&y) {
            errors.push(format!("Published year {y} is out of range"));
        }
    }
}

/// Validate a category name: required, unique length bound.
pub fn check_category_name(errors: &mut FieldErrors, name: &str) {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        errors.push("Category name is required".to_string());
    } else if trimmed.len() > MAX_CATEGORY_NAME_LEN {
        errors.push(format!(
            "Category name must be at most {MAX_CATEGORY_NAME_LEN} characters"
        ));
    }
}

/// Check an upload against a size limit given in megabytes.
pub fn check_upload_size(errors: &mut FieldErrors, label: &str, size_bytes: u64, max_mb: u64) {
    if size_bytes > max_mb * 1024 * 1024 {
        errors.push(format!(
            "{label} exceeds the {max_mb} MB size limit ({} bytes)",
            size_bytes
        ));
    }
}

// ---------------------------------------------------------------------------
// Content sniffing
// ---------------------------------------------------------------------------

/// Whether the payload starts with the PDF magic bytes (`%PDF-`).
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF-")
}

// ---------------------------------------------------------------------------
// Staging names
// ---------------------------------------------------------------------------

/// Reduce a title to a filesystem-safe slug for staged file names.
///
/// Lowercases, maps runs of non-alphanumeric characters to single
/// underscores, and truncates. An empty result falls back to `"book"`.
pub fn slugify_title(title: &str) -> String {
    let mut slug = String::new();
    let mut last_was_sep = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('_');
            last_was_sep = true;
        }
        if slug.len() >= 40 {
            break;
        }
    }
    let slug = slug.trim_matches('_').to_string();
    if slug.is_empty() {
        "book".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- accumulator ---------------------------------------------------------

    #[test]
    fn empty_accumulator_is_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn all_failures_are_collected_not_first_only() {
        let mut errors = FieldErrors::new();
        check_required_text(&mut errors, "Title", "");
        check_required_text(&mut errors, "Author", "  ");
        check_category_selected(&mut errors, None);
        assert_eq!(errors.messages().len(), 3);

        let err = errors.into_result().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Title"));
        assert!(msg.contains("Author"));
        assert!(msg.contains("category"));
    }

    // -- field checks --------------------------------------------------------

    #[test]
    fn required_text_accepts_normal_input() {
        let mut errors = FieldErrors::new();
        check_required_text(&mut errors, "Title", "Algorithms");
        assert!(errors.is_empty());
    }

    #[test]
    fn zero_category_id_is_not_selected() {
        let mut errors = FieldErrors::new();
        check_category_selected(&mut errors, Some(0));
        assert!(!errors.is_empty());
    }

    #[test]
    fn missing_year_is_fine() {
        let mut errors = FieldErrors::new();
        check_published_year(&mut errors, None);
        assert!(errors.is_empty());
    }

    #[test]
    fn implausible_year_is_rejected() {
        let mut errors = FieldErrors::new();
        check_published_year(&mut errors, Some(9999));
        assert!(!errors.is_empty());
    }

    #[test]
    fn category_name_length_bound() {
        let mut errors = FieldErrors::new();
        check_category_name(&mut errors, &"x".repeat(51));
        assert!(!errors.is_empty());
    }

    // -- upload size ---------------------------------------------------------

    #[test]
    fn oversized_pdf_reports_size_limit() {
        let mut errors = FieldErrors::new();
        check_upload_size(&mut errors, "PDF", 60 * 1024 * 1024, DEFAULT_MAX_PDF_MB);
        let err = errors.into_result().unwrap_err();
        assert!(err.to_string().contains("50 MB size limit"));
    }

    #[test]
    fn pdf_at_the_limit_passes() {
        let mut errors = FieldErrors::new();
        check_upload_size(&mut errors, "PDF", 50 * 1024 * 1024, DEFAULT_MAX_PDF_MB);
        assert!(errors.is_empty());
    }

    // -- sniffing ------------------------------------------------------------

    #[test]
    fn pdf_magic_detected() {
        assert!(is_pdf(b"%PDF-1.7\n..."));
        assert!(!is_pdf(b"<html>not a pdf</html>"));
        assert!(!is_pdf(b""));
    }

    // -- slug ----------------------------------------------------------------

    #[test]
    fn slug_collapses_punctuation() {
        assert_eq!(slugify_title("Algorithms, 4th Ed."), "algorithms_4th_ed");
    }

    #[test]
    fn slug_of_garbage_falls_back() {
        assert_eq!(slugify_title("!!!"), "book");
    }

    #[test]
    fn slug_is_bounded() {
        let slug = slugify_title(&"long title ".repeat(20));
        assert!(slug.len() <= 40);
    }
}
