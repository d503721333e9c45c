//! Output filename derivation.

use crate::types::OutputFormat;

/// Stem used when the source filename has none.
const FALLBACK_STEM: &str = "cover";

/// Suggest a filename for the square output: the source stem with a
/// `-square` suffix and the format's extension.
///
/// Only the final extension is removed, so `art.final.png` becomes
/// `art.final-square.jpg`.
#[must_use]
pub fn suggested_filename(source_filename: &str, format: OutputFormat) -> String {
    let name = source_filename.trim();
    let stem = match name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => name,
    };
    let stem = if stem.is_empty() { FALLBACK_STEM } else { stem };
    format!("{stem}-square.{}", format.extension())
}
