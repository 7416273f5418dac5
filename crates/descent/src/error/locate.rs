use memchr::memchr_iter;

use super::Location;

/// Translates a byte offset into a 1-based line/column pair.
///
/// Columns count characters, not bytes, so multibyte text locates the same
/// way an editor displays it. `offset` is clamped to the source length.
#[must_use]
pub fn locate(src: &str, offset: usize) -> Location {
    let offset = offset.min(src.len());
    let mut line = 1u32;
    let mut line_start = 0usize;
    for lf in memchr_iter(b'\n', src.as_bytes()) {
        if lf >= offset {
            break;
        }
        line += 1;
        line_start = lf + 1;
    }
    let column = src[line_start..offset].chars().count() as u32 + 1;
    Location { line, column }
}
