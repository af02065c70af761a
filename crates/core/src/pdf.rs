//! Best-effort PDF metadata derivation.
//!
//! Ingestion wants a page count for the book detail page, but parsing a
//! full PDF object graph is out of proportion for a nice-to-have field.
//! Instead we scan the raw bytes for page object markers and return `None`
//! when the scan finds nothing plausible. Ingestion never blocks on this.

/// Byte pattern marking a page object in an uncompressed object table.
const PAGE_MARKERS: [&[u8]; 2] = [b"/Type /Page", b"/Type/Page"];

/// Count page objects in raw PDF bytes.
///
/// Matches `/Type /Page` (and the unspaced form) while excluding the
/// `/Type /Pages` tree nodes. Returns `None` for zero matches, which
/// happens for fully compressed object streams -- indeterminate, not zero.
pub fn page_count(bytes: &[u8]) -> Option<i32> {
    let mut count = 0;
    for marker in PAGE_MARKERS {
        let mut offset = 0;
        while let Some(pos) = find(&bytes[offset..], marker) {
            let end = offset + pos + marker.len();
            // `/Type /Pages` is the page-tree node, not a page.
            if bytes.get(end) != Some(&b's') {
                count += 1;
            }
            offset = end;
        }
    }
    if count > 0 {
        Some(count)
    } else {
        None
    }
}

/// File size in whole kilobytes, rounding up so a non-empty file is never 0.
pub fn size_kb(size_bytes: u64) -> i32 {
    size_bytes.div_ceil(1024).min(i32::MAX as u64) as i32
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
