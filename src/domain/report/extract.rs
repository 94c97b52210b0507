//! Generated-text extraction from response segments

/// Concatenate text segments in response order.
///
/// Returns `None` when there are no segments or every segment is blank,
/// so callers can report an empty response.
pub fn join_text_segments<'a, I>(segments: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let text: String = segments.into_iter().collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
