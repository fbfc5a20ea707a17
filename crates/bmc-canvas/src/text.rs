//! Newline-delimited text blocks
//!
//! Canvas sections are edited as one text block per section and stored on the
//! backend as lists of entries. These two functions convert between the forms.

/// Split a text block into list entries, one per line, dropping empty lines
///
/// Lines are not trimmed: a line holding only spaces is kept.
#[must_use]
pub fn split_to_list(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join list entries into a text block, one entry per line
#[must_use]
pub fn join_with_newline<S: AsRef<str>>(items: &[S]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(item.as_ref());
    }
    out
}
