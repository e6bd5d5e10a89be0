//! Per-occurrence scan over the raw bytes of a body.
//!
//! Every byte the scanner stops on (`"`, `\`, `:`, space, tab) is ASCII, so
//! the ranges it produces always fall on UTF-8 character boundaries.

use std::ops::Range;

use tracing::trace;

/// Why an occurrence of a sensitive field was left as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Skip {
    /// No `:` anywhere after the field name.
    NoColon,
    /// The text ends right after the colon (and optional blanks).
    MissingValue,
    /// The value is not a string: number, boolean, `null`, object, array, ...
    NonString,
    /// The string value never gets its closing quote.
    Unterminated,
}

/// What to do with one occurrence of a sensitive field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Mask this byte range, the interior of the string value (quotes excluded).
    Mask(Range<usize>),
    /// Leave the occurrence alone.
    Skip(Skip),
}

#[derive(Debug, Clone, Copy)]
enum State {
    SeekColon { from: usize },
    SkipWhitespace { pos: usize },
    SeekStringEnd { open: usize, pos: usize },
}

/// Resolves the occurrence of a field token starting at `token_start`.
pub(crate) fn resolve(text: &[u8], token_start: usize) -> Outcome {
    let mut state = State::SeekColon { from: token_start };
    loop {
        state = match state {
            State::SeekColon { from } => match find_byte(text, from, b':') {
                Some(colon) => State::SkipWhitespace { pos: colon + 1 },
                None => return Outcome::Skip(Skip::NoColon),
            },
            State::SkipWhitespace { pos } => match text.get(pos) {
                Some(b' ' | b'\t') => State::SkipWhitespace { pos: pos + 1 },
                Some(b'"') => State::SeekStringEnd {
                    open: pos,
                    pos: pos + 1,
                },
                Some(_) => return Outcome::Skip(Skip::NonString),
                None => return Outcome::Skip(Skip::MissingValue),
            },
            State::SeekStringEnd { open, pos } => match text.get(pos) {
                Some(b'"') => return Outcome::Mask(open + 1..pos),
                Some(b'\\') => State::SeekStringEnd { open, pos: pos + 2 },
                Some(_) => State::SeekStringEnd { open, pos: pos + 1 },
                None => return Outcome::Skip(Skip::Unterminated),
            },
        };
    }
}

/// Collects the ranges to mask for every occurrence of `"<field>"` in `text`.
///
/// The result is sorted and non-overlapping. Applying it in one pass gives the
/// same text as masking each value and searching again in the updated text:
/// an occurrence that overlaps a masked interior would not exist anymore.
pub(crate) fn field_edits(text: &[u8], field: &str) -> Vec<Range<usize>> {
    let token = format!("\"{field}\"");
    let token = token.as_bytes();

    let mut edits: Vec<Range<usize>> = Vec::new();
    let mut from = 0;
    while let Some(start) = find_token(text, from, token) {
        let end = start + token.len();

        let swallowed = edits
            .last()
            .is_some_and(|last| start < last.end && end > last.start);
        if swallowed {
            from = start + 1;
            continue;
        }

        match resolve(text, start) {
            // the same value reached again from a token sitting before it
            Outcome::Mask(range) if edits.last() == Some(&range) => {}
            Outcome::Mask(range) => edits.push(range),
            Outcome::Skip(reason) => trace!(field, start, ?reason, "sensitive field left as is"),
        }
        from = end;
    }

    edits
}

fn find_byte(text: &[u8], from: usize, needle: u8) -> Option<usize> {
    text.get(from..)?
        .iter()
        .position(|&byte| byte == needle)
        .map(|offset| from + offset)
}

fn find_token(text: &[u8], from: usize, token: &[u8]) -> Option<usize> {
    if token.is_empty() {
        return None;
    }
    text.get(from..)?
        .windows(token.len())
        .position(|window| window.eq_ignore_ascii_case(token))
        .map(|offset| from + offset)
}
