//! Range-widening heuristics for deletions.
//!
//! Each adjustment inspects the bytes around a range that is about to be
//! deleted and widens it to swallow punctuation or whitespace the deletion
//! would otherwise orphan. All of them are pure: the result depends only on
//! the source and the input range. They are also idempotent: a range that
//! already holds the token an adjustment would swallow is left as it is.

use std::ops::Range;

fn byte_at(source: &str, index: usize) -> Option<u8> {
    source.as_bytes().get(index).copied()
}

fn byte_before(source: &str, index: usize) -> Option<u8> {
    index.checked_sub(1).and_then(|before| byte_at(source, before))
}

fn precedes(source: &str, index: usize, token: &str) -> bool {
    index
        .checked_sub(token.len())
        .and_then(|start| source.as_bytes().get(start..index))
        .is_some_and(|bytes| bytes == token.as_bytes())
}

fn covered<'a>(source: &'a str, range: &Range<usize>) -> &'a str {
    source.get(range.clone()).unwrap_or_default()
}

fn follows(source: &str, index: usize, token: &str) -> bool {
    source
        .as_bytes()
        .get(index..index.saturating_add(token.len()))
        .is_some_and(|bytes| bytes == token.as_bytes())
}

/// Collapses the double space a deletion between two spaces leaves.
#[must_use]
pub fn squeeze_spaces(source: &str, range: Range<usize>) -> Range<usize> {
    let text = covered(source, &range);
    if text.starts_with(' ') || text.ends_with(' ') {
        return range;
    }
    if byte_before(source, range.start) == Some(b' ') && byte_at(source, range.end) == Some(b' ') {
        range.start - 1..range.end
    } else {
        range
    }
}

/// Swallows the trailing newline when the deleted lines sit between two
/// blank lines.
#[must_use]
pub fn squeeze_lines(source: &str, range: Range<usize>) -> Range<usize> {
    let swallowed_blank = covered(source, &range)
        .strip_suffix('\n')
        .and_then(|rest| rest.rsplit_once('\n'))
        .is_some_and(|(_, last)| last.trim().is_empty());
    if swallowed_blank {
        return range;
    }
    let before = source.get(..range.start).unwrap_or_default();
    let previous_blank = before
        .strip_suffix('\n')
        .map(|rest| rest.rsplit('\n').next().unwrap_or_default())
        .is_some_and(|line| line.trim().is_empty());
    let after = source.get(range.end..).unwrap_or_default();
    let next_line = after.split('\n').next().unwrap_or_default();
    let next_blank = after.contains('\n') && next_line.trim().is_empty();
    if previous_blank && next_blank {
        range.start..range.end + next_line.len() + 1
    } else {
        range
    }
}

/// Swallows an enclosing brace pair left empty by the deletion.
///
/// Handles `{}`, `{ }` and the single-space variants on either side.
#[must_use]
pub fn remove_braces(source: &str, range: Range<usize>) -> Range<usize> {
    let text = covered(source, &range);
    if text.starts_with('{') && text.ends_with('}') {
        return range;
    }
    let opening = ["{ ", "{"]
        .into_iter()
        .find(|token| precedes(source, range.start, token));
    let closing = [" }", "}"]
        .into_iter()
        .find(|token| follows(source, range.end, token));
    match (opening, closing) {
        (Some(open), Some(close)) => range.start - open.len()..range.end + close.len(),
        _ => range,
    }
}

/// Swallows the list separator the deletion leaves dangling.
///
/// A trailing comma (and one following space) is preferred; otherwise a
/// leading `", "` or `","` is taken. Ranges starting with `:` are left
/// alone so key/value pairs keep their separators, and ranges that already
/// hold a separator at either edge are not widened again.
#[must_use]
pub fn remove_comma(source: &str, range: Range<usize>) -> Range<usize> {
    let text = covered(source, &range);
    if matches!(byte_at(source, range.start), Some(b':' | b','))
        || text.trim_end_matches(' ').ends_with(',')
    {
        return range;
    }
    if byte_at(source, range.end) == Some(b',') {
        let spaced = byte_at(source, range.end + 1) == Some(b' ');
        return range.start..range.end + 1 + usize::from(spaced);
    }
    if precedes(source, range.start, ", ") {
        return range.start - 2..range.end;
    }
    if precedes(source, range.start, ",") {
        return range.start - 1..range.end;
    }
    range
}

/// Swallows the space before a closing angle bracket, as left by removing
/// the last attribute of a tag.
#[must_use]
pub fn remove_space(source: &str, range: Range<usize>) -> Range<usize> {
    if covered(source, &range).starts_with(' ') {
        return range;
    }
    if byte_before(source, range.start) == Some(b' ') && byte_at(source, range.end) == Some(b'>') {
        range.start - 1..range.end
    } else {
        range
    }
}

/// Applies the partial-deletion adjustments in order: spaces, braces,
/// commas, then the tag space.
#[must_use]
pub fn tidy_deletion(source: &str, range: Range<usize>) -> Range<usize> {
    let spaced = squeeze_spaces(source, range);
    let braced = remove_braces(source, spaced);
    let separated = remove_comma(source, braced);
    remove_space(source, separated)
}
