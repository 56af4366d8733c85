//! Two-column, word-wrapped table rendering.
//!
//! Each logical row is split on whitespace and its words are packed greedily
//! into physical lines. A word followed by its one-space separator must fit in
//! the room left on the current line, so a column of width `w` holds words of
//! at most `w - 1` characters. The left column is always padded to `w + 1`
//! characters so the right column starts at a fixed offset.
//!
//! Both columns of a logical row advance in lock-step: every physical line
//! takes as many words as fit from each side, and the row ends once both
//! sides are exhausted. The next logical row therefore always starts on a
//! fresh line with both columns aligned.

use crate::error::TableError;

/// Render `left` and `right` side by side.
///
/// The lists may have different lengths; the shorter one contributes empty
/// cells. The table is built in memory and returned whole, so a word that
/// cannot be packed produces an error and no partial output.
pub fn render_two_columns<L, R>(
    left: &[L],
    right: &[R],
    left_width: usize,
    right_width: usize,
) -> Result<String, TableError>
where
    L: AsRef<str>,
    R: AsRef<str>,
{
    let rows = left.len().max(right.len());
    let mut out = String::new();

    for i in 0..rows {
        let left_words = words_in(left.get(i).map(AsRef::as_ref), left_width)?;
        let right_words = words_in(right.get(i).map(AsRef::as_ref), right_width)?;
        render_row(&left_words, &right_words, left_width, right_width, &mut out);
    }

    Ok(out)
}

fn words_in(cell: Option<&str>, width: usize) -> Result<Vec<&str>, TableError> {
    let words: Vec<&str> = cell.map(|c| c.split_whitespace().collect()).unwrap_or_default();
    if let Some(long) = words.iter().find(|w| w.chars().count() + 1 > width) {
        return Err(TableError::TokenTooLong {
            token: long.to_string(),
            width,
        });
    }
    Ok(words)
}

fn render_row(left: &[&str], right: &[&str], left_width: usize, right_width: usize, out: &mut String) {
    let mut l = left.iter().peekable();
    let mut r = right.iter().peekable();

    while l.peek().is_some() || r.peek().is_some() {
        let mut pos = 0;
        while let Some(word) = l.next_if(|w| w.chars().count() < left_width - pos) {
            out.push_str(word);
            out.push(' ');
            pos += word.chars().count() + 1;
        }
        while pos <= left_width {
            out.push(' ');
            pos += 1;
        }

        pos = 0;
        while let Some(word) = r.next_if(|w| w.chars().count() < right_width - pos) {
            out.push_str(word);
            out.push(' ');
            pos += word.chars().count() + 1;
        }
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_row_fits_on_one_line() {
        let out = render_two_columns(&["help"], &["Displays this help menu."], 8, 40).unwrap();
        assert_eq!(out, "help     Displays this help menu. \n");
    }

    #[test]
    fn test_right_column_wraps_without_splitting_words() {
        let out = render_two_columns(&["cmd"], &["aaaa bbbb cccc"], 5, 10).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines, vec!["cmd   aaaa bbbb ", "      cccc "]);
    }

    #[test]
    fn test_left_column_wraps_and_stays_aligned() {
        let out = render_two_columns(&["ab cd ef"], &["x"], 6, 10).unwrap();
        assert_eq!(out, "ab cd  x \nef     \n");
    }

    #[test]
    fn test_uneven_lists_pad_with_empty_cells() {
        let out = render_two_columns(&["a", "b"], &["one"], 3, 10).unwrap();
        assert_eq!(out, "a   one \nb   \n");
    }

    #[test]
    fn test_token_too_long_is_reported() {
        let long = "x".repeat(90);
        let err = render_two_columns(&["help"], &[long.as_str()], 40, 40).unwrap_err();
        assert_eq!(
            err,
            TableError::TokenTooLong {
                token: long.clone(),
                width: 40
            }
        );
    }

    #[test]
    fn test_token_equal_to_width_does_not_fit() {
        let err = render_two_columns(&["abcd"], &["ok"], 4, 10).unwrap_err();
        assert!(matches!(err, TableError::TokenTooLong { width: 4, .. }));
        assert!(render_two_columns(&["abc"], &["ok"], 4, 10).is_ok());
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let left = ["add element", "print"];
        let right = ["Adds an element to a parent.", "Prints the document."];
        let a = render_two_columns(&left, &right, 14, 20).unwrap();
        let b = render_two_columns(&left, &right, 14, 20).unwrap();
        assert_eq!(a, b);
    }
}
