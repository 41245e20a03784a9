//! Completion by sentinel injection.
//!
//! `plutoc` has no completion mode of its own, but it recognizes two
//! reserved identifiers and answers with a `suggest:` line tailored to
//! where they appear. The engine rewrites the live buffer so one of them
//! sits exactly at the cursor:
//!
//! - `pluto_suggest_1 ` (note the trailing space) when the user is in
//!   the middle of typing an identifier - inserted at the identifier's
//!   start so the compiler sees the typed prefix as a separate token
//! - `pluto_suggest_0` when the cursor sits on fresh ground (right
//!   after a `.`, `:`, space, or at the start of a line)

use crate::driver::{CompilerDriver, CompilerError};
use crate::hint::{CompletionItem, Hint, HintError, parse_hints};

/// Sentinel used when the cursor follows a partially typed identifier.
const SENTINEL_FILTERED: &str = "pluto_suggest_1 ";

/// Sentinel used on fresh ground.
const SENTINEL_BARE: &str = "pluto_suggest_0";

/// Completion failure; the server answers these with an empty list.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// The compiler could not be driven.
    #[error(transparent)]
    Compiler(#[from] CompilerError),

    /// The compiler's output could not be scraped.
    #[error(transparent)]
    Hints(#[from] HintError),
}

/// Produce completion candidates for a cursor position.
///
/// `line` and `character` are 0-based, as on the LSP wire. Positions
/// outside the buffer yield an empty list, as does a compile that emits
/// no `suggest:` line. Diagnostics emitted alongside the suggestion are
/// ignored on this path.
pub fn complete(
    driver: &CompilerDriver,
    contents: &str,
    line: usize,
    character: usize,
) -> Result<Vec<CompletionItem>, CompletionError> {
    let Some(modified) = inject_sentinel(contents, line, character) else {
        return Ok(Vec::new());
    };

    let output = driver.run(&modified)?;
    for hint in parse_hints(&output)? {
        if let Hint::Completions(items) = hint {
            return Ok(items);
        }
    }
    Ok(Vec::new())
}

/// Rewrite `contents` with a suggestion sentinel at the cursor.
///
/// Returns `None` when `line` does not exist in the buffer.
pub fn inject_sentinel(contents: &str, line: usize, character: usize) -> Option<String> {
    let lines: Vec<&str> = contents.split('\n').collect();
    let target = *lines.get(line)?;

    let (pos, has_filter) = sentinel_position(target, character);
    let sentinel = if has_filter { SENTINEL_FILTERED } else { SENTINEL_BARE };

    let mut out = String::with_capacity(contents.len() + sentinel.len());
    for (i, l) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if i == line {
            out.push_str(&l[..pos]);
            out.push_str(sentinel);
            out.push_str(&l[pos..]);
        } else {
            out.push_str(l);
        }
    }
    Some(out)
}

/// Walk backwards from the cursor to the start of the token under it.
///
/// Returns the byte position where the sentinel belongs and whether any
/// identifier characters sit between that position and the cursor (the
/// user has started typing, so the compiler should treat the rest of the
/// token as a filter).
fn sentinel_position(line: &str, character: usize) -> (usize, bool) {
    let bytes = line.as_bytes();
    if bytes.is_empty() {
        return (0, false);
    }

    let mut cursor = character.min(bytes.len());
    while cursor > 0 && !line.is_char_boundary(cursor) {
        cursor -= 1;
    }
    if cursor == 0 {
        cursor = 1;
    }

    let mut has_filter = false;
    let mut i = cursor - 1;
    loop {
        match bytes[i] {
            b' ' | b'.' | b':' => return (i + 1, has_filter),
            _ => {
                has_filter = true;
                if i == 0 {
                    return (0, true);
                }
                i -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fresh_ground_after_a_dot_gets_the_bare_sentinel() {
        assert_eq!(inject_sentinel("obj.\n", 0, 4).as_deref(), Some("obj.pluto_suggest_0\n"));
    }

    #[test]
    fn a_typed_prefix_gets_the_filtered_sentinel_at_token_start() {
        assert_eq!(inject_sentinel("foo\n", 0, 3).as_deref(), Some("pluto_suggest_1 foo\n"));
    }

    #[test]
    fn prefix_after_a_dot_keeps_the_dot_outside_the_filter() {
        assert_eq!(
            inject_sentinel("obj.fie\n", 0, 7).as_deref(),
            Some("obj.pluto_suggest_1 fie\n")
        );
    }

    #[test]
    fn fresh_ground_after_a_colon_gets_the_bare_sentinel() {
        assert_eq!(inject_sentinel("self:\n", 0, 5).as_deref(), Some("self:pluto_suggest_0\n"));
    }

    #[test]
    fn fresh_ground_after_a_space_gets_the_bare_sentinel() {
        assert_eq!(
            inject_sentinel("local x = \n", 0, 10).as_deref(),
            Some("local x = pluto_suggest_0\n")
        );
    }

    #[test]
    fn column_zero_on_a_nonempty_line_filters_on_the_first_token() {
        assert_eq!(inject_sentinel("foo\n", 0, 0).as_deref(), Some("pluto_suggest_1 foo\n"));
    }

    #[test]
    fn an_empty_line_gets_the_bare_sentinel() {
        assert_eq!(inject_sentinel("\n", 0, 0).as_deref(), Some("pluto_suggest_0\n"));
    }

    #[test]
    fn only_the_cursor_line_is_rewritten() {
        assert_eq!(
            inject_sentinel("local a = 1\nprin\nlocal b = 2\n", 1, 4).as_deref(),
            Some("local a = 1\npluto_suggest_1 prin\nlocal b = 2\n")
        );
    }

    #[test]
    fn a_cursor_past_the_line_end_is_clamped() {
        assert_eq!(inject_sentinel("ab\n", 0, 99).as_deref(), Some("pluto_suggest_1 ab\n"));
    }

    #[test]
    fn a_line_past_the_buffer_end_yields_nothing() {
        assert_eq!(inject_sentinel("foo\n", 7, 0), None);
    }

    #[cfg(unix)]
    mod end_to_end {
        use super::*;
        use pretty_assertions::assert_eq;
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        /// Stub compiler printing a canned suggestion list.
        fn stub_compiler(dir: &std::path::Path, output: &str) -> std::path::PathBuf {
            let path = dir.join("plutoc-stub");
            let mut f = std::fs::File::create(&path).unwrap();
            writeln!(f, "#!/bin/sh\nprintf '%s\\n' \"{output}\"").unwrap();
            drop(f);
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
            path
        }

        #[test]
        fn complete_returns_the_first_suggestion_list() {
            let dir = tempfile::tempdir().unwrap();
            let stub = stub_compiler(dir.path(), "suggest: local,count;stat,if");
            let driver = CompilerDriver::new(&stub);

            let items = complete(&driver, "cou\n", 0, 3).unwrap();
            assert_eq!(items.len(), 2);
            assert_eq!(items[0].label, "count");
            assert_eq!(items[1].label, "if");
        }

        #[test]
        fn diagnostics_around_the_suggestion_are_ignored() {
            let dir = tempfile::tempdir().unwrap();
            let stub =
                stub_compiler(dir.path(), "/tmp/x.lua:1: incomplete statement\nsuggest: stat,do");
            let driver = CompilerDriver::new(&stub);

            let items = complete(&driver, "d\n", 0, 1).unwrap();
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].label, "do");
        }

        #[test]
        fn output_without_a_suggestion_yields_an_empty_list() {
            let dir = tempfile::tempdir().unwrap();
            let stub = stub_compiler(dir.path(), "/tmp/x.lua:1: some error");
            let driver = CompilerDriver::new(&stub);

            assert_eq!(complete(&driver, "x\n", 0, 1).unwrap(), vec![]);
        }
    }
}
