//! Line-oriented parser for `plutoc -p` output.
//!
//! The compiler prints human-readable diagnostics, one message per
//! non-indented line, with indented continuation lines annotating the
//! message above them, e.g.:
//!
//! ```text
//! /tmp/x.lua:1: warning: unused variable 'x'
//!      ^ here: 'x' is declared but never read
//!      + note: remove or prefix with underscore
//! suggest: local,count;efunc,print
//! ```
//!
//! Recognized top-level forms:
//!
//! - `<path>.lua:<line>: <message>` - a regular diagnostic, 1-based line
//! - `<path>.exe:<message> on line <line>` - a compiler-internal error
//! - `suggest: <tok>;<tok>;...` - completion candidates, emitted when the
//!   analyzed source contains a suggestion sentinel
//!
//! Continuation lines start with a space. `^ here: ` tails are appended
//! only when longer than the message collected so far (the compiler
//! frequently repeats the message verbatim after the caret); `+ note: `
//! tails are always appended. Anything else indented is ignored.

/// LSP severity for a scraped diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Compiler error.
    Error,
    /// Compiler warning (`warning: ` prefix, stripped from the message).
    Warning,
}

impl Severity {
    /// Numeric `DiagnosticSeverity` value used on the wire.
    pub fn lsp_value(self) -> u8 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
        }
    }
}

/// A diagnostic scraped from compiler output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 0-based line in the analyzed buffer. May point past the end of
    /// the buffer; range encoding clamps.
    pub line: u64,
    /// Message text, possibly multi-line after continuation reassembly.
    pub message: String,
    /// Error or warning.
    pub severity: Severity,
}

/// Kind of a completion candidate, by suggestion-token tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    /// `local,<name>` - a local variable in scope.
    Variable,
    /// `stat,<name>` - a statement keyword.
    Keyword,
    /// `efunc,<name>` - an environment function.
    Function,
    /// `eprop,<name>,<value>` - an enum member with its value.
    EnumMember,
}

impl CompletionKind {
    /// Numeric LSP `CompletionItemKind` value used on the wire.
    pub fn lsp_value(self) -> u8 {
        match self {
            CompletionKind::Variable => 6,
            CompletionKind::Keyword => 14,
            CompletionKind::Function => 3,
            CompletionKind::EnumMember => 20,
        }
    }
}

/// A completion candidate scraped from a `suggest:` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionItem {
    /// Label shown and inserted by the editor.
    pub label: String,
    /// Candidate kind.
    pub kind: CompletionKind,
    /// Optional human-readable annotation.
    pub detail: Option<String>,
}

/// One parsed unit of compiler output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hint {
    /// A diagnostic message with a line position.
    Diagnostic(Diagnostic),
    /// A completion candidate list from a `suggest:` line.
    Completions(Vec<CompletionItem>),
}

/// The compiler printed a top-level line in no recognized form.
#[derive(Debug, thiserror::Error)]
#[error("unparseable compiler diagnostic: {0:?}")]
pub struct HintError(pub String);

const SUGGEST_PREFIX: &str = "suggest: ";
const HERE_MARKER: &str = "^ here: ";
const NOTE_MARKER: &str = "+ note: ";
const WARNING_PREFIX: &str = "warning: ";

/// A diagnostic being assembled while its continuation lines arrive.
#[derive(Debug)]
struct DiagnosticBuffer {
    line: u64,
    message: String,
}

impl DiagnosticBuffer {
    /// Convert into a [`Diagnostic`], splitting the severity out of the
    /// message prefix. The `warning: ` prefix is only stripped here, at
    /// discharge; the continuation-length heuristic compares against the
    /// unstripped message.
    fn discharge(self) -> Diagnostic {
        match self.message.strip_prefix(WARNING_PREFIX) {
            Some(rest) => {
                Diagnostic { line: self.line, message: rest.to_string(), severity: Severity::Warning }
            }
            None => Diagnostic { line: self.line, message: self.message, severity: Severity::Error },
        }
    }
}

/// Parse raw `plutoc -p` output into an ordered list of hints.
pub fn parse_hints(output: &str) -> Result<Vec<Hint>, HintError> {
    let mut hints = Vec::new();
    let mut pending: Option<DiagnosticBuffer> = None;

    for raw in output.split('\n') {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.is_empty() {
            continue;
        }

        if line.starts_with(' ') {
            let Some(buffered) = pending.as_mut() else { continue };
            if let Some(pos) = line.find(HERE_MARKER) {
                let tail = &line[pos + HERE_MARKER.len()..];
                // A caret pointer that only restates the message carries
                // no information; keep it only when it says more.
                if tail.len() > buffered.message.len() {
                    buffered.message.push('\n');
                    buffered.message.push_str(tail);
                }
            } else if let Some(pos) = line.find(NOTE_MARKER) {
                let tail = &line[pos + NOTE_MARKER.len()..];
                buffered.message.push('\n');
                buffered.message.push_str(tail);
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix(SUGGEST_PREFIX) {
            if let Some(buffered) = pending.take() {
                hints.push(Hint::Diagnostic(buffered.discharge()));
            }
            hints.push(Hint::Completions(parse_suggestions(rest)));
            continue;
        }

        if let Some(buffered) = pending.take() {
            hints.push(Hint::Diagnostic(buffered.discharge()));
        }
        pending = Some(parse_diagnostic_line(line)?);
    }

    if let Some(buffered) = pending.take() {
        hints.push(Hint::Diagnostic(buffered.discharge()));
    }

    Ok(hints)
}

/// Parse a non-indented, non-`suggest:` line into a buffered diagnostic.
fn parse_diagnostic_line(line: &str) -> Result<DiagnosticBuffer, HintError> {
    if let Some(pos) = line.find(".lua:") {
        // `<path>.lua:<1-based line>: <message>`
        let rest = &line[pos + ".lua:".len()..];
        let (num, message) = rest.split_once(": ").ok_or_else(|| HintError(line.to_string()))?;
        let num: u64 = num.trim().parse().map_err(|_| HintError(line.to_string()))?;
        return Ok(DiagnosticBuffer { line: num.saturating_sub(1), message: message.to_string() });
    }

    if let Some(pos) = line.find(".exe:") {
        // `<path>.exe:<message> on line <1-based line>` - the compiler
        // crashed or hit an internal error; the message is preserved
        // verbatim.
        let rest = &line[pos + ".exe:".len()..];
        let sep = rest.find(" on line ").ok_or_else(|| HintError(line.to_string()))?;
        let num: u64 = rest[sep + " on line ".len()..]
            .trim()
            .parse()
            .map_err(|_| HintError(line.to_string()))?;
        return Ok(DiagnosticBuffer {
            line: num.saturating_sub(1),
            message: rest[..sep].to_string(),
        });
    }

    Err(HintError(line.to_string()))
}

/// Decode the `;`-separated token list after `suggest: `.
///
/// Tokens with an unrecognized tag are skipped, matching the parser's
/// tolerance for unknown continuation lines.
fn parse_suggestions(list: &str) -> Vec<CompletionItem> {
    let mut items = Vec::new();
    for token in list.split(';') {
        if token.is_empty() {
            continue;
        }
        let mut fields = token.split(',');
        match fields.next() {
            Some("local") => {
                if let Some(name) = fields.next() {
                    items.push(CompletionItem {
                        label: name.to_string(),
                        kind: CompletionKind::Variable,
                        detail: Some(format!("local {name}")),
                    });
                }
            }
            Some("stat") => {
                if let Some(name) = fields.next() {
                    items.push(CompletionItem {
                        label: name.to_string(),
                        kind: CompletionKind::Keyword,
                        detail: None,
                    });
                }
            }
            Some("efunc") => {
                if let Some(name) = fields.next() {
                    items.push(CompletionItem {
                        label: format!("{name}()"),
                        kind: CompletionKind::Function,
                        detail: None,
                    });
                }
            }
            Some("eprop") => {
                if let (Some(name), Some(value)) = (fields.next(), fields.next()) {
                    items.push(CompletionItem {
                        label: name.to_string(),
                        kind: CompletionKind::EnumMember,
                        detail: Some(format!("{name} = {value}")),
                    });
                }
            }
            _ => {}
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn diag(line: u64, message: &str, severity: Severity) -> Hint {
        Hint::Diagnostic(Diagnostic { line, message: message.to_string(), severity })
    }

    #[test]
    fn parses_a_basic_diagnostic() {
        let hints = parse_hints("/tmp/x.lua:3: syntax error near 'end'\n").unwrap();
        assert_eq!(hints, vec![diag(2, "syntax error near 'end'", Severity::Error)]);
    }

    #[test]
    fn strips_the_warning_prefix_and_marks_severity() {
        let hints = parse_hints("/tmp/x.lua:1: warning: unused variable 'x'\n").unwrap();
        assert_eq!(hints, vec![diag(0, "unused variable 'x'", Severity::Warning)]);
    }

    #[test]
    fn reassembles_here_and_note_continuations() {
        let output = "/tmp/x.lua:1: warning: unused variable 'x'\n     ^ here: 'x' is declared but never read\n     + note: remove or prefix with underscore\n";
        let hints = parse_hints(output).unwrap();
        assert_eq!(
            hints,
            vec![diag(
                0,
                "unused variable 'x'\n'x' is declared but never read\nremove or prefix with underscore",
                Severity::Warning,
            )]
        );
    }

    #[test]
    fn drops_a_here_tail_no_longer_than_the_message() {
        let hints = parse_hints("/tmp/x.lua:5: msg\n     ^ here: x\n").unwrap();
        assert_eq!(hints, vec![diag(4, "msg", Severity::Error)]);
    }

    #[test]
    fn here_heuristic_compares_against_the_unstripped_message() {
        // Buffered message is "warning: abcdefgh" (17 chars). A 10-char
        // tail beats the stripped message (8 chars) but not the buffered
        // one, so it must be dropped.
        let hints = parse_hints("/tmp/x.lua:2: warning: abcdefgh\n   ^ here: 0123456789\n").unwrap();
        assert_eq!(hints, vec![diag(1, "abcdefgh", Severity::Warning)]);
    }

    #[test]
    fn note_tails_are_appended_unconditionally() {
        let hints = parse_hints("/tmp/x.lua:5: message\n     + note: x\n").unwrap();
        assert_eq!(hints, vec![diag(4, "message\nx", Severity::Error)]);
    }

    #[test]
    fn unknown_continuation_lines_are_ignored() {
        let output = "/tmp/x.lua:2: bad thing\n     | local x = 1\n     ~~~~~\n";
        let hints = parse_hints(output).unwrap();
        assert_eq!(hints, vec![diag(1, "bad thing", Severity::Error)]);
    }

    #[test]
    fn continuation_without_a_buffered_diagnostic_is_ignored() {
        assert_eq!(parse_hints("   ^ here: floating pointer\n").unwrap(), vec![]);
    }

    #[test]
    fn parses_the_internal_error_form() {
        let hints = parse_hints("C:\\pluto\\plutoc.exe:assertion failed on line 12\n").unwrap();
        assert_eq!(hints, vec![diag(11, "assertion failed", Severity::Error)]);
    }

    #[test]
    fn a_new_diagnostic_discharges_the_previous_one() {
        let output = "/tmp/x.lua:1: first\n/tmp/x.lua:2: second\n";
        let hints = parse_hints(output).unwrap();
        assert_eq!(
            hints,
            vec![diag(0, "first", Severity::Error), diag(1, "second", Severity::Error)]
        );
    }

    #[test]
    fn a_suggest_line_discharges_the_buffered_diagnostic_first() {
        let output = "/tmp/x.lua:1: unfinished\nsuggest: stat,if\n";
        let hints = parse_hints(output).unwrap();
        assert_eq!(hints.len(), 2);
        assert_eq!(hints[0], diag(0, "unfinished", Severity::Error));
        assert_eq!(
            hints[1],
            Hint::Completions(vec![CompletionItem {
                label: "if".to_string(),
                kind: CompletionKind::Keyword,
                detail: None,
            }])
        );
    }

    #[test]
    fn parses_all_suggestion_token_kinds() {
        let hints = parse_hints("suggest: local,count;efunc,print;eprop,Color.Red,1\n").unwrap();
        assert_eq!(
            hints,
            vec![Hint::Completions(vec![
                CompletionItem {
                    label: "count".to_string(),
                    kind: CompletionKind::Variable,
                    detail: Some("local count".to_string()),
                },
                CompletionItem {
                    label: "print()".to_string(),
                    kind: CompletionKind::Function,
                    detail: None,
                },
                CompletionItem {
                    label: "Color.Red".to_string(),
                    kind: CompletionKind::EnumMember,
                    detail: Some("Color.Red = 1".to_string()),
                },
            ])]
        );
    }

    #[test]
    fn unknown_suggestion_tags_are_skipped() {
        let hints = parse_hints("suggest: local,a;mystery,b;stat,do\n").unwrap();
        let Hint::Completions(items) = &hints[0] else {
            panic!("expected completions");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].label, "a");
        assert_eq!(items[1].label, "do");
    }

    #[test]
    fn empty_output_yields_no_hints() {
        assert_eq!(parse_hints("").unwrap(), vec![]);
        assert_eq!(parse_hints("\n\n").unwrap(), vec![]);
    }

    #[test]
    fn unrecognized_top_level_lines_are_an_error() {
        let err = parse_hints("something entirely different\n").unwrap_err();
        assert!(err.to_string().contains("something entirely different"));
    }

    #[test]
    fn garbled_line_numbers_are_an_error() {
        assert!(parse_hints("/tmp/x.lua:abc: nope\n").is_err());
    }

    #[test]
    fn crlf_output_parses_like_lf_output() {
        let hints = parse_hints("/tmp/x.lua:3: syntax error\r\n").unwrap();
        assert_eq!(hints, vec![diag(2, "syntax error", Severity::Error)]);
    }

    #[test]
    fn lsp_values_match_the_protocol_tables() {
        assert_eq!(Severity::Error.lsp_value(), 1);
        assert_eq!(Severity::Warning.lsp_value(), 2);
        assert_eq!(CompletionKind::Variable.lsp_value(), 6);
        assert_eq!(CompletionKind::Keyword.lsp_value(), 14);
        assert_eq!(CompletionKind::Function.lsp_value(), 3);
        assert_eq!(CompletionKind::EnumMember.lsp_value(), 20);
    }
}
