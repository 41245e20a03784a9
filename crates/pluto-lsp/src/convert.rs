//! Conversions between scraped compiler hints and LSP wire types.

use lsp_types::{Diagnostic as LspDiagnostic, DiagnosticSeverity, Position, Range};
use pluto_compiler::{CompletionItem, Diagnostic, Severity};
use serde_json::{Value, json};

/// Length of the requested line, in bytes.
///
/// Falls back to 1 (not 0) when the line index is out of range; editors
/// handle the resulting half-open range better than an empty one.
fn line_length(contents: &str, line: u64) -> u64 {
    usize::try_from(line)
        .ok()
        .and_then(|idx| contents.split('\n').nth(idx))
        .map(|l| l.len() as u64)
        .unwrap_or(1)
}

/// Whole-line range for a line-level diagnostic.
pub fn line_range(contents: &str, line: u64) -> Range {
    let line_u32 = u32::try_from(line).unwrap_or(u32::MAX);
    let end = u32::try_from(line_length(contents, line)).unwrap_or(u32::MAX);
    Range::new(Position::new(line_u32, 0), Position::new(line_u32, end))
}

/// Convert a scraped diagnostic into the LSP wire shape.
pub fn to_lsp_diagnostic(contents: &str, diagnostic: &Diagnostic) -> LspDiagnostic {
    let severity = match diagnostic.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    };

    LspDiagnostic {
        range: line_range(contents, diagnostic.line),
        severity: Some(severity),
        code: None,
        code_description: None,
        source: Some("pluto-lsp".to_string()),
        message: diagnostic.message.clone(),
        related_information: None,
        tags: None,
        data: None,
    }
}

/// Encode completion candidates as the LSP completion response array.
pub fn completions_to_value(items: &[CompletionItem]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|item| {
                let mut value = json!({
                    "label": item.label,
                    "kind": item.kind.lsp_value(),
                });
                if let Some(detail) = &item.detail {
                    value["detail"] = json!(detail);
                }
                value
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pluto_compiler::CompletionKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn ranges_span_the_whole_line() {
        let range = line_range("hello\nworld!\n", 1);
        assert_eq!(range.start, Position::new(1, 0));
        assert_eq!(range.end, Position::new(1, 6));
    }

    #[test]
    fn out_of_range_lines_clamp_to_length_one() {
        let range = line_range("a\nb\n", 9);
        assert_eq!(range.end, Position::new(9, 1));
    }

    #[test]
    fn last_line_of_newline_terminated_contents() {
        // "a\nb\nc\n" has a trailing empty segment; line 2 is "c".
        let range = line_range("a\nb\nc\n", 2);
        assert_eq!(range.end, Position::new(2, 1));
    }

    #[test]
    fn diagnostics_carry_severity_and_source() {
        let diag = Diagnostic {
            line: 2,
            message: "syntax error near 'end'".to_string(),
            severity: Severity::Error,
        };
        let lsp = to_lsp_diagnostic("a\nb\nc\n", &diag);
        assert_eq!(lsp.severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(lsp.source.as_deref(), Some("pluto-lsp"));
        assert_eq!(lsp.range.end, Position::new(2, 1));
        assert_eq!(lsp.message, "syntax error near 'end'");
    }

    #[test]
    fn completion_items_serialize_with_numeric_kinds() {
        let items = vec![
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
        ];
        let value = completions_to_value(&items);
        assert_eq!(
            value,
            serde_json::json!([
                {"label": "count", "kind": 6, "detail": "local count"},
                {"label": "print()", "kind": 3},
            ])
        );
    }
}
