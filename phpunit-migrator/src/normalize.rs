//! Text normalization applied to printed output.
//!
//! Runs only on files the printer changed, after the layout edits. Protected spans
//! (string literals, heredocs, nowdocs, inline HTML) are copied through as they are;
//! the passes see only the text between them.

use crate::ast::Span;
use crate::constants::{get_blank_run_re, get_doc_close_re, get_use_then_decl_re};

/// The line ending a file uses: `"\r\n"` when it contains one, `"\n"` otherwise.
#[must_use]
pub fn detect_newline(source: &str) -> &'static str {
    if source.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Apply every normalization pass, in order, outside the `protected` spans.
///
/// `protected` must be sorted and non-overlapping; spans reaching past the end of
/// `text` are clipped.
#[must_use]
pub fn normalize(text: &str, protected: &[Span], newline: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in protected {
        let start = span.start.clamp(cursor, text.len());
        let end = span.end.clamp(start, text.len());
        out.push_str(&normalize_segment(&text[cursor..start], newline));
        out.push_str(&text[start..end]);
        cursor = end;
    }
    out.push_str(&normalize_segment(&text[cursor..], newline));
    out
}

fn normalize_segment(text: &str, newline: &str) -> String {
    let text = collapse_blank_lines(text, newline);
    let text = separate_imports(&text, newline);
    tidy_doc_close(&text)
}

/// Collapse three or more consecutive newlines to exactly two.
#[must_use]
pub fn collapse_blank_lines(text: &str, newline: &str) -> String {
    get_blank_run_re()
        .replace_all(text, format!("{newline}{newline}").as_str())
        .into_owned()
}

/// Put a blank line between a `use` statement and a following attribute or doc comment.
#[must_use]
pub fn separate_imports(text: &str, newline: &str) -> String {
    get_use_then_decl_re()
        .replace_all(text, format!("${{1}}{newline}{newline}${{2}}").as_str())
        .into_owned()
}

/// Drop whitespace-only doc comment lines right before the closing `*/`.
#[must_use]
pub fn tidy_doc_close(text: &str) -> String {
    get_doc_close_re().replace_all(text, " */").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_blank_lines() {
        let text = "    }\n\n\n\n\n    public function b()";
        assert_eq!(collapse_blank_lines(text, "\n"), "    }\n\n    public function b()");
        assert_eq!(collapse_blank_lines("a\n\nb", "\n"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\r\n\r\n\r\n\r\nb", "\r\n"), "a\r\n\r\nb");
    }

    #[test]
    fn test_separate_imports() {
        let text = "namespace App;\n\nuse A\\B;\n#[Group('x')]\nclass T {}";
        assert_eq!(
            separate_imports(text, "\n"),
            "namespace App;\n\nuse A\\B;\n\n#[Group('x')]\nclass T {}"
        );

        let doc = "\nuse A\\B;\n/**\n * x\n */";
        assert_eq!(separate_imports(doc, "\n"), "\nuse A\\B;\n\n/**\n * x\n */");

        let crlf = "\r\nuse A\\B;\r\n#[Test]";
        assert_eq!(separate_imports(crlf, "\r\n"), "\r\nuse A\\B;\r\n\r\n#[Test]");
    }

    #[test]
    fn test_separate_imports_leaves_import_runs_alone() {
        let text = "\nuse A;\nuse B;\n\nclass T {}";
        assert_eq!(separate_imports(text, "\n"), text);
    }

    #[test]
    fn test_tidy_doc_close() {
        assert_eq!(tidy_doc_close("/**\n * Text\n *\n */"), "/**\n * Text\n */");
        assert_eq!(tidy_doc_close("/**\n * Text\n */"), "/**\n * Text\n */");
    }

    #[test]
    fn test_normalize_runs_all_passes() {
        let text = "<?php\n\n\n\nuse A;\n/**\n * x\n *\n */\nclass T {}\n";
        assert_eq!(
            normalize(text, &[], "\n"),
            "<?php\n\nuse A;\n\n/**\n * x\n */\nclass T {}\n"
        );
    }

    #[test]
    fn test_normalize_skips_protected_spans() {
        let text = "<?php\n\n\n\n$a = <<<TXT\nx\n\n\n\ny\nTXT;\n\n\n\n$b = 1;\n";
        let start = text.find("<<<").unwrap();
        let end = text.find("TXT;").unwrap() + 3;
        let out = normalize(text, &[Span::new(start, end)], "\n");
        assert_eq!(out, "<?php\n\n$a = <<<TXT\nx\n\n\n\ny\nTXT;\n\n$b = 1;\n");
    }

    #[test]
    fn test_detect_newline() {
        assert_eq!(detect_newline("<?php\r\nclass A {}\r\n"), "\r\n");
        assert_eq!(detect_newline("<?php\nclass A {}\n"), "\n");
    }
}
