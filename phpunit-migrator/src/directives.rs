//! Doc comment directive scanning and stripping.
//!
//! Two entry points keep the regex work behind a small surface:
//! [`extract_directives`] reads the tags out of a doc comment and
//! [`strip_directive_lines`] removes the lines of the kinds that were migrated.
//! Both work line by line on the raw comment text.

use crate::constants::{
    get_blank_doc_line_re, get_data_provider_line_re, get_group_line_re, get_test_line_re,
    COVERS_TAG_RE, DATA_PROVIDER_TAG_RE, GROUP_TAG_RE, TEST_TAG_RE,
};
use crate::context::CoversRef;

/// The directive families the migration understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    /// `@test`
    Test,
    /// `@group <name>`
    Group,
    /// `@covers Class::method`
    Covers,
    /// `@dataProvider <method>`
    DataProvider,
}

/// Everything found in one doc comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    /// Whether a `@test` marker is present.
    pub test: bool,
    /// `@group` values, in order of appearance.
    pub groups: Vec<String>,
    /// `@covers` references, in order of appearance.
    pub covers: Vec<CoversRef>,
    /// First `@dataProvider` method name.
    pub data_provider: Option<String>,
    /// Further `@dataProvider` tags that were not migrated.
    pub ignored_data_providers: Vec<String>,
}

impl Directives {
    /// Whether nothing was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.test && self.groups.is_empty() && self.covers.is_empty() && self.data_provider.is_none()
    }
}

/// Scan a doc comment for directives.
#[must_use]
pub fn extract_directives(doc: &str) -> Directives {
    let mut found = Directives::default();

    for line in doc.lines() {
        if TEST_TAG_RE().is_match(line) {
            found.test = true;
        }
        for caps in GROUP_TAG_RE().captures_iter(line) {
            found.groups.push(caps[1].to_owned());
        }
        for caps in COVERS_TAG_RE().captures_iter(line) {
            found.covers.push(CoversRef::new(&caps[1], &caps[2]));
        }
        for caps in DATA_PROVIDER_TAG_RE().captures_iter(line) {
            if found.data_provider.is_none() {
                found.data_provider = Some(caps[1].to_owned());
            } else {
                found.ignored_data_providers.push(caps[1].to_owned());
            }
        }
    }

    found
}

fn is_directive_line(line: &str, kind: DirectiveKind) -> bool {
    match kind {
        DirectiveKind::Test => get_test_line_re().is_match(line),
        DirectiveKind::Group => get_group_line_re().is_match(line),
        DirectiveKind::DataProvider => get_data_provider_line_re().is_match(line),
        // `covers` stays in the doc comment next to the method it documents.
        DirectiveKind::Covers => false,
    }
}

/// Remove whole directive lines of the given kinds from a doc comment.
///
/// Only interior lines are candidates, so single-line comments come back unchanged.
/// Blank ` *` lines left dangling by a removal (next to the opening or closing line,
/// or doubled up) are dropped too; all other text is kept as is.
#[must_use]
pub fn strip_directive_lines(doc: &str, kinds: &[DirectiveKind]) -> String {
    let lines: Vec<&str> = doc.split('\n').collect();
    if lines.len() < 3 || kinds.is_empty() {
        return doc.to_owned();
    }
    let last = lines.len() - 1;

    let removed: Vec<bool> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            i != 0 && i != last && kinds.iter().any(|&kind| is_directive_line(line, kind))
        })
        .collect();
    if !removed.contains(&true) {
        return doc.to_owned();
    }

    let is_blank = |i: usize| i != 0 && i != last && get_blank_doc_line_re().is_match(lines[i]);
    let kept: Vec<usize> = (0..lines.len()).filter(|&i| !removed[i]).collect();

    let mut out: Vec<usize> = Vec::with_capacity(kept.len());
    let mut k = 0;
    while k < kept.len() {
        if !is_blank(kept[k]) {
            out.push(kept[k]);
            k += 1;
            continue;
        }

        // A run of blank lines between two non-blank kept lines.
        let run_start = k;
        while k < kept.len() && is_blank(kept[k]) {
            k += 1;
        }
        let run = &kept[run_start..k];
        let before = out.last().copied().unwrap_or(0);
        let after = kept.get(k).copied().unwrap_or(last);
        let touched = (before..after).any(|i| removed[i]);

        if !touched {
            out.extend_from_slice(run);
        } else if before != 0 && after != last {
            out.push(run[0]);
        }
    }

    out.iter()
        .map(|&i| lines[i])
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_all_kinds() {
        let doc = r"/**
     * Checks things.
     *
     * @test
     * @group fast
     * @group db
     * @covers Foo::bar
     * @covers \App\Baz::qux
     * @dataProvider cases
     * @dataProvider moreCases
     */";
        let found = extract_directives(doc);
        assert!(found.test);
        assert_eq!(found.groups, vec!["fast", "db"]);
        assert_eq!(
            found.covers,
            vec![CoversRef::new("Foo", "bar"), CoversRef::new("\\App\\Baz", "qux")]
        );
        assert_eq!(found.data_provider.as_deref(), Some("cases"));
        assert_eq!(found.ignored_data_providers, vec!["moreCases"]);
    }

    #[test]
    fn test_extract_nothing() {
        let found = extract_directives("/**\n * @testdox It works\n * @covers ::bar\n */");
        assert!(found.is_empty());
    }

    #[test]
    fn test_strip_test_line() {
        let doc = "/**\n     * Does a thing.\n     *\n     * @test\n     */";
        assert_eq!(
            strip_directive_lines(doc, &[DirectiveKind::Test]),
            "/**\n     * Does a thing.\n     */"
        );
    }

    #[test]
    fn test_strip_only_requested_kinds() {
        let doc = "/**\n * @group a\n * @test\n * @covers Foo::bar\n */";
        assert_eq!(
            strip_directive_lines(doc, &[DirectiveKind::Group, DirectiveKind::Covers]),
            "/**\n * @test\n * @covers Foo::bar\n */"
        );
    }

    #[test]
    fn test_strip_collapses_blank_lines_in_the_middle() {
        let doc = "/**\n * Intro\n *\n * @group a\n *\n * Outro\n */";
        assert_eq!(
            strip_directive_lines(doc, &[DirectiveKind::Group]),
            "/**\n * Intro\n *\n * Outro\n */"
        );
    }

    #[test]
    fn test_strip_leading_blank_after_opening() {
        let doc = "/**\n * @group a\n * @group b\n *\n * Text\n */";
        assert_eq!(
            strip_directive_lines(doc, &[DirectiveKind::Group]),
            "/**\n * Text\n */"
        );
    }

    #[test]
    fn test_untouched_blank_lines_survive() {
        let doc = "/**\n * A\n *\n *\n * B\n * @test\n */";
        assert_eq!(
            strip_directive_lines(doc, &[DirectiveKind::Test]),
            "/**\n * A\n *\n *\n * B\n */"
        );
    }

    #[test]
    fn test_single_line_comment_unchanged() {
        let doc = "/** @test */";
        assert_eq!(strip_directive_lines(doc, &[DirectiveKind::Test]), doc);
    }

    #[test]
    fn test_result_is_subsequence_of_lines() {
        let doc = "/**\n * x\n * @dataProvider p\n *\n * @test\n * y @test inline\n */";
        let stripped =
            strip_directive_lines(doc, &[DirectiveKind::Test, DirectiveKind::DataProvider]);
        let original: Vec<&str> = doc.lines().collect();
        let mut it = original.iter();
        for line in stripped.lines() {
            assert!(it.any(|candidate| *candidate == line));
        }
        assert!(stripped.contains("y @test inline"));
    }
}
