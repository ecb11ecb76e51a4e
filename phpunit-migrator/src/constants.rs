use regex::Regex;
use std::sync::OnceLock;

/// Name of the optional per-project configuration file.
pub const CONFIG_FILENAME: &str = ".phpunit-migrator.toml";

/// Namespace holding the PHPUnit attribute classes.
pub const ATTRIBUTES_NAMESPACE: &str = "PHPUnit\\Framework\\Attributes";

/// File extensions processed when the configuration does not say otherwise.
pub const DEFAULT_EXTENSIONS: &[&str] = &["php"];

/// Printed once the whole batch has been processed.
pub const COMPLETION_MESSAGE: &str = "PHPUnit annotations transformed!";

/// Printed when the positional argument is not a directory.
pub const NOT_A_DIRECTORY_MESSAGE: &str = "Error: Given path is not a directory.";

/// Build a regex from a constant pattern.
///
/// # Panics
///
/// Panics if the pattern is invalid (patterns are compile-time constants).
fn compile(pattern: &str) -> Regex {
    #[allow(clippy::expect_used)]
    Regex::new(pattern).expect("Invalid built-in regex pattern")
}

/// `@test` as a standalone tag (not `@testdox`, `@testWith`).
pub fn get_test_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"@test\b"))
}

/// `@group <value>`; the value runs up to whitespace or `*`.
pub fn get_group_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"@group\s+([^\s*]+)"))
}

/// `@covers Class::method`, the class optionally namespace-qualified.
pub fn get_covers_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        compile(r"@covers\s+(\\?[A-Za-z_][A-Za-z0-9_\\]*)::([A-Za-z_][A-Za-z0-9_]*)")
    })
}

/// `@dataProvider <method>`
pub fn get_data_provider_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"@dataProvider\s+(\w+)"))
}

/// A doc comment line holding only `* @test`.
pub fn get_test_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"^\s*\*\s+@test\s*$"))
}

/// A doc comment line holding only `* @group <value>`.
pub fn get_group_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"^\s*\*\s+@group\s+[^\s*]+\s*$"))
}

/// A doc comment line holding only `* @dataProvider <method>`.
pub fn get_data_provider_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"^\s*\*\s+@dataProvider\s+\w+\s*$"))
}

/// A doc comment line holding only `*`.
pub fn get_blank_doc_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"^\s*\*\s*$"))
}

/// Three or more consecutive newlines.
pub fn get_blank_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"(?:\r?\n){3,}"))
}

/// A `use` statement directly followed by an attribute or doc comment line.
pub fn get_use_then_decl_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"(\r?\nuse[^;]+;)\r?\n(#\[|/\*\*)"))
}

/// An empty ` *` line right before a doc comment's closing `*/`.
pub fn get_doc_close_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r" \*\s+\*/"))
}

pub use get_blank_doc_line_re as BLANK_DOC_LINE_RE;
pub use get_covers_tag_re as COVERS_TAG_RE;
pub use get_data_provider_tag_re as DATA_PROVIDER_TAG_RE;
pub use get_group_tag_re as GROUP_TAG_RE;
pub use get_test_tag_re as TEST_TAG_RE;
