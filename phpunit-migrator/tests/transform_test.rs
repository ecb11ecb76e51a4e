//! End-to-end properties of the source transformation.
#![allow(clippy::unwrap_used, clippy::needless_raw_string_hashes)]

use phpunit_migrator::migrator::transform_source;

fn migrate(source: &str) -> String {
    transform_source(source).unwrap()
}

// =============================================================================
// Idempotence and no-op preservation
// =============================================================================

#[test]
fn test_idempotent_across_inputs() {
    let inputs = [
        "<?php\nclass FooTest\n{\n    /**\n     * @test\n     */\n    public function a(): void {}\n}\n",
        r#"<?php

namespace App\Tests;

/**
 * @group slow
 * @group db
 */
class RepoTest
{
    /**
     * @dataProvider rows
     * @covers \App\Repo::find
     */
    public function finds(int $id): void
    {
    }

    public function rows(): array
    {
        return [[1]];
    }
}
"#,
    ];

    for input in inputs {
        let once = migrate(input);
        assert_ne!(once, input);
        assert_eq!(migrate(&once), once, "second pass changed:\n{once}");
    }
}

#[test]
fn test_source_without_directives_is_untouched() {
    let source = r#"<?php
namespace App;



/**
 * @testdox Works as intended
 * @param int $x
 */
class Plain
{
    /**
     * @return void
     */
    public function run(int $x): void {}
}
"#;
    assert_eq!(migrate(source), source);
}

// =============================================================================
// Directive migration
// =============================================================================

#[test]
fn test_test_marker_becomes_single_attribute() {
    let source = r#"<?php

use PHPUnit\Framework\TestCase;

class FooTest extends TestCase
{
    /**
     * @test
     */
    public function first(): void
    {
    }

    /**
     * @test
     */
    public function second(): void
    {
    }
}
"#;
    let out = migrate(source);
    assert_eq!(out.matches("#[Test]").count(), 2);
    assert!(out.contains("#[Test]\n    public function first()"));
    assert!(!out.contains("@test"));
    assert_eq!(
        out.matches("use PHPUnit\\Framework\\Attributes\\Test;").count(),
        1
    );
}

#[test]
fn test_class_groups_keep_order_and_leave_doc() {
    let source = r#"<?php

/**
 * @group A
 * @group B
 */
class FooTest
{
}
"#;
    let out = migrate(source);
    let a = out.find("#[Group('A')]").unwrap();
    let b = out.find("#[Group('B')]").unwrap();
    assert!(a < b);
    assert!(!out.contains("@group"));
}

#[test]
fn test_covers_flushed_once_per_target() {
    let source = r#"<?php

class FooTest
{
    /**
     * @covers Foo::bar
     */
    public function one(): void {}

    /**
     * @covers Foo::baz
     */
    public function two(): void {}

    /**
     * @covers Foo::bar
     */
    public function three(): void {}
}
"#;
    let out = migrate(source);
    assert_eq!(out.matches("#[CoversMethod(").count(), 2);
    let bar = out.find("#[CoversMethod(Foo::class, 'bar')]").unwrap();
    let baz = out.find("#[CoversMethod(Foo::class, 'baz')]").unwrap();
    let class = out.find("class FooTest").unwrap();
    assert!(bar < baz && baz < class);
    // covers lines stay in the method docs
    assert_eq!(out.matches("@covers").count(), 3);
}

#[test]
fn test_imports_follow_namespace_sorted_and_unique() {
    let source = r#"<?php

namespace App\Tests;

class FooTest
{
    /**
     * @test
     * @group unit
     * @dataProvider cases
     */
    public function a(int $x): void {}

    /**
     * @test
     * @group unit
     */
    public function b(): void {}

    public function cases(): array
    {
        return [[1]];
    }
}
"#;
    let out = migrate(source);
    assert!(out.contains(
        "namespace App\\Tests;\n\n\
         use PHPUnit\\Framework\\Attributes\\DataProvider;\n\
         use PHPUnit\\Framework\\Attributes\\Group;\n\
         use PHPUnit\\Framework\\Attributes\\Test;\n\n\
         class FooTest"
    ));
    assert_eq!(out.matches("Attributes\\Group;").count(), 1);
}

#[test]
fn test_manual_attribute_is_not_duplicated() {
    let source = r#"<?php

use PHPUnit\Framework\Attributes\Test;

class FooTest
{
    /**
     * @test
     */
    #[Test]
    public function a(): void {}
}
"#;
    let out = migrate(source);
    assert_eq!(out.matches("#[Test]").count(), 1);
    assert_eq!(out.matches("Attributes\\Test;").count(), 1);
    assert_eq!(migrate(&out), out);
}

#[test]
fn test_group_names_keep_dashes() {
    let source = "<?php\n\n/**\n * @group slow-io\n */\nclass FooTest\n{\n}\n";
    let out = migrate(source);
    assert!(out.contains("#[Group('slow-io')]\nclass FooTest"));
}

#[test]
fn test_doc_reaches_declaration_across_plain_comment() {
    let source = r#"<?php

class FooTest
{
    /**
     * @test
     */
    // helper note
    public function a(): void {}
}
"#;
    let out = migrate(source);
    assert!(out.contains("    // helper note\n    #[Test]\n    public function a()"));
    assert!(!out.contains("@test"));
}

// =============================================================================
// Declaration scopes
// =============================================================================

#[test]
fn test_interface_methods_are_migrated() {
    let source = r#"<?php

interface FooTestCase
{
    /**
     * @test
     */
    public function a(): void;
}
"#;
    let out = migrate(source);
    assert!(out.contains("    #[Test]\n    public function a(): void;"));
    assert_eq!(out.matches("Attributes\\Test;").count(), 1);
    assert_eq!(migrate(&out), out);
}

#[test]
fn test_class_inside_conditional_block_is_migrated() {
    let source = r#"<?php

if (!class_exists('FooTest')) {
    class FooTest
    {
        /**
         * @test
         */
        public function a(): void {}
    }
}
"#;
    let out = migrate(source);
    assert!(out.contains("        #[Test]\n        public function a(): void {}"));
    assert!(out.contains("use PHPUnit\\Framework\\Attributes\\Test;\n\nif ("));
}

#[test]
fn test_each_namespace_gets_its_own_imports() {
    let source = r#"<?php

namespace App\A;

class ATest
{
    /**
     * @test
     */
    public function a(): void {}
}

namespace App\B;

/**
 * @group slow
 */
class BTest
{
}
"#;
    let out = migrate(source);
    assert!(out.contains(
        "namespace App\\A;\n\nuse PHPUnit\\Framework\\Attributes\\Test;\n\nclass ATest"
    ));
    assert!(out.contains(
        "namespace App\\B;\n\nuse PHPUnit\\Framework\\Attributes\\Group;\n\n/**"
    ));
    assert_eq!(out.matches("Attributes\\Test;").count(), 1);
    assert_eq!(out.matches("Attributes\\Group;").count(), 1);
    assert_eq!(migrate(&out), out);
}

// =============================================================================
// Formatting
// =============================================================================

#[test]
fn test_blank_line_runs_collapse_in_changed_files() {
    let source = "<?php\nclass FooTest\n{\n    /**\n     * @test\n     */\n    public function a(): void\n    {\n    }\n\n\n\n\n    public function b(): void\n    {\n    }\n}\n";
    let out = migrate(source);
    assert!(out.contains("    }\n\n    public function b()"));
    assert!(!out.contains("\n\n\n"));
}

#[test]
fn test_class_followed_by_declaration_gets_blank_line() {
    let source = "<?php\nclass FooTest\n{\n    /**\n     * @test\n     */\n    public function a(): void {}\n}\nclass Helper {}\n";
    let out = migrate(source);
    assert!(out.contains("}\n\nclass Helper {}\n"));
}

#[test]
fn test_untouched_regions_are_byte_identical() {
    let source = "<?php\nclass FooTest\n{\n    private   $odd  =  [1,2,   3];\n\n    /**\n     * @test\n     */\n    public function a(): void {}\n}\n";
    let out = migrate(source);
    assert!(out.contains("    private   $odd  =  [1,2,   3];\n"));
}

#[test]
fn test_heredoc_and_multiline_strings_are_untouched() {
    let source = r#"<?php

class FooTest
{
    /**
     * @test
     */
    public function a(): void {}

    public function text(): string
    {
        $s = "x


y";
        return <<<TXT
line1



line2
TXT;
    }
}
"#;
    let out = migrate(source);
    assert!(out.contains("#[Test]"));
    assert!(out.contains("line1\n\n\n\nline2"));
    assert!(out.contains("\"x\n\n\ny\""));
}

#[test]
fn test_crlf_files_keep_crlf() {
    let source = "<?php\r\n\r\nnamespace App;\r\n\r\nclass FooTest\r\n{\r\n    /**\r\n     * @test\r\n     */\r\n    public function a(): void\r\n    {\r\n    }\r\n    public function b(): void\r\n    {\r\n    }\r\n}\r\n";
    let out = migrate(source);
    assert!(out.contains("#[Test]\r\n    public function a()"));
    assert!(out.contains("use PHPUnit\\Framework\\Attributes\\Test;\r\n\r\nclass FooTest"));
    assert!(out.contains("    }\r\n\r\n    public function b()"));
    let bare = out
        .match_indices('\n')
        .filter(|&(i, _)| i == 0 || out.as_bytes()[i - 1] != b'\r')
        .count();
    assert_eq!(bare, 0, "bare line feeds in:\n{out}");
}
