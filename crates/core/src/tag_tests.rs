use super::*;

#[test]
fn substitutes_version_decimal() {
    assert_eq!(render_tag("demo:$VERSION", 1), "demo:1");
    assert_eq!(render_tag("demo:$VERSION", 42), "demo:42");
}

#[test]
fn leaves_template_without_token_untouched() {
    assert_eq!(render_tag("demo:latest", 7), "demo:latest");
}

#[test]
fn substitutes_every_occurrence() {
    assert_eq!(render_tag("$VERSION-$VERSION", 3), "3-3");
}

#[test]
fn large_version_renders_as_plain_digits_not_a_code_point() {
    // Regression guard for the rune-conversion bug named in spec.md §9.
    assert_eq!(render_tag("v$VERSION", 128512), "v128512");
}
