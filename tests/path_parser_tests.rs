use nestpath::path::{PathExpression, PathSyntax, Segment};

fn keys(names: &[&str]) -> Vec<Segment> {
    names.iter().map(|n| Segment::Key(n.to_string())).collect()
}

#[test]
fn test_parse_dotted_path() {
    let expr = PathExpression::parse("a.b.c");
    assert_eq!(expr.segments(), keys(&["a", "b", "c"]).as_slice());
    assert_eq!(expr.raw(), "a.b.c");
    assert!(!expr.is_indirect());
}

#[test]
fn test_parse_single_key() {
    let expr = PathExpression::parse("name");
    assert_eq!(expr.segments(), keys(&["name"]).as_slice());
}

#[test]
fn test_parse_empty_path_is_empty_key() {
    let expr = PathExpression::parse("");
    assert_eq!(expr.segments(), keys(&[""]).as_slice());
}

#[test]
fn test_parse_bracket_groups() {
    let expr = PathExpression::parse("users[0][name]");
    assert_eq!(expr.segments(), keys(&["users", "0", "name"]).as_slice());
}

#[test]
fn test_parse_indirect_group() {
    let expr = PathExpression::parse("users[$current].name");
    assert_eq!(
        expr.segments(),
        &[
            Segment::Key("users".to_string()),
            Segment::Indirect("current".to_string()),
            Segment::Key("name".to_string()),
        ]
    );
    assert!(expr.is_indirect());
}

#[test]
fn test_indirect_group_may_hold_a_path() {
    let expr = PathExpression::parse("users[$session.user].name");
    assert_eq!(
        expr.segments(),
        &[
            Segment::Key("users".to_string()),
            Segment::Indirect("session.user".to_string()),
            Segment::Key("name".to_string()),
        ]
    );
}

#[test]
fn test_parse_append_group() {
    let expr = PathExpression::parse("tags[]");
    assert_eq!(expr.segments(), &[Segment::Key("tags".to_string()), Segment::Append]);
}

#[test]
fn test_unbalanced_brackets_stay_literal() {
    let expr = PathExpression::parse("a[b.c");
    assert_eq!(expr.segments(), keys(&["a[b.c"]).as_slice());

    let expr = PathExpression::parse("a]b");
    assert_eq!(expr.segments(), keys(&["a]b"]).as_slice());
}

#[test]
fn test_text_after_bracket_stays_literal() {
    let expr = PathExpression::parse("a[0]x");
    assert_eq!(expr.segments(), keys(&["a[0]x"]).as_slice());
}

#[test]
fn test_custom_marker_and_delimiters() {
    let syntax = PathSyntax::new(vec!["->".to_string(), "/".to_string()], '@');
    let expr = PathExpression::parse_with("a->b/c[@d]", &syntax);
    assert_eq!(
        expr.segments(),
        &[
            Segment::Key("a".to_string()),
            Segment::Key("b".to_string()),
            Segment::Key("c".to_string()),
            Segment::Indirect("d".to_string()),
        ]
    );
    assert_eq!(syntax.joiner(), "->");
}

#[test]
fn test_empty_delimiters_fall_back_to_dot() {
    let syntax = PathSyntax::new(vec![String::new()], '$');
    assert_eq!(syntax, PathSyntax::default());
}

#[test]
fn test_display_is_raw_text() {
    let expr = PathExpression::parse("users[$id].name");
    assert_eq!(expr.to_string(), "users[$id].name");
    assert_eq!(Segment::Indirect("id".to_string()).to_string(), "[$id]");
    assert_eq!(Segment::Append.to_string(), "[]");
}
