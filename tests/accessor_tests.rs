use nestpath::document::codec::{parse_json, to_json_compact};
use nestpath::document::node::Document;
use nestpath::path::accessor::{delete_with, get_with, set_with};
use nestpath::path::{delete, extract, get, has, set, PathSyntax, SetReturn};
use nestpath::Error;

fn doc(json: &str) -> Document {
    parse_json(json).unwrap()
}

#[test]
fn test_get_nested_value() {
    let d = doc(r#"{"user": {"address": {"city": "Utrecht"}}}"#);
    assert_eq!(get(&d, "user.address.city"), Some(&Document::from("Utrecht")));
    assert_eq!(get(&d, "user.address.zip"), None);
    assert_eq!(get(&d, "user.address.city.name"), None);
}

#[test]
fn test_get_sequence_index() {
    let d = doc(r#"{"items": [{"id": 1}, {"id": 2}]}"#);
    assert_eq!(get(&d, "items.1.id"), Some(&Document::from(2)));
    assert_eq!(get(&d, "items[0][id]"), Some(&Document::from(1)));
    assert_eq!(get(&d, "items.2"), None);
}

#[test]
fn test_compound_key_wins_over_nesting() {
    let d = doc(r#"{"a.b": 1, "a": {"b": 2}}"#);
    assert_eq!(get(&d, "a.b"), Some(&Document::from(1)));
}

#[test]
fn test_compound_key_in_the_middle_of_a_path() {
    let d = doc(r#"{"config": {"db.host": {"name": "primary"}}}"#);
    assert_eq!(get(&d, "config.db.host.name"), Some(&Document::from("primary")));
}

#[test]
fn test_get_null_is_present() {
    let d = doc(r#"{"a": null}"#);
    assert_eq!(get(&d, "a"), Some(&Document::Null));
    assert!(has(&d, "a"));
}

#[test]
fn test_has_matches_get() {
    let d = doc(r#"{"a": {"b": [1, {"c": null}]}, "x.y": false}"#);
    for path in ["a", "a.b", "a.b.0", "a.b.1.c", "a.b.2", "x.y", "x", "missing", "a.b.1.c.d"] {
        assert_eq!(has(&d, path), get(&d, path).is_some(), "path {}", path);
    }
}

#[test]
fn test_has_empty_path_on_empty_document() {
    assert!(has(&Document::map(), ""));
    assert!(has(&Document::Null, ""));
    assert!(!has(&doc(r#"{"a": 1}"#), ""));
}

#[test]
fn test_indirect_segment_resolves_against_root() {
    let d = doc(r#"{"current": "bob", "users": {"alice": {"age": 30}, "bob": {"age": 41}}}"#);
    assert_eq!(get(&d, "users[$current].age"), Some(&Document::from(41)));
}

#[test]
fn test_indirect_segment_with_numeric_value() {
    let d = doc(r#"{"pick": 1, "list": ["a", "b", "c"]}"#);
    assert_eq!(get(&d, "list[$pick]"), Some(&Document::from("b")));
}

#[test]
fn test_unresolved_indirect_segment_uses_empty_key() {
    let d = doc(r#"{"users": {"": "nobody", "bob": 1}}"#);
    assert_eq!(get(&d, "users[$missing]"), Some(&Document::from("nobody")));
}

#[test]
fn test_set_then_get_round_trip() {
    let mut d = Document::map();
    let values = [
        Document::from(1),
        Document::from("text"),
        Document::from(true),
        Document::from(2.5),
        Document::Null,
    ];
    for (i, value) in values.into_iter().enumerate() {
        let path = format!("deep.path{}.leaf", i);
        set(&mut d, &path, value.clone()).unwrap();
        assert_eq!(get(&d, &path), Some(&value));
    }
}

#[test]
fn test_reset_moves_key_to_end() {
    let mut d = doc(r#"{"a": 1, "b": 2}"#);
    set(&mut d, "a", Document::from(3)).unwrap();
    assert_eq!(d.keys(), vec!["b".to_string(), "a".to_string()]);
    assert_eq!(get(&d, "a"), Some(&Document::from(3)));
}

#[test]
fn test_set_map_over_map_merges_in_place() {
    let mut d = doc(r#"{"a": {"x": 1}, "b": 2}"#);
    set(&mut d, "a", doc(r#"{"y": 2}"#)).unwrap();
    assert_eq!(d, doc(r#"{"a": {"x": 1, "y": 2}, "b": 2}"#));
}

#[test]
fn test_set_creates_intermediate_maps() {
    let mut d = Document::Null;
    set(&mut d, "a.b.c", Document::from(1)).unwrap();
    assert_eq!(d, doc(r#"{"a": {"b": {"c": 1}}}"#));
}

#[test]
fn test_set_through_scalar_is_type_mismatch() {
    let mut d = doc(r#"{"a": 5}"#);
    let err = set(&mut d, "a.b", Document::from(1)).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
    assert_eq!(d, doc(r#"{"a": 5}"#));
}

#[test]
fn test_set_append_to_sequence() {
    let mut d = doc(r#"{"tags": ["a"]}"#);
    set(&mut d, "tags[]", Document::from("b")).unwrap();
    set(&mut d, "tags[]", Document::from("c")).unwrap();
    assert_eq!(d, doc(r#"{"tags": ["a", "b", "c"]}"#));
}

#[test]
fn test_set_append_creates_sequence() {
    let mut d = Document::map();
    set(&mut d, "log[]", Document::from("first")).unwrap();
    assert_eq!(d, doc(r#"{"log": ["first"]}"#));
}

#[test]
fn test_set_past_sequence_end_is_invalid() {
    let mut d = doc(r#"{"list": [1]}"#);
    let err = set(&mut d, "list.5", Document::from(2)).unwrap_err();
    assert!(matches!(err, Error::InvalidPath(_)));
}

#[test]
fn test_set_return_modes() {
    let syntax = PathSyntax::default();
    let mut d = doc(r#"{"count": 1}"#);

    let root = set_with(&mut d, "a.b", Document::from(2), &SetReturn::Root, &syntax)
        .unwrap()
        .cloned();
    assert_eq!(root, Some(doc(r#"{"count": 1, "a": {"b": 2}}"#)));

    let other = set_with(&mut d, "a.c", Document::from(3), &SetReturn::Path("count".into()), &syntax)
        .unwrap()
        .cloned();
    assert_eq!(other, Some(Document::from(1)));

    let missing = set_with(&mut d, "a.d", Document::from(4), &SetReturn::from_name("nope"), &syntax).unwrap();
    assert_eq!(missing, None);
}

#[test]
fn test_custom_delimiters() {
    let syntax = PathSyntax::new(vec!["/".to_string(), "::".to_string()], '$');
    let mut d = Document::map();
    set_with(&mut d, "a/b::c", Document::from(1), &SetReturn::Child, &syntax).unwrap();
    assert_eq!(get_with(&d, "a::b/c", &syntax), Some(&Document::from(1)));
    assert!(delete_with(&mut d, "a/b/c", &syntax));
    assert_eq!(d, doc(r#"{"a": {"b": {}}}"#));
}

#[test]
fn test_delete_nested() {
    let mut d = doc(r#"{"a": {"b": 1, "c": 2}}"#);
    assert!(delete(&mut d, "a.b"));
    assert_eq!(d, doc(r#"{"a": {"c": 2}}"#));
    assert!(!delete(&mut d, "a.b"));
    assert!(!delete(&mut d, "x.y"));
}

#[test]
fn test_delete_back_to_contiguous_indices_gives_a_list() {
    let mut d = doc(r#"{"tags": ["a", "b", "c"]}"#);
    assert!(delete(&mut d, "tags.1"));
    assert_eq!(to_json_compact(get(&d, "tags").unwrap()), r#"{"0":"a","2":"c"}"#);

    assert!(delete(&mut d, "tags.2"));
    assert_eq!(d, doc(r#"{"tags": ["a"]}"#));
    assert_eq!(to_json_compact(&d), r#"{"tags":["a"]}"#);
}

#[test]
fn test_delete_exact_compound_key() {
    let mut d = doc(r#"{"a.b": 1, "a": {"b": 2}}"#);
    assert!(delete(&mut d, "a.b"));
    assert_eq!(d, doc(r#"{"a": {"b": 2}}"#));
}

#[test]
fn test_delete_drops_null_placeholder() {
    let mut d = doc(r#"{"a": null, "b": 1}"#);
    assert!(!delete(&mut d, "a.b"));
    assert_eq!(d, doc(r#"{"b": 1}"#));
}

#[test]
fn test_delete_keeps_original_indices() {
    let mut d = doc(r#"{"list": ["a", "b", "c"]}"#);
    assert!(delete(&mut d, "list.0"));
    assert_eq!(get(&d, "list.1"), Some(&Document::from("b")));
    assert_eq!(get(&d, "list.2"), Some(&Document::from("c")));
    assert_eq!(get(&d, "list.0"), None);
}

#[test]
fn test_delete_last_element_pops() {
    let mut d = doc(r#"{"list": ["a", "b"]}"#);
    assert!(delete(&mut d, "list.1"));
    assert_eq!(d, doc(r#"{"list": ["a"]}"#));
}

#[test]
fn test_append_path_is_never_found() {
    let mut d = doc(r#"{"tags": ["a"]}"#);
    assert_eq!(get(&d, "tags[]"), None);
    assert!(!has(&d, "tags[]"));
    assert!(!delete(&mut d, "tags[]"));
}

#[test]
fn test_extract_removes_value() {
    let mut d = doc(r#"{"a": {"b": [1, 2]}, "c": 3}"#);
    assert_eq!(extract(&mut d, "a.b"), Some(doc("[1, 2]")));
    assert_eq!(d, doc(r#"{"a": {}, "c": 3}"#));
    assert_eq!(extract(&mut d, "a.b"), None);
}
