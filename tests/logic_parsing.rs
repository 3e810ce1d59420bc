use serde_json::json;
use stocksieve::error::StocksieveError;
use stocksieve::logic::{Logic, LogicKind, mentioned_parameters, split_condition};

#[test]
fn leaf_lowercases_parameter_and_keeps_option_case() {
    let logic = Logic::parse(&json!("HEATING_TYPE|Electric")).expect("parse ok");
    match logic.kind() {
        LogicKind::Leaf { parameter, option } => {
            assert_eq!(parameter, "heating_type");
            assert_eq!(option, "Electric");
        }
        other => panic!("expected a leaf, got {other:?}"),
    }
}

#[test]
fn leaf_without_separator_is_a_configuration_error() {
    let err = Logic::parse(&json!("bad_condition_no_pipe")).unwrap_err();
    assert!(matches!(err, StocksieveError::Configuration(_)));
    assert!(format!("{err}").contains("bad_condition_no_pipe"));
}

#[test]
fn nested_lists_splice_into_their_parent() {
    let nested = Logic::parse(&json!([["a|1"], ["b|2", ["c|3"]]])).expect("parse ok");
    let flat = Logic::parse(&json!(["a|1", "b|2", "c|3"])).expect("parse ok");
    assert_eq!(nested.fingerprint(), flat.fingerprint());
}

#[test]
fn singleton_list_collapses_to_its_element() {
    let wrapped = Logic::parse(&json!(["a|1"])).expect("parse ok");
    let bare = Logic::parse(&json!("a|1")).expect("parse ok");
    assert_eq!(wrapped.fingerprint(), bare.fingerprint());
    assert!(matches!(wrapped.kind(), LogicKind::Leaf { .. }));
}

#[test]
fn single_child_combinators_collapse() {
    let anded = Logic::parse(&json!({"and": ["a|1"]})).expect("parse ok");
    let ored = Logic::parse(&json!({"or": "a|1"})).expect("parse ok");
    let bare = Logic::parse(&json!("a|1")).expect("parse ok");
    assert_eq!(anded.fingerprint(), bare.fingerprint());
    assert_eq!(ored.fingerprint(), bare.fingerprint());
}

#[test]
fn bare_list_and_explicit_and_share_a_fingerprint() {
    let implicit = Logic::parse(&json!(["a|1", "b|2"])).expect("parse ok");
    let explicit = Logic::parse(&json!({"and": ["a|1", "b|2"]})).expect("parse ok");
    assert_eq!(implicit.fingerprint(), explicit.fingerprint());
    assert!(matches!(
        implicit.kind(),
        LogicKind::And { implicit: true, .. }
    ));
    assert!(matches!(
        explicit.kind(),
        LogicKind::And { implicit: false, .. }
    ));
}

#[test]
fn and_and_or_fingerprints_differ() {
    let anded = Logic::parse(&json!({"and": ["a|1", "b|2"]})).expect("parse ok");
    let ored = Logic::parse(&json!({"or": ["a|1", "b|2"]})).expect("parse ok");
    assert_ne!(anded.fingerprint(), ored.fingerprint());
}

#[test]
fn not_over_a_list_wraps_an_implicit_conjunction() {
    let listed = Logic::parse(&json!({"not": ["a|1", "b|2"]})).expect("parse ok");
    let explicit = Logic::parse(&json!({"not": {"and": ["a|1", "b|2"]}})).expect("parse ok");
    assert_eq!(listed.fingerprint(), explicit.fingerprint());
    match listed.kind() {
        LogicKind::Not { child } => match child.kind() {
            LogicKind::And { children, .. } => assert_eq!(children.len(), 2),
            other => panic!("expected a conjunction under not, got {other:?}"),
        },
        other => panic!("expected not, got {other:?}"),
    }
}

#[test]
fn multi_key_mapping_is_a_configuration_error() {
    let err = Logic::parse(&json!({"and": ["a|1"], "or": ["b|2"]})).unwrap_err();
    assert!(format!("{err}").contains("more than one key"));
}

#[test]
fn unknown_combinator_is_a_configuration_error() {
    let err = Logic::parse(&json!({"xor": ["a|1", "b|2"]})).unwrap_err();
    let message = format!("{err}");
    assert!(message.contains("xor"), "message should name the key: {message}");
    assert!(message.contains("a|1"), "message should show the fragment: {message}");
}

#[test]
fn non_logic_value_kinds_are_configuration_errors() {
    assert!(Logic::parse(&json!(42)).is_err());
    assert!(Logic::parse(&json!(true)).is_err());
    assert!(Logic::parse(&json!(null)).is_err());
}

#[test]
fn split_condition_lowercases_only_the_parameter() {
    let (parameter, option) = split_condition("Vintage|1960s").expect("split ok");
    assert_eq!(parameter, "vintage");
    assert_eq!(option, "1960s");
}

#[test]
fn mentioned_parameters_are_deduplicated_in_first_seen_order() {
    let raw = json!({"and": ["b|2", {"or": ["a|1", "b|3", {"not": "c|4"}]}]});
    let parameters = mentioned_parameters(&raw).expect("collect ok");
    assert_eq!(parameters, vec!["b", "a", "c"]);
}

#[test]
fn mentioned_parameters_of_null_is_empty() {
    assert!(mentioned_parameters(&json!(null)).expect("collect ok").is_empty());
}
