//! Tests schema filename derivation from interaction descriptions.

use pact_check_core::{SCHEMA_FILENAME_SUFFIX, schema_filename_for};
use proptest::prelude::*;

#[test]
fn name_derivation_tests_replaces_every_slash() {
    assert_eq!(schema_filename_for("tls/domains"), "tls-domains-schema.json");
    assert_eq!(
        schema_filename_for("/api/v1/users/"),
        "-api-v1-users--schema.json"
    );
}

#[test]
fn name_derivation_tests_keeps_other_characters_verbatim() {
    assert_eq!(schema_filename_for("get user"), "get user-schema.json");
    assert_eq!(schema_filename_for("a?b#c"), "a?b#c-schema.json");
    assert_eq!(schema_filename_for(""), "-schema.json");
}

#[test]
fn name_derivation_tests_documents_collisions() {
    assert_eq!(schema_filename_for("a/b"), schema_filename_for("a-b"));
}

proptest! {
    #[test]
    fn name_derivation_is_total_and_deterministic(description in ".*") {
        let first = schema_filename_for(&description);
        let second = schema_filename_for(&description);
        prop_assert_eq!(&first, &second);
        prop_assert!(first.ends_with(SCHEMA_FILENAME_SUFFIX));
    }

    #[test]
    fn name_derivation_leaves_no_slashes(description in ".*") {
        prop_assert!(!schema_filename_for(&description).contains('/'));
    }

    #[test]
    fn slash_and_dash_spellings_collide(description in "[a-z/-]{0,16}") {
        let dashed = description.replace('/', "-");
        prop_assert_eq!(schema_filename_for(&description), schema_filename_for(&dashed));
    }
}
