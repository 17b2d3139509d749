//! STIX identifier generation and well-formedness checks

/// Separator between the type prefix and the unique token of a STIX id.
pub const ID_SEPARATOR: &str = "--";

/// Minimum length of the unique token for an id to count as well formed.
///
/// Ids the LLM invents ("malware--1", "tool--abc") are shorter than this and
/// get replaced during normalization; real UUID tokens always pass.
pub const MIN_TOKEN_LEN: usize = 9;

/// Generate a fresh bundle id: `bundle--<uuid-v4>`.
pub fn bundle_id() -> String {
    format!("bundle{}{}", ID_SEPARATOR, uuid::Uuid::new_v4())
}

/// Generate a fresh object id for the given type: `<type>--<uuid-v4>`.
pub fn object_id(object_type: &str) -> String {
    format!("{}{}{}", object_type, ID_SEPARATOR, uuid::Uuid::new_v4())
}

/// Check whether an id is well formed: it contains the `--` separator and
/// the token after it is longer than 8 characters.
///
/// The type prefix is deliberately not checked against the object's `type`
/// field; LLM output is untrusted and a mismatched prefix is tolerated.
pub fn is_well_formed(id: &str) -> bool {
    match id.split_once(ID_SEPARATOR) {
        Some((_, token)) => token.len() >= MIN_TOKEN_LEN,
        None => false,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: every generated object id is well formed, whatever the
        /// type string looks like.
        #[test]
        fn test_generated_ids_are_well_formed(object_type in "[a-z-]{1,24}") {
            prop_assert!(is_well_formed(&object_id(&object_type)));
        }

        /// Property: well-formedness is exactly "separator present and token
        /// longer than 8".
        #[test]
        fn test_well_formed_matches_token_length(token in "[a-z0-9]{0,16}") {
            let id = format!("malware--{}", token);
            prop_assert_eq!(is_well_formed(&id), token.len() > 8);
        }
    }
}
