/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Object key and key prefix derivation.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Path separator used between key segments
pub const DELIMITER: char = '/';

/// Characters escaped in a single key segment. Matches the set left untouched by
/// `encodeURIComponent`, so keys line up with ones produced by browser clients.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// The key a model is written to, plus the identity generated for it (if it was new).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ModelKey {
    pub(crate) key: String,
    pub(crate) assigned_id: Option<String>,
}

/// Escape a single key segment (e.g. a model identity).
pub fn escape_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Append an escaped segment to `base`, inserting a separator only when `base` does not
/// already end with one.
pub fn join_segment(base: &str, segment: &str) -> String {
    let mut joined = String::with_capacity(base.len() + segment.len() + 1);
    joined.push_str(base);
    if !joined.ends_with(DELIMITER) {
        joined.push(DELIMITER);
    }
    joined.push_str(&escape_segment(segment));
    joined
}

/// Strip a single leading separator from a url to get an object key.
pub fn object_key(url: &str) -> String {
    url.strip_prefix(DELIMITER).unwrap_or(url).to_owned()
}

/// Derive the key for a model write.
///
/// New models get a freshly generated identity appended to their url; that identity is
/// returned so it can be merged into the written attributes.
pub(crate) fn model_key<F>(url: &str, is_new: bool, generate_id: F) -> ModelKey
where
    F: FnOnce() -> String,
{
    if !is_new {
        return ModelKey {
            key: object_key(url),
            assigned_id: None,
        };
    }

    let id = generate_id();
    let key = object_key(&join_segment(url, &id));
    tracing::trace!("assigned id {id:?} to new model, key: {key:?}");
    ModelKey {
        key,
        assigned_id: Some(id),
    }
}

/// Derive the listing prefix for a collection url.
///
/// Leading separators are removed and the result ends with exactly one separator. A url
/// that is empty or only separators maps to the bare separator.
pub fn collection_prefix(url: &str) -> String {
    let trimmed = url.trim_start_matches(DELIMITER).trim_end_matches(DELIMITER);
    format!("{trimmed}{DELIMITER}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_model_key() {
        let resolved = model_key("/notes/abc", false, || unreachable!());
        assert_eq!("notes/abc", resolved.key);
        assert_eq!(None, resolved.assigned_id);
    }

    #[test]
    fn test_new_model_key_ends_with_token() {
        for url in ["notes", "notes/", "/notes", "/notes/"] {
            let resolved = model_key(url, true, || "token-1".to_owned());
            assert_eq!("notes/token-1", resolved.key, "url: {url}");
            assert_eq!(Some("token-1".to_owned()), resolved.assigned_id);
        }
    }

    #[test]
    fn test_new_model_token_is_escaped() {
        let resolved = model_key("notes", true, || "a b/c?".to_owned());
        assert_eq!("notes/a%20b%2Fc%3F", resolved.key);
        // the attribute value stays unescaped
        assert_eq!(Some("a b/c?".to_owned()), resolved.assigned_id);
    }

    #[test]
    fn test_unreserved_characters_not_escaped() {
        assert_eq!("AZaz09-_.!~*'()", escape_segment("AZaz09-_.!~*'()"));
    }

    #[test]
    fn test_collection_prefix() {
        for url in ["notes", "/notes", "notes/", "/notes/", "//notes//"] {
            assert_eq!("notes/", collection_prefix(url), "url: {url}");
        }
        assert_eq!("a/b/", collection_prefix("/a/b"));
    }

    #[test]
    fn test_root_collection_prefix() {
        for url in ["", "/", "//"] {
            let prefix = collection_prefix(url);
            assert_eq!("/", prefix, "url: {url:?}");
            assert!(prefix.ends_with(DELIMITER));
        }
    }
}
