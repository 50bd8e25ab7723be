/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Object body and metadata encoding.
//!
//! # Wire format
//!
//! An object body is the JSON serialization of a model's attributes. Dates are written as
//! ISO-8601 UTC strings with millisecond precision (`2013-01-01T00:00:00.000Z`).
//!
//! Because JSON has no date type, the names of date valued attributes are recorded in the
//! user metadata entry [`DATE_ATTRIBUTES_METADATA_KEY`] as a JSON array of strings sorted
//! by name, e.g. `["postedAt","updatedAt"]`. Body keys are sorted the same way. Readers
//! rehydrate exactly those attributes as dates, from an RFC 3339 string or a number of epoch
//! milliseconds. The entry is only meaningful together with the body it was written with.
//!
//! Decoding never fails: a malformed body decodes as no attributes and malformed metadata
//! as no date attributes.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};

use crate::types::{Attributes, Value};

/// Reserved user metadata entry listing the attributes that hold dates.
pub const DATE_ATTRIBUTES_METADATA_KEY: &str = "date-attributes";

/// Content type of every object body written by this crate.
pub const CONTENT_TYPE: &str = "application/json";

/// Names of all date valued attributes, sorted by name.
///
/// [`Attributes`] is ordered by name, so this is also the order of the keys in the body.
pub fn date_attribute_names(attributes: &Attributes) -> Vec<&str> {
    attributes
        .iter()
        .filter(|(_, value)| value.is_date())
        .map(|(name, _)| name.as_str())
        .collect()
}

/// Build the metadata to write alongside `attributes`.
///
/// Caller supplied metadata is kept; the date attribute entry is added over it when at
/// least one attribute is a date.
pub fn encode_metadata(
    attributes: &Attributes,
    metadata: Option<HashMap<String, String>>,
) -> Result<Option<HashMap<String, String>>, serde_json::Error> {
    let dates = date_attribute_names(attributes);
    if dates.is_empty() {
        return Ok(metadata);
    }

    let mut metadata = metadata.unwrap_or_default();
    metadata.insert(
        DATE_ATTRIBUTES_METADATA_KEY.to_owned(),
        serde_json::to_string(&dates)?,
    );
    Ok(Some(metadata))
}

/// Serialize attributes into an object body.
pub fn encode_body(attributes: &Attributes) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(attributes)
}

/// Decode an object body and rehydrate the date attributes named in `metadata`.
pub fn decode(body: &[u8], metadata: Option<&HashMap<String, String>>) -> Attributes {
    let mut attributes = match serde_json::from_slice::<Attributes>(body) {
        Ok(attributes) => attributes,
        Err(err) => {
            tracing::debug!("object body is not a JSON object, decoding as empty: {err}");
            Attributes::new()
        }
    };

    for name in date_attributes(metadata) {
        let Some(value) = attributes.get_mut(&name) else {
            continue;
        };
        match parse_date(value) {
            Some(date) => *value = Value::Date(date),
            None => tracing::debug!("attribute {name:?} is listed as a date but is not one"),
        }
    }

    attributes
}

fn date_attributes(metadata: Option<&HashMap<String, String>>) -> Vec<String> {
    let Some(raw) = metadata.and_then(|md| md.get(DATE_ATTRIBUTES_METADATA_KEY)) else {
        return Vec::new();
    };
    serde_json::from_str(raw).unwrap_or_else(|err| {
        tracing::debug!("ignoring malformed {DATE_ATTRIBUTES_METADATA_KEY} metadata {raw:?}: {err}");
        Vec::new()
    })
}

/// Interpret a stored value as a date: an RFC 3339 string or epoch milliseconds (fractional
/// milliseconds are truncated).
fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Date(date) => Some(*date),
        Value::Json(serde_json::Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|date| date.with_timezone(&Utc)),
        Value::Json(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        Value::Json(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn posted_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2013, 1, 1, 0, 0, 0).unwrap()
    }

    fn note() -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("title".to_owned(), "hello".into());
        attrs.insert("postedAt".to_owned(), posted_at().into());
        attrs.insert("views".to_owned(), 3i64.into());
        attrs
    }

    #[test]
    fn test_encode_metadata_lists_dates() {
        let md = encode_metadata(&note(), None).unwrap().unwrap();
        assert_eq!("[\"postedAt\"]", md[DATE_ATTRIBUTES_METADATA_KEY]);
    }

    #[test]
    fn test_encode_metadata_without_dates() {
        let mut attrs = note();
        attrs.remove("postedAt");
        assert_eq!(None, encode_metadata(&attrs, None).unwrap());

        let caller = HashMap::from([("owner".to_owned(), "me".to_owned())]);
        assert_eq!(Some(caller.clone()), encode_metadata(&attrs, Some(caller)).unwrap());
    }

    #[test]
    fn test_encode_metadata_merges_caller_metadata() {
        let caller = HashMap::from([
            ("owner".to_owned(), "me".to_owned()),
            (DATE_ATTRIBUTES_METADATA_KEY.to_owned(), "stale".to_owned()),
        ]);
        let md = encode_metadata(&note(), Some(caller)).unwrap().unwrap();
        assert_eq!("me", md["owner"]);
        assert_eq!("[\"postedAt\"]", md[DATE_ATTRIBUTES_METADATA_KEY]);
    }

    #[test]
    fn test_round_trip() {
        let attrs = note();
        let body = encode_body(&attrs).unwrap();
        let md = encode_metadata(&attrs, None).unwrap();

        let decoded = decode(&body, md.as_ref());
        assert_eq!(attrs, decoded);
        assert_eq!(Some(&posted_at()), decoded["postedAt"].as_date());
    }

    #[test]
    fn test_round_trip_truncates_to_millis() {
        let precise = Utc.timestamp_nanos(1_357_000_000_123_456_789);
        let mut attrs = Attributes::new();
        attrs.insert("at".to_owned(), precise.into());

        let decoded = decode(
            &encode_body(&attrs).unwrap(),
            encode_metadata(&attrs, None).unwrap().as_ref(),
        );
        assert_eq!(
            Some(&Utc.timestamp_millis_opt(1_357_000_000_123).unwrap()),
            decoded["at"].as_date()
        );
    }

    #[test]
    fn test_without_metadata_dates_stay_strings() {
        let body = encode_body(&note()).unwrap();
        let decoded = decode(&body, None);
        assert_eq!(Some("2013-01-01T00:00:00.000Z"), decoded["postedAt"].as_str());
    }

    #[test]
    fn test_malformed_body_decodes_empty() {
        assert!(decode(b"not json", None).is_empty());
        assert!(decode(b"[1, 2]", None).is_empty());
        assert!(decode(b"", None).is_empty());
    }

    #[test]
    fn test_malformed_metadata_is_ignored() {
        let body = encode_body(&note()).unwrap();
        let md = HashMap::from([(DATE_ATTRIBUTES_METADATA_KEY.to_owned(), "{oops".to_owned())]);
        let decoded = decode(&body, Some(&md));
        assert_eq!(Some("2013-01-01T00:00:00.000Z"), decoded["postedAt"].as_str());
        assert_eq!(Value::from(json!(3)), decoded["views"]);
    }

    #[test]
    fn test_names_and_body_keys_are_sorted() {
        let mut attrs = Attributes::new();
        attrs.insert("zUpdated".to_owned(), posted_at().into());
        attrs.insert("aCreated".to_owned(), posted_at().into());
        attrs.insert("title".to_owned(), "hello".into());

        assert_eq!(vec!["aCreated", "zUpdated"], date_attribute_names(&attrs));
        let md = encode_metadata(&attrs, None).unwrap().unwrap();
        assert_eq!("[\"aCreated\",\"zUpdated\"]", md[DATE_ATTRIBUTES_METADATA_KEY]);

        let body = String::from_utf8(encode_body(&attrs).unwrap()).unwrap();
        let a = body.find("aCreated").unwrap();
        let t = body.find("title").unwrap();
        let z = body.find("zUpdated").unwrap();
        assert!(a < t && t < z, "body: {body}");
    }

    #[test]
    fn test_fractional_epoch_millis() {
        let body = br#"{"createdAt":1356998400000.0,"updatedAt":1356998400123.9}"#;
        let md = HashMap::from([(
            DATE_ATTRIBUTES_METADATA_KEY.to_owned(),
            r#"["createdAt","updatedAt"]"#.to_owned(),
        )]);
        let decoded = decode(body, Some(&md));
        assert_eq!(Some(&posted_at()), decoded["createdAt"].as_date());
        assert_eq!(
            Some(&Utc.timestamp_millis_opt(1_356_998_400_123).unwrap()),
            decoded["updatedAt"].as_date()
        );
    }

    #[test]
    fn test_listed_attribute_missing_or_not_a_date() {
        let body = br#"{"title":"hello","createdAt":1356998400000}"#;
        let md = HashMap::from([(
            DATE_ATTRIBUTES_METADATA_KEY.to_owned(),
            r#"["title","missing","createdAt"]"#.to_owned(),
        )]);
        let decoded = decode(body, Some(&md));
        assert_eq!(2, decoded.len());
        assert_eq!(Some("hello"), decoded["title"].as_str());
        assert_eq!(Some(&posted_at()), decoded["createdAt"].as_date());
    }
}
