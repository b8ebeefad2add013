use std::collections::HashMap;

use chrono::{TimeZone, Utc};

use crate::error::ApiError;
use crate::ContentType;

#[test]
fn canonical_strings_match_the_wire_format() {
    let expected = [
        (ContentType::AzureActiveDirectory, "Audit.AzureActiveDirectory"),
        (ContentType::Exchange, "Audit.Exchange"),
        (ContentType::SharePoint, "Audit.SharePoint"),
        (ContentType::General, "Audit.General"),
        (ContentType::Dlp, "DLP.All"),
    ];
    for (ct, s) in expected {
        assert_eq!(ct.as_str(), s);
        assert_eq!(ct.to_string(), s);
    }
}

#[test]
fn all_lists_every_stream_once() {
    assert_eq!(ContentType::ALL.len(), 5);
    let mut seen = ContentType::ALL.to_vec();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 5);
}

#[test]
fn parsing_round_trips_the_canonical_form() {
    for ct in ContentType::ALL {
        assert_eq!(ct.as_str().parse::<ContentType>().unwrap(), ct);
    }
}

#[test]
fn unknown_strings_are_rejected() {
    for input in ["", "Audit.Bogus", "audit.exchange", "DLP.ALL"] {
        match input.parse::<ContentType>() {
            Err(ApiError::UnknownContentType { value }) => assert_eq!(value, input),
            other => panic!("expected unknown content type for {input:?}, got {other:?}"),
        }
    }
}

#[test]
fn serializes_as_the_canonical_string() {
    let json = serde_json::to_string(&ContentType::Exchange).unwrap();
    assert_eq!(json, "\"Audit.Exchange\"");

    let back: ContentType = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ContentType::Exchange);

    assert!(serde_json::from_str::<ContentType>("\"Audit.Bogus\"").is_err());
}

#[test]
fn works_as_a_json_map_key() {
    let t = Utc.with_ymd_and_hms(2024, 3, 5, 7, 9, 0).unwrap();
    let mut map = HashMap::new();
    map.insert(ContentType::General, t);

    let json = serde_json::to_string(&map).unwrap();
    assert!(json.contains("\"Audit.General\""));

    let back: HashMap<ContentType, chrono::DateTime<Utc>> = serde_json::from_str(&json).unwrap();
    assert_eq!(back.get(&ContentType::General), Some(&t));
}
