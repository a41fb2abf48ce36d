use super::*;
use serde_json::json;

#[test]
fn decode_is_total_over_every_shape() {
    let cases = [
        (json!({"__kind__": "approved"}), Status::Approved),
        (json!({"approved": null}), Status::Approved),
        (json!("approved"), Status::Approved),
        (json!("rejected"), Status::Rejected),
        (json!({}), Status::Unknown),
        (json!(null), Status::Unknown),
        (json!(42), Status::Unknown),
    ];
    for (raw, expected) in cases {
        assert_eq!(decode(&raw), expected, "decoding {raw}");
    }
}

#[test]
fn tag_wins_over_other_keys() {
    let raw = json!({"__kind__": "rejected", "approved": null});
    assert_eq!(decode(&raw), Status::Rejected);
}

#[test]
fn non_string_tag_is_unknown() {
    assert_eq!(decode(&json!({"__kind__": 1})), Status::Unknown);
}

#[test]
fn multi_key_object_without_tag_is_unknown() {
    assert_eq!(
        decode(&json!({"approved": null, "rejected": null})),
        Status::Unknown
    );
}

#[test]
fn unrecognized_names_are_unknown() {
    assert_eq!(decode(&json!("archived")), Status::Unknown);
    assert_eq!(decode(&json!({"suspended": null})), Status::Unknown);
    assert_eq!(decode(&json!("Approved")), Status::Unknown);
    assert_eq!(decode(&json!(["approved"])), Status::Unknown);
}

#[test]
fn unknown_displays_as_pending_but_stays_distinct() {
    assert_ne!(Status::Unknown, Status::Pending);
    assert_eq!(decode_for_display(&json!(42)), Status::Pending);
    assert_eq!(Status::Unknown.badge_label(), "Pending");
    assert_eq!(decode_for_display(&json!("approved")), Status::Approved);
}

#[test]
fn encodings_decode_back_to_the_same_status() {
    assert_eq!(encode_variant(Status::Approved), json!({"approved": null}));
    assert_eq!(encode_plain(Status::Rejected), json!("rejected"));
    assert_eq!(decode(&encode_variant(Status::Pending)), Status::Pending);
}

#[test]
fn parses_user_input_case_insensitively() {
    assert_eq!("Approved".parse::<Status>(), Ok(Status::Approved));
    assert!("unknown".parse::<Status>().is_err());
    assert!("maybe".parse::<Status>().is_err());
}
