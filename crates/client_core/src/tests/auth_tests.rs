use super::*;

fn form(password: &str, confirm: &str) -> SignupForm {
    SignupForm {
        name: "Meena".into(),
        mobile: "9876543210".into(),
        email: "meena@example.com".into(),
        password: password.into(),
        confirm_password: confirm.into(),
    }
}

#[test]
fn hash_password_matches_known_values() {
    assert_eq!(hash_password(""), "0");
    assert_eq!(hash_password("a"), "61");
    assert_eq!(hash_password("abc"), "17862");
}

#[test]
fn hash_password_wraps_instead_of_overflowing() {
    let long = "secret-password-".repeat(64);
    let hashed = hash_password(&long);
    assert!(!hashed.is_empty());
    assert!(hashed.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(hashed, hash_password(&long));
}

#[test]
fn agent_ids_have_prefix_and_base36_body() {
    let id = generate_agent_id();
    let body = id.as_str().strip_prefix("AID").expect("prefix");
    assert!(body.len() > AGENT_ID_RANDOM_LEN);
    assert!(body
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
}

#[test]
fn base36_encodes_like_radix_conversion() {
    assert_eq!(to_base36(0), "0");
    assert_eq!(to_base36(35), "Z");
    assert_eq!(to_base36(36), "10");
}

#[test]
fn signup_requires_matching_passwords() {
    let err = form("secret1", "secret2").validate().expect_err("mismatch");
    assert_eq!(err.to_string(), "Passwords do not match");
}

#[test]
fn signup_requires_minimum_password_length() {
    let err = form("abc", "abc").validate().expect_err("too short");
    assert_eq!(err.to_string(), "Password must be at least 6 characters");
    assert!(form("abcdef", "abcdef").validate().is_ok());
}

#[test]
fn signup_requires_non_empty_fields() {
    let mut missing_name = form("secret1", "secret1");
    missing_name.name = "   ".into();
    let err = missing_name.validate().expect_err("blank name");
    assert_eq!(err.to_string(), "Full name is required");
}
