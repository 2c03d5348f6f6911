//! Tests for the user identity model.

use super::*;
use rstest::rstest;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[rstest]
fn user_id_round_trips_through_string() {
    let id = UserId::new(VALID_ID).expect("valid id");
    assert_eq!(id.as_ref(), VALID_ID);
    assert_eq!(String::from(id.clone()), VALID_ID);
    assert_eq!(UserId::from_uuid(*id.as_uuid()), id);
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
}

#[rstest]
#[case("ada")]
#[case("ada.lovelace@example.com")]
#[case("bob_the-builder+1")]
fn username_accepts_allowed_characters(#[case] raw: &str) {
    let username = Username::new(raw).expect("valid username");
    assert_eq!(username.as_ref(), raw);
}

#[rstest]
#[case("", UserValidationError::EmptyUsername)]
#[case("has space", UserValidationError::UsernameInvalidCharacters)]
#[case("emoji🙂", UserValidationError::UsernameInvalidCharacters)]
fn username_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Username::new(raw).expect_err("invalid username"), expected);
}

#[rstest]
fn username_rejects_overlong_input() {
    let raw = "a".repeat(USERNAME_MAX + 1);
    assert_eq!(
        Username::new(raw).expect_err("too long"),
        UserValidationError::UsernameTooLong { max: USERNAME_MAX }
    );
}

#[rstest]
fn username_deserialisation_validates() {
    let result: Result<Username, _> = serde_json::from_str("\"bad name\"");
    assert!(result.is_err());
}

#[rstest]
fn admin_constructor_sets_flag() {
    let username = Username::new("root").expect("username");
    let admin = User::admin(UserId::random(), username.clone());
    let regular = User::new(UserId::random(), username);
    assert!(admin.is_admin());
    assert!(!regular.is_admin());
}
