use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public shape returned after registration. The password hash never
/// appears here.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Public profile of the authenticated user.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub modified_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    #[test]
    fn profile_response_never_carries_a_password_field() {
        let now = OffsetDateTime::now_utc();
        let profile = ProfileResponse {
            id: 1,
            name: "testuser".into(),
            username: "test".into(),
            email: "test@gmail.com".into(),
            created_at: now,
            modified_at: now,
        };
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("\"username\":\"test\""));
    }

    #[test]
    fn register_response_serializes_expected_fields() {
        let out = RegisterResponse {
            id: 7,
            username: "test".into(),
            email: "test@gmail.com".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["username"], "test");
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }
}
