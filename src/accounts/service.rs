use lazy_static::lazy_static;
use regex::Regex;

use crate::accounts::dto::{
    LoginRequest, LoginResponse, ProfileResponse, RegisterRequest, RegisterResponse,
};
use crate::accounts::jwt::JwtKeys;
use crate::accounts::model::NewUser;
use crate::accounts::password;
use crate::accounts::repo::UserRepository;
use crate::error::ApiError;

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Orchestrates registration, login and profile lookup over the credential
/// store. Holds no state of its own; errors propagate unchanged to the
/// boundary.
pub struct AccountService<R> {
    repo: R,
}

impl<R: UserRepository> AccountService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn register(&self, mut req: RegisterRequest) -> Result<RegisterResponse, ApiError> {
        req.username = req.username.trim().to_string();
        req.email = req.email.trim().to_lowercase();

        if req.username.is_empty() {
            return Err(ApiError::Validation("username is required".into()));
        }
        if req.name.trim().is_empty() {
            return Err(ApiError::Validation("name is required".into()));
        }
        if !is_valid_email(&req.email) {
            return Err(ApiError::Validation("invalid email".into()));
        }
        if req.password.len() < 8 {
            return Err(ApiError::Validation("password too short".into()));
        }

        let hash = password::hash_password(&req.password).map_err(ApiError::Hashing)?;

        let user = self
            .repo
            .create(NewUser {
                username: req.username,
                name: req.name.trim().to_string(),
                email: req.email,
                password_hash: hash,
            })
            .await?;

        Ok(RegisterResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        })
    }

    pub async fn login(&self, req: LoginRequest, keys: &JwtKeys) -> Result<LoginResponse, ApiError> {
        let user = self
            .repo
            .find_by_username(req.username.trim())
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        // A malformed stored hash counts as a mismatch, never a match.
        let ok = password::verify_password(&req.password, &user.password_hash).unwrap_or(false);
        if !ok {
            return Err(ApiError::InvalidCredentials);
        }

        let access_token = keys
            .sign(user.id, &user.username, &user.email)
            .map_err(ApiError::Token)?;

        Ok(LoginResponse { access_token })
    }

    pub async fn get_profile(&self, user_id: i64) -> Result<ProfileResponse, ApiError> {
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::NotFound)?;

        Ok(ProfileResponse {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
            modified_at: user.modified_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::model::User;
    use crate::config::JwtConfig;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Mutex;
    use time::OffsetDateTime;

    #[derive(Default)]
    struct MemoryRepo {
        users: Mutex<Vec<User>>,
        next_id: AtomicI64,
    }

    #[async_trait]
    impl UserRepository for MemoryRepo {
        async fn create(&self, user: NewUser) -> Result<User, ApiError> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.username == user.username) {
                return Err(ApiError::DuplicateUsername);
            }
            let now = OffsetDateTime::now_utc();
            let created = User {
                id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
                username: user.username,
                name: user.name,
                email: user.email,
                password_hash: user.password_hash,
                created_at: now,
                modified_at: now,
            };
            users.push(created.clone());
            Ok(created)
        }

        async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.username == username).cloned())
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<User>, ApiError> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.id == id).cloned())
        }
    }

    fn register_req() -> RegisterRequest {
        RegisterRequest {
            username: "test".into(),
            name: "testuser".into(),
            email: "test@gmail.com".into(),
            password: "password123".into(),
        }
    }

    fn keys() -> JwtKeys {
        JwtKeys::new(&JwtConfig::for_tests())
    }

    #[tokio::test]
    async fn register_assigns_id_and_hides_hash() {
        let service = AccountService::new(MemoryRepo::default());
        let out = service.register(register_req()).await.expect("register");
        assert!(out.id > 0);
        assert_eq!(out.username, "test");
        assert_eq!(out.email, "test@gmail.com");

        let json = serde_json::to_string(&out).unwrap();
        assert!(!json.contains("password"));
    }

    #[tokio::test]
    async fn register_stores_hash_not_plaintext() {
        let service = AccountService::new(MemoryRepo::default());
        let out = service.register(register_req()).await.expect("register");
        let stored = service
            .repo
            .find_by_id(out.id)
            .await
            .unwrap()
            .expect("user persisted");
        assert_ne!(stored.password_hash, "password123");
        assert!(password::verify_password("password123", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn register_then_login_roundtrip() {
        let service = AccountService::new(MemoryRepo::default());
        let keys = keys();
        let registered = service.register(register_req()).await.expect("register");

        let out = service
            .login(
                LoginRequest {
                    username: "test".into(),
                    password: "password123".into(),
                },
                &keys,
            )
            .await
            .expect("login");

        let claims = keys.verify(&out.access_token).expect("token verifies");
        assert_eq!(claims.sub, registered.id);
        assert_eq!(claims.username, "test");
        assert_eq!(claims.email, "test@gmail.com");
    }

    #[tokio::test]
    async fn duplicate_username_rejected_second_time() {
        let service = AccountService::new(MemoryRepo::default());
        service.register(register_req()).await.expect("first register");
        let err = service.register(register_req()).await.unwrap_err();
        assert!(matches!(err, ApiError::DuplicateUsername));
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_yield_identical_errors() {
        let service = AccountService::new(MemoryRepo::default());
        let keys = keys();
        service.register(register_req()).await.expect("register");

        let wrong_password = service
            .login(
                LoginRequest {
                    username: "test".into(),
                    password: "not-the-password".into(),
                },
                &keys,
            )
            .await
            .unwrap_err();
        let unknown_user = service
            .login(
                LoginRequest {
                    username: "nobody".into(),
                    password: "password123".into(),
                },
                &keys,
            )
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, ApiError::InvalidCredentials));
        assert!(matches!(unknown_user, ApiError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn profile_returns_full_public_shape() {
        let service = AccountService::new(MemoryRepo::default());
        let registered = service.register(register_req()).await.expect("register");

        let profile = service.get_profile(registered.id).await.expect("profile");
        assert_eq!(profile.id, registered.id);
        assert_eq!(profile.name, "testuser");
        assert_eq!(profile.username, "test");
        assert_eq!(profile.email, "test@gmail.com");

        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("password"));
    }

    #[tokio::test]
    async fn profile_miss_is_not_found() {
        let service = AccountService::new(MemoryRepo::default());
        let err = service.get_profile(9999).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn register_validates_input() {
        let service = AccountService::new(MemoryRepo::default());

        let mut bad_email = register_req();
        bad_email.email = "not-an-email".into();
        assert!(matches!(
            service.register(bad_email).await.unwrap_err(),
            ApiError::Validation(_)
        ));

        let mut short_password = register_req();
        short_password.password = "short".into();
        assert!(matches!(
            service.register(short_password).await.unwrap_err(),
            ApiError::Validation(_)
        ));

        let mut blank_username = register_req();
        blank_username.username = "   ".into();
        assert!(matches!(
            service.register(blank_username).await.unwrap_err(),
            ApiError::Validation(_)
        ));
    }
}
