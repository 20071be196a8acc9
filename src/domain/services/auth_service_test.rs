#[cfg(test)]
mod tests {
    use crate::domain::models::user::User;
    use crate::domain::services::auth_service::AuthService;

    fn service() -> AuthService {
        // Low cost keeps the hashing tests fast
        AuthService::new("access-secret".to_string(), "refresh-secret".to_string(), 4)
    }

    fn sample_user() -> User {
        User::new(
            "alice@example.com".to_string(),
            "hash".to_string(),
            "Alice".to_string(),
            "Smith".to_string(),
            None,
            "ABCD1234".to_string(),
        )
    }

    #[test]
    fn test_password_hash_round_trip() {
        let service = service();
        let hash = service.hash_password("S3cret!pw").unwrap();
        assert_ne!(hash, "S3cret!pw");
        assert!(service.verify_password("S3cret!pw", &hash).unwrap());
        assert!(!service.verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_access_token_round_trip() {
        let service = service();
        let user = sample_user();
        let token = service.issue_access_token(&user).unwrap();

        let (user_id, claims) = service.verify_access_token(&token).unwrap();
        assert_eq!(user_id, user.id);
        assert_eq!(claims.email, user.email);
    }

    #[test]
    fn test_refresh_token_uses_separate_secret() {
        let service = service();
        let user = sample_user();
        let refresh = service.issue_refresh_token(&user).unwrap();

        // A refresh token must not validate as an access token
        assert!(service.verify_access_token(&refresh).is_err());
        assert!(service.verify_refresh_token(&refresh).is_ok());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let service = service();
        assert!(service.verify_access_token("not-a-token").is_err());
    }

    #[test]
    fn test_user_lock_state() {
        let mut user = sample_user();
        assert!(!user.is_locked());

        user.locked_until = Some((chrono::Utc::now() + chrono::Duration::minutes(5)).into());
        assert!(user.is_locked());

        user.locked_until = Some((chrono::Utc::now() - chrono::Duration::minutes(5)).into());
        assert!(!user.is_locked());
    }
}
