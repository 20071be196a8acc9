#[cfg(test)]
mod tests {
    use crate::utils::tokens::{generate_random_token, generate_referral_code};

    #[test]
    fn test_referral_code_shape() {
        let code = generate_referral_code();
        assert_eq!(code.len(), 8);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_random_token_is_hex_and_unique() {
        let a = generate_random_token();
        let b = generate_random_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
