#[cfg(test)]
mod tests {
    use crate::utils::validators::{validate_password_strength, validate_phone_number};

    #[test]
    fn test_password_strength() {
        assert!(validate_password_strength("Abc1$x").is_ok());
        assert!(validate_password_strength("Str0ng&Pass").is_ok());
        // Missing character classes
        assert!(validate_password_strength("alllowercase1$").is_err());
        assert!(validate_password_strength("ALLUPPER1$").is_err());
        assert!(validate_password_strength("NoDigits$").is_err());
        assert!(validate_password_strength("NoSpecial1").is_err());
        // Too short
        assert!(validate_password_strength("Ab1$").is_err());
    }

    #[test]
    fn test_phone_number() {
        assert!(validate_phone_number("+1 (555) 123-4567").is_ok());
        assert!(validate_phone_number("5551234567").is_ok());
        assert!(validate_phone_number("123").is_err());
        assert!(validate_phone_number("not-a-phone!").is_err());
    }
}
