// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use validator::ValidationError;

/// 密码强度校验
///
/// 至少 6 位，包含大写字母、小写字母、数字与特殊字符各一。
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.len() >= 6;
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| "@$!%*?&".contains(c));

    if long_enough && has_lower && has_upper && has_digit && has_special {
        Ok(())
    } else {
        Err(ValidationError::new("password_strength"))
    }
}

/// 手机号格式校验
///
/// 可选前导 +，之后至少 10 个数字/空格/连字符/括号。
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    let rest = phone.strip_prefix('+').unwrap_or(phone);
    let valid_chars = rest
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-' || c == '(' || c == ')');

    if rest.len() >= 10 && valid_chars {
        Ok(())
    } else {
        Err(ValidationError::new("phone_number"))
    }
}

#[cfg(test)]
#[path = "validators_test.rs"]
mod tests;
