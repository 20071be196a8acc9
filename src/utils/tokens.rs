// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use rand::Rng;

/// 推荐码字符集，去掉易混淆字符前的朴素版本
const REFERRAL_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
/// 推荐码长度
const REFERRAL_CODE_LEN: usize = 8;

/// 生成 8 位大写字母数字推荐码
pub fn generate_referral_code() -> String {
    let mut rng = rand::rng();
    (0..REFERRAL_CODE_LEN)
        .map(|_| {
            let idx = rng.random_range(0..REFERRAL_CHARSET.len());
            REFERRAL_CHARSET[idx] as char
        })
        .collect()
}

/// 生成不透明的十六进制令牌
///
/// 用于邮箱验证与密码重置，32 字节随机数的 hex 编码。
pub fn generate_random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
#[path = "tokens_test.rs"]
mod tests;
