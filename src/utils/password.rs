// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;

/// 密码哈希错误
#[derive(Error, Debug)]
pub enum PasswordError {
    /// 存储的哈希格式无法解析
    #[error("Malformed password hash")]
    Malformed,
    /// HMAC 初始化失败
    #[error("Invalid key length")]
    InvalidKey,
}

/// PBKDF2-HMAC-SHA256 密码哈希器
///
/// 输出格式为 `pbkdf2-sha256$<迭代次数>$<盐>$<哈希>`，盐与哈希使用无填充 base64。
/// 校验时使用哈希串中记录的迭代次数，因此调整配置不影响已有用户登录。
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    iterations: u32,
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    /// 使用随机盐计算密码哈希
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt: [u8; SALT_LEN] = rand::random();
        let derived = derive(password.as_bytes(), &salt, self.iterations)?;

        Ok(format!(
            "{}${}${}${}",
            SCHEME,
            self.iterations,
            STANDARD_NO_PAD.encode(salt),
            STANDARD_NO_PAD.encode(derived)
        ))
    }

    /// 校验密码是否与存储的哈希匹配
    pub fn verify(&self, password: &str, encoded: &str) -> Result<bool, PasswordError> {
        let mut parts = encoded.split('$');
        let (Some(scheme), Some(iterations), Some(salt), Some(expected), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(PasswordError::Malformed);
        };

        if scheme != SCHEME {
            return Err(PasswordError::Malformed);
        }
        let iterations: u32 = iterations.parse().map_err(|_| PasswordError::Malformed)?;
        if iterations == 0 {
            return Err(PasswordError::Malformed);
        }
        let salt = STANDARD_NO_PAD
            .decode(salt)
            .map_err(|_| PasswordError::Malformed)?;
        let expected = STANDARD_NO_PAD
            .decode(expected)
            .map_err(|_| PasswordError::Malformed)?;

        let derived = derive(password.as_bytes(), &salt, iterations)?;
        Ok(constant_time_eq(&derived, &expected))
    }
}

/// 单块 PBKDF2，输出长度等于 SHA-256 摘要长度
fn derive(password: &[u8], salt: &[u8], iterations: u32) -> Result<[u8; 32], PasswordError> {
    let prf = HmacSha256::new_from_slice(password).map_err(|_| PasswordError::InvalidKey)?;

    let mut mac = prf.clone();
    mac.update(salt);
    mac.update(&1u32.to_be_bytes());
    let mut block = [0u8; 32];
    block.copy_from_slice(&mac.finalize().into_bytes());
    let mut output = block;

    for _ in 1..iterations {
        let mut mac = prf.clone();
        mac.update(&block);
        block.copy_from_slice(&mac.finalize().into_bytes());
        for (out, b) in output.iter_mut().zip(block.iter()) {
            *out ^= b;
        }
    }

    Ok(output)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
