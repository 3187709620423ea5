use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::LazyLock;

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?\d{8,15}$").expect("phone regex is valid"));

/// 校验手机号：可选的 + 前缀，8-15 位数字
pub fn validate_phone(phone: &str) -> AppResult<()> {
    if !PHONE_REGEX.is_match(phone) {
        return Err(AppError::ValidationError(
            "Invalid phone number, expected 8-15 digits with optional leading +".to_string(),
        ));
    }

    Ok(())
}

/// 去掉空格、括号、横线等分隔符，保留开头的 +
pub fn normalize_phone(phone: &str) -> String {
    let trimmed = phone.trim();
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();

    if trimmed.starts_with('+') {
        format!("+{digits}")
    } else {
        digits
    }
}
