use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

// 常见弱密码（不区分大小写）
const WEAK_PASSWORDS: &[&str] = &[
    "password1",
    "12345678",
    "qwerty123",
    "student1",
    "teacher1",
    "school123",
    "welcome1",
];

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 长度：3 <= x <= 32
    if !(3..=32).contains(&username.chars().count()) {
        return Err("Username length must be between 3 and 32 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username may only contain letters, digits, '.', '_' or '-'");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.len() > 254 || !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 密码策略：至少 8 个字符，同时包含字母和数字，且不是常见弱密码
///
/// 返回全部不满足的规则，便于前端一次性展示。
pub fn validate_password(password: &str) -> Result<(), Vec<&'static str>> {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_alphabetic()) {
        errors.push("Password must contain at least one letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }
    if WEAK_PASSWORDS
        .iter()
        .any(|weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// 校验必填文本字段（去除首尾空白后非空，且不超过 max 个字符）
pub fn validate_required_text(field: &str, value: &str, max: usize) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    if trimmed.chars().count() > max {
        return Err(format!("{field} must be at most {max} characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("ms.rivera").is_ok());
        assert!(validate_username("jo").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"a".repeat(33)).is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("teacher@school.edu").is_ok());
        assert!(validate_email("no-at-sign.edu").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_password_collects_every_failure() {
        assert!(validate_password("Syllabus2024").is_ok());

        let errors = validate_password("abc").expect_err("weak password");
        assert!(errors.contains(&"Password must be at least 8 characters long"));
        assert!(errors.contains(&"Password must contain at least one digit"));

        let errors = validate_password("STUDENT1").expect_err("common password");
        assert_eq!(
            errors,
            vec!["Password is too common, please choose a stronger password"]
        );
    }

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("title", "Algebra I", 100).is_ok());
        assert!(validate_required_text("title", "   ", 100).is_err());
        assert!(validate_required_text("title", "abcdef", 5).is_err());
    }
}
