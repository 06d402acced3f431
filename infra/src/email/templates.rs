//! Email copy for the verification flows.

/// Subject line for the code email
pub fn code_subject() -> String {
    "Your MailProof verification code".to_string()
}

pub fn code_text(code: &str, ttl_minutes: i64) -> String {
    format!(
        "Your verification code is {}.\n\nIt expires in {} minutes. \
         If you didn't request this code, you can ignore this email.",
        code, ttl_minutes
    )
}

pub fn code_html(code: &str, ttl_minutes: i64) -> String {
    format!(
        "<p>Your verification code is:</p>\
         <p style=\"font-size:24px;font-weight:bold;letter-spacing:4px\">{}</p>\
         <p>It expires in {} minutes. If you didn't request this code, you can ignore this email.</p>",
        code, ttl_minutes
    )
}

/// Subject line for the welcome email
pub fn welcome_subject() -> String {
    "Welcome! Please verify your email".to_string()
}

pub fn welcome_text(name: Option<&str>, link: &str, ttl_hours: i64) -> String {
    format!(
        "Hi {},\n\nWelcome aboard! Please verify your email address by opening \
         the link below:\n\n{}\n\nThe link expires in {} hours.",
        name.unwrap_or("there"),
        link,
        ttl_hours
    )
}

pub fn welcome_html(name: Option<&str>, link: &str, ttl_hours: i64) -> String {
    format!(
        "<p>Hi {},</p>\
         <p>Welcome aboard! Please verify your email address:</p>\
         <p><a href=\"{}\">Verify my email</a></p>\
         <p>The link expires in {} hours.</p>",
        name.unwrap_or("there"),
        link,
        ttl_hours
    )
}
