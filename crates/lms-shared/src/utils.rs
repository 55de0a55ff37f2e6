//! Utility functions

pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let visible = if local.chars().count() <= 2 { 1 } else { 2 };
        let keep: String = local.chars().take(visible).collect();
        format!("{}***{}", keep, domain)
    } else {
        "***".to_string()
    }
}

/// Trims a user-supplied optional string, mapping blank input to `None`.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
