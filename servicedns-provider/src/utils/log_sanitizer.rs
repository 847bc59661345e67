//! Log sanitization utilities
//!
//! Request bodies can carry long TXT payloads (DKIM keys) and credentials
//! travel in headers; neither should land in logs in full.

/// Maximum number of bytes of a payload kept in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Characters of a secret left visible by [`mask_secret`].
const SECRET_VISIBLE: usize = 4;

/// Largest char boundary not above `index` (`str::floor_char_boundary` needs 1.91).
fn char_boundary_at_or_below(s: &str, index: usize) -> usize {
    (0..=index.min(s.len()))
        .rev()
        .find(|&i| s.is_char_boundary(i))
        .unwrap_or(0)
}

/// Truncate a payload for logging, noting the original size.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    let cut = char_boundary_at_or_below(s, TRUNCATE_LIMIT);
    format!("{}... [truncated, total {} bytes]", &s[..cut], s.len())
}

/// Keep the first few characters of a credential, mask the rest.
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(SECRET_VISIBLE).collect();
    if secret.chars().count() <= SECRET_VISIBLE * 2 {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_within_limit_untouched() {
        let txt = "v=spf1 include:_spf.example.com ~all";
        assert_eq!(truncate_for_log(txt), txt);
        let exact = "x".repeat(TRUNCATE_LIMIT);
        assert_eq!(truncate_for_log(&exact), exact);
    }

    #[test]
    fn dkim_key_truncated() {
        let dkim = format!("v=DKIM1; k=rsa; p={}", "A".repeat(400));
        let logged = truncate_for_log(&dkim);
        assert!(logged.ends_with(&format!("[truncated, total {} bytes]", dkim.len())));
        assert!(logged.len() < dkim.len());
    }

    #[test]
    fn truncation_respects_utf8() {
        let s = "ü".repeat(200);
        let logged = truncate_for_log(&s);
        assert!(logged.contains("[truncated"));
    }

    #[test]
    fn secrets_masked() {
        assert_eq!(mask_secret("abcd1234efgh5678"), "abcd****");
        assert_eq!(mask_secret("short"), "****");
        assert_eq!(mask_secret(""), "****");
    }
}
