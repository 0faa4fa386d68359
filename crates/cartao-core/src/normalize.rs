// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Phone and URL normalizers used by every exporter.
//
// Profiles keep links exactly as the user typed them; these helpers turn them
// into absolute targets at render/export time only.

/// Remove every character that is not an ASCII decimal digit.
///
/// `only_digits("(11) 99999-0000") == "11999990000"`
pub fn only_digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// Turn a user-entered link into an absolute URL.
///
/// Empty input stays empty. Input starting with the literal prefix `http` is
/// returned unchanged, anything else gets `https://` prepended. This is a
/// prefix check, not a URL parser: `ftp:` or `mailto:` links are prefixed too,
/// and `httpbin.org` is taken as already schemed.
pub fn as_url(u: &str) -> String {
    if u.is_empty() {
        String::new()
    } else if u.starts_with("http") {
        u.to_owned()
    } else {
        format!("https://{u}")
    }
}

/// `tel:` target for a phone number.
pub fn tel_href(phone: &str) -> String {
    format!("tel:{}", only_digits(phone))
}

/// WhatsApp click-to-chat link for a phone number.
pub fn whatsapp_href(phone: &str) -> String {
    format!("https://wa.me/{}", only_digits(phone))
}

/// `mailto:` target for an e-mail address.
pub fn mailto_href(email: &str) -> String {
    format!("mailto:{email}")
}
