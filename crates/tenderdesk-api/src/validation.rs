//! Validation utilities for API handlers

/// Check the uploaded bytes actually look like a PDF. Content-Type headers
/// are client-controlled and cannot be trusted on their own.
pub fn file_is_pdf(data: &[u8]) -> bool {
    data.starts_with(b"%PDF-")
}

/// Company registration numbers issued by Companies House are 8 characters,
/// either all digits or a two-letter prefix followed by six digits.
pub fn looks_like_companies_house_number(value: &str) -> bool {
    let value = value.trim();
    if value.len() != 8 {
        return false;
    }
    let bytes = value.as_bytes();
    let all_digits = bytes.iter().all(|b| b.is_ascii_digit());
    let prefixed = bytes[..2].iter().all(|b| b.is_ascii_alphabetic())
        && bytes[2..].iter().all(|b| b.is_ascii_digit());
    all_digits || prefixed
}
