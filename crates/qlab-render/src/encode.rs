//! Wire encoding helpers for binary artifacts.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Base64-encode bytes for embedding in JSON.
pub fn to_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Encode PNG bytes as a `data:` URL for direct use in an `<img>` tag.
pub fn to_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", to_base64(png))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_roundtrip() {
        let data = b"qlab";
        let encoded = to_base64(data);
        let decoded = STANDARD.decode(&encoded).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_data_url_prefix() {
        assert!(to_data_url(&[1, 2, 3]).starts_with("data:image/png;base64,"));
    }
}
