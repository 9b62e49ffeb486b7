use crate::digest::derive_digest;
use crate::error::{Error, Result};
use crate::generator::generate_password;
use zeroize::Zeroizing;

/// A typed label/length/key triple, validated before it reaches the core.
pub struct DerivationRequest {
    label: String,
    length: usize,
    key: Zeroizing<String>,
}

impl DerivationRequest {
    pub fn new(label: impl Into<String>, length: usize, key: Zeroizing<String>) -> Self {
        Self {
            label: label.into(),
            length,
            key,
        }
    }

    /// Builds a request from the raw text fields a form or prompt supplies.
    pub fn parse(label: &str, length: &str, key: &str) -> Result<Self> {
        let length = parse_length(length)?;
        Ok(Self::new(label, length, Zeroizing::new(key.to_string())))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn digest(&self) -> Zeroizing<String> {
        derive_digest(&self.label, &self.key)
    }

    pub fn derive(&self) -> Zeroizing<String> {
        let digest = self.digest();
        generate_password(&digest, self.length)
    }
}

/// Parses an output length: surrounding whitespace and a leading `+` are
/// accepted, negative values are not.
pub fn parse_length(text: &str) -> Result<usize> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid("length", "value is empty"));
    }

    let value: i64 = trimmed
        .parse()
        .map_err(|_| Error::invalid("length", format!("expected an integer, got {:?}", trimmed)))?;

    length_from_int(value)
}

pub(crate) fn length_from_int(value: i64) -> Result<usize> {
    if value < 0 {
        return Err(Error::invalid(
            "length",
            format!("must not be negative, got {}", value),
        ));
    }

    usize::try_from(value)
        .map_err(|_| Error::invalid("length", format!("{} does not fit this platform", value)))
}

/// Decodes a raw field as UTF-8 text.
pub fn parse_text<'a>(field: &'static str, bytes: &'a [u8]) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|e| {
        Error::invalid(
            field,
            format!("not valid UTF-8 (at byte {})", e.valid_up_to()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_length_accepts_integers() {
        assert_eq!(parse_length("16").unwrap(), 16);
        assert_eq!(parse_length("0").unwrap(), 0);
        assert_eq!(parse_length(" 20\n").unwrap(), 20);
        assert_eq!(parse_length("+8").unwrap(), 8);
    }

    #[test]
    fn test_parse_length_rejects_non_numeric() {
        for input in ["", "   ", "abc", "16.5", "0x10", "1e3", "sixteen"] {
            let err = parse_length(input).unwrap_err();
            assert_eq!(err.field(), "length", "input {:?}", input);
        }
    }

    #[test]
    fn test_parse_length_rejects_negative() {
        let err = parse_length("-1").unwrap_err();
        assert!(err.to_string().contains("must not be negative"));
        assert!(length_from_int(i64::MIN).is_err());
    }

    #[test]
    fn test_parse_text() {
        assert_eq!(parse_text("key", b"dsm980220").unwrap(), "dsm980220");
        assert_eq!(parse_text("label", "жизнь".as_bytes()).unwrap(), "жизнь");

        let err = parse_text("key", &[0x61, 0xff, 0x62]).unwrap_err();
        assert_eq!(err.field(), "key");
        assert!(err.to_string().contains("at byte 1"));
    }

    #[test]
    fn test_request_accessors() {
        let request = DerivationRequest::parse("steam", "16", "dsm980220").unwrap();
        assert_eq!(request.label(), "steam");
        assert_eq!(request.length(), 16);
        assert_eq!(request.key(), "dsm980220");
        assert_eq!(*request.digest(), "84e468dc950010fa4585f225d346074f");
    }

    #[test]
    fn test_request_derive() {
        let request = DerivationRequest::parse("github", "20", "hunter2").unwrap();
        assert_eq!(*request.derive(), "VxBr%!bEwYdsb6P@,SVO");
    }

    #[test]
    fn test_request_invalid_length() {
        assert!(DerivationRequest::parse("steam", "-3", "dsm980220").is_err());
        assert!(DerivationRequest::parse("steam", "many", "dsm980220").is_err());
    }
}
