pub mod alphabet;
pub mod digest;
pub mod error;
pub mod generator;
pub mod mersenne;
pub mod request;

pub use alphabet::{ALPHABET, alphabet_size, distinct_symbols};
pub use digest::{derive_digest, interleave};
pub use error::{Error, Result};
pub use generator::generate_password;
pub use request::{DerivationRequest, parse_length, parse_text};

use zeroize::Zeroizing;

/// Derives the password for `label` and `key` with `length` symbols.
///
/// A negative `length` is rejected; zero yields an empty string.
pub fn derive(label: &str, length: i64, key: &str) -> Result<Zeroizing<String>> {
    let length = request::length_from_int(length)?;
    let digest = derive_digest(label, key);
    Ok(generate_password(&digest, length))
}
