use md5::{Digest, Md5};
use zeroize::Zeroizing;

pub const DIGEST_HEX_LEN: usize = 32;

/// Joins the characters of `key` with `label` between each pair.
///
/// `interleave("-", "abc")` is `"a-b-c"`; a key of zero or one
/// characters comes back unchanged.
pub fn interleave(label: &str, key: &str) -> Zeroizing<String> {
    let key_chars = key.chars().count();
    let capacity = key.len() + label.len() * key_chars.saturating_sub(1);
    let mut joined = Zeroizing::new(String::with_capacity(capacity));

    for (i, ch) in key.chars().enumerate() {
        if i > 0 {
            joined.push_str(label);
        }
        joined.push(ch);
    }

    joined
}

/// Lowercase hex MD5 of the interleaved label and key.
pub fn derive_digest(label: &str, key: &str) -> Zeroizing<String> {
    let joined = interleave(label, key);

    let raw = Zeroizing::new(Md5::digest(joined.as_bytes()).to_vec());
    Zeroizing::new(hex::encode(&*raw))
}
