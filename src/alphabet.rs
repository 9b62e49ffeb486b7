/// Symbol table indexed by the selection stage.
///
/// The second `'0'` after `'9'` is part of the table: it shifts every
/// following index by one and doubles the weight of `'0'`.
pub const ALPHABET: &[u8; 77] =
    b"01234567890abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ,.~!@#$%^&*;:?";

pub fn alphabet_size() -> usize {
    ALPHABET.len()
}

/// Number of different symbols, with the duplicate `'0'` counted once.
pub fn distinct_symbols() -> usize {
    alphabet_size() - 1
}

pub fn symbol(index: usize) -> Option<char> {
    ALPHABET.get(index).map(|&b| b as char)
}

pub fn contains(ch: char) -> bool {
    ch.is_ascii() && ALPHABET.contains(&(ch as u8))
}
