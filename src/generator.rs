use crate::alphabet::ALPHABET;
use crate::mersenne::SeededMt;
use zeroize::Zeroizing;

/// Positions at or past this index all seed from the full digest.
pub const SATURATION_INDEX: usize = crate::digest::DIGEST_HEX_LEN;

fn seed_prefix(digest: &str, position: usize) -> &str {
    match digest.char_indices().nth(position) {
        Some((end, _)) => &digest[..end],
        None => digest,
    }
}

/// Draws the symbol for one output position.
///
/// The generator is seeded from `digest[..position]` and discarded, so a
/// position's symbol depends only on that prefix.
pub fn symbol_at(digest: &str, position: usize) -> u8 {
    let mut rng = SeededMt::from_str_seed(seed_prefix(digest, position));
    let index = rng.below(ALPHABET.len() as u32);
    ALPHABET[index as usize]
}

pub fn generate_password(digest: &str, password_length: usize) -> Zeroizing<String> {
    let mut password = Zeroizing::new(String::with_capacity(password_length));

    let seed_chars = digest.chars().count();
    let mut saturated = None;
    for position in 0..password_length {
        let symbol = if position >= seed_chars {
            *saturated.get_or_insert_with(|| symbol_at(digest, position))
        } else {
            symbol_at(digest, position)
        };
        password.push(symbol as char);
    }

    password
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet;
    use crate::digest::derive_digest;

    const STEAM_DIGEST: &str = "84e468dc950010fa4585f225d346074f";

    #[test]
    fn test_seed_prefix_grows_then_saturates() {
        assert_eq!(seed_prefix(STEAM_DIGEST, 0), "");
        assert_eq!(seed_prefix(STEAM_DIGEST, 1), "8");
        assert_eq!(seed_prefix(STEAM_DIGEST, 4), "84e4");
        assert_eq!(seed_prefix(STEAM_DIGEST, 32), STEAM_DIGEST);
        assert_eq!(seed_prefix(STEAM_DIGEST, 100), STEAM_DIGEST);
    }

    #[test]
    fn test_symbols_for_known_prefixes() {
        let expected = [b'V', b's', b'r', b'P', b'E'];
        for (position, symbol) in expected.iter().enumerate() {
            assert_eq!(symbol_at(STEAM_DIGEST, position), *symbol);
        }
    }

    #[test]
    fn test_regression_password_steam() {
        let password = generate_password(STEAM_DIGEST, 16);
        assert_eq!(*password, "VsrPEQJH!oHV~xLT");
    }

    #[test]
    fn test_regression_password_saturated_tail() {
        let password = generate_password(STEAM_DIGEST, 40);
        assert_eq!(*password, "VsrPEQJH!oHV~xLT:aT0c8K%b%OR78kvSSSSSSSS");

        let tail = &password[SATURATION_INDEX..];
        assert!(tail.bytes().all(|b| b == b'S'));
    }

    #[test]
    fn test_saturated_tail_matches_reseeded_draws() {
        let password = generate_password(STEAM_DIGEST, 36);
        for position in SATURATION_INDEX..36 {
            assert_eq!(
                password.as_bytes()[position],
                symbol_at(STEAM_DIGEST, position)
            );
        }
    }

    #[test]
    fn test_password_prefix_stability() {
        let short = generate_password(STEAM_DIGEST, 8);
        let long = generate_password(STEAM_DIGEST, 24);
        assert!(long.starts_with(short.as_str()));
    }

    #[test]
    fn test_password_length() {
        for length in [0, 1, 5, 16, 32, 33, 64] {
            let password = generate_password(STEAM_DIGEST, length);
            assert_eq!(password.len(), length);
            assert_eq!(password.chars().count(), length);
        }
    }

    #[test]
    fn test_zero_length_is_empty() {
        let password = generate_password(STEAM_DIGEST, 0);
        assert!(password.is_empty());
    }

    #[test]
    fn test_password_charset() {
        let digest = derive_digest("charset", "check");
        let password = generate_password(&digest, 48);

        for ch in password.chars() {
            assert!(
                alphabet::contains(ch),
                "Password contains invalid character: \"{}\"",
                ch
            );
        }
    }

    #[test]
    fn test_password_deterministic() {
        let digest = derive_digest("qq", "customized keys");
        let password1 = generate_password(&digest, 16);
        let password2 = generate_password(&digest, 16);
        assert_eq!(*password1, *password2);
        assert_eq!(*password1, "VZt0sAs@,UAX7f;$");
    }

    #[test]
    fn test_short_digest_input() {
        let password = generate_password("ab", 5);
        assert_eq!(password.len(), 5);
        let tail = &password.as_bytes()[2..];
        assert!(tail.iter().all(|b| *b == tail[0]));
    }
}
