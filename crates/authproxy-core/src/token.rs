//! Session token generation.
//!
//! Uses the same 62-symbol alphabet and byte-modulo mapping as the original
//! companion so generated tokens stay format-compatible. The `byte % 62`
//! mapping is slightly biased toward the first `256 % 62 = 8` symbols; kept
//! as-is rather than switched to rejection sampling.

use rand::Rng;

const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Generate a random token of `len` symbols drawn from the alphabet above.
#[must_use]
pub fn generate(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| {
            let byte: u8 = rng.gen();
            ALPHABET[(byte as usize) % ALPHABET.len()] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_length() {
        let token = generate(24);
        assert_eq!(token.chars().count(), 24);
    }

    #[test]
    fn only_uses_alphabet_symbols() {
        let token = generate(256);
        assert!(token.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn zero_length_is_empty() {
        assert_eq!(generate(0), "");
    }
}
