//! Verification code generation.
//!
//! A user receives a fresh code every time they write to the bot before being
//! verified. The code is confirmed out of band (`cfbot users verify <code>`),
//! so it has to be unambiguous when read aloud or retyped.

use rand::Rng;

/// Length of a verification code.
pub const CODE_LEN: usize = 8;

/// Uppercase letters and digits without the look-alikes `0 O 1 I`.
const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generate a random verification code.
pub fn generate_verification_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect()
}

/// Normalise user-typed input before lookup.
pub fn normalize_code(input: &str) -> String {
    input.trim().to_ascii_uppercase()
}
