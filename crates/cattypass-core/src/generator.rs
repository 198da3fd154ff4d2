//! Random password generation.

use rand::Rng;

/// Characters a generated password is drawn from.
pub const PASSWORD_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()_+-=[]{}|;':,./<>?";

pub const DEFAULT_PASSWORD_LENGTH: usize = 16;

/// Generate a password of `length` characters using the thread-local RNG.
pub fn generate_password(length: usize) -> String {
    generate_password_with(&mut rand::thread_rng(), length)
}

/// Generate a password of `length` characters using `rng`.
pub fn generate_password_with<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    let alphabet = PASSWORD_ALPHABET.as_bytes();
    (0..length)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}
