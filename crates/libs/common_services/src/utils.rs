/// Length of the random part of generated ids.
pub const ID_LENGTH: usize = 16;

/// Generate a URL-safe random ID of a given length.
#[must_use]
pub fn nice_id(length: usize) -> String {
    const URL_SAFE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_";
    (0..length)
        .map(|_| {
            let idx = rand::random_range(0..URL_SAFE.len());
            URL_SAFE[idx] as char
        })
        .collect()
}

/// Generate a prefixed id such as `playlist-Xb3...`.
#[must_use]
pub fn prefixed_id(prefix: &str) -> String {
    format!("{prefix}-{}", nice_id(ID_LENGTH))
}
