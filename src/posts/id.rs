use chrono::{DateTime, Utc};
use rand::Rng;

const ID_PREFIX: &str = "post";
const SUFFIX_LEN: usize = 9;
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `post_<unix millis>_<9 random base36 chars>`.
///
/// The millisecond clock alone repeats across rapid saves, so a random
/// suffix is mixed in.
pub fn generate_post_id(now: DateTime<Utc>) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect();
    format!("{ID_PREFIX}_{}_{suffix}", now.timestamp_millis())
}

/// Draw ids until one is not `taken`.
pub fn unique_post_id(now: DateTime<Utc>, taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = generate_post_id(now);
        if !taken(&id) {
            return id;
        }
        tracing::debug!(%id, "post id collision, drawing again");
    }
}
