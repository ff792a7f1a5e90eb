use rand::Rng;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 6;

pub const CHARACTER_PREFIX: &str = "char";
pub const LOCATION_PREFIX: &str = "loc";
pub const SCENE_PREFIX: &str = "scn";
pub const SHOT_PREFIX: &str = "sht";

/// Returns `<prefix>_` followed by six random base-36 characters.
///
/// Collisions are not detected; the suffix space is large enough for
/// hand-authored documents.
pub fn uid(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
        .collect();
    format!("{prefix}_{suffix}")
}
