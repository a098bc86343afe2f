//! URL slugs for posts: `{slugified-title}-{suffix}`.
//!
//! The suffix is appended unconditionally, even for a title never seen
//! before, so two posts with the same title never share a slug. The unique
//! index on `posts.slug` is the final arbiter; callers regenerate on conflict.

use rand::Rng;
use time::OffsetDateTime;

/// Hex characters in a suffix.
pub const SUFFIX_LENGTH: usize = 13;

/// ASCII-transliterated, lowercase, runs of anything non-alphanumeric
/// collapsed to a single `-`, no leading or trailing `-`.
pub fn slugify(title: &str) -> String {
    ::slug::slugify(title)
}

/// 8 hex digits of unix seconds followed by 5 random hex digits.
pub fn unique_suffix() -> String {
    let secs = OffsetDateTime::now_utc().unix_timestamp() as u32;
    let noise: u32 = rand::thread_rng().gen_range(0..0x10_0000);
    format!("{:08x}{:05x}", secs, noise)
}

/// `{slugified-title}-{suffix}`. The separator is kept even when the title
/// slugifies to nothing, giving `-{suffix}`.
pub fn slug_with_suffix(title: &str, suffix: &str) -> String {
    format!("{}-{}", slugify(title), suffix)
}
