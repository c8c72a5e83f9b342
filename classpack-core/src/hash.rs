//! Deterministic class name hashing.
//!
//! Merged class names are derived from the CSS declaration text they stand
//! for, never from discovery order, so the same declaration set always maps
//! to the same name across runs, machines, and incremental rebuilds. The
//! hash is the classic djb2 multiplicative string hash (seed 5381, factor
//! 33) truncated to 24 bits and rendered in base 36, which bounds generated
//! names to five characters plus prefix.

/// Prefix for single-declaration class names.
pub const CLASS_HASH_PREFIX: &str = "_";

/// Prefix for merged (multi-declaration) class names.
pub const MERGED_HASH_PREFIX: &str = "_m";

/// djb2 string hash, wrapped to unsigned 32 bits.
pub fn hash_string(s: &str) -> u32 {
    let mut hash: u32 = 5381;
    for c in s.chars() {
        hash = hash.wrapping_mul(33).wrapping_add(c as u32);
    }
    hash
}

/// Render `n` in base 36 using digits `0-9a-z`.
fn to_base36(mut n: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = String::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize] as char);
        n /= 36;
    }
    out.chars().rev().collect()
}

/// Hash a single declaration into a prefixed class name.
///
/// Only the low 24 bits of the hash are encoded, bounding the generated
/// suffix to five base-36 characters.
pub fn hash_class_name(declaration: &str, prefix: &str) -> String {
    let hash = hash_string(declaration) & 0x00FF_FFFF;
    format!("{}{}", prefix, to_base36(hash))
}

/// Hash a declaration set into a prefixed merged class name.
///
/// The declarations are sorted before joining, so the resulting name is
/// independent of the order in which the constituents were discovered.
pub fn hash_merged_class_name<S: AsRef<str>>(declarations: &[S], prefix: &str) -> String {
    let mut sorted: Vec<&str> = declarations.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();
    hash_class_name(&sorted.join(";"), prefix)
}
