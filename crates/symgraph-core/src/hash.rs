//! Deterministic hashing of fully-qualified names into the integer node ids
//! the graph writer uses as SQLite primary keys. Grounded on the teacher's
//! `xxhash_rust::xxh64`-based content hash (`keel-core/src/hash.rs`),
//! repurposed here to hash an FQN instead of a signature+body+docstring
//! triple, since node identity in this system is FQN-keyed, not
//! content-keyed (spec §3: "FQN uniqueness").

use xxhash_rust::xxh64::xxh64;

const SEED: u64 = 0;

/// A stable 63-character alphabet base62 encoding, matching the teacher's
/// fixed-width zero-padded scheme so ids sort and compare cheaply.
const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

pub fn base62_encode(mut value: u64) -> String {
    if value == 0 {
        return "0".repeat(11);
    }
    let mut out = Vec::with_capacity(11);
    while value > 0 {
        let rem = (value % 62) as usize;
        out.push(ALPHABET[rem]);
        value /= 62;
    }
    while out.len() < 11 {
        out.push(b'0');
    }
    out.reverse();
    String::from_utf8(out).expect("base62 alphabet is ascii")
}

/// Hash a fully-qualified name to a `u64` node id.
pub fn fqn_hash(fqn: &str) -> u64 {
    xxh64(fqn.as_bytes(), SEED)
}

/// Base62-encoded form of [`fqn_hash`], used where a string id is wanted
/// (e.g. `Annotation.name` or `<anonymous>@line` identities).
pub fn fqn_hash_str(fqn: &str) -> String {
    base62_encode(fqn_hash(fqn))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_fqn_hashes_identically() {
        assert_eq!(fqn_hash("com.example.User.save"), fqn_hash("com.example.User.save"));
    }

    #[test]
    fn different_fqns_differ() {
        assert_ne!(fqn_hash("com.example.User.save"), fqn_hash("com.example.User.load"));
    }

    #[test]
    fn base62_is_fixed_width() {
        assert_eq!(base62_encode(0).len(), 11);
        assert_eq!(base62_encode(u64::MAX).len(), 11);
    }
}
