//! Name hashing and bucket selection.

/// Multiply-by-31 string hash over the name's bytes, wrapping at 32 bits.
///
/// Non-ASCII names hash their UTF-8 encoding byte by byte.
pub fn name_hash(name: &str) -> u32 {
    name.bytes()
        .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(u32::from(b)))
}

/// Bucket for `name` in a table of `capacity` buckets, or `None` when the
/// capacity is zero.
pub fn bucket_index(name: &str, capacity: usize) -> Option<usize> {
    (name_hash(name) as usize).checked_rem(capacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_hashes_to_zero() {
        assert_eq!(name_hash(""), 0);
    }

    #[test]
    fn known_values() {
        assert_eq!(name_hash("a"), 97);
        assert_eq!(name_hash("ab"), 97 * 31 + 98);
        assert_eq!(name_hash("pi"), 112 * 31 + 105);
    }

    #[test]
    fn long_names_wrap_instead_of_overflowing() {
        let name = "z".repeat(64);
        let expected = name
            .bytes()
            .fold(0u64, |h, b| (h * 31 + u64::from(b)) & 0xffff_ffff);
        assert_eq!(u64::from(name_hash(&name)), expected);
    }

    #[test]
    fn bucket_is_hash_mod_capacity() {
        assert_eq!(bucket_index("pi", 256), Some((112 * 31 + 105) % 256));
        assert_eq!(bucket_index("anything", 1), Some(0));
        assert_eq!(bucket_index("pi", 0), None);
    }

    #[test]
    fn non_ascii_hashes_utf8_bytes() {
        // "é" is 0xC3 0xA9.
        assert_eq!(name_hash("é"), 0xC3 * 31 + 0xA9);
    }
}
