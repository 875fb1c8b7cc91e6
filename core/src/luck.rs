use xxhash_rust::xxh3::xxh3_64;

/// Bits of precision kept from the hash, matching the `f64` mantissa.
const LUCK_BITS: u32 = 53;

/// Deterministic, well-spread value in `[0, 1)` for `key`.
///
/// The key's UTF-8 bytes are hashed with XXH3-64 (seed 0) and the top 53 bits are scaled down by
/// `2^53`. Nothing else feeds in, so the same key yields the same value on every run and platform.
/// Not suitable for anything adversarial.
pub fn luck(key: &str) -> f64 {
    let hash = xxh3_64(key.as_bytes());
    (hash >> (u64::BITS - LUCK_BITS)) as f64 / (1u64 << LUCK_BITS) as f64
}
