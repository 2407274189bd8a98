//! Deterministic fingerprints of resolved set state.
//!
//! Sites serialize as `scheme://domain` and every map is a `BTreeMap`, so
//! equal state always produces the same JSON byte stream.

use serde::Serialize;
use xxhash_rust::xxh64::Xxh64;

/// Shared by every fingerprint so overlays from different processes compare equal.
const FINGERPRINT_SEED: u64 = 0;

/// xxh64 of the JSON form of `state`, as 16 hex digits.
///
/// The JSON is streamed into the hasher rather than buffered. Crate state
/// has string map keys and no floats, so serialization cannot fail.
pub(crate) fn fingerprint_of<T: Serialize + ?Sized>(state: &T) -> String {
    let mut hasher = Xxh64::new(FINGERPRINT_SEED);
    serde_json::to_writer(&mut hasher, state).expect("set state serializes to JSON");
    format!("{:016x}", hasher.digest())
}
