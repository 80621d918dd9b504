//! # Common Types and Traits

/// The index of a canonical label in its vocabulary's canonical order.
///
/// These are opaque outside of the vocabulary which produced them.
pub type LabelId = usize;

/// A `(token_text, logprob)` pair, as ranked by the model at one decoding step.
pub type TokenLogprob = (String, f64);

/// The ranked candidate tokens for one decoding step; most likely first.
pub type StepCandidates = Vec<TokenLogprob>;

/// The ranked candidates for every decoding step of one sample.
pub type LogprobSample = Vec<StepCandidates>;

cfg_if::cfg_if! {
    if #[cfg(feature = "ahash")] {
        /// Type Alias for hash maps in this crate.
        pub type LCHashMap<K, V> = ahash::AHashMap<K, V>;

        /// Create a new empty hash map.
        pub fn hash_map_new<K, V>() -> LCHashMap<K, V> {
            LCHashMap::new()
        }

        /// Type Alias for hash sets in this crate.
        pub type LCHashSet<V> = ahash::AHashSet<V>;

        /// Create a new empty hash set.
        pub fn hash_set_new<V>() -> LCHashSet<V> {
            LCHashSet::new()
        }

    } else {
        /// Type Alias for hash maps in this crate.
        pub type LCHashMap<K, V> = std::collections::HashMap<K, V>;

        /// Create a new empty hash map.
        pub fn hash_map_new<K, V>() -> LCHashMap<K, V> {
            LCHashMap::new()
        }

        /// Type Alias for hash sets in this crate.
        pub type LCHashSet<V> = std::collections::HashSet<V>;

        /// Create a new empty hash set.
        pub fn hash_set_new<V>() -> LCHashSet<V> {
            LCHashSet::new()
        }
    }
}

/// Compile-time check that a value is `Send`.
pub fn check_is_send<S: Send>(_: &S) {}

/// Compile-time check that a value is `Sync`.
pub fn check_is_sync<S: Sync>(_: &S) {}
