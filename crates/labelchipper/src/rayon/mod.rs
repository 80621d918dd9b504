//! # Rayon Utilities
//!
//! [`rayon`] powered wrappers for parallel label resolution.

mod rayon_resolver;

pub use rayon_resolver::ParallelRayonResolver;
