//! Deterministic practice-problem ladders.
//!
//! `ladder-core` turns a popularity-ordered candidate list for a rating
//! window into a ladder: adjacency duplicates (the same problem mirrored on
//! a neighbouring contest) are collapsed, the result is bounded, and
//! canonical 100-point buckets are memoized through an injected cache.
//! Identical inputs always produce identical ladders.
//!
//! The problem store, the cache backend and the transport are supplied by
//! the caller through [`ladder::ProblemSource`] and [`cache::ResultCache`].

pub mod cache;
pub mod config;
pub mod ladder;
pub mod problem;
pub mod types;
