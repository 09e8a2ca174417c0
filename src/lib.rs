//! A Red-Black ordered search tree for Rust.
//!
//! This crate provides [`RBTreeSet`], an ordered set over any `T: Ord` with
//! O(log n) insert, remove, and lookup. The tree rebalances itself after every
//! mutation with the classical Red-Black recolor/rotate protocol, so its height
//! never exceeds 2·log₂(n + 1) no matter the insertion order.
//!
//! # Example
//!
//! ```
//! use sumi_tree::RBTreeSet;
//!
//! let mut set = RBTreeSet::new();
//! set.insert(20);
//! set.insert(10);
//! set.insert(30);
//!
//! // Lookups and order queries are O(log n).
//! assert!(set.contains(&10));
//! assert_eq!(set.first(), Some(&10));
//! assert_eq!(set.successor(&10), Some(&20));
//!
//! // Re-inserting an existing key is a no-op.
//! assert!(!set.insert(20));
//! assert_eq!(set.len(), 3);
//!
//! // Removal reports whether the key was present.
//! assert!(set.remove(&20));
//! assert!(!set.remove(&20));
//! ```
//!
//! # Implementation
//!
//! Nodes live in a growable arena and reference their children by index handle,
//! so the structure is free of parent back-pointers and of `unsafe`. Mutations
//! record the root-to-target descent on an explicit path stack and replay it
//! during the insert and delete fixup passes, keeping every operation O(log n).

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod raw;

pub mod rbtree_set;

pub use rbtree_set::RBTreeSet;
