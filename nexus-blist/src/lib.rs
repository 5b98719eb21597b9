//! A sorted list of fixed-capacity arrays.
//!
//! [`BList`] sits between a linked list and a vector: a doubly-linked chain
//! of blocks, each holding up to `N` values inline. With `N = 1` it is an
//! ordinary doubly-linked list; larger blocks mean fewer nodes to chase.
//!
//! # Design
//!
//! Blocks are never heap-allocated one by one. They live in a storage arena
//! and link to each other through stable [`Key`]s:
//!
//! ```text
//! Storage (Slab / BoxedStorage)  - owns blocks, hands out keys
//! BList                          - owns the storage, tracks head/tail/len
//! Block                          - [T; N] + count + prev/next keys
//! ```
//!
//! Splicing blocks in and out is O(1) key rewriting, and a whole list is
//! released by dropping its storage.
//!
//! # Quick Start
//!
//! ```
//! use nexus_blist::BList;
//!
//! let mut list: BList<i32, 4> = BList::new();
//!
//! // Sorted insertion splits full blocks as needed
//! for v in [7, 3, 9, 1, 5, 3] {
//!     list.insert(v);
//! }
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 3, 3, 5, 7, 9]);
//!
//! // Positional access walks the chain
//! assert_eq!(list[2], 3);
//! assert_eq!(list.find(&7), Some(4));
//!
//! let stats = list.stats();
//! assert_eq!(stats.item_count, 6);
//! assert_eq!(stats.array_size, 4);
//! ```
//!
//! # Storage Options
//!
//! | Storage | Capacity | Insertion API | Use Case |
//! |---------|----------|---------------|----------|
//! | `slab::Slab` ([`SlabStorage`]) | Growable | `insert`, `push_*` | Default choice |
//! | [`BoxedStorage`] ([`BoundedBList`]) | Fixed block budget | `try_insert`, `try_push_*` | Bounded memory |
//!
//! # Errors
//!
//! - [`OutOfRange`]: index outside `0..len` (`get`, `get_mut`, `remove`)
//! - [`Full`]: bounded storage has no block to spare; the value is handed back
//! - Value not found is not an error: [`BList::find`] and
//!   [`BList::remove_by_value`] return `None`
//!
//! # Logging
//!
//! Block allocation, splits and releases are reported through the `log`
//! facade at `trace` level; storage exhaustion at `debug` level.

#![warn(missing_docs)]

pub mod blist;
pub mod block;
pub mod error;
pub mod iter;
pub mod key;
pub mod stats;
pub mod storage;

pub use blist::{BList, BoundedBList, BoxedBlockStorage, SlabStorage};
pub use block::Block;
pub use error::{ErrorCode, OutOfRange};
pub use iter::{Blocks, Iter};
pub use key::Key;
pub use stats::BListStats;
pub use storage::{BoundedStorage, BoxedStorage, Full, Storage, UnboundedStorage};
