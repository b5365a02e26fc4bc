/*
 * Copyright 2021 Luca Fulchir <luker@fenrirproject.org>
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! A single-thread, fixed-capacity, two-way set-associative cache
//!
//! # Why
//! Memoizing an expensive keyed computation on a hot path usually means a
//! hashmap, and a hashmap means allocating, growing and rehashing.
//! A direct-mapped array avoids all of that but loses an entry on every
//! collision.
//! [`FixedCapacityCache`] sits in between: every key maps to exactly two
//! adjacent slots (a *bucket pair*), the whole array is allocated at
//! construction and never again.
//!
//! # Eviction
//! * a hit on the second slot of a pair swaps it into the first slot
//! * an insert fills the first slot if empty, otherwise it overwrites the
//!   second slot, whatever was there
//!
//! So the entry that was most recently confirmed useful survives insert
//! pressure, and the second slot is always the one sacrificed.
//! This is a cheap approximation of LRU, not LRU.
//!
//! # Prefilter
//! Each slot carries a one-byte [`Prefilter`](tag::Prefilter) tag made from
//! the hash bits not used to pick the bucket pair. A tag of `0` means empty,
//! so keys only get compared when the tags match.
//!
//! # Single thread
//! There is no internal synchronization. Wrap the cache in a mutex or keep it
//! on one thread.
//!
//! # Keys and values
//! Keys implement [`user::Key`], which provides the "empty" sentinel that is
//! never a valid key. Values only need [`Default`].
//!
//! ```
//! use twoway::FixedCapacityCache;
//!
//! let mut cache = FixedCapacityCache::<u32, &str, 64>::new();
//! cache.insert(7, "seven");
//! assert_eq!(cache.find(&7).map(|v| *v), Some("seven"));
//! assert!(cache.find(&8).is_none());
//! ```

pub mod cache;
/// common result and error types for insert operations
pub mod results;
pub mod tag;
pub mod user;

#[cfg(test)]
mod test_util;

pub use cache::FixedCapacityCache;
pub use results::{Error, InsertResult};
pub use user::{Key, Val};
