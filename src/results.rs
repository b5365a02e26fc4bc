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

/// Errors reported by the checked insert path
///
/// The unchecked operations treat these as caller bugs and only
/// `debug_assert!` on them
#[derive(::thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("key is the empty sentinel")]
    EmptyKey,
    #[error("key is already present in its bucket pair")]
    DuplicateKey,
}

/// What happened to the slot an insert wrote into
#[derive(Debug, PartialEq, Eq)]
pub enum InsertResult<K, V> {
    /// an empty slot was filled
    Success,
    /// the second slot of the pair was overwritten, this was its occupant
    Evicted(K, V),
}

impl<K, V> InsertResult<K, V> {
    pub fn is_eviction(&self) -> bool {
        matches!(self, InsertResult::Evicted(_, _))
    }
}
