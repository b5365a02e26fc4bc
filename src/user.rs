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

/// What the cache needs from a key
///
/// Hashing goes through the cache's `BuildHasher`, equality is used to
/// confirm a prefilter match.
/// `empty()` is the sentinel stored in unused slots: it must never be used
/// as a real key, neither on insert nor on lookup.
pub trait Key: ::std::hash::Hash + Eq + Sized {
    /// the "empty-space" marker for unused slots
    fn empty() -> Self;
    #[inline]
    fn is_empty_marker(&self) -> bool {
        *self == Self::empty()
    }
}

/// Values are stored inline, unused slots hold `V::default()`
pub trait Val: Default {}

impl<T: Default> Val for T {}

macro_rules! zero_is_empty {
    ($($t:ty),*) => {
        $(
            impl Key for $t {
                #[inline]
                fn empty() -> Self {
                    0
                }
            }
        )*
    };
}

zero_is_empty!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl Key for char {
    #[inline]
    fn empty() -> Self {
        '\0'
    }
}

impl Key for String {
    #[inline]
    fn empty() -> Self {
        String::new()
    }
    #[inline]
    fn is_empty_marker(&self) -> bool {
        self.is_empty()
    }
}

impl Key for &'static str {
    #[inline]
    fn empty() -> Self {
        ""
    }
    #[inline]
    fn is_empty_marker(&self) -> bool {
        self.is_empty()
    }
}

/// `None` is the sentinel, so every `Some(_)` is a valid key
impl<T: ::std::hash::Hash + Eq> Key for Option<T> {
    #[inline]
    fn empty() -> Self {
        None
    }
    #[inline]
    fn is_empty_marker(&self) -> bool {
        self.is_none()
    }
}
