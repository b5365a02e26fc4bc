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

//! One-byte prefilter stored next to each slot
//!
//! Bucket selection uses `hash % N`, the tag uses the bits above that:
//! `((hash / N) & 0xFF) | 1`.
//! Bit 0 is always set on an occupied slot, so a raw `0` means empty and
//! the other 7 bits let most lookups skip the key comparison.

::bitfield::bitfield! {
    #[derive(PartialEq, Eq, Copy, Clone, Default)]
    pub struct Prefilter(u8);
    impl Debug;
    #[inline]
    pub is_occupied, _: 0;
    #[inline]
    pub u8, fragment, _: 7, 1;
}

impl Prefilter {
    pub const EMPTY: Prefilter = Prefilter(0);

    /// Derive the tag for a hash, for a cache of capacity `N`
    #[inline]
    pub fn from_hash<const N: usize>(hash: u64) -> Self {
        Prefilter((((hash / N as u64) & 0xFF) as u8) | 1)
    }

    #[inline]
    pub fn raw(&self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tag() {
        assert_eq!(Prefilter::default(), Prefilter::EMPTY);
        assert_eq!(Prefilter::EMPTY.raw(), 0);
        assert!(!Prefilter::EMPTY.is_occupied());
    }

    #[test]
    fn tag_is_never_empty() {
        // all bits used by the bucket, nothing left over
        let t = Prefilter::from_hash::<8>(0);
        assert_eq!(t.raw(), 1);
        assert!(t.is_occupied());
        for hash in [1u64, 7, 8, 255, 256, 2047, 2048, u64::MAX] {
            assert_eq!(Prefilter::from_hash::<8>(hash).raw() & 1, 1);
        }
    }

    #[test]
    fn tag_uses_bits_above_the_bucket() {
        // 0x2A0 / 16 = 0x2A, | 1 = 0x2B
        let t = Prefilter::from_hash::<16>(0x2A0);
        assert_eq!(t.raw(), 0x2B);
        assert_eq!(t.fragment(), 0x2B >> 1);
        // low bits only pick the bucket, the tag does not change
        assert_eq!(Prefilter::from_hash::<16>(0x2AF), t);
        // only one byte of the quotient is kept
        assert_eq!(
            Prefilter::from_hash::<4>(0x1_0000 * 4 + 4 * 6),
            Prefilter::from_hash::<4>(4 * 6)
        );
    }
}
