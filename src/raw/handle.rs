use core::num::NonZero;

/// An index into the node arena.
///
/// The index is stored with a bias of one so the all-zero bit pattern stays
/// free for the `None` niche: `Option<Handle>` is four bytes, and a node's two
/// optional child links cost no more than two bare indices would. The `u32`
/// payload caps the arena at [`Handle::MAX`] slots, which is also the largest
/// supported set; `Arena::alloc` asserts the cap before growing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<u32>);

impl Handle {
    /// The largest representable slot index, and so the largest tree this
    /// crate can hold. One key per node means roughly 4 billion keys.
    pub(crate) const MAX: usize = u32::MAX as usize - 1;

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        // The add cannot overflow and the result cannot be zero.
        #[allow(clippy::cast_possible_truncation)]
        match NonZero::new(index as u32 + 1) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        self.0.get() as usize - 1
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use static_assertions::{assert_eq_size, const_assert};

    // The one-bias leaves the zero pattern as a niche, so optional child
    // links are free, and even the last slot of a full arena is addressable.
    assert_eq_size!(Option<Handle>, u32);
    const_assert!(Handle::MAX < u32::MAX as usize);

    #[test]
    fn boundary_indices_round_trip() {
        for index in [0, 1, Handle::MAX - 1, Handle::MAX] {
            assert_eq!(Handle::from_index(index).to_index(), index);
        }
    }

    #[test]
    #[should_panic(expected = "`Handle::from_index()` - `index` > `Handle::MAX`!")]
    fn index_past_the_cap_panics() {
        let _ = Handle::from_index(Handle::MAX + 1);
    }
}
