//! Block handles.
//!
//! Blocks live in a storage arena and refer to their neighbours by handle
//! rather than by pointer. A [`Key`] is such a handle: an integer index with a
//! reserved `NONE` value standing in for "no neighbour".

/// Handle type used to address blocks in storage.
///
/// The sentinel [`Key::NONE`] marks a missing link (the `prev` of the head
/// block, the `next` of the tail block, or the head/tail of an empty list).
///
/// # Example
///
/// ```
/// use nexus_blist::Key;
///
/// let key: u32 = 7;
/// assert!(key.is_some());
/// assert!(u32::NONE.is_none());
/// assert_eq!(u32::from_usize(7), key);
/// ```
pub trait Key: Copy + Eq + core::fmt::Debug {
    /// Sentinel meaning "no block".
    const NONE: Self;

    /// Creates a key from a storage slot index.
    fn from_usize(val: usize) -> Self;

    /// Returns the storage slot index for this key.
    fn as_usize(&self) -> usize;

    /// Returns `true` if this is the sentinel value.
    #[inline]
    fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Returns `true` if this key names a block.
    #[inline]
    fn is_some(&self) -> bool {
        !self.is_none()
    }
}

macro_rules! impl_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Key for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn from_usize(val: usize) -> Self {
                    debug_assert!(val < <$ty>::MAX as usize, "slot index collides with NONE");
                    val as $ty
                }

                #[inline]
                fn as_usize(&self) -> usize {
                    *self as usize
                }
            }
        )*
    };
}

impl_key!(u16, u32, u64, usize);
