//! Fixed-capacity, NUL-padded strings for the kernel's 32-byte name,
//! label and consumer fields.

use std::ops::Deref;

/// A string stored in a fixed `N`-byte array, zero-padded, with one byte
/// always reserved for the NUL terminator: content is at most `N - 1` bytes.
#[derive(Clone, Copy)]
pub struct FixedStr<const N: usize> {
    s: [u8; N],
}

impl<const N: usize> FixedStr<N> {
    #[inline]
    pub const fn empty() -> Self {
        Self { s: [0; N] }
    }

    pub fn new(s: &str) -> Result<Self, FixedStrErr> {
        if s.len() >= N {
            return Err(FixedStrErr::CapacityOverflow {
                capacity: N - 1,
                required: s.len(),
            });
        }
        if s.bytes().any(|b| b == 0) {
            return Err(FixedStrErr::InteriorNul);
        }

        let mut f = Self::empty();
        f.s[..s.len()].copy_from_slice(s.as_bytes());
        Ok(f)
    }

    /// Decodes a zero-padded byte array as returned by the kernel.
    pub fn from_byte_array(mut bytes: [u8; N]) -> Result<Self, FixedStrErr> {
        let nul = bytes.iter().position(|b| *b == 0).unwrap_or(N);
        let _ = core::str::from_utf8(&bytes[..nul])?;
        if nul < N {
            bytes[nul..].fill(0);
        }

        Ok(FixedStr { s: bytes })
    }

    pub const fn into_byte_array(self) -> [u8; N] {
        self.s
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.s.iter().position(|b| *b == 0).unwrap_or(N)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.s[0] == 0
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        let s = &self.s[..self.len()];
        unsafe { std::str::from_utf8_unchecked(s) }
    }
}

impl<const N: usize> Default for FixedStr<N> {
    #[inline(always)]
    fn default() -> Self {
        Self::empty()
    }
}

impl<const N: usize> std::fmt::Debug for FixedStr<N> {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FixedStr").field(&self.as_str()).finish()
    }
}

impl<const N: usize> std::fmt::Display for FixedStr<N> {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_str().fmt(f)
    }
}

impl<const N: usize> AsRef<str> for FixedStr<N> {
    #[inline(always)]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<const N: usize> Deref for FixedStr<N> {
    type Target = str;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

#[derive(Debug, Clone, Copy, thiserror::Error)]
pub enum FixedStrErr {
    #[error(
        "exceeded fixed string size: required {required} bytes with only {capacity} available"
    )]
    CapacityOverflow { capacity: usize, required: usize },
    #[error("embedded NUL byte")]
    InteriorNul,
    #[error("UTF8 error")]
    Utf8(#[from] core::str::Utf8Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_fits_up_to_capacity_minus_one() {
        let s31 = "a".repeat(31);
        let f = FixedStr::<32>::new(&s31).unwrap();
        assert_eq!(f.as_str(), s31);
        assert_eq!(f.len(), 31);

        let s32 = "a".repeat(32);
        assert!(matches!(
            FixedStr::<32>::new(&s32),
            Err(FixedStrErr::CapacityOverflow { capacity: 31, .. })
        ));
    }

    #[test]
    fn byte_array_round_trip() {
        let f = FixedStr::<32>::new("gpiochip0").unwrap();
        let arr = f.into_byte_array();
        assert_eq!(&arr[..9], b"gpiochip0");
        assert!(arr[9..].iter().all(|b| *b == 0));

        let back = FixedStr::<32>::from_byte_array(arr).unwrap();
        assert_eq!(back.as_str(), "gpiochip0");
    }

    #[test]
    fn garbage_after_nul_is_discarded() {
        let mut arr = [0u8; 32];
        arr[..3].copy_from_slice(b"led");
        arr[10] = 0xff;
        let f = FixedStr::<32>::from_byte_array(arr).unwrap();
        assert_eq!(f.as_str(), "led");
        assert_eq!(f.into_byte_array()[10], 0);
    }

    #[test]
    fn empty() {
        let f = FixedStr::<32>::empty();
        assert!(f.is_empty());
        assert_eq!(f.len(), 0);
        assert_eq!(f.as_str(), "");
    }
}
