//! Fixed-capacity value types shared by the codec and the listen-only node.
//!
//! Nothing here allocates: every buffer lives inline so values can be moved
//! through `embassy_sync` channels and kept on task stacks.
use ::core::fmt;
use ::core::ops::Deref;

/// Largest payload carried by a classic CAN frame.
pub const MAX_FRAME_PAYLOAD: usize = 8;

/// Text length of a Base64-encoded classic CAN payload (8 bytes → 12 symbols).
pub const MAX_PAYLOAD_TEXT: usize = 12;

/// Owned Base64 text stored inline, `N` bytes of capacity.
///
/// The text only holds ASCII symbols from the Base64 alphabet plus `=`.
#[derive(Clone, Copy)]
pub struct Base64Text<const N: usize> {
    pub(crate) data: [u8; N],
    pub(crate) len: usize,
}

/// Base64 rendering of a CAN frame payload.
pub type PayloadText = Base64Text<MAX_PAYLOAD_TEXT>;

impl<const N: usize> Default for Base64Text<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Base64Text<N> {
    /// Create an empty text.
    pub const fn new() -> Self {
        Self {
            data: [0; N],
            len: 0,
        }
    }

    /// Maximum number of symbols the text can hold.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of symbols stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks whether the text is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reset the text.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Raw symbols.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Text view over the stored symbols.
    #[inline]
    pub fn as_str(&self) -> &str {
        crate::infra::codec::base64::ascii_str(self.as_bytes())
    }
}

impl<const N: usize> Deref for Base64Text<N> {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

/// Only the stored symbols take part; bytes past `len` are ignored.
impl<const N: usize> PartialEq for Base64Text<N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<const N: usize> Eq for Base64Text<N> {}

impl<const N: usize> PartialEq<str> for Base64Text<N> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl<const N: usize> PartialEq<&str> for Base64Text<N> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl<const N: usize> fmt::Debug for Base64Text<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl<const N: usize> fmt::Display for Base64Text<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appends Base64 symbols, so a [`Base64Writer`](crate::infra::codec::base64::Base64Writer)
/// can stream straight into inline storage. Anything outside the Base64
/// alphabet, or text that does not fit, is rejected with `fmt::Error`.
impl<const N: usize> fmt::Write for Base64Text<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let end = self.len + bytes.len();
        if end > N || !bytes.iter().all(|&b| crate::infra::codec::base64::is_symbol(b)) {
            return Err(fmt::Error);
        }
        self.data[self.len..end].copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for Base64Text<N> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}
