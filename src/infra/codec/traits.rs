//! Public traits exposed by the codec layer. They let upper layers render any
//! byte carrier (raw slices, CAN frames) as Base64 without knowing how the
//! bytes are stored.
use crate::core::Base64Text;
use crate::error::Base64Error;
use crate::infra::codec::base64::{encode, Base64Display, Base64Writer};
use core::fmt;

//==================================================================================TO_BASE64
/// Implemented by every type whose payload can be rendered as Base64.
pub trait ToBase64 {
    /// Bytes to encode.
    fn base64_bytes(&self) -> &[u8];

    /// Encode into an owned inline text of capacity `N`.
    fn to_base64<const N: usize>(&self) -> Result<Base64Text<N>, Base64Error> {
        encode(self.base64_bytes())
    }

    /// Lazy `Display` adapter, useful in log statements.
    fn base64_display(&self) -> Base64Display<'_> {
        Base64Display::new(self.base64_bytes())
    }

    /// Append the encoded payload to an existing streaming encoder.
    fn write_base64<W: fmt::Write>(&self, writer: &mut Base64Writer<W>) -> fmt::Result {
        writer.write(self.base64_bytes())
    }
}

impl ToBase64 for [u8] {
    fn base64_bytes(&self) -> &[u8] {
        self
    }
}

impl<const N: usize> ToBase64 for [u8; N] {
    fn base64_bytes(&self) -> &[u8] {
        self
    }
}
