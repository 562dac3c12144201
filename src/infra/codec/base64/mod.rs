//! Standard Base64 (RFC 4648 alphabet, `=` padding) without allocation.
//!
//! Input is processed in groups of three bytes; each group yields four
//! symbols. A short final group is zero-filled and its missing symbols are
//! replaced by the padding character:
//!
//! ```text
//! byte0    byte1    byte2
//! 76543210 76543210 76543210
//! \____/\_____/\_____/\____/
//!  idx0   idx1   idx2   idx3
//! ```
//!
//! Three entry points cover the usual ownership needs:
//! - [`encode_into`] / [`encode_into_nul`] write into caller storage;
//! - [`encode`] returns an inline [`Base64Text`];
//! - [`Base64Writer`] streams arbitrary chunks into any `fmt::Write` sink.
//!
//! [`decode_into`] is the inverse mapping.
use core::fmt;

use crate::core::Base64Text;
use crate::error::Base64Error;

/// Standard Base64 alphabet, indexed by 6-bit value.
pub const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Padding symbol for incomplete trailing groups.
pub const PAD: u8 = b'=';

/// Input bytes per group.
pub const GROUP_BYTES: usize = 3;

/// Output symbols per group.
pub const GROUP_SYMBOLS: usize = 4;

const INVALID: u8 = 0xFF;

/// Reverse lookup: symbol → 6-bit value, `INVALID` elsewhere.
static DECODE_TABLE: [u8; 256] = {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < 64 {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Number of symbols produced for `len` input bytes: `4 * ceil(len / 3)`.
#[inline]
pub const fn encoded_len(len: usize) -> usize {
    len.div_ceil(GROUP_BYTES) * GROUP_SYMBOLS
}

/// Encode a single group.
///
/// `group` holds the input bytes zero-filled past `len`; `len` is the number
/// of real bytes (values ≥ 3 mean a full group). Symbols without data become
/// [`PAD`].
#[inline]
pub const fn encode_block(group: [u8; GROUP_BYTES], len: usize) -> [u8; GROUP_SYMBOLS] {
    let [b0, b1, b2] = group;
    [
        ALPHABET[(b0 >> 2) as usize],
        ALPHABET[(((b0 & 0x03) << 4) | (b1 >> 4)) as usize],
        if len > 1 {
            ALPHABET[(((b1 & 0x0f) << 2) | (b2 >> 6)) as usize]
        } else {
            PAD
        },
        if len > 2 {
            ALPHABET[(b2 & 0x3f) as usize]
        } else {
            PAD
        },
    ]
}

/// Checks whether `byte` may appear in encoded text (alphabet or padding).
#[inline]
pub fn is_symbol(byte: u8) -> bool {
    byte == PAD || DECODE_TABLE[byte as usize] != INVALID
}

/// Zero-fill a chunk of at most three bytes into a group.
#[inline]
fn load_group(chunk: &[u8]) -> [u8; GROUP_BYTES] {
    let mut group = [0u8; GROUP_BYTES];
    let len = chunk.len().min(GROUP_BYTES);
    group[..len].copy_from_slice(&chunk[..len]);
    group
}

/// View encoder output as text.
#[inline]
pub(crate) fn ascii_str(symbols: &[u8]) -> &str {
    core::str::from_utf8(symbols).unwrap_or_default()
}

/// Encode `input` into `out`, returning the number of symbols written.
fn encode_raw(input: &[u8], out: &mut [u8]) -> Result<usize, Base64Error> {
    let required = encoded_len(input.len());
    if out.len() < required {
        return Err(Base64Error::BufferTooSmall {
            required,
            available: out.len(),
        });
    }

    for (chunk, dst) in input
        .chunks(GROUP_BYTES)
        .zip(out.chunks_exact_mut(GROUP_SYMBOLS))
    {
        dst.copy_from_slice(&encode_block(load_group(chunk), chunk.len()));
    }

    Ok(required)
}

/// Encode `input` into caller storage and return the text.
///
/// `out` must hold at least [`encoded_len`] bytes.
///
/// ```
/// use korri_listen::infra::codec::base64::encode_into;
///
/// let mut out = [0u8; 8];
/// assert_eq!(encode_into(b"Hello", &mut out).unwrap(), "SGVsbG8=");
/// ```
pub fn encode_into<'a>(input: &[u8], out: &'a mut [u8]) -> Result<&'a str, Base64Error> {
    let len = encode_raw(input, out)?;
    Ok(ascii_str(&out[..len]))
}

/// Encode `input` and append a NUL terminator, C-string style.
///
/// `out` must hold at least `encoded_len(input.len()) + 1` bytes. Returns
/// the text length, terminator excluded.
pub fn encode_into_nul(input: &[u8], out: &mut [u8]) -> Result<usize, Base64Error> {
    let required = encoded_len(input.len()) + 1;
    if out.len() < required {
        return Err(Base64Error::BufferTooSmall {
            required,
            available: out.len(),
        });
    }
    let len = encode_raw(input, out)?;
    out[len] = 0;
    Ok(len)
}

/// Encode `input` into an owned inline text of capacity `N`.
///
/// ```
/// use korri_listen::infra::codec::base64::encode;
///
/// let text = encode::<8>(&[0x48, 0x65, 0x6C, 0x6C, 0x6F]).unwrap();
/// assert_eq!(text.as_str(), "SGVsbG8=");
/// ```
pub fn encode<const N: usize>(input: &[u8]) -> Result<Base64Text<N>, Base64Error> {
    let mut text = Base64Text::<N>::new();
    text.len = encode_raw(input, &mut text.data)?;
    Ok(text)
}

//==================================================================================DISPLAY
/// Formats a byte slice as Base64 on demand, without intermediate storage.
///
/// Handy for log lines: `println!("{}", Base64Display::new(payload))`.
#[derive(Clone, Copy, Debug)]
pub struct Base64Display<'a> {
    bytes: &'a [u8],
}

impl<'a> Base64Display<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }
}

impl fmt::Display for Base64Display<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.bytes.chunks(GROUP_BYTES) {
            let block = encode_block(load_group(chunk), chunk.len());
            f.write_str(ascii_str(&block))?;
        }
        Ok(())
    }
}

//==================================================================================WRITER
/// Streaming encoder.
///
/// Accepts input in chunks of any size and forwards every completed group to
/// `sink` right away. At most two bytes stay pending between calls; they are
/// flushed, padded, by [`finish`](Self::finish). The produced text is the
/// same as [`encode`] over the concatenated input.
pub struct Base64Writer<W: fmt::Write> {
    sink: W,
    pending: [u8; GROUP_BYTES],
    pending_len: usize,
}

impl<W: fmt::Write> Base64Writer<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            pending: [0; GROUP_BYTES],
            pending_len: 0,
        }
    }

    /// Bytes waiting for a complete group.
    pub fn pending(&self) -> usize {
        self.pending_len
    }

    /// Feed more input.
    pub fn write(&mut self, mut bytes: &[u8]) -> fmt::Result {
        if self.pending_len > 0 {
            let take = (GROUP_BYTES - self.pending_len).min(bytes.len());
            self.pending[self.pending_len..self.pending_len + take].copy_from_slice(&bytes[..take]);
            self.pending_len += take;
            bytes = &bytes[take..];

            if self.pending_len < GROUP_BYTES {
                return Ok(());
            }
            let group = self.pending;
            self.pending_len = 0;
            self.emit(group, GROUP_BYTES)?;
        }

        let mut groups = bytes.chunks_exact(GROUP_BYTES);
        for chunk in &mut groups {
            self.emit([chunk[0], chunk[1], chunk[2]], GROUP_BYTES)?;
        }

        let rest = groups.remainder();
        self.pending[..rest.len()].copy_from_slice(rest);
        self.pending_len = rest.len();
        Ok(())
    }

    /// Flush the final (padded) group and hand the sink back.
    pub fn finish(mut self) -> Result<W, fmt::Error> {
        if self.pending_len > 0 {
            // Stale bytes from an earlier group must not leak into the padding bits.
            let len = self.pending_len;
            self.pending[len..].fill(0);
            let group = self.pending;
            self.emit(group, len)?;
        }
        Ok(self.sink)
    }

    fn emit(&mut self, group: [u8; GROUP_BYTES], len: usize) -> fmt::Result {
        let block = encode_block(group, len);
        self.sink.write_str(ascii_str(&block))
    }
}

//==================================================================================DECODER
/// Number of bytes [`decode_into`] produces for well-formed `text`.
pub fn decoded_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let groups = bytes.len() / GROUP_SYMBOLS;
    groups * GROUP_BYTES - trailing_padding(bytes).min(groups * GROUP_BYTES)
}

fn trailing_padding(bytes: &[u8]) -> usize {
    bytes.iter().rev().take(2).take_while(|&&b| b == PAD).count()
}

/// Decode padded Base64 `text` into `out`.
///
/// Padding is only accepted in the last two positions of the final group.
/// Non-zero bits under the padding are ignored.
pub fn decode_into<'a>(text: &str, out: &'a mut [u8]) -> Result<&'a [u8], Base64Error> {
    let bytes = text.as_bytes();
    if bytes.len() % GROUP_SYMBOLS != 0 {
        return Err(Base64Error::InvalidLength { len: bytes.len() });
    }

    let padding = trailing_padding(bytes);
    let data_end = bytes.len() - padding;
    // At most two trailing `=` count as padding, so "A===" fails here too.
    if let Some(position) = bytes[..data_end].iter().position(|&b| b == PAD) {
        return Err(Base64Error::InvalidPadding { position });
    }

    let required = decoded_len(text);
    if out.len() < required {
        return Err(Base64Error::BufferTooSmall {
            required,
            available: out.len(),
        });
    }

    let mut written = 0;
    for (group_index, group) in bytes.chunks_exact(GROUP_SYMBOLS).enumerate() {
        let mut values = [0u8; GROUP_SYMBOLS];
        for (offset, &symbol) in group.iter().enumerate() {
            let position = group_index * GROUP_SYMBOLS + offset;
            if position >= data_end {
                break;
            }
            let value = DECODE_TABLE[symbol as usize];
            if value == INVALID {
                return Err(Base64Error::InvalidSymbol { position, symbol });
            }
            values[offset] = value;
        }

        let decoded = [
            (values[0] << 2) | (values[1] >> 4),
            (values[1] << 4) | (values[2] >> 2),
            (values[2] << 6) | values[3],
        ];
        let take = (required - written).min(GROUP_BYTES);
        out[written..written + take].copy_from_slice(&decoded[..take]);
        written += take;
    }

    Ok(&out[..written])
}
