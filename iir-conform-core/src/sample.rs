use core::fmt::{Debug, Display, LowerExp};
use core::iter::Sum;
use core::str::FromStr;

use num_traits::{Float, FromPrimitive, ToPrimitive};

use crate::{Error, Result};

/// Precision of every value stored in a fixture.
///
/// Selected once per fixture from its one-byte tag and carried as a type
/// parameter from then on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleType {
    /// IEEE-754 single precision, tag `'f'`.
    Float32,
    /// IEEE-754 double precision, tag `'d'`.
    Float64,
}

impl SampleType {
    /// The on-disk tag byte.
    pub const fn tag(self) -> u8 {
        match self {
            SampleType::Float32 => b'f',
            SampleType::Float64 => b'd',
        }
    }

    /// Parse an on-disk tag byte.
    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            b'f' => Ok(SampleType::Float32),
            b'd' => Ok(SampleType::Float64),
            other => Err(Error::format(format!(
                "unknown sample type tag {other:#04x}, expected 'f' or 'd'"
            ))),
        }
    }

    /// Element width in bytes.
    pub const fn width(self) -> usize {
        match self {
            SampleType::Float32 => 4,
            SampleType::Float64 => 8,
        }
    }

    /// C type name, used in derived file names.
    pub const fn name(self) -> &'static str {
        match self {
            SampleType::Float32 => "float",
            SampleType::Float64 => "double",
        }
    }
}

impl Display for SampleType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SampleType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "f" | "f32" | "float" | "single" => Ok(SampleType::Float32),
            "d" | "f64" | "double" => Ok(SampleType::Float64),
            other => Err(Error::format(format!("unknown sample type `{other}`"))),
        }
    }
}

/// A fixture element type.
///
/// Arithmetic on a `Sample` stays in its own precision: `f32` fixtures are
/// filtered with `f32` sums and products only.
pub trait Sample:
    Float
    + FromPrimitive
    + ToPrimitive
    + Sum
    + FromStr
    + Display
    + LowerExp
    + Debug
    + Default
    + Send
    + Sync
    + 'static
{
    /// Matching runtime tag.
    const TYPE: SampleType;

    /// Decode one element from exactly `TYPE.width()` little-endian bytes.
    fn from_le_slice(bytes: &[u8]) -> Self;

    /// Append the little-endian encoding of `self`.
    fn extend_le(self, out: &mut Vec<u8>);

    /// Raw IEEE-754 bit pattern widened to `u64`.
    fn to_bits_u64(self) -> u64;

    /// Round a double to this precision (round to nearest, ties to even).
    fn from_f64_rounded(value: f64) -> Self;

    /// Widen to double; exact for both precisions.
    fn to_f64_exact(self) -> f64;
}

impl Sample for f32 {
    const TYPE: SampleType = SampleType::Float32;

    fn from_le_slice(bytes: &[u8]) -> Self {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(bytes);
        f32::from_le_bytes(buf)
    }

    fn extend_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn to_bits_u64(self) -> u64 {
        u64::from(self.to_bits())
    }

    fn from_f64_rounded(value: f64) -> Self {
        value as f32
    }

    fn to_f64_exact(self) -> f64 {
        f64::from(self)
    }
}

impl Sample for f64 {
    const TYPE: SampleType = SampleType::Float64;

    fn from_le_slice(bytes: &[u8]) -> Self {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        f64::from_le_bytes(buf)
    }

    fn extend_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn to_bits_u64(self) -> u64 {
        self.to_bits()
    }

    fn from_f64_rounded(value: f64) -> Self {
        value
    }

    fn to_f64_exact(self) -> f64 {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for ty in [SampleType::Float32, SampleType::Float64] {
            assert_eq!(SampleType::from_tag(ty.tag()).unwrap(), ty);
        }
        assert_eq!(SampleType::Float32.width(), 4);
        assert_eq!(SampleType::Float64.width(), 8);
    }

    #[test]
    fn unknown_tag_is_format_error() {
        let err = SampleType::from_tag(b'i').unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
    }

    #[test]
    fn parses_cli_spellings() {
        assert_eq!("f32".parse::<SampleType>().unwrap(), SampleType::Float32);
        assert_eq!("double".parse::<SampleType>().unwrap(), SampleType::Float64);
        assert!("f16".parse::<SampleType>().is_err());
    }

    #[test]
    fn element_codec_is_little_endian() {
        let mut out = Vec::new();
        1.0f32.extend_le(&mut out);
        assert_eq!(out, vec![0x00, 0x00, 0x80, 0x3f]);
        assert_eq!(f32::from_le_slice(&out), 1.0);

        out.clear();
        (-2.5f64).extend_le(&mut out);
        assert_eq!(f64::from_le_slice(&out), -2.5);
        assert_eq!((-2.5f64).to_bits_u64(), (-2.5f64).to_bits());
    }

    #[test]
    fn rounding_to_single() {
        assert_eq!(f32::from_f64_rounded(0.1), 0.1f32);
        assert_eq!(f32::from_f64_rounded(16_777_217.0), 16_777_216.0);
        assert_eq!(f64::from_f64_rounded(0.1), 0.1);
        assert_eq!(0.1f32.to_f64_exact(), f64::from(0.1f32));
    }
}
