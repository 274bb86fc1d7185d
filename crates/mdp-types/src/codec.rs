use std::fmt;

use crate::error::TypeError;

/// Null sentinels: reserved bit patterns meaning "value not set".
///
/// Each constant is the raw little-endian bit pattern zero-extended to
/// 64 bits, which is what [`FieldKind::is_null`] compares against. The
/// plain SBE defaults reserve the bottom of the signed range and the top
/// of the unsigned range; the MDP 3.0 optional types reserve the top of
/// both.
pub mod null {
    pub const U8: u64 = u8::MAX as u64;
    pub const U16: u64 = u16::MAX as u64;
    pub const U32: u64 = u32::MAX as u64;
    pub const U64: u64 = u64::MAX;
    pub const I8: u64 = i8::MIN as u8 as u64;
    pub const I16: u64 = i16::MIN as u16 as u64;
    pub const I32: u64 = i32::MIN as u32 as u64;
    pub const I64: u64 = i64::MIN as u64;
    pub const CHAR: u64 = 0;

    // MDP 3.0 optional types
    pub const INT32_NULL: u64 = i32::MAX as u32 as u64;
    pub const UINT8_NULL: u64 = U8;
    pub const UINT32_NULL: u64 = U32;
    pub const UINT64_NULL: u64 = U64;
    pub const LOCAL_MKT_DATE_NULL: u64 = U16;
    pub const PRICE_NULL9: u64 = i64::MAX as u64;
}

/// Fixed-point decimal: `mantissa × 10^exponent`.
///
/// MDP 3.0 prices are `PRICE9` (i64 mantissa, constant exponent -9), so
/// a mantissa of `9_000_000_000_000` is a price of 9000. Arithmetic stays
/// in integers; [`to_f64`](Self::to_f64) is for display and analytics only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Decimal {
    pub mantissa: i64,
    pub exponent: i8,
}

impl Decimal {
    #[must_use]
    pub const fn new(mantissa: i64, exponent: i8) -> Self {
        Self { mantissa, exponent }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64(self) -> f64 {
        self.mantissa as f64 * 10f64.powi(i32::from(self.exponent))
    }
}

impl fmt::Display for Decimal {
    /// Exact decimal rendering with trailing fractional zeros trimmed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let digits = self.mantissa.unsigned_abs();
        if digits == 0 {
            return f.write_str("0");
        }

        if self.exponent >= 0 {
            write!(f, "{sign}{digits}")?;
            for _ in 0..self.exponent {
                f.write_str("0")?;
            }
            return Ok(());
        }

        let places = u32::from(self.exponent.unsigned_abs());
        let (int, frac) = match 10u64.checked_pow(places) {
            Some(scale) => (digits / scale, digits % scale),
            None => (0, digits),
        };
        if frac == 0 {
            return write!(f, "{sign}{int}");
        }

        let width = places as usize;
        let frac = format!("{frac:0width$}");
        write!(f, "{sign}{int}.{}", frac.trim_end_matches('0'))
    }
}

/// A decoded field value.
///
/// Char arrays borrow from the message buffer; everything else is copied
/// out. Null sentinels never appear here: the reader turns them into
/// `None` before a `FieldValue` is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldValue<'a> {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Char(u8),
    Chars(&'a [u8]),
    Decimal(Decimal),
}

impl<'a> FieldValue<'a> {
    /// Short name of the variant, for diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::Char(_) => "char",
            Self::Chars(_) => "char array",
            Self::Decimal(_) => "decimal",
        }
    }

    /// Widen any integer variant to `i128`; `None` for non-integers.
    #[must_use]
    pub fn as_i128(&self) -> Option<i128> {
        match *self {
            Self::U8(v) => Some(v.into()),
            Self::U16(v) => Some(v.into()),
            Self::U32(v) => Some(v.into()),
            Self::U64(v) => Some(v.into()),
            Self::I8(v) => Some(v.into()),
            Self::I16(v) => Some(v.into()),
            Self::I32(v) => Some(v.into()),
            Self::I64(v) => Some(v.into()),
            Self::Char(_) | Self::Chars(_) | Self::Decimal(_) => None,
        }
    }

    /// A char array as text, with NUL padding stripped.
    ///
    /// Returns `None` for other variants or non-UTF-8 content.
    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Self::Chars(bytes) => {
                let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
                std::str::from_utf8(&bytes[..end]).ok()
            }
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::Char(c) => write!(f, "{:?}", char::from(*c)),
            Self::Chars(_) => match self.as_str() {
                Some(s) => write!(f, "{s:?}"),
                None => write!(f, "<non-utf8>"),
            },
            Self::Decimal(d) => write!(f, "{d}"),
        }
    }
}

/// Conversion from a decoded [`FieldValue`] into a concrete Rust type.
///
/// Typed message views use this to turn the reader's generic result into
/// the accessor's return type. A variant mismatch yields `None`, which the
/// reader reports as a [`TypeError::KindMismatch`].
pub trait FromFieldValue: Sized {
    const KIND: &'static str;

    fn from_field_value(value: FieldValue<'_>) -> Option<Self>;
}

macro_rules! from_field_value {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl FromFieldValue for $ty {
                const KIND: &'static str = stringify!($ty);

                fn from_field_value(value: FieldValue<'_>) -> Option<Self> {
                    match value {
                        FieldValue::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )+
    };
}

from_field_value! {
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    Decimal => Decimal,
}

impl FromFieldValue for char {
    const KIND: &'static str = "char";

    fn from_field_value(value: FieldValue<'_>) -> Option<Self> {
        match value {
            FieldValue::Char(c) => Some(char::from(c)),
            _ => None,
        }
    }
}

/// How a field is laid out on the wire.
///
/// ```text
/// ┌────────────────────┬────────┬───────────────────────────────────────┐
/// │ Kind               │ Width  │ Encoding                              │
/// ├────────────────────┼────────┼───────────────────────────────────────┤
/// │ U8 … U64, I8 … I64 │ 1 – 8  │ little-endian two's complement        │
/// │ Char               │ 1      │ single ASCII byte                     │
/// │ CharArray(n)       │ n      │ ASCII, NUL padded on the right        │
/// │ Decimal64 { e }    │ 8      │ i64 mantissa, constant exponent e     │
/// │ Decimal32 { e }    │ 4      │ i32 mantissa, constant exponent e     │
/// │ Constant(v)        │ 0      │ not on the wire; value from schema    │
/// └────────────────────┴────────┴───────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    Char,
    CharArray(usize),
    Decimal64 { exponent: i8 },
    Decimal32 { exponent: i8 },
    Constant(FieldValue<'static>),
}

fn array<const N: usize>(bytes: &[u8]) -> Result<[u8; N], TypeError> {
    bytes.try_into().map_err(|_| TypeError::WidthMismatch {
        expected: N,
        actual: bytes.len(),
    })
}

/// Zero-extend up to 8 little-endian bytes into a `u64`.
fn raw_bits(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .take(8)
        .rev()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

impl FieldKind {
    /// Width of the field on the wire in bytes.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::U8 | Self::I8 | Self::Char => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::Decimal32 { .. } => 4,
            Self::U64 | Self::I64 | Self::Decimal64 { .. } => 8,
            Self::CharArray(n) => n,
            Self::Constant(_) => 0,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Char => "char",
            Self::CharArray(_) => "char array",
            Self::Decimal64 { .. } | Self::Decimal32 { .. } => "decimal",
            Self::Constant(_) => "constant",
        }
    }

    /// The plain SBE null sentinel for this kind, if it has one.
    #[must_use]
    pub const fn default_null(self) -> Option<u64> {
        match self {
            Self::U8 => Some(null::U8),
            Self::U16 => Some(null::U16),
            Self::U32 => Some(null::U32),
            Self::U64 => Some(null::U64),
            Self::I8 => Some(null::I8),
            Self::I16 => Some(null::I16),
            Self::I32 | Self::Decimal32 { .. } => Some(null::I32),
            Self::I64 | Self::Decimal64 { .. } => Some(null::I64),
            Self::Char | Self::CharArray(_) => Some(null::CHAR),
            Self::Constant(_) => None,
        }
    }

    /// The zero value of this kind, used as the default for required
    /// fields that are absent from a buffer.
    #[must_use]
    pub const fn zero(self) -> FieldValue<'static> {
        match self {
            Self::U8 => FieldValue::U8(0),
            Self::U16 => FieldValue::U16(0),
            Self::U32 => FieldValue::U32(0),
            Self::U64 => FieldValue::U64(0),
            Self::I8 => FieldValue::I8(0),
            Self::I16 => FieldValue::I16(0),
            Self::I32 => FieldValue::I32(0),
            Self::I64 => FieldValue::I64(0),
            Self::Char => FieldValue::Char(0),
            Self::CharArray(_) => FieldValue::Chars(&[]),
            Self::Decimal64 { exponent } | Self::Decimal32 { exponent } => {
                FieldValue::Decimal(Decimal::new(0, exponent))
            }
            Self::Constant(v) => v,
        }
    }

    /// Does `bytes` hold the null sentinel?
    ///
    /// Scalars compare their zero-extended bit pattern; char arrays are
    /// null when every byte equals the sentinel byte.
    #[must_use]
    pub fn is_null(self, bytes: &[u8], sentinel: u64) -> bool {
        match self {
            Self::Constant(_) => false,
            Self::CharArray(_) => {
                !bytes.is_empty() && bytes.iter().all(|&b| u64::from(b) == sentinel)
            }
            _ => raw_bits(bytes) == sentinel,
        }
    }

    /// Decode raw field bytes (already sliced to the field width).
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::WidthMismatch`] if `bytes` is not exactly
    /// [`width`](Self::width) bytes long.
    pub fn decode(self, bytes: &[u8]) -> Result<FieldValue<'_>, TypeError> {
        Ok(match self {
            Self::U8 => FieldValue::U8(u8::from_le_bytes(array(bytes)?)),
            Self::U16 => FieldValue::U16(u16::from_le_bytes(array(bytes)?)),
            Self::U32 => FieldValue::U32(u32::from_le_bytes(array(bytes)?)),
            Self::U64 => FieldValue::U64(u64::from_le_bytes(array(bytes)?)),
            Self::I8 => FieldValue::I8(i8::from_le_bytes(array(bytes)?)),
            Self::I16 => FieldValue::I16(i16::from_le_bytes(array(bytes)?)),
            Self::I32 => FieldValue::I32(i32::from_le_bytes(array(bytes)?)),
            Self::I64 => FieldValue::I64(i64::from_le_bytes(array(bytes)?)),
            Self::Char => FieldValue::Char(u8::from_le_bytes(array(bytes)?)),
            Self::CharArray(n) => {
                if bytes.len() != n {
                    return Err(TypeError::WidthMismatch {
                        expected: n,
                        actual: bytes.len(),
                    });
                }
                FieldValue::Chars(bytes)
            }
            Self::Decimal64 { exponent } => FieldValue::Decimal(Decimal::new(
                i64::from_le_bytes(array(bytes)?),
                exponent,
            )),
            Self::Decimal32 { exponent } => FieldValue::Decimal(Decimal::new(
                i64::from(i32::from_le_bytes(array(bytes)?)),
                exponent,
            )),
            Self::Constant(v) => v,
        })
    }

    /// Encode `value` into `out`, which must be exactly the field width.
    ///
    /// Char arrays shorter than the field are NUL padded.
    ///
    /// # Errors
    ///
    /// - [`TypeError::WidthMismatch`] if `out` has the wrong length, or a
    ///   char array value is longer than the field.
    /// - [`TypeError::KindMismatch`] if the value variant does not match.
    /// - [`TypeError::ExponentMismatch`] for a decimal with the wrong
    ///   exponent, or a mantissa that does not fit a 32-bit decimal.
    pub fn encode(self, value: FieldValue<'_>, out: &mut [u8]) -> Result<(), TypeError> {
        if out.len() != self.width() {
            return Err(TypeError::WidthMismatch {
                expected: self.width(),
                actual: out.len(),
            });
        }

        match (self, value) {
            (Self::U8, FieldValue::U8(v)) | (Self::Char, FieldValue::Char(v)) => out[0] = v,
            (Self::U16, FieldValue::U16(v)) => out.copy_from_slice(&v.to_le_bytes()),
            (Self::U32, FieldValue::U32(v)) => out.copy_from_slice(&v.to_le_bytes()),
            (Self::U64, FieldValue::U64(v)) => out.copy_from_slice(&v.to_le_bytes()),
            (Self::I8, FieldValue::I8(v)) => out.copy_from_slice(&v.to_le_bytes()),
            (Self::I16, FieldValue::I16(v)) => out.copy_from_slice(&v.to_le_bytes()),
            (Self::I32, FieldValue::I32(v)) => out.copy_from_slice(&v.to_le_bytes()),
            (Self::I64, FieldValue::I64(v)) => out.copy_from_slice(&v.to_le_bytes()),
            (Self::CharArray(n), FieldValue::Chars(text)) => {
                if text.len() > n {
                    return Err(TypeError::WidthMismatch {
                        expected: n,
                        actual: text.len(),
                    });
                }
                out.fill(0);
                out[..text.len()].copy_from_slice(text);
            }
            (Self::Decimal64 { exponent }, FieldValue::Decimal(d)) => {
                check_exponent(exponent, d)?;
                out.copy_from_slice(&d.mantissa.to_le_bytes());
            }
            (Self::Decimal32 { exponent }, FieldValue::Decimal(d)) => {
                check_exponent(exponent, d)?;
                let mantissa = i32::try_from(d.mantissa).map_err(|_| TypeError::KindMismatch {
                    expected: "decimal with 32-bit mantissa",
                    found: "decimal with 64-bit mantissa",
                })?;
                out.copy_from_slice(&mantissa.to_le_bytes());
            }
            (Self::Constant(_), _) => {}
            (kind, value) => {
                return Err(TypeError::KindMismatch {
                    expected: kind.name(),
                    found: value.kind_name(),
                });
            }
        }

        Ok(())
    }

    /// Write the null sentinel `sentinel` into `out`.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::WidthMismatch`] if `out` has the wrong length.
    pub fn encode_null(self, sentinel: u64, out: &mut [u8]) -> Result<(), TypeError> {
        let width = self.width();
        if out.len() != width {
            return Err(TypeError::WidthMismatch {
                expected: width,
                actual: out.len(),
            });
        }
        match self {
            Self::Constant(_) => {}
            // Only the low byte of a char sentinel is meaningful.
            #[allow(clippy::cast_possible_truncation)]
            Self::CharArray(_) => out.fill(sentinel as u8),
            _ => out.copy_from_slice(&sentinel.to_le_bytes()[..width]),
        }
        Ok(())
    }
}

fn check_exponent(expected: i8, value: Decimal) -> Result<(), TypeError> {
    if value.exponent == expected {
        Ok(())
    } else {
        Err(TypeError::ExponentMismatch {
            expected,
            found: value.exponent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRICE9: FieldKind = FieldKind::Decimal64 { exponent: -9 };

    #[test]
    fn widths() {
        assert_eq!(FieldKind::U8.width(), 1);
        assert_eq!(FieldKind::I16.width(), 2);
        assert_eq!(FieldKind::Decimal32 { exponent: -4 }.width(), 4);
        assert_eq!(PRICE9.width(), 8);
        assert_eq!(FieldKind::CharArray(6).width(), 6);
        assert_eq!(FieldKind::Constant(FieldValue::Char(b'g')).width(), 0);
    }

    #[test]
    fn decodes_little_endian_integers() {
        assert_eq!(
            FieldKind::I32.decode(&[0xF4, 0x15, 0x00, 0x00]).unwrap(),
            FieldValue::I32(5620)
        );
        assert_eq!(
            FieldKind::U32.decode(&[0x4D, 0x07, 0x00, 0x00]).unwrap(),
            FieldValue::U32(1869)
        );
        assert_eq!(
            FieldKind::I16.decode(&[0xFF, 0xFF]).unwrap(),
            FieldValue::I16(-1)
        );
    }

    #[test]
    fn decodes_price9() {
        let bytes = 9_000_000_000_000i64.to_le_bytes();
        let value = PRICE9.decode(&bytes).unwrap();
        assert_eq!(value, FieldValue::Decimal(Decimal::new(9_000_000_000_000, -9)));
        assert_eq!(value.to_string(), "9000");
    }

    #[test]
    fn decode_rejects_wrong_width() {
        assert_eq!(
            FieldKind::U64.decode(&[0u8; 7]),
            Err(TypeError::WidthMismatch {
                expected: 8,
                actual: 7
            })
        );
        assert!(FieldKind::CharArray(6).decode(b"ES").is_err());
    }

    #[test]
    fn null_sentinels() {
        let bytes = i64::MAX.to_le_bytes();
        assert!(PRICE9.is_null(&bytes, null::PRICE_NULL9));
        assert!(!PRICE9.is_null(&bytes, null::I64));

        assert!(FieldKind::I8.is_null(&[0x80], null::I8));
        assert!(FieldKind::I32.is_null(&i32::MAX.to_le_bytes(), null::INT32_NULL));
        assert!(FieldKind::U16.is_null(&[0xFF, 0xFF], null::LOCAL_MKT_DATE_NULL));

        assert!(FieldKind::CharArray(3).is_null(&[0, 0, 0], null::CHAR));
        assert!(!FieldKind::CharArray(3).is_null(b"E\0\0", null::CHAR));
    }

    #[test]
    fn decimal_display() {
        assert_eq!(Decimal::new(10_000_000_000, -9).to_string(), "10");
        assert_eq!(Decimal::new(1_234_500_000, -9).to_string(), "1.2345");
        assert_eq!(Decimal::new(-250, -2).to_string(), "-2.5");
        assert_eq!(Decimal::new(5, -3).to_string(), "0.005");
        assert_eq!(Decimal::new(42, 2).to_string(), "4200");
        assert_eq!(Decimal::new(i64::MIN, -9).to_string(), "-9223372036.854775808");
        assert_eq!(Decimal::new(7, -30).to_string(), "0.000000000000000000000000000007");
    }

    #[test]
    fn zero_mantissa_displays_as_zero() {
        assert_eq!(Decimal::new(0, 2).to_string(), "0");
        assert_eq!(Decimal::new(0, 0).to_string(), "0");
        assert_eq!(Decimal::new(0, -9).to_string(), "0");
    }

    #[test]
    fn decimal_to_f64() {
        let d = Decimal::new(12_500_000_000, -9);
        assert!((d.to_f64() - 12.5).abs() < 1e-12);
    }

    #[test]
    fn encode_then_decode_char_array() {
        let kind = FieldKind::CharArray(6);
        let mut out = [0xFFu8; 6];
        kind.encode(FieldValue::Chars(b"ES"), &mut out).unwrap();
        assert_eq!(&out, b"ES\0\0\0\0");
        assert_eq!(kind.decode(&out).unwrap().as_str(), Some("ES"));
    }

    #[test]
    fn encode_rejects_kind_mismatch() {
        let mut out = [0u8; 4];
        assert_eq!(
            FieldKind::I32.encode(FieldValue::U32(1), &mut out),
            Err(TypeError::KindMismatch {
                expected: "i32",
                found: "u32"
            })
        );
    }

    #[test]
    fn encode_rejects_exponent_mismatch() {
        let mut out = [0u8; 8];
        assert!(matches!(
            PRICE9.encode(FieldValue::Decimal(Decimal::new(1, -2)), &mut out),
            Err(TypeError::ExponentMismatch {
                expected: -9,
                found: -2
            })
        ));
    }

    #[test]
    fn encode_null_writes_sentinel() {
        let mut out = [0u8; 4];
        FieldKind::I32
            .encode_null(null::INT32_NULL, &mut out)
            .unwrap();
        assert_eq!(out, [0xFF, 0xFF, 0xFF, 0x7F]);
        assert!(FieldKind::I32.is_null(&out, null::INT32_NULL));
    }

    #[test]
    fn from_field_value_matches_variant() {
        assert_eq!(i32::from_field_value(FieldValue::I32(-5)), Some(-5));
        assert_eq!(u32::from_field_value(FieldValue::I32(-5)), None);
        assert_eq!(char::from_field_value(FieldValue::Char(b'g')), Some('g'));
    }

    #[test]
    fn zero_values() {
        assert_eq!(FieldKind::U64.zero(), FieldValue::U64(0));
        assert_eq!(
            PRICE9.zero(),
            FieldValue::Decimal(Decimal::new(0, -9))
        );
        assert_eq!(
            FieldKind::Constant(FieldValue::Char(b'J')).zero(),
            FieldValue::Char(b'J')
        );
    }
}
