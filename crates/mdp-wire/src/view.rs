use crate::error::WireError;

/// A borrowed, bounds-checked window over a raw byte buffer.
///
/// ```text
///   buf:  ┌──────────────┬──────────────────────────┬─────────┐
///         │   (before)   │     window [base, +len)  │ (after) │
///         └──────────────┴──────────────────────────┴─────────┘
///                        ▲ offset 0 of the view
/// ```
///
/// Every read is expressed relative to the window start and must satisfy
/// `offset + width <= len`. A request that does not fit is a
/// [`WireError::OutOfBounds`], never a short read. The view never copies
/// or owns the buffer; returned slices borrow straight from it.
///
/// The constructor checks `base + len <= buf.len()` once, so the indexing
/// inside `read` can never panic.
#[derive(Clone, Copy, Debug)]
pub struct ByteView<'a> {
    buf: &'a [u8],
    base: usize,
    len: usize,
}

/// Generates little-endian typed readers on top of `read_array`.
macro_rules! le_readers {
    ($($name:ident -> $ty:ty),+ $(,)?) => {
        $(
            #[doc = concat!("Read a little-endian `", stringify!($ty), "` at `offset`.")]
            ///
            /// # Errors
            ///
            /// Returns [`WireError::OutOfBounds`] if the value does not fit
            /// inside the view.
            pub fn $name(&self, offset: usize) -> Result<$ty, WireError> {
                Ok(<$ty>::from_le_bytes(self.read_array(offset)?))
            }
        )+
    };
}

impl<'a> ByteView<'a> {
    /// View the whole buffer.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            base: 0,
            len: buf.len(),
        }
    }

    /// View `len` bytes of `buf` starting at `base`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::OutOfBounds`] if the window does not lie
    /// entirely inside `buf`.
    pub fn window(buf: &'a [u8], base: usize, len: usize) -> Result<Self, WireError> {
        match base.checked_add(len) {
            Some(end) if end <= buf.len() => Ok(Self { buf, base, len }),
            _ => Err(WireError::OutOfBounds {
                offset: base,
                width: len,
                len: buf.len(),
            }),
        }
    }

    /// View up to `len` bytes of `buf` starting at `base`, cut short at
    /// the end of the buffer.
    ///
    /// This is the message-body view: its length is
    /// `min(len, buf.len() - base)`, and a `base` past the end yields an
    /// empty view. Reads past a clamped view still fail.
    #[must_use]
    pub fn clamped(buf: &'a [u8], base: usize, len: usize) -> Self {
        let base = base.min(buf.len());
        Self {
            buf,
            base,
            len: len.min(buf.len() - base),
        }
    }

    /// Number of bytes visible through this view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Offset of the window inside the underlying buffer.
    #[must_use]
    pub fn base(&self) -> usize {
        self.base
    }

    /// The visible bytes as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &'a [u8] {
        &self.buf[self.base..self.base + self.len]
    }

    /// Return exactly `width` bytes starting at `offset` within the view.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::OutOfBounds`] if `offset + width > len()`.
    pub fn read(&self, offset: usize, width: usize) -> Result<&'a [u8], WireError> {
        let end = offset
            .checked_add(width)
            .filter(|&end| end <= self.len)
            .ok_or(WireError::OutOfBounds {
                offset,
                width,
                len: self.len,
            })?;
        Ok(&self.buf[self.base + offset..self.base + end])
    }

    /// Copy `N` bytes starting at `offset` into a fixed-size array.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::OutOfBounds`] if the array does not fit.
    pub fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N], WireError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read(offset, N)?);
        Ok(out)
    }

    le_readers! {
        u8_at -> u8,
        u16_at -> u16,
        u32_at -> u32,
        u64_at -> u64,
        i8_at -> i8,
        i16_at -> i16,
        i32_at -> i32,
        i64_at -> i64,
    }

    /// A narrower view of `len` bytes starting at `offset` in this view.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::OutOfBounds`] if the sub-window does not fit.
    pub fn sub_view(&self, offset: usize, len: usize) -> Result<Self, WireError> {
        self.read(offset, len)?;
        Ok(Self {
            buf: self.buf,
            base: self.base + offset,
            len,
        })
    }
}
