//! A little-endian byte reader for the DICOM data set.

#[derive(Clone, Debug)]
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    #[inline]
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    #[inline]
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    /// Moves the reader to the given offset, clamped to the end of the data.
    #[inline]
    pub(crate) fn jump(&mut self, offset: usize) {
        self.offset = offset.min(self.data.len());
    }

    #[inline]
    pub(crate) fn peek_bytes(&self, len: usize) -> Option<&'a [u8]> {
        let end = self.offset.checked_add(len)?;
        self.data.get(self.offset..end)
    }

    #[inline]
    pub(crate) fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        let v = self.peek_bytes(len)?;
        self.offset += len;

        Some(v)
    }

    #[inline]
    pub(crate) fn skip_bytes(&mut self, len: usize) -> Option<()> {
        self.read_bytes(len).map(|_| {})
    }

    #[inline]
    pub(crate) fn peek_u16(&self) -> Option<u16> {
        let bytes = self.peek_bytes(2)?;

        Some(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    #[inline]
    pub(crate) fn read_u16(&mut self) -> Option<u16> {
        let v = self.peek_u16()?;
        self.offset += 2;

        Some(v)
    }

    #[inline]
    pub(crate) fn read_u32(&mut self) -> Option<u32> {
        let bytes = self.read_bytes(4)?;

        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}
