//! Section cursors and smart-int coding
//!
//! Every model section is a bounded byte range. Reads past the end of a
//! section yield zero instead of failing, which keeps malformed files
//! decodable.

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use crate::error::{Error, Result};

/// Smallest value a smart int can carry.
pub const SMART_MIN: i32 = -16384;

/// Largest value a smart int can carry.
pub const SMART_MAX: i32 = 16383;

/// How the high byte of a two-byte smart int is interpreted on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmartFlavor {
    /// 317: high bit masked off, then biased by 16384.
    Masked,
    /// 667: full 16-bit value biased by 49152.
    Unmasked,
}

/// A read cursor over one section of a model buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor over `len` bytes of `buf` starting at `offset`.
    ///
    /// The range is clamped to the buffer, so an oversized section simply
    /// underruns into zeros.
    pub fn section(buf: &'a [u8], offset: usize, len: usize) -> Self {
        let start = offset.min(buf.len());
        let end = offset.saturating_add(len).min(buf.len());
        Self {
            data: &buf[start..end],
            pos: 0,
        }
    }

    /// Create a cursor over a whole slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes left before the section end.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        if self.remaining() < n {
            self.pos = self.data.len();
            return None;
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Some(bytes)
    }

    pub fn read_u8(&mut self) -> u8 {
        self.take(1).map_or(0, |b| b[0])
    }

    pub fn read_i8(&mut self) -> i8 {
        self.read_u8() as i8
    }

    pub fn read_u16(&mut self) -> u16 {
        self.take(2).map_or(0, BigEndian::read_u16)
    }

    pub fn read_i16(&mut self) -> i16 {
        self.take(2).map_or(0, BigEndian::read_i16)
    }

    /// Read `n` bytes, zero-filling whatever lies past the section end.
    pub fn read_bytes(&mut self, n: usize) -> Vec<u8> {
        let available = self.remaining().min(n);
        let mut bytes = self.data[self.pos..self.pos + available].to_vec();
        self.pos += available;
        bytes.resize(n, 0);
        bytes
    }

    /// Read a signed smart int.
    pub fn read_smart(&mut self, flavor: SmartFlavor) -> i32 {
        let Some(&peek) = self.data.get(self.pos) else {
            return 0;
        };
        if peek < 0x80 {
            return i32::from(self.read_u8()) - 64;
        }
        // a missing low byte reads as zero, the high byte still counts
        let high = self.read_u8();
        let low = i32::from(self.read_u8());
        match flavor {
            SmartFlavor::Masked => ((i32::from(high & 0x7F) << 8) | low) - 16384,
            SmartFlavor::Unmasked => ((i32::from(high) << 8) | low) - 49152,
        }
    }
}

/// Append a signed smart int to `out`.
///
/// # Errors
///
/// Returns [`Error::SmartIntOutOfRange`] when `value` is outside
/// `-16384..=16383`.
pub fn write_smart(out: &mut Vec<u8>, value: i32) -> Result<()> {
    if !(SMART_MIN..=SMART_MAX).contains(&value) {
        return Err(Error::SmartIntOutOfRange { value });
    }
    if (-64..64).contains(&value) {
        out.write_u8((value + 64) as u8)?;
    } else {
        out.write_u16::<BigEndian>((value + 49152) as u16)?;
    }
    Ok(())
}

/// Number of bytes [`write_smart`] emits for `value`.
pub fn smart_len(value: i32) -> usize {
    if (-64..64).contains(&value) { 1 } else { 2 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(value: i32) -> Vec<u8> {
        let mut out = Vec::new();
        write_smart(&mut out, value).unwrap();
        out
    }

    #[test]
    fn test_small_values_take_one_byte() {
        assert_eq!(pack(0), vec![64]);
        assert_eq!(pack(-64), vec![0]);
        assert_eq!(pack(63), vec![127]);
        assert_eq!(pack(64), vec![0xC0, 0x40]);
        assert_eq!(pack(-65), vec![0xBF, 0xBF]);
    }

    #[test]
    fn test_smart_round_trip_both_flavors() {
        for value in SMART_MIN..=SMART_MAX {
            let bytes = pack(value);
            assert_eq!(bytes.len(), smart_len(value));
            for flavor in [SmartFlavor::Masked, SmartFlavor::Unmasked] {
                let mut cursor = ByteCursor::new(&bytes);
                assert_eq!(cursor.read_smart(flavor), value, "{value} {flavor:?}");
                assert_eq!(cursor.remaining(), 0);
            }
        }
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut out = Vec::new();
        assert!(matches!(
            write_smart(&mut out, 16384),
            Err(Error::SmartIntOutOfRange { value: 16384 })
        ));
        assert!(write_smart(&mut out, -16385).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_flavors_agree_on_two_byte_values() {
        // high bit is always set here, so masking and the larger bias cancel out
        let bytes = [0x80, 0x00];
        assert_eq!(ByteCursor::new(&bytes).read_smart(SmartFlavor::Masked), -16384);
        assert_eq!(ByteCursor::new(&bytes).read_smart(SmartFlavor::Unmasked), -16384);
        let bytes = [0xFF, 0xFF];
        assert_eq!(ByteCursor::new(&bytes).read_smart(SmartFlavor::Masked), 16383);
        assert_eq!(ByteCursor::new(&bytes).read_smart(SmartFlavor::Unmasked), 16383);
        let bytes = [0x90, 0x00];
        assert_eq!(ByteCursor::new(&bytes).read_smart(SmartFlavor::Masked), -12288);
        assert_eq!(ByteCursor::new(&bytes).read_smart(SmartFlavor::Unmasked), -12288);
    }

    #[test]
    fn test_underrun_reads_zero() {
        let buf = [1u8, 2, 3];
        let mut cursor = ByteCursor::section(&buf, 2, 10);
        assert_eq!(cursor.read_u8(), 3);
        assert_eq!(cursor.read_u8(), 0);
        assert_eq!(cursor.read_u16(), 0);
        assert_eq!(cursor.read_smart(SmartFlavor::Masked), 0);

        let mut cursor = ByteCursor::section(&buf, 50, 4);
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(cursor.read_i16(), 0);
    }

    #[test]
    fn test_read_bytes_pads_with_zero() {
        let buf = [7u8, 8, 9, 10];
        let mut cursor = ByteCursor::section(&buf, 1, 2);
        assert_eq!(cursor.read_bytes(4), vec![8, 9, 0, 0]);
        assert_eq!(cursor.read_bytes(1), vec![0]);
    }

    #[test]
    fn test_partial_u16_reads_zero() {
        let buf = [0x12u8];
        let mut cursor = ByteCursor::new(&buf);
        assert_eq!(cursor.read_u16(), 0);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_smart_missing_low_byte_keeps_high_byte() {
        let buf = [0xC5u8];
        for flavor in [SmartFlavor::Masked, SmartFlavor::Unmasked] {
            let mut cursor = ByteCursor::new(&buf);
            assert_eq!(cursor.read_smart(flavor), 1280, "{flavor:?}");
            assert_eq!(cursor.remaining(), 0);
        }

        // the cut happens at the section end, not the buffer end
        let buf = [0x90u8, 0x33];
        let mut cursor = ByteCursor::section(&buf, 0, 1);
        assert_eq!(cursor.read_smart(SmartFlavor::Masked), -12288);
    }
}
