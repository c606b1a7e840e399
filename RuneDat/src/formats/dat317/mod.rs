//! 317/OSRS model format
//!
//! The body is a run of sections followed by an 18-byte big-endian footer
//! holding the element counts, the section presence flags and the lengths
//! of the variable-size streams.
//!
//! Section order: vertex flags, face opcodes, priorities, tskins, texture
//! flags, vertex skins, alphas, triangle indices, colours, texture
//! triangles, x, y, z.

mod reader;
mod writer;

pub use reader::decode;
pub use writer::encode;

use std::io::{Cursor, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};

/// Size of the trailing footer.
pub const FOOTER_LEN: usize = 18;

/// Priority byte meaning "one priority per face follows".
pub const PER_FACE_PRIORITY: u8 = 0xFF;

/// Largest texture coordinate index a texture flag byte can carry.
pub const MAX_TEXTURE_COORD: i32 = 63;

/// Texture flag bit marking a textured face.
pub const TEXTURED_BIT: u8 = 0x2;

/// Format name used in errors and logs.
pub(crate) const FORMAT_NAME: &str = "317";

/// The 18-byte footer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Footer {
    pub vertex_count: u16,
    pub face_count: u16,
    pub texture_triangle_count: u8,
    pub textured: u8,
    /// `0xFF` for per-face priorities, otherwise the model priority.
    pub priority: u8,
    pub alpha: u8,
    pub tskin: u8,
    pub vskin: u8,
    pub x_len: u16,
    pub y_len: u16,
    pub z_len: u16,
    pub indices_len: u16,
}

impl Footer {
    /// Read the footer from the end of a model buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedInput`] when the buffer is shorter than
    /// the footer.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < FOOTER_LEN {
            return Err(Error::TruncatedInput {
                format: FORMAT_NAME,
                needed: FOOTER_LEN,
                found: data.len(),
            });
        }
        let mut cursor = Cursor::new(&data[data.len() - FOOTER_LEN..]);
        Ok(Self {
            vertex_count: cursor.read_u16::<BigEndian>()?,
            face_count: cursor.read_u16::<BigEndian>()?,
            texture_triangle_count: cursor.read_u8()?,
            textured: cursor.read_u8()?,
            priority: cursor.read_u8()?,
            alpha: cursor.read_u8()?,
            tskin: cursor.read_u8()?,
            vskin: cursor.read_u8()?,
            x_len: cursor.read_u16::<BigEndian>()?,
            y_len: cursor.read_u16::<BigEndian>()?,
            z_len: cursor.read_u16::<BigEndian>()?,
            indices_len: cursor.read_u16::<BigEndian>()?,
        })
    }

    /// Append the footer to `out`.
    pub fn write<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        out.write_u16::<BigEndian>(self.vertex_count)?;
        out.write_u16::<BigEndian>(self.face_count)?;
        out.write_u8(self.texture_triangle_count)?;
        out.write_u8(self.textured)?;
        out.write_u8(self.priority)?;
        out.write_u8(self.alpha)?;
        out.write_u8(self.tskin)?;
        out.write_u8(self.vskin)?;
        out.write_u16::<BigEndian>(self.x_len)?;
        out.write_u16::<BigEndian>(self.y_len)?;
        out.write_u16::<BigEndian>(self.z_len)?;
        out.write_u16::<BigEndian>(self.indices_len)?;
        Ok(())
    }

    pub fn has_textures(&self) -> bool {
        self.textured == 1
    }

    pub fn has_face_priorities(&self) -> bool {
        self.priority == PER_FACE_PRIORITY
    }

    pub fn has_alphas(&self) -> bool {
        self.alpha == 1
    }

    pub fn has_tskins(&self) -> bool {
        self.tskin == 1
    }

    pub fn has_vertex_skins(&self) -> bool {
        self.vskin == 1
    }
}

/// Byte offsets of every body section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Sections {
    pub vertex_flags: usize,
    pub face_opcodes: usize,
    pub priorities: usize,
    pub tskins: usize,
    pub texture_flags: usize,
    pub vertex_skins: usize,
    pub alphas: usize,
    pub indices: usize,
    pub colors: usize,
    pub texture_triangles: usize,
    pub x: usize,
    pub y: usize,
    pub z: usize,
    pub end: usize,
}

impl Sections {
    pub(crate) fn locate(footer: &Footer) -> Self {
        let vc = usize::from(footer.vertex_count);
        let fc = usize::from(footer.face_count);
        let mut s = Self::default();
        let mut pos = 0;
        let mut next = |present: bool, len: usize| {
            let start = pos;
            if present {
                pos += len;
            }
            start
        };

        s.vertex_flags = next(true, vc);
        s.face_opcodes = next(true, fc);
        s.priorities = next(footer.has_face_priorities(), fc);
        s.tskins = next(footer.has_tskins(), fc);
        s.texture_flags = next(footer.has_textures(), fc);
        s.vertex_skins = next(footer.has_vertex_skins(), vc);
        s.alphas = next(footer.has_alphas(), fc);
        s.indices = next(true, usize::from(footer.indices_len));
        s.colors = next(true, fc * 2);
        s.texture_triangles = next(
            footer.has_textures(),
            usize::from(footer.texture_triangle_count) * 6,
        );
        s.x = next(true, usize::from(footer.x_len));
        s.y = next(true, usize::from(footer.y_len));
        s.z = next(true, usize::from(footer.z_len));
        s.end = pos;
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_footer_round_trip() {
        let footer = Footer {
            vertex_count: 300,
            face_count: 2,
            texture_triangle_count: 1,
            textured: 1,
            priority: PER_FACE_PRIORITY,
            alpha: 1,
            tskin: 0,
            vskin: 1,
            x_len: 3,
            y_len: 4,
            z_len: 5,
            indices_len: 6,
        };
        let mut bytes = vec![0xAAu8, 0xBB];
        footer.write(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 2 + FOOTER_LEN);
        assert_eq!(&bytes[2..4], &[0x01, 0x2C]);
        assert_eq!(Footer::parse(&bytes).unwrap(), footer);
    }

    #[test]
    fn test_short_buffer_rejected() {
        assert!(matches!(
            Footer::parse(&[0; 17]),
            Err(Error::TruncatedInput { needed: 18, found: 17, .. })
        ));
    }

    #[test]
    fn test_section_offsets() {
        let footer = Footer {
            vertex_count: 4,
            face_count: 2,
            texture_triangle_count: 1,
            textured: 1,
            priority: 1,
            alpha: 1,
            tskin: 1,
            vskin: 0,
            x_len: 3,
            y_len: 2,
            z_len: 1,
            indices_len: 5,
        };
        let s = Sections::locate(&footer);
        assert_eq!(s.face_opcodes, 4);
        assert_eq!(s.priorities, 6);
        assert_eq!(s.tskins, 6);
        assert_eq!(s.texture_flags, 8);
        assert_eq!(s.vertex_skins, 10);
        assert_eq!(s.alphas, 10);
        assert_eq!(s.indices, 12);
        assert_eq!(s.colors, 17);
        assert_eq!(s.texture_triangles, 21);
        assert_eq!(s.x, 27);
        assert_eq!(s.end, 33);
    }
}
