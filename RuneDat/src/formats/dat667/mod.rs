//! 667 versioned model format
//!
//! The footer sits 23 bytes from the end of the buffer and is followed by
//! two marker bytes (`0xFF 0xFF` when written by this crate). Texture render
//! types lead the body; the texture placement data trails it, split into
//! simple (planar) records, complex records and four lockstep parameter
//! regions for the complex kinds.

mod reader;
mod writer;

pub use reader::decode;
pub use writer::encode;

use std::io::{Cursor, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};
use crate::model::{RENDER_CUBE, RENDER_PLANAR};

/// Size of the footer fields.
pub const FOOTER_LEN: usize = 21;

/// Footer plus the two trailing marker bytes.
pub const TRAILER_LEN: usize = FOOTER_LEN + 2;

/// Trailing bytes written after the footer.
pub const MARKER: [u8; 2] = [0xFF, 0xFF];

/// Priority flag meaning "one priority per face follows".
pub const PER_FACE_PRIORITY: u8 = 0xFF;

/// Bytes per P/M/N record.
pub const RECORD_LEN: usize = 6;

/// Bytes per entry in the complex scale region.
pub const SCALE_LEN: usize = 6;

/// Largest texture coordinate index the coordinate bytes can carry.
pub const MAX_TEXTURE_COORD: i32 = 254;

/// Largest texture id the material slots can carry.
pub const MAX_TEXTURE_ID: i32 = 65534;

pub(crate) const FORMAT_NAME: &str = "667";

/// The 21-byte footer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Footer {
    pub vertex_count: u16,
    pub triangle_count: u16,
    pub texture_triangle_count: u8,
    /// Bit 0: per-face render info block present.
    pub flags: u8,
    /// `0xFF` for per-face priorities, otherwise the model priority.
    pub priority: u8,
    pub alpha: u8,
    pub tskin: u8,
    pub texture: u8,
    pub vskin: u8,
    pub x_len: u16,
    pub y_len: u16,
    pub z_len: u16,
    pub indices_len: u16,
    pub texture_coords_len: u16,
}

impl Footer {
    /// Read the footer that precedes the two trailing bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedInput`] when the buffer is shorter than the
    /// footer and marker.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < TRAILER_LEN {
            return Err(Error::TruncatedInput {
                format: FORMAT_NAME,
                needed: TRAILER_LEN,
                found: data.len(),
            });
        }
        let start = data.len() - TRAILER_LEN;
        let mut cursor = Cursor::new(&data[start..start + FOOTER_LEN]);
        Ok(Self {
            vertex_count: cursor.read_u16::<BigEndian>()?,
            triangle_count: cursor.read_u16::<BigEndian>()?,
            texture_triangle_count: cursor.read_u8()?,
            flags: cursor.read_u8()?,
            priority: cursor.read_u8()?,
            alpha: cursor.read_u8()?,
            tskin: cursor.read_u8()?,
            texture: cursor.read_u8()?,
            vskin: cursor.read_u8()?,
            x_len: cursor.read_u16::<BigEndian>()?,
            y_len: cursor.read_u16::<BigEndian>()?,
            z_len: cursor.read_u16::<BigEndian>()?,
            indices_len: cursor.read_u16::<BigEndian>()?,
            texture_coords_len: cursor.read_u16::<BigEndian>()?,
        })
    }

    /// Append the footer and the marker bytes to `out`.
    pub fn write<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        out.write_u16::<BigEndian>(self.vertex_count)?;
        out.write_u16::<BigEndian>(self.triangle_count)?;
        out.write_u8(self.texture_triangle_count)?;
        out.write_u8(self.flags)?;
        out.write_u8(self.priority)?;
        out.write_u8(self.alpha)?;
        out.write_u8(self.tskin)?;
        out.write_u8(self.texture)?;
        out.write_u8(self.vskin)?;
        out.write_u16::<BigEndian>(self.x_len)?;
        out.write_u16::<BigEndian>(self.y_len)?;
        out.write_u16::<BigEndian>(self.z_len)?;
        out.write_u16::<BigEndian>(self.indices_len)?;
        out.write_u16::<BigEndian>(self.texture_coords_len)?;
        out.write_all(&MARKER)
    }

    pub fn has_render_info(&self) -> bool {
        self.flags & 1 == 1
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

    pub fn has_textures(&self) -> bool {
        self.texture == 1
    }

    pub fn has_vertex_skins(&self) -> bool {
        self.vskin == 1
    }
}

/// How many texture triangles of each kind a render type list describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextureCounts {
    pub simple: usize,
    pub complex: usize,
    pub cube: usize,
}

impl TextureCounts {
    pub fn from_render_types(render_types: &[u8]) -> Self {
        let mut counts = Self::default();
        for &render_type in render_types {
            match render_type {
                RENDER_PLANAR => counts.simple += 1,
                1..=3 => {
                    counts.complex += 1;
                    if render_type == RENDER_CUBE {
                        counts.cube += 1;
                    }
                }
                _ => {}
            }
        }
        counts
    }
}

/// Byte offsets of every body section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Sections {
    pub render_types: usize,
    pub vertex_flags: usize,
    pub render_info: usize,
    pub opcodes: usize,
    pub priorities: usize,
    pub tskins: usize,
    pub vertex_skins: usize,
    pub alphas: usize,
    pub indices: usize,
    pub materials: usize,
    pub texture_coords: usize,
    pub colors: usize,
    pub x: usize,
    pub y: usize,
    pub z: usize,
    pub simple: usize,
    pub complex: usize,
    pub scales: usize,
    pub rotations: usize,
    pub directions: usize,
    pub translations: usize,
    pub end: usize,
}

impl Sections {
    pub(crate) fn locate(footer: &Footer, counts: &TextureCounts) -> Self {
        let vc = usize::from(footer.vertex_count);
        let tc = usize::from(footer.triangle_count);
        let mut s = Self::default();
        let mut pos = 0;
        let mut next = |present: bool, len: usize| {
            let start = pos;
            if present {
                pos += len;
            }
            start
        };

        s.render_types = next(true, usize::from(footer.texture_triangle_count));
        s.vertex_flags = next(true, vc);
        s.render_info = next(footer.has_render_info(), tc);
        s.opcodes = next(true, tc);
        s.priorities = next(footer.has_face_priorities(), tc);
        s.tskins = next(footer.has_tskins(), tc);
        s.vertex_skins = next(footer.has_vertex_skins(), vc);
        s.alphas = next(footer.has_alphas(), tc);
        s.indices = next(true, usize::from(footer.indices_len));
        s.materials = next(footer.has_textures(), tc * 2);
        s.texture_coords = next(true, usize::from(footer.texture_coords_len));
        s.colors = next(true, tc * 2);
        s.x = next(true, usize::from(footer.x_len));
        s.y = next(true, usize::from(footer.y_len));
        s.z = next(true, usize::from(footer.z_len));
        s.simple = next(true, counts.simple * RECORD_LEN);
        s.complex = next(true, counts.complex * RECORD_LEN);
        s.scales = next(true, counts.complex * SCALE_LEN);
        s.rotations = next(true, counts.complex);
        s.directions = next(true, counts.complex);
        s.translations = next(true, counts.complex + counts.cube * 2);
        s.end = pos;
        s
    }
}
