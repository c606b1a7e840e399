//! Building blocks shared by the 317 and 667 model formats

pub mod attributes;
pub mod stream;
pub mod texture;
pub mod triangles;
pub mod vertices;

pub use attributes::{
    decode_alpha, decode_vertex_skin, encode_alpha, encode_vertex_skin, pack_hsl,
    skin_channel_count, unpack_hsl,
};
pub use stream::{ByteCursor, SmartFlavor, write_smart};
pub use texture::TextureBasis;
pub use triangles::{TriangleState, TriangleStreams, decode_triangles, encode_triangles};
pub use vertices::{VertexStreams, decode_vertices, encode_vertices};

use crate::error::{Error, Result};

/// Check that an optional per-element array matches `expected`.
pub(crate) fn check_len<T>(
    attribute: &'static str,
    values: Option<&[T]>,
    expected: usize,
) -> Result<()> {
    match values {
        Some(values) if values.len() != expected => Err(Error::AttributeLengthMismatch {
            attribute,
            expected,
            found: values.len(),
        }),
        _ => Ok(()),
    }
}

/// Convert a count to a footer field, failing when it does not fit.
pub(crate) fn footer_field<T: TryFrom<usize>>(what: &'static str, count: usize, max: T) -> Result<T>
where
    usize: From<T>,
    T: Copy,
{
    T::try_from(count).map_err(|_| Error::CountOverflow {
        what,
        count,
        max: usize::from(max),
    })
}
