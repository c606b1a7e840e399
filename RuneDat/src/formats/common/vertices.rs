//! Delta-compressed vertex streams
//!
//! Positions travel in client space: the mesh position `(x, y, z)` is
//! written as `(x, -z, y)`. Each vertex gets a flag byte whose low three
//! bits mark which axes changed, and each changed axis appends a smart-int
//! delta to its own stream.

use super::stream::{ByteCursor, SmartFlavor, write_smart};
use crate::error::{Error, Result};

/// Flag bit set when the x delta is non-zero.
pub const FLAG_X: u8 = 0x1;
/// Flag bit set when the y delta is non-zero.
pub const FLAG_Y: u8 = 0x2;
/// Flag bit set when the z delta is non-zero.
pub const FLAG_Z: u8 = 0x4;

/// The four vertex byte streams of a model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexStreams {
    pub flags: Vec<u8>,
    pub x: Vec<u8>,
    pub y: Vec<u8>,
    pub z: Vec<u8>,
}

/// Convert a mesh position to client space.
///
/// Widened to `i64` so negating `i32::MIN` cannot overflow.
pub fn to_wire([x, y, z]: [i32; 3]) -> [i64; 3] {
    [i64::from(x), -i64::from(z), i64::from(y)]
}

/// Convert a client-space position back to the mesh axes.
pub fn from_wire([x, y, z]: [i32; 3]) -> [i32; 3] {
    [x, z, -y]
}

/// Encode mesh positions into flag and axis streams.
///
/// # Errors
///
/// Returns [`crate::Error::SmartIntOutOfRange`] when two consecutive
/// vertices are further apart than a smart int can express.
pub fn encode_vertices(vertices: &[[i32; 3]]) -> Result<VertexStreams> {
    let mut streams = VertexStreams {
        flags: Vec::with_capacity(vertices.len()),
        ..VertexStreams::default()
    };
    let mut prev = [0i64; 3];

    for &vertex in vertices {
        let wire = to_wire(vertex);
        let mut flag = 0u8;
        let axes = [
            (FLAG_X, &mut streams.x),
            (FLAG_Y, &mut streams.y),
            (FLAG_Z, &mut streams.z),
        ];
        for (axis, (bit, out)) in axes.into_iter().enumerate() {
            let delta = wire[axis] - prev[axis];
            let delta = i32::try_from(delta).map_err(|_| Error::SmartIntOutOfRange {
                value: if delta < 0 { i32::MIN } else { i32::MAX },
            })?;
            if delta != 0 {
                flag |= bit;
                write_smart(out, delta)?;
            }
        }
        streams.flags.push(flag);
        prev = wire;
    }

    Ok(streams)
}

/// Decode `count` positions from the flag stream and three axis streams.
pub fn decode_vertices(
    count: usize,
    flags: &mut ByteCursor<'_>,
    x: &mut ByteCursor<'_>,
    y: &mut ByteCursor<'_>,
    z: &mut ByteCursor<'_>,
    flavor: SmartFlavor,
) -> Vec<[i32; 3]> {
    let mut vertices = Vec::with_capacity(count);
    let mut wire = [0i32; 3];

    for _ in 0..count {
        let flag = flags.read_u8();
        if flag & FLAG_X != 0 {
            wire[0] += x.read_smart(flavor);
        }
        if flag & FLAG_Y != 0 {
            wire[1] += y.read_smart(flavor);
        }
        if flag & FLAG_Z != 0 {
            wire[2] += z.read_smart(flavor);
        }
        vertices.push(from_wire(wire));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode(streams: &VertexStreams, count: usize) -> Vec<[i32; 3]> {
        decode_vertices(
            count,
            &mut ByteCursor::new(&streams.flags),
            &mut ByteCursor::new(&streams.x),
            &mut ByteCursor::new(&streams.y),
            &mut ByteCursor::new(&streams.z),
            SmartFlavor::Masked,
        )
    }

    #[test]
    fn test_axis_permutation() {
        assert_eq!(to_wire([1, 2, 3]), [1, -3, 2]);
        assert_eq!(from_wire([1, -3, 2]), [1, 2, 3]);
        assert_eq!(to_wire([0, 0, i32::MIN]), [0, 2_147_483_648, 0]);
    }

    #[test]
    fn test_flags_mark_changed_axes() {
        let vertices = [[0, 0, 0], [10, 0, 0], [10, 5, 0], [10, 5, -7]];
        let streams = encode_vertices(&vertices).unwrap();
        // mesh y lands on wire z, mesh z lands on wire y
        assert_eq!(streams.flags, vec![0, FLAG_X, FLAG_Z, FLAG_Y]);
        assert_eq!(streams.x, vec![64 + 10]);
        assert_eq!(streams.y, vec![64 + 7]);
        assert_eq!(streams.z, vec![64 + 5]);
        assert_eq!(decode(&streams, vertices.len()), vertices.to_vec());
    }

    #[test]
    fn test_large_deltas_use_two_bytes() {
        let vertices = [[1000, -2000, 300], [-1000, 2000, -300]];
        let streams = encode_vertices(&vertices).unwrap();
        assert_eq!(streams.x.len(), 4);
        assert_eq!(decode(&streams, 2), vertices.to_vec());
    }

    #[test]
    fn test_delta_overflow_fails() {
        let vertices = [[0, 0, 0], [20000, 0, 0]];
        assert!(encode_vertices(&vertices).is_err());
    }

    #[test]
    fn test_extreme_coordinates_rejected() {
        let vertices = [[0, 0, i32::MIN], [0, 0, 0], [1, 0, 0]];
        assert!(matches!(
            encode_vertices(&vertices),
            Err(Error::SmartIntOutOfRange { value: i32::MAX })
        ));

        // wire deltas past i32 saturate in the error
        let vertices = [[16000, 0, 0], [i32::MIN, 0, 0]];
        assert!(matches!(
            encode_vertices(&vertices),
            Err(Error::SmartIntOutOfRange { value: i32::MIN })
        ));
    }

    #[test]
    fn test_truncated_axis_stream_keeps_high_byte() {
        // x delta 0xC5 0x00 with the low byte cut off
        let vertices = decode_vertices(
            1,
            &mut ByteCursor::new(&[FLAG_X]),
            &mut ByteCursor::new(&[0xC5]),
            &mut ByteCursor::new(&[]),
            &mut ByteCursor::new(&[]),
            SmartFlavor::Masked,
        );
        assert_eq!(vertices, vec![[1280, 0, 0]]);
    }

    #[test]
    fn test_short_streams_decode_to_origin() {
        let flags = [FLAG_X | FLAG_Y | FLAG_Z];
        let vertices = decode_vertices(
            2,
            &mut ByteCursor::new(&flags),
            &mut ByteCursor::new(&[]),
            &mut ByteCursor::new(&[]),
            &mut ByteCursor::new(&[]),
            SmartFlavor::Unmasked,
        );
        assert_eq!(vertices, vec![[0, 0, 0], [0, 0, 0]]);
    }
}
