//! Triangle index compression
//!
//! Triangles are written as a stream of opcodes plus smart-int index
//! deltas. The coder keeps a rolling window of the last triangle so that a
//! face sharing an edge with its predecessor only stores one new index.

use super::stream::{ByteCursor, SmartFlavor, write_smart};
use crate::error::Result;

/// All three indices follow as deltas.
pub const OP_NEW: u8 = 1;
/// Reuse `(v1, v3)`, one new index.
pub const OP_KEEP_FIRST: u8 = 2;
/// Reuse `(v3, v2)`, one new index.
pub const OP_KEEP_SECOND: u8 = 3;
/// Reuse `(v2, v1)`, one new index.
pub const OP_SWAP: u8 = 4;

/// Encoded triangle streams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriangleStreams {
    pub opcodes: Vec<u8>,
    pub indices: Vec<u8>,
}

/// Rolling state shared by the encoder and decoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriangleState {
    pub v1: i32,
    pub v2: i32,
    pub v3: i32,
    /// The last index written to (or read from) the delta stream.
    pub last: i32,
}

impl TriangleState {
    /// Pick the opcode for `tri` against the current window.
    pub fn opcode_for(&self, [p1, p2, _]: [i32; 3]) -> u8 {
        if p1 == self.v2 && p2 == self.v1 {
            OP_SWAP
        } else if p1 == self.v3 && p2 == self.v2 {
            OP_KEEP_SECOND
        } else if p1 == self.v1 && p2 == self.v3 {
            OP_KEEP_FIRST
        } else {
            OP_NEW
        }
    }

    /// Append one triangle, choosing the shortest opcode.
    pub fn encode(&mut self, tri: [i32; 3], out: &mut TriangleStreams) -> Result<u8> {
        let opcode = self.opcode_for(tri);
        let [p1, p2, p3] = tri;

        if opcode == OP_NEW {
            for index in tri {
                write_smart(&mut out.indices, index - self.last)?;
                self.last = index;
            }
            self.v1 = p1;
            self.v2 = p2;
        } else {
            write_smart(&mut out.indices, p3 - self.last)?;
            self.last = p3;
            match opcode {
                OP_SWAP => std::mem::swap(&mut self.v1, &mut self.v2),
                OP_KEEP_SECOND => self.v1 = self.v3,
                _ => self.v2 = self.v3,
            }
        }
        self.v3 = p3;
        out.opcodes.push(opcode);
        Ok(opcode)
    }

    /// Advance the window by one opcode, reading deltas from `indices`.
    ///
    /// Unknown opcodes leave the window untouched.
    pub fn decode(&mut self, opcode: u8, indices: &mut ByteCursor<'_>, flavor: SmartFlavor) {
        match opcode {
            OP_NEW => {
                self.v1 = self.last + indices.read_smart(flavor);
                self.v2 = self.v1 + indices.read_smart(flavor);
                self.v3 = self.v2 + indices.read_smart(flavor);
                self.last = self.v3;
            }
            OP_KEEP_FIRST | OP_KEEP_SECOND | OP_SWAP => {
                match opcode {
                    OP_KEEP_FIRST => self.v2 = self.v3,
                    OP_KEEP_SECOND => self.v1 = self.v3,
                    _ => std::mem::swap(&mut self.v1, &mut self.v2),
                }
                self.v3 = self.last + indices.read_smart(flavor);
                self.last = self.v3;
            }
            _ => {}
        }
    }

    /// Clamp the window into `0..vertex_count`, returning how many indices moved.
    pub fn clamp(&mut self, vertex_count: usize) -> usize {
        let max = i32::try_from(vertex_count.saturating_sub(1)).unwrap_or(i32::MAX);
        let mut clamped = 0;
        for v in [&mut self.v1, &mut self.v2, &mut self.v3] {
            let fixed = (*v).clamp(0, max);
            if fixed != *v {
                *v = fixed;
                clamped += 1;
            }
        }
        clamped
    }

    pub fn triangle(&self) -> [i32; 3] {
        [self.v1, self.v2, self.v3]
    }
}

/// Encode a triangle list.
///
/// # Errors
///
/// Returns [`crate::Error::SmartIntOutOfRange`] when an index delta does
/// not fit into a smart int.
pub fn encode_triangles(triangles: &[[u16; 3]]) -> Result<TriangleStreams> {
    let mut out = TriangleStreams {
        opcodes: Vec::with_capacity(triangles.len()),
        indices: Vec::new(),
    };
    let mut state = TriangleState::default();
    for tri in triangles {
        state.encode(tri.map(i32::from), &mut out)?;
    }
    Ok(out)
}

/// Decode `count` triangles, clamping every index into the vertex range.
///
/// Returns the triangles and the number of indices that had to be clamped.
pub fn decode_triangles(
    count: usize,
    vertex_count: usize,
    opcodes: &mut ByteCursor<'_>,
    indices: &mut ByteCursor<'_>,
    flavor: SmartFlavor,
) -> (Vec<[u16; 3]>, usize) {
    let mut triangles = Vec::with_capacity(count);
    let mut state = TriangleState::default();
    let mut clamped = 0;

    for _ in 0..count {
        state.decode(opcodes.read_u8(), indices, flavor);
        clamped += state.clamp(vertex_count);
        triangles.push(state.triangle().map(|v| u16::try_from(v).unwrap_or(u16::MAX)));
    }

    (triangles, clamped)
}
