//! Error types for `RuneDat`

use thiserror::Error;

/// The error type for `RuneDat` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error during batch discovery.
    #[error("directory walk error: {0}")]
    WalkDirError(String),

    // ==================== Decode Errors ====================
    /// The buffer is too short for the footer or for the sections implied
    /// by the footer counts.
    #[error("truncated {format} model: need at least {needed} bytes, found {found}")]
    TruncatedInput {
        /// Format being decoded (`"317"` or `"667"`).
        format: &'static str,
        /// Minimum number of bytes required.
        needed: usize,
        /// Number of bytes available.
        found: usize,
    },

    /// P, M and N are collinear (or coincident), so no texture basis exists.
    #[error("degenerate texture basis (determinant {det})")]
    MalformedTextureBasis {
        /// The Gram determinant of the basis.
        det: f64,
    },

    // ==================== Encode Errors ====================
    /// A delta does not fit into a smart int.
    #[error("value {value} cannot be encoded as a smart int (range -16384..=16383)")]
    SmartIntOutOfRange {
        /// The offending value.
        value: i32,
    },

    /// A count or section length exceeds the width of its footer field.
    #[error("{what} of {count} exceeds the footer limit of {max}")]
    CountOverflow {
        /// Which count overflowed (e.g. `"vertex count"`).
        what: &'static str,
        /// The actual count.
        count: usize,
        /// The maximum the footer can hold.
        max: usize,
    },

    /// An optional attribute array does not match the element count.
    #[error("{attribute} has {found} entries, expected {expected}")]
    AttributeLengthMismatch {
        /// Name of the mesh attribute.
        attribute: &'static str,
        /// Expected length (triangle or vertex count).
        expected: usize,
        /// Actual length.
        found: usize,
    },

    /// A triangle or texture triangle references a missing vertex.
    #[error("triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    TriangleIndexOutOfRange {
        /// Triangle position in its list.
        triangle: usize,
        /// The offending vertex index.
        index: u16,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A texture id cannot be stored in the target format.
    #[error("face {face} has texture id {id}, which the {format} format cannot store")]
    TextureIdOutOfRange {
        /// Face index.
        face: usize,
        /// The texture id.
        id: i32,
        /// Target format name.
        format: &'static str,
    },

    /// A textured face references a texture coordinate the format cannot store.
    #[error("face {face} has texture coordinate {coord}, which the {format} format cannot store")]
    TextureCoordOutOfRange {
        /// Face index.
        face: usize,
        /// The texture coordinate index.
        coord: i32,
        /// Target format name.
        format: &'static str,
    },

    /// The target format has no encoding for a texture projection kind.
    #[error("texture triangle {index} uses a {kind} projection, which the {format} format cannot store")]
    UnsupportedProjection {
        /// Texture triangle index.
        index: usize,
        /// Projection kind name.
        kind: &'static str,
        /// Target format name.
        format: &'static str,
    },

    // ==================== Conversion Errors ====================
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A model format name could not be parsed.
    #[error("unknown model format: {0}")]
    UnknownFormat(String),
}

// Add conversion from walkdir::Error
impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

/// A specialized Result type for `RuneDat` operations.
pub type Result<T> = std::result::Result<T, Error>;
