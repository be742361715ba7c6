/// The eight bytes every png starts with
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Largest width or height accepted by the encoder
pub const MAX_DIMENSIONS: usize = 1 << 24;

/// Largest chunk payload the container allows
pub const MAX_CHUNK_LENGTH: usize = (1 << 31) - 1;

/// IHDR payload length
pub const IHDR_LENGTH: usize = 13;
