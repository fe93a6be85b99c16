//! Shared constants for karst-mesh-cpu.

/// One-voxel skirt around the meshed region. Buffers are padded on every side
/// so neighbor reads in the main loop never leave the channel.
pub const PADDING: usize = 1;
