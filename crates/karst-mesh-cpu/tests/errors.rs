use std::sync::Arc;

use karst_blocks::{bake_library_from_toml, Library};
use karst_chunk::{ChannelCompression, ChannelDepth, VoxelBuffer};
use karst_mesh_cpu::{BlockyMesher, MeshError, MesherInput};

const CATALOG: &str = r#"
materials = ["terrain"]

[[blocks]]
name = "stone"
material = "terrain"
"#;

fn make_mesher() -> BlockyMesher {
    let baked = bake_library_from_toml(CATALOG).unwrap();
    BlockyMesher::with_library(Arc::new(Library::new(baked)))
}

fn build(mesher: &BlockyMesher, voxels: &VoxelBuffer) -> Result<karst_mesh_cpu::MesherOutput, MeshError> {
    mesher.build(MesherInput {
        voxels,
        lod_index: 0,
        collision_hint: false,
    })
}

#[test]
fn uniform_chunks_are_silently_empty() {
    let mesher = make_mesher();
    let voxels = VoxelBuffer::uniform(4, 4, 4, 1, ChannelDepth::Bits8);
    let output = build(&mesher, &voxels).unwrap();
    assert!(output.surfaces.is_empty());
}

#[test]
fn unknown_compression_is_reported() {
    let mesher = make_mesher();
    let voxels =
        VoxelBuffer::new(4, 4, 4, ChannelDepth::Bits8).with_compression(ChannelCompression::Other);
    assert_eq!(
        build(&mesher, &voxels).unwrap_err(),
        MeshError::UnsupportedCompression
    );
}

#[test]
fn thirty_two_bit_channels_are_reported() {
    let mesher = make_mesher();
    let voxels = VoxelBuffer::new(4, 4, 4, ChannelDepth::Bits32);
    assert_eq!(
        build(&mesher, &voxels).unwrap_err(),
        MeshError::UnsupportedDepth
    );
}

#[test]
fn undersized_chunks_are_a_hard_failure() {
    let mesher = make_mesher();
    let voxels = VoxelBuffer::new(1, 4, 4, ChannelDepth::Bits8);
    assert!(matches!(
        build(&mesher, &voxels).unwrap_err(),
        MeshError::ChunkTooSmall { size: (1, 4, 4) }
    ));
}

#[test]
fn ids_beyond_the_library_mesh_like_air_but_shade_like_solids() {
    let mesher = make_mesher();
    // id 9 has no model: the voxel itself is skipped and does not occlude,
    // but it still darkens adjacent corners like a solid
    let mut voxels = VoxelBuffer::new(4, 4, 3, ChannelDepth::Bits8);
    voxels.set(1, 1, 1, 1);
    voxels.set(2, 2, 1, 9);
    let output = build(&mesher, &voxels).unwrap();
    let arrays = &output.surfaces[0].arrays;
    // the unknown voxel contributes no geometry and hides nothing
    assert_eq!(arrays.positions.len(), 24);
    // but the stone's top corners against it pick up shade
    for ((p, n), c) in arrays
        .positions
        .iter()
        .zip(&arrays.normals)
        .zip(&arrays.colors)
    {
        if n.y != 1.0 {
            continue;
        }
        if p.x == 1.0 {
            assert!(c.r < 1.0, "corner at {p:?} should be shaded");
        } else {
            assert_eq!(c.r, 1.0);
        }
    }
}
