use std::sync::Arc;

use karst_blocks::{bake_library_from_toml, Library};
use karst_chunk::{ChannelDepth, VoxelBuffer};
use karst_geom::Vec3;
use karst_mesh_cpu::{BlockyMesher, MesherInput, MesherOutput};

const CATALOG: &str = r#"
materials = ["terrain"]

[[blocks]]
name = "stone"
material = "terrain"
"#;

const STONE: u32 = 1;

fn make_mesher() -> BlockyMesher {
    let baked = bake_library_from_toml(CATALOG).unwrap();
    let mut mesher = BlockyMesher::with_library(Arc::new(Library::new(baked)));
    mesher.set_occlusion_enabled(false);
    mesher
}

fn build(mesher: &BlockyMesher, voxels: &VoxelBuffer, lod_index: u8) -> MesherOutput {
    mesher
        .build(MesherInput {
            voxels,
            lod_index,
            collision_hint: false,
        })
        .unwrap()
}

#[test]
fn lod_seam_adds_a_quad_on_the_exposed_boundary() {
    let mesher = make_mesher();
    // stone in the chunk plus matter in the neighbor chunk's padding, with
    // that outer voxel exposed to air in its plane
    let mut voxels = VoxelBuffer::new(3, 3, 3, ChannelDepth::Bits8);
    voxels.set(1, 1, 1, STONE);
    voxels.set(0, 1, 1, STONE);

    // at lod 0 nothing is stitched: the -X face culls against the padding
    // voxel, leaving 5 quads
    let output = build(&mesher, &voxels, 0);
    assert_eq!(output.surfaces[0].arrays.positions.len(), 20);

    // at lod 1 the stitcher adds the buried -X side back, scaled like the
    // rest of the mesh
    let output = build(&mesher, &voxels, 1);
    let arrays = &output.surfaces[0].arrays;
    assert_eq!(arrays.positions.len(), 24);
    assert_eq!(arrays.indices.len(), 36);

    // the 5 main quads come first; the seam quad is last
    let seam = &arrays.positions[20..24];
    let neg_x = Vec3::new(-1.0, 0.0, 0.0);
    for (p, n) in seam.iter().zip(&arrays.normals[20..24]) {
        assert_eq!(p.x, 0.0);
        assert!((0.0..=2.0).contains(&p.y));
        assert!((0.0..=2.0).contains(&p.z));
        assert_eq!(*n, neg_x);
    }

    // every position is scaled by 2^lod
    let unscaled = build(&mesher, &voxels, 0);
    for (scaled, plain) in arrays.positions[..20]
        .iter()
        .zip(&unscaled.surfaces[0].arrays.positions)
    {
        assert_eq!(*scaled, *plain * 2.0);
    }
}

#[test]
fn no_seam_without_an_inner_voxel_to_stitch_to() {
    let mesher = make_mesher();
    // matter only in the padding: the stitcher finds air inward and adds
    // nothing; the main loop has nothing to mesh either
    let mut voxels = VoxelBuffer::new(3, 3, 3, ChannelDepth::Bits8);
    voxels.set(0, 1, 1, STONE);

    let output = build(&mesher, &voxels, 1);
    assert!(output.surfaces.is_empty());
}

#[test]
fn no_seam_when_the_outer_voxel_is_buried_in_plane() {
    let mesher = make_mesher();
    let mut voxels = VoxelBuffer::new(3, 3, 3, ChannelDepth::Bits8);
    voxels.set(1, 1, 1, STONE);
    // fill the whole -X padding plane: the boundary voxel is not exposed to
    // air in its plane, so nothing is stitched
    for y in 0..3 {
        for z in 0..3 {
            voxels.set(0, y, z, STONE);
        }
    }

    let output = build(&mesher, &voxels, 1);
    assert_eq!(output.surfaces[0].arrays.positions.len(), 20);
}

#[test]
fn seams_are_stitched_on_all_exposed_faces() {
    let mesher = make_mesher();
    // boundary matter on two different chunk faces
    let mut voxels = VoxelBuffer::new(3, 3, 3, ChannelDepth::Bits8);
    voxels.set(1, 1, 1, STONE);
    voxels.set(0, 1, 1, STONE); // -X neighbor chunk
    voxels.set(1, 2, 1, STONE); // +Y neighbor chunk

    let output = build(&mesher, &voxels, 1);
    // 4 visible faces from the main loop plus 2 stitched quads
    assert_eq!(output.surfaces[0].arrays.positions.len(), 24);
}
