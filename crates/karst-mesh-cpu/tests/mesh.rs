use std::sync::Arc;

use karst_blocks::{bake_library_from_toml, Library, Side, SideSurface, SideSurfaces};
use karst_chunk::{ChannelDepth, VoxelBuffer};
use karst_geom::{Vec2, Vec3};
use karst_mesh_cpu::{Arrays, BlockyMesher, MesherInput, MesherOutput, PrimitiveType};

const CATALOG: &str = r#"
materials = ["terrain", "glass"]

[[blocks]]
name = "stone"
material = "terrain"

[[blocks]]
name = "glass"
material = "glass"
transparency_index = 1
contributes_to_ao = false
"#;

const STONE: u32 = 1;
const GLASS: u32 = 2;

fn make_mesher(occlusion: bool) -> BlockyMesher {
    let baked = bake_library_from_toml(CATALOG).unwrap();
    let mut mesher = BlockyMesher::with_library(Arc::new(Library::new(baked)));
    mesher.set_occlusion_enabled(occlusion);
    mesher.set_occlusion_darkness(1.0);
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

fn total_vertices(output: &MesherOutput) -> usize {
    output
        .surfaces
        .iter()
        .map(|s| s.arrays.positions.len())
        .sum()
}

fn total_indices(output: &MesherOutput) -> usize {
    output.surfaces.iter().map(|s| s.arrays.indices.len()).sum()
}

fn assert_front_facing(arrays: &Arrays) {
    for tri in arrays.indices.chunks(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let geometric = (arrays.positions[b] - arrays.positions[a])
            .cross(arrays.positions[c] - arrays.positions[a]);
        assert!(
            geometric.dot(arrays.normals[a]) > 0.0,
            "triangle {tri:?} winds away from its stored normal"
        );
    }
}

#[test]
fn single_cube_emits_six_quads() {
    let mesher = make_mesher(false);
    let mut voxels = VoxelBuffer::new(3, 3, 3, ChannelDepth::Bits8);
    voxels.set(1, 1, 1, STONE);

    let output = build(&mesher, &voxels, 0);
    assert_eq!(output.primitive_type, PrimitiveType::Triangles);
    assert_eq!(output.surfaces.len(), 1);
    assert_eq!(output.surfaces[0].material_index, 0);

    let arrays = &output.surfaces[0].arrays;
    assert_eq!(arrays.positions.len(), 24);
    assert_eq!(arrays.indices.len(), 36);
    assert_eq!(arrays.normals.len(), 24);
    assert_eq!(arrays.uvs.len(), 24);
    assert_eq!(arrays.colors.len(), 24);
    assert_eq!(arrays.tangents.len(), 24 * 4);

    // four vertices per cardinal direction
    for side in Side::ALL {
        let n = side.normal();
        let count = arrays.normals.iter().filter(|&&v| v == n).count();
        assert_eq!(count, 4, "{side:?}");
    }

    // the cube occupies [0,1]^3 once the padding is subtracted
    for p in &arrays.positions {
        assert!((0.0..=1.0).contains(&p.x));
        assert!((0.0..=1.0).contains(&p.y));
        assert!((0.0..=1.0).contains(&p.z));
    }

    assert_front_facing(arrays);
}

#[test]
fn adjacent_cubes_cull_the_shared_face() {
    let mesher = make_mesher(false);
    let mut voxels = VoxelBuffer::new(4, 3, 3, ChannelDepth::Bits8);
    voxels.set(1, 1, 1, STONE);
    voxels.set(2, 1, 1, STONE);

    let output = build(&mesher, &voxels, 0);
    // 10 quads: 12 sides minus the two shared ones
    assert_eq!(total_vertices(&output), 40);
    assert_eq!(total_indices(&output), 60);
}

#[test]
fn sixteen_bit_channel_matches_eight_bit() {
    let mesher = make_mesher(true);
    let mut bytes = VoxelBuffer::new(4, 3, 3, ChannelDepth::Bits8);
    bytes.set(1, 1, 1, STONE);
    bytes.set(2, 1, 1, GLASS);

    let mut words = VoxelBuffer::new(4, 3, 3, ChannelDepth::Bits16);
    words.set(1, 1, 1, STONE);
    words.set(2, 1, 1, GLASS);

    assert_eq!(build(&mesher, &bytes, 0), build(&mesher, &words, 0));
}

#[test]
fn occlusion_darkens_the_corner_next_to_a_block() {
    // stone at (1,1,1) and (2,1,1), plus (1,2,1) resting on the first one
    let mesher = make_mesher(true);
    let mut voxels = VoxelBuffer::new(4, 4, 3, ChannelDepth::Bits8);
    voxels.set(1, 1, 1, STONE);
    voxels.set(2, 1, 1, STONE);
    voxels.set(1, 2, 1, STONE);

    let output = build(&mesher, &voxels, 0);
    // 18 faces minus 2x2 culled between the touching pairs
    assert_eq!(total_vertices(&output), 56);

    let arrays = &output.surfaces[0].arrays;
    let up = Vec3::new(0.0, 1.0, 0.0);
    let top_vertices: Vec<(Vec3, f32)> = arrays
        .positions
        .iter()
        .zip(&arrays.normals)
        .zip(&arrays.colors)
        .filter(|((_, n), _)| **n == up)
        .map(|((p, _), c)| (*p, c.r))
        .collect();
    // the face of (1,1,1) under (1,2,1) is culled: only two up-facing quads
    assert_eq!(top_vertices.len(), 8);

    // on the top of (2,1,1) at y=1, the corners against the (1,2,1) column
    // are darker than the free corners
    for (p, r) in &top_vertices {
        if p.y != 1.0 {
            continue;
        }
        if p.x == 1.0 {
            assert!((r - 2.0 / 3.0).abs() < 1e-6, "shaded corner at {p:?}: {r}");
        } else {
            assert_eq!(p.x, 2.0);
            assert_eq!(*r, 1.0, "free corner at {p:?}");
        }
    }
}

#[test]
fn occlusion_off_keeps_colors_flat() {
    let mesher = make_mesher(false);
    let mut voxels = VoxelBuffer::new(4, 4, 3, ChannelDepth::Bits8);
    voxels.set(1, 1, 1, STONE);
    voxels.set(2, 1, 1, STONE);
    voxels.set(1, 2, 1, STONE);

    let output = build(&mesher, &voxels, 0);
    for surface in &output.surfaces {
        for c in &surface.arrays.colors {
            assert_eq!((c.r, c.g, c.b, c.a), (1.0, 1.0, 1.0, 1.0));
        }
    }
}

#[test]
fn transparent_neighbor_keeps_the_solid_face() {
    let mesher = make_mesher(false);
    let mut voxels = VoxelBuffer::new(4, 3, 3, ChannelDepth::Bits8);
    voxels.set(1, 1, 1, STONE);
    voxels.set(2, 1, 1, GLASS);

    let output = build(&mesher, &voxels, 0);
    assert_eq!(output.surfaces.len(), 2);
    // material order is ascending and empty materials are omitted
    assert_eq!(output.surfaces[0].material_index, 0);
    assert_eq!(output.surfaces[1].material_index, 1);
    // stone keeps all 6 faces (its +X face shows through the glass), glass
    // loses the face buried against the stone
    assert_eq!(output.surfaces[0].arrays.positions.len(), 24);
    assert_eq!(output.surfaces[1].arrays.positions.len(), 20);
}

#[test]
fn collision_mirrors_surfaces_that_enable_it() {
    let mesher = make_mesher(false);
    let mut voxels = VoxelBuffer::new(3, 3, 3, ChannelDepth::Bits8);
    voxels.set(1, 1, 1, STONE);

    let output = mesher
        .build(MesherInput {
            voxels: &voxels,
            lod_index: 0,
            collision_hint: true,
        })
        .unwrap();
    let collision = output.collision_surface.as_ref().unwrap();
    assert_eq!(collision.positions.len(), 24);
    assert_eq!(collision.indices.len(), 36);
    assert_eq!(collision.positions, output.surfaces[0].arrays.positions);

    // not requested: not collected
    let output = build(&mesher, &voxels, 0);
    assert!(output.collision_surface.is_none());
}

#[test]
fn missing_library_returns_empty_output() {
    let mesher = BlockyMesher::new();
    let mut voxels = VoxelBuffer::new(3, 3, 3, ChannelDepth::Bits8);
    voxels.set(1, 1, 1, STONE);
    let output = build(&mesher, &voxels, 0);
    assert!(output.surfaces.is_empty());
}

#[test]
fn cutouts_trim_partially_covered_sides() {
    // Hand-build a third side pattern: the neighbor's -X side only covers
    // part of the face, and the first block carries a pre-cut triangle for
    // exactly that case.
    const PARTIAL: u32 = 2;
    let catalog = r#"
        materials = ["terrain"]
        [[blocks]]
        name = "stone"
        material = "terrain"
        [[blocks]]
        name = "carved"
        material = "terrain"
    "#;
    let mut baked = bake_library_from_toml(catalog).unwrap();
    baked.side_pattern_count = 3;
    baked.side_pattern_culling = vec![false; 9];
    for a in 0..3u32 {
        baked.side_pattern_culling[(a * 3 + 1) as usize] = true; // FULL covers all
    }
    baked.models[2].side_pattern_indices[Side::NegX.index()] = PARTIAL;

    let mut cut: SideSurfaces = Default::default();
    cut[0] = SideSurface {
        positions: vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
        ],
        uvs: vec![Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0)],
        indices: vec![0, 1, 2],
        tangents: Vec::new(),
    };
    baked.models[1].cutout_side_surfaces[Side::PosX.index()].insert(PARTIAL, cut);
    baked.models[1].cutout_sides_enabled = true;

    let without_cutouts = {
        let mut plain = baked.clone();
        plain.models[1].cutout_sides_enabled = false;
        plain
    };

    let mut voxels = VoxelBuffer::new(4, 3, 3, ChannelDepth::Bits8);
    voxels.set(1, 1, 1, 1);
    voxels.set(2, 1, 1, 2);

    let mesher = BlockyMesher::with_library(Arc::new(Library::new(baked)));
    let cut_output = build(&mesher, &voxels, 0);
    let mesher = BlockyMesher::with_library(Arc::new(Library::new(without_cutouts)));
    let full_output = build(&mesher, &voxels, 0);

    // cutouts only trim
    assert!(total_vertices(&cut_output) < total_vertices(&full_output));
    // stone: 5 full quads + the 3-vertex cutout; carved: 5 quads (its -X face
    // is buried against the stone)
    assert_eq!(total_vertices(&cut_output), 43);
    assert_eq!(total_vertices(&full_output), 44);
}
