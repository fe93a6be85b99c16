use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use karst_blocks::{bake_library_from_toml, Library};
use karst_chunk::{ChannelDepth, VoxelBuffer};
use karst_mesh_cpu::{BlockyMesher, MesherInput};

const CATALOG: &str = r#"
materials = ["terrain", "water"]

[[fluids]]
name = "water"
material = "water"
max_level = 8
dip_when_flowing_down = true

[[blocks]]
name = "stone"
material = "terrain"

[[blocks]]
name = "water_source"
fluid = "water"
"#;

const STONE: u32 = 1;
const WATER: u32 = 2;

/// Terrain-like fill: solid below a rolling height, one layer of water above
/// it in the valleys, air everywhere else.
fn terrain_buffer(size: usize) -> VoxelBuffer {
    let mut voxels = VoxelBuffer::new(size, size, size, ChannelDepth::Bits8);
    let mid = size as i32 / 2;
    for z in 0..size {
        for x in 0..size {
            let sway = (((x * 7 + z * 13) % 5) as i32) - 2;
            let height = (mid + sway).clamp(1, size as i32 - 1) as usize;
            for y in 0..height {
                voxels.set(x, y, z, STONE);
            }
            if height < mid as usize {
                for y in height..mid as usize {
                    voxels.set(x, y, z, WATER);
                }
            }
        }
    }
    voxels
}

fn bench_build(c: &mut Criterion) {
    let baked = bake_library_from_toml(CATALOG).unwrap();
    let mesher = BlockyMesher::with_library(Arc::new(Library::new(baked)));
    let voxels = terrain_buffer(34);

    let mut group = c.benchmark_group("build_chunk");
    group.bench_function("terrain_34", |b| {
        b.iter(|| {
            let output = mesher
                .build(MesherInput {
                    voxels: black_box(&voxels),
                    lod_index: 0,
                    collision_hint: true,
                })
                .unwrap();
            black_box(output)
        })
    });
    group.bench_function("terrain_34_lod1", |b| {
        b.iter(|| {
            let output = mesher
                .build(MesherInput {
                    voxels: black_box(&voxels),
                    lod_index: 1,
                    collision_hint: false,
                })
                .unwrap();
            black_box(output)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
