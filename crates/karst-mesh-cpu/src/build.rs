use std::cell::RefCell;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use karst_blocks::Library;
use karst_chunk::{ChannelCompression, ChannelDepth, VoxelBuffer};

use crate::arrays::{Arrays, CollisionSurface};
use crate::constants::PADDING;
use crate::fluid::FluidScratch;
use crate::mesh::generate_blocky_mesh;
use crate::seams::append_seams;

/// One chunk to mesh.
pub struct MesherInput<'a> {
    pub voxels: &'a VoxelBuffer,
    pub lod_index: u8,
    pub collision_hint: bool,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum PrimitiveType {
    #[default]
    Triangles,
}

/// Mesh arrays for one material.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputSurface {
    pub material_index: u32,
    pub arrays: Arrays,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MesherOutput {
    /// Non-empty materials in material-index order.
    pub surfaces: Vec<OutputSurface>,
    pub collision_surface: Option<CollisionSurface>,
    pub primitive_type: PrimitiveType,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MeshError {
    /// The type channel uses an encoding the mesher cannot read. Decompress
    /// first.
    UnsupportedCompression,
    /// The type channel is neither 8 nor 16 bit.
    UnsupportedDepth,
    /// An axis is smaller than twice the padding.
    ChunkTooSmall { size: (usize, usize, usize) },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::UnsupportedCompression => {
                write!(f, "voxel channel compression is not supported by the mesher")
            }
            MeshError::UnsupportedDepth => {
                write!(f, "voxel channel depth is not supported by the mesher")
            }
            MeshError::ChunkTooSmall { size } => write!(
                f,
                "chunk of size {}x{}x{} is smaller than {} on some axis",
                size.0,
                size.1,
                size.2,
                2 * PADDING
            ),
        }
    }
}

impl Error for MeshError {}

/// Per-thread meshing scratch, living across builds on its worker thread.
/// Cleared at build start, never shrunk.
#[derive(Default)]
struct Cache {
    arrays_per_material: Vec<Arrays>,
    index_offsets: Vec<i32>,
    collision: CollisionSurface,
    fluid_scratch: FluidScratch,
}

thread_local! {
    static CACHE: RefCell<Cache> = RefCell::new(Cache::default());
}

/// Public build entrypoint. Converts a padded voxel buffer into per-material
/// triangle surfaces using the shared library's baked data.
pub struct BlockyMesher {
    library: Option<Arc<Library>>,
    occlusion_enabled: bool,
    occlusion_darkness: f32,
}

impl Default for BlockyMesher {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockyMesher {
    pub fn new() -> Self {
        BlockyMesher {
            library: None,
            occlusion_enabled: true,
            occlusion_darkness: 0.8,
        }
    }

    pub fn with_library(library: Arc<Library>) -> Self {
        let mut mesher = Self::new();
        mesher.set_library(Some(library));
        mesher
    }

    pub fn set_library(&mut self, library: Option<Arc<Library>>) {
        self.library = library;
    }

    pub fn library(&self) -> Option<&Arc<Library>> {
        self.library.as_ref()
    }

    pub fn set_occlusion_enabled(&mut self, enabled: bool) {
        self.occlusion_enabled = enabled;
    }

    pub fn occlusion_enabled(&self) -> bool {
        self.occlusion_enabled
    }

    pub fn set_occlusion_darkness(&mut self, darkness: f32) {
        self.occlusion_darkness = darkness.clamp(0.0, 1.0);
    }

    pub fn occlusion_darkness(&self) -> f32 {
        self.occlusion_darkness
    }

    /// Meshes one chunk. Missing library and uniform chunks return an empty
    /// output without error; unsupported encodings and undersized chunks are
    /// reported to the caller with the output left empty.
    pub fn build(&self, input: MesherInput<'_>) -> Result<MesherOutput, MeshError> {
        let mut output = MesherOutput::default();

        let library = match &self.library {
            // Probably still being configured; the mesh stays empty rather
            // than spamming errors in editors.
            None => return Ok(output),
            Some(library) => library,
        };

        match input.voxels.channel_compression() {
            ChannelCompression::None => {}
            ChannelCompression::Uniform => {
                // All voxels share one id: all air or all interior. Callers
                // wanting geometry for a uniform chunk decompress it first.
                return Ok(output);
            }
            ChannelCompression::Other => {
                log::error!("blocky mesher received unsupported voxel compression");
                return Err(MeshError::UnsupportedCompression);
            }
        }

        let size = input.voxels.size();
        let (sx, sy, sz) = size;
        if sx < 2 * PADDING || sy < 2 * PADDING || sz < 2 * PADDING {
            return Err(MeshError::ChunkTooSmall { size });
        }

        let baked_occlusion_darkness = if self.occlusion_enabled {
            self.occlusion_darkness / 3.0
        } else {
            0.0
        };

        let channel = input.voxels.channel_bytes();

        CACHE.with(|cache| {
            let mut cache = cache.borrow_mut();
            let cache = &mut *cache;

            let material_count;
            {
                // Only baked data is safe to read from meshing threads; hold
                // the shared lock for the whole build so editors stay out.
                let baked = library.baked();
                material_count = baked.indexed_materials_count as usize;

                if cache.arrays_per_material.len() < material_count {
                    cache
                        .arrays_per_material
                        .resize_with(material_count, Arrays::default);
                }
                for arrays in &mut cache.arrays_per_material {
                    arrays.clear();
                }
                cache.index_offsets.clear();
                cache.index_offsets.resize(material_count, 0);
                cache.collision.clear();

                let arrays = &mut cache.arrays_per_material[..material_count];
                let collision = input.collision_hint.then_some(&mut cache.collision);

                match input.voxels.channel_depth() {
                    ChannelDepth::Bits8 => {
                        generate_blocky_mesh::<u8>(
                            arrays,
                            &mut cache.index_offsets,
                            collision,
                            channel,
                            size,
                            &baked,
                            self.occlusion_enabled,
                            baked_occlusion_darkness,
                            &mut cache.fluid_scratch,
                        );
                        if input.lod_index > 0 {
                            append_seams::<u8>(channel, size, arrays, &baked);
                        }
                    }
                    ChannelDepth::Bits16 => {
                        generate_blocky_mesh::<u16>(
                            arrays,
                            &mut cache.index_offsets,
                            collision,
                            channel,
                            size,
                            &baked,
                            self.occlusion_enabled,
                            baked_occlusion_darkness,
                            &mut cache.fluid_scratch,
                        );
                        if input.lod_index > 0 {
                            append_seams::<u16>(channel, size, arrays, &baked);
                        }
                    }
                    ChannelDepth::Bits32 => {
                        log::error!("blocky mesher received unsupported voxel depth");
                        return Err(MeshError::UnsupportedDepth);
                    }
                }
            }

            if input.lod_index > 0 {
                // Might not look great, but at least it's something.
                let lod_scale = f32::from(1u16 << input.lod_index.min(15));
                for arrays in &mut cache.arrays_per_material[..material_count] {
                    for p in &mut arrays.positions {
                        *p = *p * lod_scale;
                    }
                }
                if input.collision_hint {
                    for p in &mut cache.collision.positions {
                        *p = *p * lod_scale;
                    }
                }
            }

            for (material_index, arrays) in cache.arrays_per_material[..material_count]
                .iter()
                .enumerate()
            {
                if arrays.is_empty() {
                    continue;
                }
                // Copy out; the scratch keeps its capacity for the next build.
                output.surfaces.push(OutputSurface {
                    material_index: material_index as u32,
                    arrays: arrays.clone(),
                });
            }
            if input.collision_hint {
                output.collision_surface = Some(cache.collision.clone());
            }
            output.primitive_type = PrimitiveType::Triangles;

            Ok(output)
        })
    }
}
