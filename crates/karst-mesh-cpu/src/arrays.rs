use karst_geom::{Color, Vec2, Vec3};

/// Per-material scratch mesh arrays. One instance per material per worker
/// thread, reused across builds: `clear` keeps the allocations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arrays {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub colors: Vec<Color>,
    pub indices: Vec<i32>,
    /// Four floats per vertex; empty when no emitted surface carried tangents.
    pub tangents: Vec<f32>,
}

impl Arrays {
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.colors.clear();
        self.indices.clear();
        self.tangents.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Positions and indices of every surface flagged for collision, merged into
/// one mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionSurface {
    pub positions: Vec<Vec3>,
    pub indices: Vec<i32>,
}

impl CollisionSurface {
    pub fn clear(&mut self) {
        self.positions.clear();
        self.indices.clear();
    }
}
