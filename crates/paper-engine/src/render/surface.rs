use crate::mesh::Mesh;

use super::Material;

/// Consumer of a finished frame.
///
/// The renderer calls `set_mesh` then `set_material` once per successful frame.
/// A frame that fails never reaches the surface, so implementations keep showing
/// the last mesh they were given.
pub trait DisplaySurface {
    fn set_mesh(&mut self, mesh: Mesh);
    fn set_material(&mut self, material: Material);
}

/// Surface that simply holds on to the last frame.
///
/// Useful headless, and as the handoff point for backends that draw later in the
/// frame.
#[derive(Debug, Default)]
pub struct RetainedSurface {
    mesh: Option<Mesh>,
    material: Option<Material>,
    frames: u64,
}

impl RetainedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    pub fn material(&self) -> Option<&Material> {
        self.material.as_ref()
    }

    /// Number of materials received, i.e. completed frames.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl DisplaySurface for RetainedSurface {
    fn set_mesh(&mut self, mesh: Mesh) {
        self.mesh = Some(mesh);
    }

    fn set_material(&mut self, material: Material) {
        self.material = Some(material);
        self.frames += 1;
    }
}
