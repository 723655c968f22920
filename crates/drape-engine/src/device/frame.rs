/// Surface frame acquired by `set_default_target` and finished by `present`.
///
/// Every pass of a render frame records into `encoder`. Holding the surface
/// texture blocks acquisition of the next one, so a frame never outlives a
/// single pass through the frame loop.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

impl std::fmt::Debug for GpuFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuFrame")
            .field("size", &self.surface_texture.texture.size())
            .finish_non_exhaustive()
    }
}
