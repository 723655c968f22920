use anyhow::{bail, Result};
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::{ColorRgba, Rect};

/// One vertex of tile geometry, in scene units.
///
/// Color is linear premultiplied RGBA.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TileVertex {
    pub pos: [f32; 2],
    pub color: [f32; 4],
}

impl TileVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x4  // color
    ];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TileVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

struct GpuMesh {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
}

/// Indexed triangle list for one tile.
///
/// Producers fill the CPU side on their own thread; the render thread uploads
/// it once (`upload`) and frees the GPU side once (`release`).
pub struct TileMesh {
    vertices: Vec<TileVertex>,
    indices: Vec<u16>,
    gpu: Option<GpuMesh>,
}

impl TileMesh {
    pub fn new(vertices: Vec<TileVertex>, indices: Vec<u16>) -> Self {
        Self {
            vertices,
            indices,
            gpu: None,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// Appends an axis-aligned filled quad.
    pub fn push_quad(&mut self, rect: Rect, color: ColorRgba) {
        let base = self.vertices.len() as u16;
        let color = color.to_array();
        self.vertices.extend(rect.corners().map(|p| TileVertex {
            pos: p.to_array(),
            color,
        }));
        self.indices.extend([0, 1, 2, 0, 2, 3].map(|i| base + i));
    }

    pub fn quad(rect: Rect, color: ColorRgba) -> Self {
        let mut mesh = Self::empty();
        mesh.push_quad(rect, color);
        mesh
    }

    #[inline]
    pub fn vertices(&self) -> &[TileVertex] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    #[inline]
    pub fn is_uploaded(&self) -> bool {
        self.gpu.is_some()
    }

    pub(super) fn upload(&mut self, device: &wgpu::Device) -> Result<()> {
        if self.gpu.is_some() {
            bail!("tile mesh uploaded twice");
        }
        if self.indices.is_empty() {
            // Nothing to draw; keep the mesh un-uploaded.
            return Ok(());
        }

        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("drape tile vbo"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // Index buffers must be a multiple of 4 bytes.
        let mut indices = self.indices.clone();
        if indices.len() % 2 == 1 {
            indices.push(0);
        }
        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("drape tile ibo"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        self.gpu = Some(GpuMesh {
            vbo,
            ibo,
            index_count: self.indices.len() as u32,
        });
        Ok(())
    }

    pub(super) fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(gpu) = self.gpu.as_ref() else { return };
        pass.set_vertex_buffer(0, gpu.vbo.slice(..));
        pass.set_index_buffer(gpu.ibo.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..gpu.index_count, 0, 0..1);
    }

    pub(super) fn release(self) {
        if let Some(gpu) = self.gpu {
            gpu.vbo.destroy();
            gpu.ibo.destroy();
        }
    }
}

impl std::fmt::Debug for TileMesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileMesh")
            .field("vertices", &self.vertices.len())
            .field("indices", &self.indices.len())
            .field("uploaded", &self.is_uploaded())
            .finish()
    }
}
