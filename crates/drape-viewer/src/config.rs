use winit::dpi::LogicalSize;

use drape_engine::device::GpuInit;
use drape_engine::frontend::RendererConfig;

use crate::tiles::TileGrid;

/// Viewer configuration.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,

    /// Heading change per arrow key press, in radians.
    pub rotate_step: f32,

    pub grid: TileGrid,
    pub gpu: GpuInit,
    pub renderer: RendererConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "drape".to_string(),
            initial_size: LogicalSize::new(1024.0, 768.0),
            rotate_step: 5f32.to_radians(),
            grid: TileGrid::default(),
            gpu: GpuInit::default(),
            renderer: RendererConfig {
                messages_per_frame: 8,
                ..RendererConfig::default()
            },
        }
    }
}
