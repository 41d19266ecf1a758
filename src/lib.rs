// 模块声明
pub mod command;
pub mod config;
pub mod device;
pub mod drawing;
pub mod error;
pub mod renderer;
pub mod rendering;
pub mod types;
pub mod utils;

// 重新导出主要类型
pub use command::RenderCommand;
pub use config::{ConfigManager, Settings};
pub use device::{DeviceSignals, RenderingOptions, Tier, classify};
pub use drawing::{CanvasState, GesturePhase, InputFilter, PathCache, RawPointerSample};
pub use error::{CanvasError, CanvasResult};
pub use renderer::{CanvasRenderer, ImageFormat};
pub use rendering::{DirtyRegionTracker, LayerKind, RenderScheduler, RenderStats};
pub use types::{BrushKind, BrushSettings, Color, Point, Rect, Stroke};
