//! 渲染模块
//!
//! 图层合成、帧率门控调度和脏区域追踪。

mod dirty_rect;
mod layers;
mod scheduler;

pub use dirty_rect::{DIRTY_RING_CAPACITY, DirtyKind, DirtyRegionTracker};
pub use layers::{Layer, LayerKind, LayerStack, StrokeStyle};
pub use scheduler::{RenderScheduler, RenderStats};
