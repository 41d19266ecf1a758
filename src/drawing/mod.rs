//! 绘图模块
//!
//! 笔画历史（撤销/重做状态机）、输入过滤和路径缓存。

mod history;
mod input;
mod path_cache;

pub use history::{CanvasState, GesturePhase, StrokeBatch};
pub use input::{InputFilter, RawPointerSample};
pub use path_cache::{CacheStats, PathCache, PathKey};
