//! 工具模块

mod profiler;

pub use profiler::Profiler;
