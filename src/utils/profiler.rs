//! 性能监控模块
//!
//! 提供简单的性能监控工具，用于测量代码段的执行时间。
//!
//! ## 使用示例
//! ```no_run
//! use sketch_canvas::utils::Profiler;
//!
//! let mut profiler = Profiler::new_enabled();
//!
//! profiler.time("composite", || {
//!     // 执行合成操作
//! });
//!
//! profiler.report();
//! ```

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// 性能监控器
pub struct Profiler {
    spans: HashMap<String, Vec<Duration>>,
    enabled: bool,
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Profiler {
    /// 创建新的性能监控器（仅在 debug 模式下默认启用）
    pub fn new() -> Self {
        Self {
            spans: HashMap::new(),
            enabled: cfg!(debug_assertions),
        }
    }

    /// 创建一个始终启用的性能监控器
    pub fn new_enabled() -> Self {
        Self {
            spans: HashMap::new(),
            enabled: true,
        }
    }

    /// 启用或禁用性能监控
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// 测量函数执行时间
    pub fn time<F, R>(&mut self, name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let duration = start.elapsed();

        self.spans
            .entry(name.to_string())
            .or_default()
            .push(duration);

        result
    }

    /// 某个计时区间的采样次数
    pub fn sample_count(&self, name: &str) -> usize {
        self.spans.get(name).map_or(0, Vec::len)
    }

    /// 输出各计时区间的聚合报告
    pub fn report(&self) {
        if !self.enabled || self.spans.is_empty() {
            return;
        }

        let mut names: Vec<&String> = self.spans.keys().collect();
        names.sort();

        for name in names {
            let samples = &self.spans[name];
            let total: Duration = samples.iter().sum();
            let avg = total / samples.len() as u32;
            log::info!(
                "profile {name}: samples={}, total={:.2}ms, avg={:.3}ms",
                samples.len(),
                total.as_secs_f64() * 1000.0,
                avg.as_secs_f64() * 1000.0,
            );
        }
    }

    /// 清空已采集的数据
    pub fn reset(&mut self) {
        self.spans.clear();
    }
}
