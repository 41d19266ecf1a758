//! 设备能力分级模块
//!
//! 根据运行环境信号（逻辑核心数、内存总量、移动端特征）将设备划分为
//! 低/中/高三档，并通过静态查找表映射到对应的渲染配置。
//! 分级函数是纯函数，给定输入时结果确定，且总是返回一个档位。

use serde::{Deserialize, Serialize};

/// 内存信号缺失时的默认值（GB）
const DEFAULT_MEMORY_GB: f64 = 4.0;

/// 设备性能档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Low,
    Medium,
    High,
}

/// 分级所需的环境信号
///
/// 所有字段均可手工构造，便于独立测试分级逻辑。
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSignals {
    /// 逻辑核心数
    pub logical_cores: usize,
    /// 内存总量（GB），测量不可用时为 None
    pub memory_gb: Option<f64>,
    /// 是否为移动端设备
    pub is_mobile: bool,
}

impl DeviceSignals {
    /// 从当前主机探测环境信号
    pub fn detect() -> Self {
        let sys = sysinfo::System::new_all();
        let logical_cores = sys.cpus().len().max(1);
        let total_bytes = sys.total_memory();
        let memory_gb =
            (total_bytes > 0).then(|| total_bytes as f64 / (1024.0 * 1024.0 * 1024.0));

        Self {
            logical_cores,
            memory_gb,
            is_mobile: cfg!(any(target_os = "android", target_os = "ios")),
        }
    }
}

/// 渲染配置
///
/// 通常由设备分级得出，也允许调用方直接覆盖。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderingOptions {
    /// 启用离屏预览表面
    pub enable_offscreen_rendering: bool,
    /// 启用抗锯齿平滑
    pub enable_smoothing: bool,
    /// 启用批处理队列
    pub enable_batching: bool,
    /// 批处理队列的容量上限（达到后强制出帧）
    pub max_batch_size: usize,
    /// 目标帧率
    pub frame_rate: u32,
}

impl RenderingOptions {
    /// 目标帧间隔（毫秒）
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.frame_rate as f64
    }
}

/// 档位到渲染配置的静态查找表
const HIGH_OPTIONS: RenderingOptions = RenderingOptions {
    enable_offscreen_rendering: true,
    enable_smoothing: true,
    enable_batching: true,
    max_batch_size: 50,
    frame_rate: 60,
};

const MEDIUM_OPTIONS: RenderingOptions = RenderingOptions {
    enable_offscreen_rendering: true,
    enable_smoothing: true,
    enable_batching: true,
    max_batch_size: 30,
    frame_rate: 30,
};

const LOW_OPTIONS: RenderingOptions = RenderingOptions {
    enable_offscreen_rendering: false,
    enable_smoothing: false,
    enable_batching: true,
    max_batch_size: 10,
    frame_rate: 15,
};

impl Tier {
    /// 查表获取该档位的渲染配置
    pub fn rendering_options(self) -> RenderingOptions {
        match self {
            Tier::High => HIGH_OPTIONS,
            Tier::Medium => MEDIUM_OPTIONS,
            Tier::Low => LOW_OPTIONS,
        }
    }
}

/// 根据环境信号分级
///
/// 移动端：核心数 >= 6 且内存 >= 4GB 时为 Medium，否则 Low；
/// 桌面端：核心数 >= 8 且内存 >= 8GB 时为 High，
/// 核心数 >= 4 且内存 >= 4GB 时为 Medium，否则 Low。
pub fn classify(signals: &DeviceSignals) -> Tier {
    let memory_gb = signals.memory_gb.unwrap_or(DEFAULT_MEMORY_GB);
    let cores = signals.logical_cores;

    if signals.is_mobile {
        if cores >= 6 && memory_gb >= 4.0 {
            Tier::Medium
        } else {
            Tier::Low
        }
    } else if cores >= 8 && memory_gb >= 8.0 {
        Tier::High
    } else if cores >= 4 && memory_gb >= 4.0 {
        Tier::Medium
    } else {
        Tier::Low
    }
}
