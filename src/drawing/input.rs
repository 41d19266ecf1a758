//! 输入过滤模块
//!
//! 将设备坐标系下的原始指针采样转换到表面像素空间，并在手势进行中
//! 按与画笔粗细成正比的距离阈值过滤过密的采样点，
//! 避免高采样率设备产生点洪泛，同时不影响笔画的可见形状。

use crate::types::{Point, Rect};

/// 原始指针采样（设备/客户端坐标）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPointerSample {
    pub client_x: f32,
    pub client_y: f32,
    /// 采样时间戳（毫秒）
    pub timestamp: f64,
}

impl RawPointerSample {
    pub fn new(client_x: f32, client_y: f32, timestamp: f64) -> Self {
        Self {
            client_x,
            client_y,
            timestamp,
        }
    }
}

/// 距离阈值与画笔粗细的比例（经验值：半笔宽）
const MIN_DISTANCE_FACTOR: f32 = 0.5;

/// 输入过滤器
#[derive(Debug)]
pub struct InputFilter {
    /// 表面在客户端坐标系中的包围矩形
    bounds: Rect,
    /// 设备像素比
    pixel_ratio: f32,
    /// 手势进行中最近一次被接受的点
    last_accepted: Option<Point>,
    /// 当前手势的最小采样间距
    min_distance: f32,
    /// 手势是否进行中
    active: bool,
}

impl InputFilter {
    /// 创建输入过滤器
    pub fn new(bounds: Rect, pixel_ratio: f32) -> Self {
        Self {
            bounds,
            pixel_ratio,
            last_accepted: None,
            min_distance: 0.0,
            active: false,
        }
    }

    /// 更新表面包围矩形与像素比（布局变化或缩放时调用）
    pub fn set_bounds(&mut self, bounds: Rect, pixel_ratio: f32) {
        self.bounds = bounds;
        self.pixel_ratio = pixel_ratio;
    }

    /// 开始手势
    ///
    /// 距离阈值取半笔宽。
    pub fn begin_gesture(&mut self, brush_size: f32) {
        self.active = true;
        self.last_accepted = None;
        self.min_distance = brush_size * MIN_DISTANCE_FACTOR;
    }

    /// 结束手势
    pub fn end_gesture(&mut self) {
        self.active = false;
        self.last_accepted = None;
    }

    /// 手势是否进行中
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// 将客户端坐标映射到表面像素空间
    pub fn map(&self, sample: &RawPointerSample) -> Point {
        Point {
            x: (sample.client_x - self.bounds.x) * self.pixel_ratio,
            y: (sample.client_y - self.bounds.y) * self.pixel_ratio,
        }
    }

    /// 过滤一个采样点
    ///
    /// 手势进行中时，与上一个被接受的点距离小于阈值的候选点被拒绝
    /// （返回 None，不会转发给笔画历史或调度器）。手势外的采样只做坐标映射。
    pub fn accept(&mut self, sample: &RawPointerSample) -> Option<Point> {
        let point = self.map(sample);

        if !self.active {
            return Some(point);
        }

        if let Some(last) = &self.last_accepted {
            if point.distance_to(last) < self.min_distance {
                return None;
            }
        }

        self.last_accepted = Some(point);
        Some(point)
    }
}
