//! 画布核心类型定义
//!
//! 包含点、矩形、颜色、画笔设置和笔画等核心数据类型。

use serde::{Deserialize, Serialize};

/// 表面像素空间中的点
///
/// 纯值类型，无标识。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// 创建新的点
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 计算到另一个点的欧氏距离
    pub fn distance_to(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// 计算与另一个点的中点
    pub fn midpoint(&self, other: &Point) -> Point {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

/// 矩形区域
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// 创建新的矩形
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 从左上角和右下角坐标创建矩形
    pub fn from_bounds(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }

    /// 检查矩形是否为空（宽或高不为正）
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// 检查两个矩形是否重叠
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_right = self.x + self.width;
        let a_bottom = self.y + self.height;
        let b_right = other.x + other.width;
        let b_bottom = other.y + other.height;

        self.x < b_right && a_right > other.x && self.y < b_bottom && a_bottom > other.y
    }

    /// 合并两个矩形
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);

        Rect {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }

    /// 扩展矩形（用于添加边距）
    pub fn expand(&self, margin: f32) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }

    /// 裁剪矩形到表面范围内
    pub fn clip_to(&self, surface_width: f32, surface_height: f32) -> Rect {
        let left = self.x.max(0.0);
        let top = self.y.max(0.0);
        let right = (self.x + self.width).min(surface_width);
        let bottom = (self.y + self.height).min(surface_height);

        Rect {
            x: left,
            y: top,
            width: (right - left).max(0.0),
            height: (bottom - top).max(0.0),
        }
    }
}

/// RGBA 颜色（每通道 0-255）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };
    pub const BLACK: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };

    /// 创建不透明颜色
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// 创建带透明度的颜色
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// 解析 `#RRGGBB` 或 `#RRGGBBAA` 形式的颜色字符串
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::rgb(r, g, b))
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
                Some(Self::rgba(r, g, b, a))
            }
            _ => None,
        }
    }

    /// 按不透明度系数缩放 alpha 通道
    ///
    /// `opacity` 取值范围 [0.0, 1.0]，超出范围会被钳制。
    pub fn with_opacity(self, opacity: f32) -> Color {
        let opacity = opacity.clamp(0.0, 1.0);
        Color {
            a: (self.a as f32 * opacity).round() as u8,
            ..self
        }
    }

    /// 转换为 tiny-skia 颜色
    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// 画笔类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrushKind {
    /// 普通画笔
    Pen,
    /// 马克笔
    Marker,
    /// 橡皮擦
    Eraser,
}

/// 画笔设置
///
/// 可变配置，仅作用于新建的笔画；修改画笔设置不会影响已封闭的笔画。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrushSettings {
    /// 画笔粗细（表面像素）
    pub size: f32,
    /// 画笔颜色
    pub color: Color,
    /// 不透明度 [0.0, 1.0]
    pub opacity: f32,
    /// 画笔类型
    pub kind: BrushKind,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            size: 4.0,
            color: Color::BLACK,
            opacity: 1.0,
            kind: BrushKind::Pen,
        }
    }
}

/// 笔画
///
/// 由一次连续的绘制手势产生的有序点序列。手势结束时封闭，
/// 封闭后不可变；路径缓存和图层只引用笔画，不拥有它。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// 会话内唯一标识
    pub id: u64,
    /// 有序点序列（表面像素空间）
    pub points: Vec<Point>,
    /// 笔画颜色（不透明度已折算进 alpha 通道）
    pub color: Color,
    /// 笔画宽度
    pub width: f32,
    /// 画笔类型
    pub kind: BrushKind,
    /// 创建时间（毫秒时间戳）
    pub created_at: u64,
}

impl Stroke {
    /// 计算笔画点序列的轴对齐包围矩形
    ///
    /// 空笔画返回 None。
    pub fn bounding_rect(&self) -> Option<Rect> {
        let first = self.points.first()?;
        let mut left = first.x;
        let mut top = first.y;
        let mut right = first.x;
        let mut bottom = first.y;

        for p in &self.points[1..] {
            left = left.min(p.x);
            top = top.min(p.y);
            right = right.max(p.x);
            bottom = bottom.max(p.y);
        }

        Some(Rect::from_bounds(left, top, right, bottom))
    }

    /// 计算按半笔宽外扩后的包围矩形（脏区域）
    pub fn padded_bounds(&self) -> Option<Rect> {
        self.bounding_rect().map(|r| r.expand(self.width / 2.0))
    }
}
