//! 路径缓存模块
//!
//! 将笔画的点序列编译为可复用的 tiny-skia 路径对象，按
//! (笔画 id, 点数, 颜色, 宽度) 为键缓存。笔画封闭后不可变，
//! 因此缓存条目一旦建立即永久有效，不需要失效机制；
//! 缓存也不做淘汰，在渲染器生命周期内只增不减
//! （清空画布后旧条目只是不再被引用）。

use std::collections::HashMap;

use crate::types::{Point, Stroke};

/// 路径缓存键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathKey {
    id: u64,
    point_count: usize,
    color: [u8; 4],
    width_bits: u32,
}

impl PathKey {
    /// 从笔画构造缓存键
    pub fn for_stroke(stroke: &Stroke) -> Self {
        Self {
            id: stroke.id,
            point_count: stroke.points.len(),
            color: [
                stroke.color.r,
                stroke.color.g,
                stroke.color.b,
                stroke.color.a,
            ],
            width_bits: stroke.width.to_bits(),
        }
    }
}

/// 路径缓存
///
/// 少于 2 个点的笔画编译为空路径（缓存为 None），不产生可见笔迹。
pub struct PathCache {
    paths: HashMap<PathKey, Option<tiny_skia::Path>>,
    /// 缓存命中计数
    hit_count: u64,
    /// 缓存未命中计数
    miss_count: u64,
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PathCache {
    /// 创建空缓存
    pub fn new() -> Self {
        Self {
            paths: HashMap::new(),
            hit_count: 0,
            miss_count: 0,
        }
    }

    /// 编译笔画路径
    ///
    /// 命中时直接返回缓存条目；否则构建路径：移动到首点，
    /// 对每个内部点发出一段二次曲线（控制点为该点，终点为它与后继点的中点），
    /// 最后以直线段连到末点。构建结果写入缓存后返回。
    pub fn compile(&mut self, stroke: &Stroke) -> Option<&tiny_skia::Path> {
        let key = PathKey::for_stroke(stroke);

        if self.paths.contains_key(&key) {
            self.hit_count += 1;
        } else {
            self.miss_count += 1;
            let built = build_path(&stroke.points);
            self.paths.insert(key.clone(), built);
        }

        self.paths.get(&key).and_then(|p| p.as_ref())
    }

    /// 缓存条目数（含空路径条目）
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// 缓存是否为空
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// 获取缓存统计信息
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.paths.len(),
            hit_count: self.hit_count,
            miss_count: self.miss_count,
            hit_rate: if self.hit_count + self.miss_count > 0 {
                self.hit_count as f64 / (self.hit_count + self.miss_count) as f64
            } else {
                0.0
            },
        }
    }

    /// 重置统计计数器
    pub fn reset_stats(&mut self) {
        self.hit_count = 0;
        self.miss_count = 0;
    }
}

/// 构建中点平滑路径
///
/// 少于 2 个点时返回 None。
fn build_path(points: &[Point]) -> Option<tiny_skia::Path> {
    if points.len() < 2 {
        return None;
    }

    let mut builder = tiny_skia::PathBuilder::new();
    builder.move_to(points[0].x, points[0].y);

    for i in 1..points.len() - 1 {
        let mid = points[i].midpoint(&points[i + 1]);
        builder.quad_to(points[i].x, points[i].y, mid.x, mid.y);
    }

    let last = points[points.len() - 1];
    builder.line_to(last.x, last.y);

    builder.finish()
}

/// 缓存统计信息
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// 缓存条目数
    pub entry_count: usize,
    /// 命中次数
    pub hit_count: u64,
    /// 未命中次数
    pub miss_count: u64,
    /// 命中率 (0.0 - 1.0)
    pub hit_rate: f64,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PathCache: entries={}, hits={}, misses={}, rate={:.1}%",
            self.entry_count,
            self.hit_count,
            self.miss_count,
            self.hit_rate * 100.0
        )
    }
}
