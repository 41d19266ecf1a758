//! 脏区域追踪模块
//!
//! 记录每次绘制操作触及的包围矩形（按半笔宽外扩），保存在容量有限的
//! 环形缓冲中（超出容量时淘汰最旧条目），为将来的局部重绘保留信息。
//! 同时提供合并后的脏矩形用于剪裁渲染。

use std::collections::VecDeque;

use crate::types::Rect;

/// 环形缓冲默认容量
pub const DIRTY_RING_CAPACITY: usize = 64;

/// 脏区域类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyKind {
    /// 全表面重绘
    Full,
    /// 局部重绘
    Partial,
    /// 无需重绘
    None,
}

/// 脏区域追踪器
#[derive(Debug)]
pub struct DirtyRegionTracker {
    /// 脏区域环形缓冲（最旧在队首）
    regions: VecDeque<Rect>,
    /// 容量上限
    capacity: usize,
    /// 是否需要全表面重绘
    full_redraw: bool,
    /// 表面尺寸（用于全表面重绘时返回）
    surface_size: (f32, f32),
}

impl DirtyRegionTracker {
    /// 创建新的追踪器
    pub fn new(surface_width: f32, surface_height: f32) -> Self {
        Self::with_capacity(surface_width, surface_height, DIRTY_RING_CAPACITY)
    }

    /// 创建指定容量的追踪器
    pub fn with_capacity(surface_width: f32, surface_height: f32, capacity: usize) -> Self {
        Self {
            regions: VecDeque::with_capacity(capacity),
            capacity,
            full_redraw: false,
            surface_size: (surface_width, surface_height),
        }
    }

    /// 更新表面尺寸
    pub fn set_surface_size(&mut self, width: f32, height: f32) {
        self.surface_size = (width, height);
    }

    /// 标记区域为脏
    ///
    /// 与已有区域重叠时就地合并；否则入队，超出容量时淘汰最旧条目。
    pub fn mark_dirty(&mut self, rect: Rect) {
        if self.full_redraw {
            return;
        }

        for existing in &mut self.regions {
            if existing.overlaps(&rect) {
                *existing = existing.union(&rect);
                return;
            }
        }

        if self.regions.len() == self.capacity {
            self.regions.pop_front();
        }
        self.regions.push_back(rect);
    }

    /// 标记需要全表面重绘
    pub fn mark_full_redraw(&mut self) {
        self.full_redraw = true;
        self.regions.clear();
    }

    /// 是否需要全表面重绘
    pub fn needs_full_redraw(&self) -> bool {
        self.full_redraw
    }

    /// 获取合并后的脏矩形
    ///
    /// 无脏区域时返回 None；全表面重绘时返回整个表面区域。
    pub fn combined(&self) -> Option<Rect> {
        if self.full_redraw {
            return Some(Rect::new(0.0, 0.0, self.surface_size.0, self.surface_size.1));
        }

        let mut iter = self.regions.iter();
        let mut combined = *iter.next()?;
        for rect in iter {
            combined = combined.union(rect);
        }
        Some(combined)
    }

    /// 当前记录的脏区域数
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// 是否没有任何记录
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty() && !self.full_redraw
    }

    /// 是否有脏区域
    pub fn is_dirty(&self) -> bool {
        self.full_redraw || !self.regions.is_empty()
    }

    /// 脏区域类型
    pub fn dirty_kind(&self) -> DirtyKind {
        if self.full_redraw {
            DirtyKind::Full
        } else if !self.regions.is_empty() {
            DirtyKind::Partial
        } else {
            DirtyKind::None
        }
    }

    /// 裁剪矩形到表面范围内
    pub fn clip_to_surface(&self, rect: Rect) -> Rect {
        rect.clip_to(self.surface_size.0, self.surface_size.1)
    }

    /// 清空追踪状态
    pub fn clear(&mut self) {
        self.regions.clear();
        self.full_redraw = false;
    }

    /// 遍历当前记录的脏区域（从旧到新）
    pub fn regions(&self) -> impl Iterator<Item = &Rect> {
        self.regions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_dirty() {
        let mut tracker = DirtyRegionTracker::new(1920.0, 1080.0);

        tracker.mark_dirty(Rect::new(10.0, 10.0, 100.0, 100.0));
        assert!(tracker.is_dirty());
        assert_eq!(tracker.dirty_kind(), DirtyKind::Partial);
    }

    #[test]
    fn test_overlapping_regions_merge() {
        let mut tracker = DirtyRegionTracker::new(1920.0, 1080.0);

        tracker.mark_dirty(Rect::new(10.0, 10.0, 100.0, 100.0));
        tracker.mark_dirty(Rect::new(50.0, 50.0, 100.0, 100.0));

        assert_eq!(tracker.len(), 1);
        let combined = tracker.combined().unwrap();
        assert_eq!(combined.width, 140.0);
        assert_eq!(combined.height, 140.0);
    }

    #[test]
    fn test_ring_evicts_oldest() {
        let mut tracker = DirtyRegionTracker::with_capacity(1920.0, 1080.0, 4);

        // 互不重叠的区域填满缓冲再继续写入
        for i in 0..8 {
            let x = i as f32 * 50.0;
            tracker.mark_dirty(Rect::new(x, 0.0, 10.0, 10.0));
        }

        assert_eq!(tracker.len(), 4);
        // 最旧的条目已被淘汰
        let leftmost = tracker.regions().map(|r| r.x).fold(f32::MAX, f32::min);
        assert_eq!(leftmost, 200.0);
    }

    #[test]
    fn test_mark_full_redraw() {
        let mut tracker = DirtyRegionTracker::new(1920.0, 1080.0);

        tracker.mark_dirty(Rect::new(10.0, 10.0, 100.0, 100.0));
        tracker.mark_full_redraw();
        assert!(tracker.needs_full_redraw());
        assert_eq!(tracker.dirty_kind(), DirtyKind::Full);
        assert_eq!(tracker.len(), 0);

        let combined = tracker.combined().unwrap();
        assert_eq!(combined.width, 1920.0);
        assert_eq!(combined.height, 1080.0);

        // 全表面重绘后局部标记被忽略
        tracker.mark_dirty(Rect::new(0.0, 0.0, 5.0, 5.0));
        assert_eq!(tracker.len(), 0);
    }

    #[test]
    fn test_clear() {
        let mut tracker = DirtyRegionTracker::new(1920.0, 1080.0);

        tracker.mark_full_redraw();
        tracker.clear();

        assert!(!tracker.is_dirty());
        assert_eq!(tracker.dirty_kind(), DirtyKind::None);
        assert!(tracker.combined().is_none());
    }

    #[test]
    fn test_clip_to_surface() {
        let tracker = DirtyRegionTracker::new(100.0, 100.0);
        let clipped = tracker.clip_to_surface(Rect::new(90.0, 90.0, 50.0, 50.0));
        assert_eq!(clipped.width, 10.0);
        assert_eq!(clipped.height, 10.0);
    }
}
