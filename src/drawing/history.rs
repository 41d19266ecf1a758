//! 笔画历史模块
//!
//! 维护会话内的笔画日志和撤销栈，以及进行中手势的状态机。
//! 不变量：`strokes` 与撤销栈自底向上展开后的内容拼接，
//! 始终能重建本会话产生的全部绘制历史。

use crate::types::{BrushSettings, Point, Stroke};

/// 手势状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    /// 无进行中手势
    Idle,
    /// 当前笔画正在累积点
    Drawing,
}

/// 撤销批次：一次撤销操作恢复的笔画组
///
/// 逐笔撤销产生单笔画批次；`clear` 将整个笔画列表作为一个批次压栈，
/// 因此一次撤销即可整体恢复清空前的画面。
pub type StrokeBatch = Vec<Stroke>;

/// 画布状态
///
/// 笔画在活动期间由本模块独占拥有；封闭后追加到笔画日志，
/// 渲染侧只持有引用或克隆。
#[derive(Debug, Clone)]
pub struct CanvasState {
    /// 已封闭的笔画（绘制顺序）
    strokes: Vec<Stroke>,
    /// 撤销栈（批次粒度）
    undo_stack: Vec<StrokeBatch>,
    /// 进行中的笔画
    current: Option<Stroke>,
    /// 当前画笔设置
    brush: BrushSettings,
    /// 下一个笔画 id
    next_id: u64,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasState {
    /// 创建空的画布状态
    pub fn new() -> Self {
        Self {
            strokes: Vec::new(),
            undo_stack: Vec::new(),
            current: None,
            brush: BrushSettings::default(),
            next_id: 1,
        }
    }

    /// 当前手势状态
    pub fn phase(&self) -> GesturePhase {
        if self.current.is_some() {
            GesturePhase::Drawing
        } else {
            GesturePhase::Idle
        }
    }

    /// 是否正在绘制（有进行中的笔画）
    pub fn is_drawing(&self) -> bool {
        self.current.is_some()
    }

    /// 开始新笔画（手势开始）
    ///
    /// 用当前画笔设置创建空点序列的笔画。已有进行中笔画时忽略并返回 false。
    pub fn begin_stroke(&mut self, created_at: u64) -> bool {
        if self.current.is_some() {
            return false;
        }

        let stroke = Stroke {
            id: self.next_id,
            points: Vec::new(),
            color: self.brush.color.with_opacity(self.brush.opacity),
            width: self.brush.size,
            kind: self.brush.kind,
            created_at,
        };
        self.next_id += 1;
        self.current = Some(stroke);
        true
    }

    /// 向进行中的笔画追加一个点（手势移动）
    pub fn push_point(&mut self, point: Point) -> bool {
        match &mut self.current {
            Some(stroke) => {
                stroke.points.push(point);
                true
            }
            None => false,
        }
    }

    /// 封闭进行中的笔画并追加到笔画日志（手势结束）
    ///
    /// 返回封闭后笔画的克隆，供渲染侧提交绘制。
    pub fn end_stroke(&mut self) -> Option<Stroke> {
        let stroke = self.current.take()?;
        self.strokes.push(stroke.clone());
        Some(stroke)
    }

    /// 丢弃进行中的笔画（手势取消）
    pub fn cancel_stroke(&mut self) -> bool {
        self.current.take().is_some()
    }

    /// 撤销最近一个封闭笔画
    ///
    /// 将其作为单笔画批次压入撤销栈。笔画日志为空或手势进行中时为空操作。
    pub fn undo(&mut self) -> bool {
        if self.is_drawing() {
            return false;
        }
        match self.strokes.pop() {
            Some(stroke) => {
                self.undo_stack.push(vec![stroke]);
                true
            }
            None => false,
        }
    }

    /// 重做最近撤销的批次
    ///
    /// 将批次内的笔画按原顺序追加回笔画日志。撤销栈为空或手势进行中时为空操作。
    pub fn redo(&mut self) -> bool {
        if self.is_drawing() {
            return false;
        }
        match self.undo_stack.pop() {
            Some(batch) => {
                self.strokes.extend(batch);
                true
            }
            None => false,
        }
    }

    /// 清空画布
    ///
    /// 将整个笔画列表作为单个批次压入撤销栈，一次撤销即可整体恢复。
    /// 画布已空时为空操作，不会压入空批次。
    pub fn clear(&mut self) -> bool {
        if self.is_drawing() || self.strokes.is_empty() {
            return false;
        }
        let batch = std::mem::take(&mut self.strokes);
        self.undo_stack.push(batch);
        true
    }

    /// 更新画笔设置
    ///
    /// 仅影响之后创建的笔画，与手势状态机无关。
    pub fn set_brush(&mut self, brush: BrushSettings) {
        self.brush = brush;
    }

    /// 当前画笔设置
    pub fn brush(&self) -> &BrushSettings {
        &self.brush
    }

    /// 已封闭的笔画
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// 进行中的笔画
    pub fn current_stroke(&self) -> Option<&Stroke> {
        self.current.as_ref()
    }

    /// 撤销栈深度（批次数）
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// 是否可以撤销
    pub fn can_undo(&self) -> bool {
        !self.strokes.is_empty() && !self.is_drawing()
    }

    /// 是否可以重做
    pub fn can_redo(&self) -> bool {
        !self.undo_stack.is_empty() && !self.is_drawing()
    }

    /// 撤销栈中的批次（自底向上）
    pub fn undo_batches(&self) -> &[StrokeBatch] {
        &self.undo_stack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw_stroke(state: &mut CanvasState, points: &[(f32, f32)]) -> Stroke {
        assert!(state.begin_stroke(0));
        for &(x, y) in points {
            assert!(state.push_point(Point::new(x, y)));
        }
        state.end_stroke().unwrap()
    }

    #[test]
    fn phase_follows_current_stroke() {
        let mut state = CanvasState::new();
        assert_eq!(state.phase(), GesturePhase::Idle);

        state.begin_stroke(0);
        assert_eq!(state.phase(), GesturePhase::Drawing);
        assert!(!state.begin_stroke(0));

        state.end_stroke();
        assert_eq!(state.phase(), GesturePhase::Idle);
    }

    #[test]
    fn cancel_discards_current() {
        let mut state = CanvasState::new();
        state.begin_stroke(0);
        state.push_point(Point::new(1.0, 1.0));
        assert!(state.cancel_stroke());
        assert!(state.strokes().is_empty());
        assert_eq!(state.phase(), GesturePhase::Idle);
        assert!(!state.cancel_stroke());
    }

    #[test]
    fn sealed_strokes_get_increasing_ids() {
        let mut state = CanvasState::new();
        let a = draw_stroke(&mut state, &[(0.0, 0.0)]);
        let b = draw_stroke(&mut state, &[(1.0, 1.0)]);
        assert!(b.id > a.id);
    }

    #[test]
    fn n_undos_leave_n_single_stroke_batches() {
        let mut state = CanvasState::new();
        for i in 0..5 {
            draw_stroke(&mut state, &[(i as f32, 0.0), (i as f32, 1.0)]);
        }

        for _ in 0..5 {
            assert!(state.undo());
        }

        assert!(state.strokes().is_empty());
        assert_eq!(state.undo_depth(), 5);
        assert!(state.undo_batches().iter().all(|b| b.len() == 1));
        // 再撤销是空操作
        assert!(!state.undo());
    }

    #[test]
    fn undo_then_redo_restores_order() {
        let mut state = CanvasState::new();
        draw_stroke(&mut state, &[(0.0, 0.0)]);
        draw_stroke(&mut state, &[(1.0, 0.0)]);
        let before = state.strokes().to_vec();
        let depth_before = state.undo_depth();

        assert!(state.undo());
        assert!(state.redo());

        assert_eq!(state.strokes(), &before[..]);
        assert_eq!(state.undo_depth(), depth_before);
        // 撤销栈已空时重做是空操作
        assert!(!state.redo());
    }

    #[test]
    fn clear_is_one_bulk_batch() {
        let mut state = CanvasState::new();
        for i in 0..3 {
            draw_stroke(&mut state, &[(i as f32, 0.0)]);
        }
        let before = state.strokes().to_vec();

        assert!(state.clear());
        assert!(state.strokes().is_empty());
        assert_eq!(state.undo_depth(), 1);

        // 一次撤销整体恢复
        assert!(state.undo());
        assert_eq!(state.strokes(), &before[..]);
    }

    #[test]
    fn clear_on_empty_is_noop() {
        let mut state = CanvasState::new();
        assert!(!state.clear());
        assert_eq!(state.undo_depth(), 0);
    }

    #[test]
    fn history_ops_are_noops_while_drawing() {
        let mut state = CanvasState::new();
        draw_stroke(&mut state, &[(0.0, 0.0)]);
        state.undo();

        state.begin_stroke(0);
        assert!(!state.undo());
        assert!(!state.redo());
        assert!(!state.clear());
        assert!(!state.can_undo());
        assert!(!state.can_redo());
    }

    #[test]
    fn brush_applies_to_new_strokes_only() {
        let mut state = CanvasState::new();
        let first = draw_stroke(&mut state, &[(0.0, 0.0)]);

        state.set_brush(BrushSettings {
            size: 8.0,
            color: crate::types::Color::rgb(255, 0, 0),
            opacity: 0.5,
            kind: crate::types::BrushKind::Marker,
        });

        let second = draw_stroke(&mut state, &[(1.0, 1.0)]);

        assert_eq!(state.strokes()[0], first);
        assert_eq!(second.width, 8.0);
        // 不透明度折算进 alpha
        assert_eq!(second.color.a, 128);
    }

    #[test]
    fn history_invariant_holds() {
        let mut state = CanvasState::new();
        for i in 0..4 {
            draw_stroke(&mut state, &[(i as f32, 0.0)]);
        }
        state.undo();
        state.undo();

        let mut reconstructed: Vec<Stroke> = state.strokes().to_vec();
        for batch in state.undo_batches() {
            reconstructed.extend(batch.iter().cloned());
        }
        let mut ids: Vec<u64> = reconstructed.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }
}
