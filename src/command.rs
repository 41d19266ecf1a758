//! 渲染命令定义
//!
//! 各路输入统一提交渲染命令到调度器的两级队列，由渲染器在
//! 到帧时按既定顺序执行，避免调用方直接改写图层表面。

use crate::rendering::LayerKind;
use crate::types::{Color, Stroke};

/// 渲染命令
#[derive(Debug, Clone)]
pub enum RenderCommand {
    /// 绘制单个已封闭的笔画
    DrawStroke { stroke: Stroke, layer: LayerKind },
    /// 批量绘制笔画（重放场景）
    DrawStrokes {
        strokes: Vec<Stroke>,
        layer: LayerKind,
    },
    /// 绘制进行中笔画的预览
    PreviewStroke { stroke: Stroke },
    /// 清空预览表面
    ClearPreview,
    /// 用纯色填充背景层
    FillBackground { color: Color },
    /// 清空指定图层
    ClearLayer { layer: LayerKind },
    /// 清空所有图层
    ClearAll,
    /// 重建表面到新尺寸
    Resize { width: u32, height: u32 },
}
