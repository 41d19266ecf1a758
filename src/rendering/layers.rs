//! 图层合成模块
//!
//! 渲染器实例在整个生命周期内持有固定的三个命名图层
//! （背景、绘制、界面，按 z 序排列），各自拥有一块独立的位图表面。
//! 绘制操作写入目标图层并置脏标记；合成时按 z 序把脏图层贴到可见表面，
//! 启用离屏渲染时，离屏预览表面最后无条件叠加在最上层。
//! 尺寸调整不保留任何像素：所有表面按新尺寸重建为空白，
//! 由调用方重新提交笔画以恢复内容。

use crate::error::{CanvasError, CanvasResult};
use crate::types::{BrushKind, Color, Stroke};

/// 图层标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// 背景层
    Background,
    /// 绘制层（已封闭的笔画）
    Drawing,
    /// 界面层
    Ui,
}

impl LayerKind {
    /// 图层的 z 序
    pub fn z_index(self) -> i32 {
        match self {
            LayerKind::Background => 0,
            LayerKind::Drawing => 1,
            LayerKind::Ui => 2,
        }
    }

    /// 图层名称
    pub fn name(self) -> &'static str {
        match self {
            LayerKind::Background => "background",
            LayerKind::Drawing => "drawing",
            LayerKind::Ui => "ui",
        }
    }

    /// 按名称查找图层
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "background" => Some(LayerKind::Background),
            "drawing" => Some(LayerKind::Drawing),
            "ui" => Some(LayerKind::Ui),
            _ => None,
        }
    }
}

/// 笔画的绘制样式
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
    /// 橡皮擦以清除混合模式绘制
    pub erase: bool,
}

impl From<&Stroke> for StrokeStyle {
    fn from(stroke: &Stroke) -> Self {
        Self {
            color: stroke.color,
            width: stroke.width,
            erase: stroke.kind == BrushKind::Eraser,
        }
    }
}

/// 单个图层
pub struct Layer {
    kind: LayerKind,
    pixmap: tiny_skia::Pixmap,
    dirty: bool,
    z_index: i32,
}

impl Layer {
    fn new(kind: LayerKind, width: u32, height: u32) -> CanvasResult<Self> {
        let pixmap = new_surface(width, height, kind.name())?;
        Ok(Self {
            kind,
            pixmap,
            dirty: false,
            z_index: kind.z_index(),
        })
    }

    /// 图层标识
    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// 脏标记是否置位
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// z 序
    pub fn z_index(&self) -> i32 {
        self.z_index
    }
}

/// 分配一块绘图表面
///
/// 尺寸非法（为零或超出 tiny-skia 上限）时无法获取表面，构造失败。
fn new_surface(width: u32, height: u32, what: &str) -> CanvasResult<tiny_skia::Pixmap> {
    tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        CanvasError::ContextUnavailable(format!("{what} surface {width}x{height}"))
    })
}

/// 图层栈
///
/// 持有全部图层、可见表面和可选的离屏预览表面。
/// 表面是独占资源：仅调度器的 tick 路径会改写它们。
pub struct LayerStack {
    /// 按 z 序升序排列
    layers: Vec<Layer>,
    /// 合成目标（可见表面）
    visible: tiny_skia::Pixmap,
    /// 离屏预览表面（进行中笔画）
    offscreen: Option<tiny_skia::Pixmap>,
    /// 预览表面上是否有内容
    preview_dirty: bool,
    /// 抗锯齿开关
    smoothing: bool,
    width: u32,
    height: u32,
}

impl LayerStack {
    /// 创建图层栈
    ///
    /// 可见表面获取失败是致命错误；离屏表面获取失败只记一条警告，
    /// 本会话内禁用离屏渲染。
    pub fn new(
        width: u32,
        height: u32,
        enable_offscreen: bool,
        smoothing: bool,
    ) -> CanvasResult<Self> {
        let visible = new_surface(width, height, "visible")?;
        let layers = vec![
            Layer::new(LayerKind::Background, width, height)?,
            Layer::new(LayerKind::Drawing, width, height)?,
            Layer::new(LayerKind::Ui, width, height)?,
        ];

        let offscreen = if enable_offscreen {
            match tiny_skia::Pixmap::new(width, height) {
                Some(pixmap) => Some(pixmap),
                None => {
                    log::warn!("offscreen surface unavailable, disabling offscreen rendering");
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            layers,
            visible,
            offscreen,
            preview_dirty: false,
            smoothing,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 离屏渲染是否可用
    pub fn has_offscreen(&self) -> bool {
        self.offscreen.is_some()
    }

    /// 查找图层
    pub fn layer(&self, kind: LayerKind) -> &Layer {
        self.layers
            .iter()
            .find(|l| l.kind == kind)
            .expect("layer set is fixed at construction")
    }

    fn layer_mut(&mut self, kind: LayerKind) -> &mut Layer {
        self.layers
            .iter_mut()
            .find(|l| l.kind == kind)
            .expect("layer set is fixed at construction")
    }

    /// 将路径描边到目标图层并置脏标记
    pub fn paint(&mut self, kind: LayerKind, path: &tiny_skia::Path, style: &StrokeStyle) {
        let smoothing = self.smoothing;
        let layer = self.layer_mut(kind);
        stroke_into(&mut layer.pixmap, path, style, smoothing);
        layer.dirty = true;
    }

    /// 将进行中笔画描边到预览表面
    ///
    /// 预览先清空再整条重绘，保证与笔画当前形状一致。
    /// 离屏不可用时退化为直接画到绘制层。
    pub fn paint_preview(&mut self, path: &tiny_skia::Path, style: &StrokeStyle) {
        let smoothing = self.smoothing;
        match &mut self.offscreen {
            Some(pixmap) => {
                pixmap.fill(tiny_skia::Color::TRANSPARENT);
                stroke_into(pixmap, path, style, smoothing);
                self.preview_dirty = true;
            }
            None => self.paint(LayerKind::Drawing, path, style),
        }
    }

    /// 清空预览表面
    pub fn clear_preview(&mut self) {
        if let Some(pixmap) = &mut self.offscreen {
            pixmap.fill(tiny_skia::Color::TRANSPARENT);
        }
        self.preview_dirty = false;
    }

    /// 用纯色填充图层（置脏标记）
    pub fn fill_layer(&mut self, kind: LayerKind, color: Color) {
        let layer = self.layer_mut(kind);
        layer.pixmap.fill(color.to_skia());
        layer.dirty = true;
    }

    /// 清空指定图层（置脏标记）
    pub fn clear_layer(&mut self, kind: LayerKind) {
        self.fill_layer(kind, Color::TRANSPARENT);
    }

    /// 清空所有图层和预览
    pub fn clear_all(&mut self) {
        for kind in [LayerKind::Background, LayerKind::Drawing, LayerKind::Ui] {
            self.clear_layer(kind);
        }
        self.clear_preview();
    }

    /// 合成
    ///
    /// 没有脏图层且预览无内容时直接返回 false。否则清空可见表面，
    /// 按 z 序升序贴上脏标记置位的图层并清除其标记，
    /// 最后（若启用）无条件叠加离屏预览表面。返回是否执行了合成。
    pub fn composite(&mut self) -> bool {
        let any_dirty = self.layers.iter().any(|l| l.dirty);
        if !any_dirty && !self.preview_dirty {
            return false;
        }

        self.visible.fill(tiny_skia::Color::TRANSPARENT);

        let paint = tiny_skia::PixmapPaint::default();
        for layer in &mut self.layers {
            if layer.dirty {
                self.visible.draw_pixmap(
                    0,
                    0,
                    layer.pixmap.as_ref(),
                    &paint,
                    tiny_skia::Transform::identity(),
                    None,
                );
                layer.dirty = false;
            }
        }

        if let Some(offscreen) = &self.offscreen {
            self.visible.draw_pixmap(
                0,
                0,
                offscreen.as_ref(),
                &paint,
                tiny_skia::Transform::identity(),
                None,
            );
        }

        true
    }

    /// 按新尺寸重建所有表面
    ///
    /// 不复制任何像素数据：图层和可见表面全部重建为空白，
    /// 需要视觉连续性的调用方必须重新提交笔画（整体重绘，而非增量）。
    pub fn resize(&mut self, width: u32, height: u32) -> CanvasResult<()> {
        let visible = new_surface(width, height, "visible")?;
        let mut layers = Vec::with_capacity(self.layers.len());
        for old in &self.layers {
            layers.push(Layer::new(old.kind, width, height)?);
        }

        let offscreen = if self.offscreen.is_some() {
            match tiny_skia::Pixmap::new(width, height) {
                Some(pixmap) => Some(pixmap),
                None => {
                    log::warn!("offscreen surface unavailable after resize, disabling");
                    None
                }
            }
        } else {
            None
        };

        self.visible = visible;
        self.layers = layers;
        self.offscreen = offscreen;
        self.preview_dirty = false;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// 可见表面
    pub fn visible(&self) -> &tiny_skia::Pixmap {
        &self.visible
    }
}

/// 把路径描边到位图
fn stroke_into(
    pixmap: &mut tiny_skia::Pixmap,
    path: &tiny_skia::Path,
    style: &StrokeStyle,
    smoothing: bool,
) {
    let mut paint = tiny_skia::Paint::default();
    paint.set_color(style.color.to_skia());
    paint.anti_alias = smoothing;
    if style.erase {
        paint.blend_mode = tiny_skia::BlendMode::Clear;
    }

    let stroke = tiny_skia::Stroke {
        width: style.width,
        line_cap: tiny_skia::LineCap::Round,
        line_join: tiny_skia::LineJoin::Round,
        ..tiny_skia::Stroke::default()
    };

    pixmap.stroke_path(
        path,
        &paint,
        &stroke,
        tiny_skia::Transform::identity(),
        None,
    );
}
