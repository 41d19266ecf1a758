//! 画布渲染器
//!
//! 核心服务对象：持有图层栈、调度器、路径缓存和脏区域追踪器，
//! 显式构造一次后由调用方传引用使用（没有全局单例）。
//! 对外暴露命令（绘制/清空/重建尺寸/销毁）与查询（导出图像/统计），
//! 协作方只通过这些接口消费渲染器，不触碰图层与调度内部。

use std::time::Instant;

use crate::command::RenderCommand;
use crate::device::RenderingOptions;
use crate::drawing::{CacheStats, PathCache};
use crate::error::{CanvasError, CanvasResult};
use crate::rendering::{
    DirtyRegionTracker, LayerKind, LayerStack, RenderScheduler, RenderStats, StrokeStyle,
};
use crate::types::{Color, Stroke};

/// 导出图像格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    /// JPEG 无透明通道，导出时 alpha 在白底上拍平
    Jpeg,
}

/// 画布渲染器
pub struct CanvasRenderer {
    options: RenderingOptions,
    layers: LayerStack,
    scheduler: RenderScheduler,
    path_cache: PathCache,
    dirty: DirtyRegionTracker,
}

impl CanvasRenderer {
    /// 创建渲染器
    ///
    /// 可见表面无法获取时返回 `ContextUnavailable`（致命）。
    /// 构造完成即开始接受命令，宿主负责逐帧调用 [`tick`](Self::tick)。
    pub fn new(width: u32, height: u32, options: RenderingOptions) -> CanvasResult<Self> {
        let layers = LayerStack::new(
            width,
            height,
            options.enable_offscreen_rendering,
            options.enable_smoothing,
        )?;
        let mut scheduler = RenderScheduler::new(options);
        scheduler.start();

        Ok(Self {
            options,
            layers,
            scheduler,
            path_cache: PathCache::new(),
            dirty: DirtyRegionTracker::new(width as f32, height as f32),
        })
    }

    /// 当前渲染配置
    pub fn options(&self) -> &RenderingOptions {
        &self.options
    }

    pub fn width(&self) -> u32 {
        self.layers.width()
    }

    pub fn height(&self) -> u32 {
        self.layers.height()
    }

    /// 按名称解析图层
    ///
    /// 名称未知时记一条警告并返回 None——绘制到不存在的图层是
    /// 约定的空操作，不是错误。
    fn resolve_layer(&self, name: &str) -> Option<LayerKind> {
        let kind = LayerKind::from_name(name);
        if kind.is_none() {
            log::warn!("draw to unknown layer '{name}' ignored");
        }
        kind
    }

    /// 提交单个笔画的绘制（批处理队列）
    pub fn draw_stroke(&mut self, stroke: Stroke, layer: &str) {
        let Some(layer) = self.resolve_layer(layer) else {
            return;
        };
        self.scheduler
            .enqueue_batched(RenderCommand::DrawStroke { stroke, layer });
    }

    /// 提交一批笔画的绘制（批处理队列）
    pub fn draw_strokes(&mut self, strokes: Vec<Stroke>, layer: &str) {
        let Some(layer) = self.resolve_layer(layer) else {
            return;
        };
        self.scheduler
            .enqueue_batched(RenderCommand::DrawStrokes { strokes, layer });
    }

    /// 提交进行中笔画的预览（立即队列）
    pub fn preview_stroke(&mut self, stroke: Stroke) {
        self.scheduler
            .enqueue_immediate(RenderCommand::PreviewStroke { stroke });
    }

    /// 清空预览表面（立即队列）
    pub fn end_preview(&mut self) {
        self.scheduler.enqueue_immediate(RenderCommand::ClearPreview);
    }

    /// 用纯色填充背景层（立即队列）
    pub fn fill_background(&mut self, color: Color) {
        self.scheduler
            .enqueue_immediate(RenderCommand::FillBackground { color });
    }

    /// 清空指定图层（立即队列）
    pub fn clear_layer(&mut self, layer: &str) {
        let Some(layer) = self.resolve_layer(layer) else {
            return;
        };
        self.scheduler
            .enqueue_immediate(RenderCommand::ClearLayer { layer });
    }

    /// 清空所有图层（立即队列）
    pub fn clear(&mut self) {
        self.scheduler.enqueue_immediate(RenderCommand::ClearAll);
    }

    /// 重建表面到新尺寸（立即队列）
    ///
    /// 与其他立即命令一样排队执行，保证尺寸调整不会发生在合成中途。
    /// 不保留任何像素：执行后所有图层为空白，需要视觉连续性的
    /// 调用方必须重新提交笔画列表。
    pub fn resize(&mut self, width: u32, height: u32) {
        self.scheduler
            .enqueue_immediate(RenderCommand::Resize { width, height });
    }

    /// 销毁渲染器
    ///
    /// 注销帧回调（停止调度）并丢弃两个队列；不保证任何在途命令完成。
    pub fn destroy(&mut self) {
        self.scheduler.stop();
    }

    /// 每帧入口，由宿主的帧回调以当前时间戳（毫秒）调用
    ///
    /// 帧间隔未到时跳帧返回 false。到帧时取出并执行全部排队命令
    /// （批处理在前、立即在后），合成图层，并记录帧时长。
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if !self.scheduler.frame_due(now_ms) {
            return false;
        }

        let started = Instant::now();

        for cmd in self.scheduler.drain() {
            self.execute(cmd);
        }
        self.layers.composite();

        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.scheduler.end_frame(now_ms, duration_ms);
        true
    }

    /// 执行单条渲染命令
    fn execute(&mut self, cmd: RenderCommand) {
        match cmd {
            RenderCommand::DrawStroke { stroke, layer } => {
                self.paint_stroke(&stroke, layer);
            }
            RenderCommand::DrawStrokes { strokes, layer } => {
                for stroke in &strokes {
                    self.paint_stroke(stroke, layer);
                }
            }
            RenderCommand::PreviewStroke { stroke } => {
                if let Some(path) = self.path_cache.compile(&stroke) {
                    self.layers.paint_preview(path, &StrokeStyle::from(&stroke));
                }
            }
            RenderCommand::ClearPreview => {
                self.layers.clear_preview();
            }
            RenderCommand::FillBackground { color } => {
                self.layers.fill_layer(LayerKind::Background, color);
            }
            RenderCommand::ClearLayer { layer } => {
                self.layers.clear_layer(layer);
            }
            RenderCommand::ClearAll => {
                self.layers.clear_all();
                self.dirty.mark_full_redraw();
            }
            RenderCommand::Resize { width, height } => match self.layers.resize(width, height) {
                Ok(()) => {
                    self.dirty.set_surface_size(width as f32, height as f32);
                    self.dirty.clear();
                }
                Err(e) => log::error!("resize to {width}x{height} failed: {e}"),
            },
        }
    }

    /// 绘制已封闭的笔画到目标图层
    ///
    /// 少于 2 个点的笔画编译为空路径：不产生笔迹，不改变图层脏标记，
    /// 也不记录脏区域。
    fn paint_stroke(&mut self, stroke: &Stroke, layer: LayerKind) {
        let Some(path) = self.path_cache.compile(stroke) else {
            return;
        };
        self.layers.paint(layer, path, &StrokeStyle::from(stroke));

        if let Some(bounds) = stroke.padded_bounds() {
            let clipped = self.dirty.clip_to_surface(bounds);
            self.dirty.mark_dirty(clipped);
        }
    }

    /// 清空队列中的待执行命令并立即合成（绕过帧率门控）
    fn flush(&mut self) {
        for cmd in self.scheduler.drain() {
            self.execute(cmd);
        }
        self.layers.composite();
    }

    /// 导出当前可见表面
    ///
    /// 编码前强制清空排队的待执行工作。`quality` 仅对 JPEG 生效。
    pub fn get_image_data(&mut self, format: ImageFormat, quality: u8) -> CanvasResult<Vec<u8>> {
        self.flush();

        let pixmap = self.layers.visible();
        match format {
            ImageFormat::Png => pixmap
                .encode_png()
                .map_err(|e| CanvasError::Encode(e.to_string())),
            ImageFormat::Jpeg => {
                let width = pixmap.width();
                let height = pixmap.height();

                // JPEG 无透明通道：去预乘后在白底上拍平
                let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
                for premul in pixmap.pixels() {
                    let c = premul.demultiply();
                    let a = c.alpha() as u32;
                    let blend = |ch: u8| ((ch as u32 * a + 255 * (255 - a)) / 255) as u8;
                    rgb.push(blend(c.red()));
                    rgb.push(blend(c.green()));
                    rgb.push(blend(c.blue()));
                }

                let mut out = Vec::new();
                let mut cursor = std::io::Cursor::new(&mut out);
                let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                    &mut cursor,
                    quality,
                );
                image::ImageEncoder::write_image(
                    encoder,
                    &rgb,
                    width,
                    height,
                    image::ExtendedColorType::Rgb8,
                )
                .map_err(|e| CanvasError::Encode(e.to_string()))?;
                Ok(out)
            }
        }
    }

    /// 渲染统计
    pub fn get_performance_stats(&self) -> RenderStats {
        self.scheduler.stats()
    }

    /// 路径缓存统计
    pub fn cache_stats(&self) -> CacheStats {
        self.path_cache.stats()
    }

    /// 脏区域追踪器（只读）
    pub fn dirty_tracker(&self) -> &DirtyRegionTracker {
        &self.dirty
    }

    /// 待执行命令数
    pub fn pending_commands(&self) -> usize {
        self.scheduler.pending()
    }

    /// 调度是否仍在运行（销毁后为 false）
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Tier;
    use crate::types::{BrushKind, Point};

    fn stroke(id: u64, points: &[(f32, f32)]) -> Stroke {
        Stroke {
            id,
            points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            color: Color::from_hex("#FF0000").unwrap(),
            width: 4.0,
            kind: BrushKind::Pen,
            created_at: 0,
        }
    }

    fn renderer() -> CanvasRenderer {
        CanvasRenderer::new(100, 100, Tier::High.rendering_options()).unwrap()
    }

    #[test]
    fn construction_fails_without_surface() {
        let result = CanvasRenderer::new(0, 0, Tier::Low.rendering_options());
        assert!(matches!(result, Err(CanvasError::ContextUnavailable(_))));
    }

    #[test]
    fn unknown_layer_is_a_noop() {
        let mut r = renderer();
        r.draw_stroke(stroke(1, &[(0.0, 0.0), (50.0, 50.0)]), "bogus");
        assert_eq!(r.pending_commands(), 0);
    }

    #[test]
    fn tick_skips_within_frame_interval() {
        let mut r = renderer();
        assert!(r.tick(0.0));

        r.draw_stroke(stroke(1, &[(0.0, 0.0), (50.0, 50.0)]), "drawing");
        // 60fps 门控：5ms 后还不到帧
        assert!(!r.tick(5.0));
        assert_eq!(r.pending_commands(), 1);

        assert!(r.tick(17.0));
        assert_eq!(r.pending_commands(), 0);
    }

    #[test]
    fn short_stroke_paints_nothing() {
        let mut r = renderer();
        r.draw_stroke(stroke(1, &[(10.0, 10.0)]), "drawing");
        r.tick(0.0);

        assert_eq!(r.dirty_tracker().len(), 0);
        // 空路径也占用一个缓存条目
        assert_eq!(r.cache_stats().entry_count, 1);
    }

    #[test]
    fn stroke_records_padded_dirty_region() {
        let mut r = renderer();
        r.draw_stroke(stroke(1, &[(10.0, 10.0), (50.0, 50.0)]), "drawing");
        r.tick(0.0);

        assert_eq!(r.dirty_tracker().len(), 1);
        let region = r.dirty_tracker().combined().unwrap();
        assert_eq!(region.x, 8.0);
        assert_eq!(region.y, 8.0);
    }

    #[test]
    fn destroy_discards_pending_work() {
        let mut r = renderer();
        r.draw_stroke(stroke(1, &[(0.0, 0.0), (50.0, 50.0)]), "drawing");
        r.destroy();

        assert_eq!(r.pending_commands(), 0);
        assert!(!r.is_running());
        assert!(!r.tick(100.0));
    }

    #[test]
    fn export_flushes_pending_strokes() {
        let mut r = renderer();
        r.draw_stroke(stroke(1, &[(10.0, 10.0), (80.0, 80.0)]), "drawing");
        // 不 tick，导出前应强制冲刷
        let png = r.get_image_data(ImageFormat::Png, 0).unwrap();
        assert_eq!(r.pending_commands(), 0);

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert!(decoded.pixels().any(|p| p.0[3] > 0));
    }

    #[test]
    fn jpeg_export_produces_data() {
        let mut r = renderer();
        r.fill_background(Color::WHITE);
        r.draw_stroke(stroke(1, &[(10.0, 10.0), (80.0, 80.0)]), "drawing");
        let jpeg = r.get_image_data(ImageFormat::Jpeg, 85).unwrap();

        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.width(), 100);
        assert_eq!(decoded.height(), 100);
    }

    #[test]
    fn stats_accumulate_over_ticks() {
        let mut r = renderer();
        r.tick(0.0);
        r.tick(20.0);
        r.tick(40.0);
        assert_eq!(r.get_performance_stats().frames_rendered, 3);
    }
}
