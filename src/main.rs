//! sketch_canvas 演示程序
//!
//! 模拟一次完整的绘制会话：合成指针轨迹 → 输入过滤 → 笔画历史 →
//! 渲染调度与图层合成 → 撤销/重做 → 导出 PNG。
//! 宿主帧循环用固定步进的模拟时钟驱动。

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;

use sketch_canvas::utils::Profiler;
use sketch_canvas::{
    BrushSettings, CanvasRenderer, CanvasState, Color, ConfigManager, DeviceSignals, ImageFormat,
    InputFilter, RawPointerSample, Rect, classify,
};

/// 模拟 60Hz 宿主帧回调的步进（毫秒）
const HOST_FRAME_STEP_MS: f64 = 16.0;

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// 合成一条笔画的指针轨迹（客户端坐标）
fn synth_samples(
    center_x: f32,
    center_y: f32,
    radius: f32,
    turns: f32,
    count: usize,
    clock: f64,
) -> Vec<RawPointerSample> {
    (0..count)
        .map(|i| {
            let t = i as f32 / (count - 1).max(1) as f32;
            let angle = t * turns * std::f32::consts::TAU;
            let r = radius * (0.4 + 0.6 * t);
            RawPointerSample::new(
                center_x + r * angle.cos(),
                center_y + r * angle.sin(),
                clock + i as f64,
            )
        })
        .collect()
}

/// 走一条完整的手势：过滤 → 历史累积 → 预览 → 封闭提交
fn draw_gesture(
    renderer: &mut CanvasRenderer,
    state: &mut CanvasState,
    filter: &mut InputFilter,
    samples: &[RawPointerSample],
    clock: &mut f64,
) {
    filter.begin_gesture(state.brush().size);
    state.begin_stroke(now_millis());

    for sample in samples {
        if let Some(point) = filter.accept(sample) {
            state.push_point(point);
            if let Some(current) = state.current_stroke() {
                renderer.preview_stroke(current.clone());
            }
        }
        renderer.tick(*clock);
        *clock += HOST_FRAME_STEP_MS;
    }

    filter.end_gesture();
    if let Some(sealed) = state.end_stroke() {
        renderer.end_preview();
        renderer.draw_stroke(sealed, "drawing");
    }
    renderer.tick(*clock);
    *clock += HOST_FRAME_STEP_MS;
}

/// 撤销/重做后的整体重绘：重填背景并重放笔画列表（表面不保留增量状态）
///
/// 清空和重放分在两帧提交：同一帧内批处理命令先于立即命令执行，
/// 若清空（立即）与重放（批处理）同帧，清空会反过来抹掉重放结果。
fn replay(renderer: &mut CanvasRenderer, state: &CanvasState, background: Color, clock: &mut f64) {
    renderer.fill_background(background);
    renderer.clear_layer("drawing");
    *clock += HOST_FRAME_STEP_MS * 2.0;
    renderer.tick(*clock);

    renderer.draw_strokes(state.strokes().to_vec(), "drawing");
    *clock += HOST_FRAME_STEP_MS * 2.0;
    renderer.tick(*clock);
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = ConfigManager::new("sketch_canvas.json");
    let settings = config.get();

    let signals = DeviceSignals::detect();
    let tier = classify(&signals);
    let options = config
        .rendering_override()
        .unwrap_or_else(|| tier.rendering_options());
    log::info!(
        "device: cores={}, memory={:?}GB, mobile={} -> tier {tier:?}, {}fps",
        signals.logical_cores,
        signals.memory_gb.map(|gb| gb.round()),
        signals.is_mobile,
        options.frame_rate,
    );

    let width = settings.canvas_width;
    let height = settings.canvas_height;
    let mut renderer = CanvasRenderer::new(width, height, options)?;
    renderer.fill_background(settings.background_color);

    let mut state = CanvasState::new();
    state.set_brush(settings.brush.clone());

    // 画布占满客户端区域，像素比 1:1
    let mut filter = InputFilter::new(Rect::new(0.0, 0.0, width as f32, height as f32), 1.0);

    let mut profiler = Profiler::new_enabled();
    let mut clock = 0.0;

    // 三条螺旋笔画，颜色各异
    let strokes = [
        (width as f32 * 0.35, height as f32 * 0.5, Color::rgb(40, 90, 200)),
        (width as f32 * 0.65, height as f32 * 0.45, Color::rgb(200, 60, 60)),
        (width as f32 * 0.5, height as f32 * 0.6, Color::rgb(30, 140, 90)),
    ];
    for (cx, cy, color) in strokes {
        state.set_brush(BrushSettings {
            color,
            ..settings.brush.clone()
        });
        let samples = synth_samples(cx, cy, height as f32 * 0.2, 1.5, 120, clock);
        profiler.time("gesture", || {
            draw_gesture(&mut renderer, &mut state, &mut filter, &samples, &mut clock);
        });
    }

    // 撤销最后一条，再重做回来
    state.undo();
    replay(&mut renderer, &state, settings.background_color, &mut clock);
    state.redo();
    replay(&mut renderer, &state, settings.background_color, &mut clock);

    let png = profiler.time("export_png", || {
        renderer.get_image_data(ImageFormat::Png, 0)
    })?;
    std::fs::write("sketch.png", &png).context("write sketch.png")?;

    let stats = renderer.get_performance_stats();
    log::info!(
        "frames={}, avg={:.3}ms, dropped={}",
        stats.frames_rendered,
        stats.average_frame_time,
        stats.dropped_frames,
    );
    log::info!("{}", renderer.cache_stats());
    log::info!(
        "strokes={}, undo_depth={}, dirty_regions={}",
        state.strokes().len(),
        state.undo_depth(),
        renderer.dirty_tracker().len(),
    );
    profiler.report();

    renderer.destroy();
    Ok(())
}
