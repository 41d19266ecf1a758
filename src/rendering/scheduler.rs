//! 渲染调度模块
//!
//! 帧率门控的协作式调度：宿主每帧调用一次 tick 入口，时钟以毫秒
//! 时间戳注入，便于测试模拟。距上一帧不足目标帧间隔时本帧跳过
//! （跳帧而非延迟——下一个宿主帧会重新检查）。到帧时先按提交顺序
//! 清空批处理队列，再清空立即队列，两级队列的执行次序是调度策略
//! 的一部分，而不是实现巧合。批处理队列达到容量上限时绕过门控
//! 强制出帧，防止队列无界增长。

use std::collections::VecDeque;

use crate::command::RenderCommand;
use crate::device::RenderingOptions;

/// 帧时长滚动窗口大小
const FRAME_WINDOW: usize = 60;

/// 掉帧判定系数：单帧处理耗时超过目标帧间隔的 1.5 倍记为掉帧
const DROPPED_FRAME_FACTOR: f64 = 1.5;

/// 渲染统计
///
/// 单调累积的滚动计数，仅在渲染器重建时归零。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderStats {
    /// 已渲染帧数
    pub frames_rendered: u64,
    /// 平均帧时长（毫秒，最近 60 帧滚动平均）
    pub average_frame_time: f64,
    /// 掉帧数
    pub dropped_frames: u64,
}

/// 渲染调度器
///
/// 只负责队列与时序：命令的实际执行由渲染器在 drain 之后完成，
/// 表面改写全部发生在 tick 路径内，因此不存在并发写者。
pub struct RenderScheduler {
    /// 批处理队列
    batched: VecDeque<RenderCommand>,
    /// 立即队列
    immediate: VecDeque<RenderCommand>,
    options: RenderingOptions,
    /// 上一次出帧的时间戳（毫秒）
    last_frame_time: Option<f64>,
    running: bool,
    frames_rendered: u64,
    dropped_frames: u64,
    /// 最近帧时长（毫秒）
    frame_times: VecDeque<f64>,
}

impl RenderScheduler {
    /// 创建调度器（未启动状态）
    pub fn new(options: RenderingOptions) -> Self {
        Self {
            batched: VecDeque::new(),
            immediate: VecDeque::new(),
            options,
            last_frame_time: None,
            running: false,
            frames_rendered: 0,
            dropped_frames: 0,
            frame_times: VecDeque::with_capacity(FRAME_WINDOW),
        }
    }

    /// 启动调度
    pub fn start(&mut self) {
        self.running = true;
    }

    /// 停止调度并丢弃两个队列
    ///
    /// 取消是立即且彻底的：不保证任何在途命令完成，也没有回滚。
    pub fn stop(&mut self) {
        self.running = false;
        self.batched.clear();
        self.immediate.clear();
    }

    /// 是否在运行
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// 渲染配置
    pub fn options(&self) -> &RenderingOptions {
        &self.options
    }

    /// 提交批处理命令
    ///
    /// 批处理被禁用时转入立即队列。
    pub fn enqueue_batched(&mut self, cmd: RenderCommand) {
        if !self.running {
            return;
        }
        if self.options.enable_batching {
            self.batched.push_back(cmd);
        } else {
            self.immediate.push_back(cmd);
        }
    }

    /// 提交立即命令
    pub fn enqueue_immediate(&mut self, cmd: RenderCommand) {
        if !self.running {
            return;
        }
        self.immediate.push_back(cmd);
    }

    /// 待执行命令总数
    pub fn pending(&self) -> usize {
        self.batched.len() + self.immediate.len()
    }

    /// 本帧是否到期
    ///
    /// 距上一帧不足目标间隔时跳帧；批处理队列达到容量上限时
    /// 绕过门控（背压强制出帧）。首帧总是到期。
    pub fn frame_due(&self, now_ms: f64) -> bool {
        if !self.running {
            return false;
        }

        if self.batched.len() >= self.options.max_batch_size {
            return true;
        }

        match self.last_frame_time {
            Some(last) => now_ms - last >= self.options.frame_interval_ms(),
            None => true,
        }
    }

    /// 取出本帧要执行的全部命令
    ///
    /// 批处理命令在前、立即命令在后，各自保持 FIFO 提交顺序。
    pub fn drain(&mut self) -> Vec<RenderCommand> {
        let mut commands = Vec::with_capacity(self.batched.len() + self.immediate.len());
        commands.extend(self.batched.drain(..));
        commands.extend(self.immediate.drain(..));
        commands
    }

    /// 记录一帧的完成
    ///
    /// `frame_start_ms` 为本帧时间戳（作为下一次门控的基准），
    /// `duration_ms` 为本帧处理耗时。
    pub fn end_frame(&mut self, frame_start_ms: f64, duration_ms: f64) {
        self.last_frame_time = Some(frame_start_ms);
        self.frames_rendered += 1;

        if self.frame_times.len() == FRAME_WINDOW {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(duration_ms);

        if duration_ms > self.options.frame_interval_ms() * DROPPED_FRAME_FACTOR {
            self.dropped_frames += 1;
        }
    }

    /// 当前统计
    pub fn stats(&self) -> RenderStats {
        let average_frame_time = if self.frame_times.is_empty() {
            0.0
        } else {
            self.frame_times.iter().sum::<f64>() / self.frame_times.len() as f64
        };

        RenderStats {
            frames_rendered: self.frames_rendered,
            average_frame_time,
            dropped_frames: self.dropped_frames,
        }
    }
}
