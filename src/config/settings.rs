//! 设置定义与持久化
//!
//! 设置以 JSON 文件存储。加载失败（文件缺失或损坏）时退回默认值
//! 并记一条警告，不视为致命错误。

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::device::RenderingOptions;
use crate::types::{BrushSettings, Color};

/// 引擎设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 默认画笔
    pub brush: BrushSettings,
    /// 背景颜色
    pub background_color: Color,
    /// 画布尺寸
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// 渲染配置覆盖（None 表示按设备分级自动选择）
    pub rendering: Option<RenderingOptions>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            brush: BrushSettings::default(),
            background_color: Color::WHITE,
            canvas_width: 800,
            canvas_height: 600,
            rendering: None,
        }
    }
}

impl Settings {
    /// 从文件加载设置
    ///
    /// 文件不存在或解析失败时返回默认设置。
    pub fn load_from(path: &Path) -> Settings {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("settings file {} unreadable: {e}, using defaults", path.display());
                    Settings::default()
                }
            },
            Err(_) => Settings::default(),
        }
    }

    /// 保存设置到文件
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}
