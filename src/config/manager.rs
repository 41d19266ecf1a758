//! ConfigManager - 统一配置管理器
//!
//! 提供配置的集中管理，避免多处重复加载设置文件：
//! - 缓存配置，避免重复从文件加载
//! - 配置变更通知机制
//! - 线程安全的配置访问
//!
//! 管理器是显式构造的服务对象，由调用方传引用共享，没有全局单例。

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;

use super::settings::Settings;

/// 配置变更回调类型
pub type ConfigWatcher = Box<dyn Fn(&Settings) + Send + Sync>;

/// 统一配置管理器
pub struct ConfigManager {
    /// 设置文件路径
    path: PathBuf,
    /// 缓存的设置
    settings: Arc<RwLock<Settings>>,
    /// 设置变更监听器
    watchers: Vec<ConfigWatcher>,
}

impl ConfigManager {
    /// 创建配置管理器
    ///
    /// 初始化时从文件加载设置并缓存。
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = Settings::load_from(&path);
        Self {
            path,
            settings: Arc::new(RwLock::new(settings)),
            watchers: Vec::new(),
        }
    }

    /// 获取当前设置
    ///
    /// 返回克隆副本，避免长时间持有锁。
    pub fn get(&self) -> Settings {
        self.settings.read().clone()
    }

    /// 获取设置的共享句柄（跨线程只读访问场景）
    pub fn get_shared(&self) -> Arc<RwLock<Settings>> {
        Arc::clone(&self.settings)
    }

    /// 注册配置变更监听器
    ///
    /// 配置重新加载或更新时，所有已注册的监听器都会被调用。
    pub fn watch<F>(&mut self, callback: F)
    where
        F: Fn(&Settings) + Send + Sync + 'static,
    {
        self.watchers.push(Box::new(callback));
    }

    /// 从文件重新加载配置并通知监听器
    pub fn reload(&mut self) {
        let new_settings = Settings::load_from(&self.path);
        *self.settings.write() = new_settings.clone();
        self.notify(&new_settings);
    }

    /// 更新并保存设置
    ///
    /// 更新内存中的设置并持久化到文件，然后通知监听器。
    pub fn update(&mut self, updater: impl FnOnce(&mut Settings)) -> anyhow::Result<()> {
        let new_settings = {
            let mut guard = self.settings.write();
            updater(&mut guard);
            guard.save_to(&self.path)?;
            guard.clone()
        };
        self.notify(&new_settings);
        Ok(())
    }

    fn notify(&self, settings: &Settings) {
        for watcher in &self.watchers {
            watcher(settings);
        }
    }

    // ========== 便捷访问方法 ==========

    /// 获取默认画笔设置
    #[inline]
    pub fn brush(&self) -> crate::types::BrushSettings {
        self.settings.read().brush.clone()
    }

    /// 获取背景颜色
    #[inline]
    pub fn background_color(&self) -> crate::types::Color {
        self.settings.read().background_color
    }

    /// 获取渲染配置覆盖
    #[inline]
    pub fn rendering_override(&self) -> Option<crate::device::RenderingOptions> {
        self.settings.read().rendering
    }
}
