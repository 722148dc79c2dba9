//! Модуль конфигурации библиотеки narration-sync
//!
//! Этот модуль содержит структуры и перечисления для настройки движка выравнивания.

use serde::{Deserialize, Serialize};

/// Политика определения серьезности проблем сегмента
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SeverityPolicy {
    /// Учитывать совпадение текста и факт ограничения коэффициента
    TextAware,
    /// Только отклонение коэффициента растяжения (историческая политика)
    TimingOnly,
}

impl Default for SeverityPolicy {
    fn default() -> Self {
        Self::TextAware
    }
}

impl SeverityPolicy {
    /// Получить строковое представление политики
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextAware => "text_aware",
            Self::TimingOnly => "timing_only",
        }
    }
}

/// Конфигурация движка выравнивания
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrationSyncConfig {
    /// Минимальная пауза между словами, образующая отдельный сегмент (секунды)
    pub pause_threshold: f64,
    /// Порог схожести текста, ниже которого включается просмотр следующего сегмента
    pub lookahead_similarity_threshold: f64,
    /// Нижняя граница коэффициента, при которой сегмент остается без изменений
    pub keep_ratio_min: f64,
    /// Верхняя граница коэффициента, при которой сегмент остается без изменений
    pub keep_ratio_max: f64,
    /// Политика определения серьезности проблем
    pub severity_policy: SeverityPolicy,
    /// Максимальное количество проблемных сегментов в отчете
    pub top_problem_limit: usize,
}

impl Default for NarrationSyncConfig {
    fn default() -> Self {
        Self {
            pause_threshold: 0.05,
            lookahead_similarity_threshold: 0.3,
            keep_ratio_min: 0.9,
            keep_ratio_max: 1.1,
            severity_policy: SeverityPolicy::default(),
            top_problem_limit: 5,
        }
    }
}

impl NarrationSyncConfig {
    /// Проверить корректность конфигурации
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::NarrationSyncError;

        if self.pause_threshold <= 0.0 {
            return Err(NarrationSyncError::Configuration(
                format!("pause_threshold must be positive, got {}", self.pause_threshold)
            ));
        }
        if !(0.0..=1.0).contains(&self.lookahead_similarity_threshold) {
            return Err(NarrationSyncError::Configuration(
                format!("lookahead_similarity_threshold must be in [0, 1], got {}", self.lookahead_similarity_threshold)
            ));
        }
        if self.keep_ratio_min >= self.keep_ratio_max {
            return Err(NarrationSyncError::Configuration(
                format!("keep ratio band is empty: [{}, {}]", self.keep_ratio_min, self.keep_ratio_max)
            ));
        }
        Ok(())
    }
}
