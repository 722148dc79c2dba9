//! Модуль обработки ошибок библиотеки narration-sync
//!
//! Этот модуль содержит типы ошибок, которые могут возникнуть при работе библиотеки.
//! Сам движок выравнивания не порождает фатальных ошибок: деградация входных
//! данных обрабатывается внутри и фиксируется в диагностике.

use thiserror::Error;

/// Ошибки библиотеки narration-sync
///
/// Сбои транскрипции и ввода-вывода остаются на стороне вызывающего кода:
/// движок получает уже готовые временные метки слов.
#[derive(Debug, Error)]
pub enum NarrationSyncError {
    /// Ошибка сериализации/десериализации JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Некорректные временные метки слов
    #[error("Invalid word timings: {0}")]
    InvalidTimings(String),

    /// Ошибка конфигурации
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Другая ошибка
    #[error("Other error: {0}")]
    Other(String),
}

impl From<&str> for NarrationSyncError {
    fn from(s: &str) -> Self {
        NarrationSyncError::Other(s.to_string())
    }
}

impl From<String> for NarrationSyncError {
    fn from(s: String) -> Self {
        NarrationSyncError::Other(s)
    }
}

/// Тип Result для библиотеки narration-sync
pub type Result<T> = std::result::Result<T, NarrationSyncError>;
