//! Модуль генерации отчетов
//!
//! Этот модуль строит из результатов выравнивания два независимых отчета:
//! отчет о примененной коррекции времени и отчет о темпе речи пользователя.
//! Формы отчетов — явные неизменяемые структуры; их JSON-представление
//! является контрактом со слоем отображения.

pub mod pacing;
pub mod timing;

use serde::{Deserialize, Serialize};

/// Серьезность проблемы сегмента: сколько ручной коррекции
/// (перезаписи) сегменту, вероятно, потребуется
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Коррекция не нужна
    Perfect,
    /// Небольшое расхождение, автоматическая коррекция справится
    Minor,
    /// Заметное расхождение, результат может быть неестественным
    Major,
    /// Автоматическая коррекция не компенсирует расхождение полностью
    Critical,
}

impl Severity {
    /// Получить строковое представление серьезности
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Perfect => "perfect",
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Critical => "critical",
        }
    }
}

/// Итоговая оценка качества выравнивания
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentQuality {
    /// Отличное совпадение
    Excellent,
    /// Хорошее совпадение
    Good,
    /// Приемлемое совпадение
    Acceptable,
    /// Плохое совпадение
    Poor,
}

impl AlignmentQuality {
    /// Получить строковое представление качества
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Acceptable => "acceptable",
            Self::Poor => "poor",
        }
    }
}

/// Общая оценка темпа пользователя относительно эталона
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallTiming {
    /// Пользователь в среднем говорил медленнее эталона
    TooSlow,
    /// Пользователь в среднем говорил быстрее эталона
    TooFast,
    /// Темп совпадает
    Perfect,
}

impl OverallTiming {
    /// Получить строковое представление оценки
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TooSlow => "too_slow",
            Self::TooFast => "too_fast",
            Self::Perfect => "perfect",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Perfect < Severity::Minor);
        assert!(Severity::Minor < Severity::Major);
        assert!(Severity::Major < Severity::Critical);
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_value(Severity::Critical).unwrap(), "critical");
        assert_eq!(serde_json::to_value(AlignmentQuality::Excellent).unwrap(), "excellent");
        assert_eq!(serde_json::to_value(OverallTiming::TooSlow).unwrap(), "too_slow");
    }
}
