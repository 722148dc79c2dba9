//! Модуль выравнивания речевых сегментов
//!
//! Этот модуль сопоставляет сегменты эталонной дорожки с сегментами
//! пользовательской записи и вычисляет коэффициенты растяжения времени
//! для последующей обработки видео.

pub mod aligner;
pub mod similarity;

use serde::{Deserialize, Serialize};

use crate::transcript::TimeSegment;

/// Нижняя граница безопасного коэффициента растяжения (atempo с сохранением тона)
pub const MIN_STRETCH_RATIO: f64 = 0.5;
/// Верхняя граница безопасного коэффициента растяжения
pub const MAX_STRETCH_RATIO: f64 = 2.0;

/// Способ подгонки сегмента под пользовательскую запись
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignMethod {
    /// Растянуть сегмент (пользователь говорил дольше)
    Stretch,
    /// Сжать сегмент (пользователь говорил быстрее)
    Compress,
    /// Оставить без изменений
    Keep,
}

impl AlignMethod {
    /// Получить строковое представление способа
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stretch => "stretch",
            Self::Compress => "compress",
            Self::Keep => "keep",
        }
    }
}

/// Результат выравнивания одного эталонного сегмента
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentResult {
    /// Сегмент эталонной ("veo") дорожки
    pub veo_segment: TimeSegment,
    /// Сопоставленный сегмент пользовательской дорожки
    pub user_segment: TimeSegment,
    /// Коэффициент растяжения: длительность пользователя / длительность эталона
    pub time_stretch_ratio: f64,
    /// Способ подгонки
    pub method: AlignMethod,
}

/// Диагностическое событие выравнивания (нефатальное)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum AlignmentDiagnostic {
    /// Пользовательская дорожка закончилась раньше эталонной:
    /// сегмент сопоставлен сам с собой
    #[serde(rename_all = "camelCase")]
    MissingUserSegment { veo_index: usize },
    /// Для эталонной паузы не нашлось пользовательской паузы рядом с курсором
    #[serde(rename_all = "camelCase")]
    UnmatchedPause { veo_index: usize },
    /// Просмотр вперед пропустил лишний пользовательский сегмент
    #[serde(rename_all = "camelCase")]
    LookaheadSkip { veo_index: usize, skipped_text: String },
}

/// Итог работы выравнивателя: результаты плюс накопленная диагностика
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentOutcome {
    /// Результаты выравнивания, по одному на каждый эталонный сегмент
    pub results: Vec<AlignmentResult>,
    /// Диагностические события
    pub diagnostics: Vec<AlignmentDiagnostic>,
}

/// Ограничение коэффициента растяжения безопасным диапазоном [0.5, 2.0]
///
/// Значения вне диапазона молча приводятся к границе; факт ограничения
/// отслеживает генератор отчета, сравнивая исходный и примененный
/// коэффициенты. NaN трактуется как 1.0, чтобы ffmpeg никогда не получил
/// нечисловой аргумент atempo.
pub fn clamp_stretch_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() {
        return 1.0;
    }
    ratio.clamp(MIN_STRETCH_RATIO, MAX_STRETCH_RATIO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_bounds() {
        assert_eq!(clamp_stretch_ratio(0.1), 0.5);
        assert_eq!(clamp_stretch_ratio(10.0), 2.0);
        assert_eq!(clamp_stretch_ratio(1.0), 1.0);
        assert_eq!(clamp_stretch_ratio(0.5), 0.5);
        assert_eq!(clamp_stretch_ratio(2.0), 2.0);
        assert_eq!(clamp_stretch_ratio(f64::NEG_INFINITY), 0.5);
        assert_eq!(clamp_stretch_ratio(f64::INFINITY), 2.0);
    }

    #[test]
    fn test_clamp_is_idempotent() {
        for x in [-3.0, 0.0, 0.49, 0.5, 0.77, 1.0, 1.99, 2.0, 5.0] {
            assert_eq!(clamp_stretch_ratio(clamp_stretch_ratio(x)), clamp_stretch_ratio(x));
        }
    }

    #[test]
    fn test_clamp_nan_maps_to_unity() {
        assert_eq!(clamp_stretch_ratio(f64::NAN), 1.0);
    }

    #[test]
    fn test_align_method_as_str() {
        assert_eq!(AlignMethod::Stretch.as_str(), "stretch");
        assert_eq!(AlignMethod::Compress.as_str(), "compress");
        assert_eq!(AlignMethod::Keep.as_str(), "keep");
    }

    #[test]
    fn test_result_serializes_with_wire_field_names() {
        use crate::transcript::TimeSegment;

        let segment = TimeSegment::pause("[pause]", 0.0, 1.0);
        let result = AlignmentResult {
            veo_segment: segment.clone(),
            user_segment: segment,
            time_stretch_ratio: 1.0,
            method: AlignMethod::Keep,
        };
        let json = serde_json::to_value(&result).unwrap();

        assert!(json.get("veoSegment").is_some());
        assert!(json.get("userSegment").is_some());
        assert_eq!(json["timeStretchRatio"], 1.0);
        assert_eq!(json["method"], "keep");
    }
}
