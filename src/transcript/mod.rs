//! Модуль типов транскрипции
//!
//! Этот модуль содержит типы для представления транскрибированной речи:
//! слова с временными метками и типизированные сегменты времени.
//! Временные метки слов поставляет внешний сервис транскрипции.

pub mod extractor;

use serde::{Deserialize, Serialize};

/// Текст-заполнитель для паузы между репликами
pub const PAUSE_TEXT: &str = "[pause]";
/// Текст-заполнитель для тишины в начале дорожки
pub const SILENCE_TEXT: &str = "[silence]";

/// Слово с временными метками (секунды от начала дорожки)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordTiming {
    /// Слово
    pub word: String,
    /// Время начала слова
    pub start: f64,
    /// Время окончания слова
    pub end: f64,
}

impl WordTiming {
    /// Создать новый экземпляр WordTiming
    pub fn new(word: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            word: word.into(),
            start,
            end,
        }
    }
}

/// Тип сегмента времени
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Речь
    Speech,
    /// Пауза или тишина
    Pause,
}

impl SegmentKind {
    /// Получить строковое представление типа сегмента
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Speech => "speech",
            Self::Pause => "pause",
        }
    }
}

/// Сегмент времени на дорожке: непрерывная речь либо пауза
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSegment {
    /// Текст сегмента (для паузы — заполнитель)
    pub text: String,
    /// Время начала сегмента
    pub start: f64,
    /// Время окончания сегмента
    pub end: f64,
    /// Длительность сегмента
    pub duration: f64,
    /// Тип сегмента
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    /// Слова сегмента с временными метками (только для речи)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<WordTiming>>,
}

impl TimeSegment {
    /// Создать речевой сегмент из последовательности слов
    pub fn speech(words: Vec<WordTiming>) -> Self {
        let start = words.first().map(|w| w.start).unwrap_or(0.0);
        let end = words.last().map(|w| w.end).unwrap_or(start);
        let text = words
            .iter()
            .map(|w| w.word.as_str())
            .collect::<Vec<&str>>()
            .join(" ");

        Self {
            text,
            start,
            end,
            duration: end - start,
            kind: SegmentKind::Speech,
            words: Some(words),
        }
    }

    /// Создать сегмент паузы
    pub fn pause(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            duration: end - start,
            kind: SegmentKind::Pause,
            words: None,
        }
    }

    /// Является ли сегмент речевым
    pub fn is_speech(&self) -> bool {
        self.kind == SegmentKind::Speech
    }
}
