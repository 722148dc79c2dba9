//! Модуль извлечения сегментов из временных меток слов
//!
//! Этот модуль превращает плоский список слов с временными метками в
//! упорядоченную последовательность сегментов речи и пауз, покрывающую
//! всю дорожку без пропусков.

use crate::config::NarrationSyncConfig;
use crate::transcript::{TimeSegment, WordTiming, PAUSE_TEXT, SILENCE_TEXT};

/// Извлечение сегментов речи и пауз из списка слов
///
/// Слова группируются в один речевой сегмент, пока разрыв до следующего
/// слова не превышает `pause_threshold`. Разрыв больше порога порождает
/// сегмент паузы истинной длительности. Если речь начинается не с нуля,
/// вставляется ведущий сегмент тишины.
///
/// Пустой вход дает пустой результат; функция никогда не завершается ошибкой.
pub fn extract_segments(words: &[WordTiming], config: &NarrationSyncConfig) -> Vec<TimeSegment> {
    if words.is_empty() {
        log::debug!("No word timings supplied, returning empty segment list");
        return Vec::new();
    }

    let threshold = config.pause_threshold;
    let mut segments = Vec::new();

    // Ведущая тишина до первого слова
    if words[0].start > threshold {
        segments.push(TimeSegment::pause(SILENCE_TEXT, 0.0, words[0].start));
    }

    let mut current_words: Vec<WordTiming> = vec![words[0].clone()];

    for pair in words.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        let gap = next.start - prev.end;

        if gap > threshold {
            segments.push(TimeSegment::speech(std::mem::take(&mut current_words)));
            segments.push(TimeSegment::pause(PAUSE_TEXT, prev.end, next.start));
        }
        current_words.push(next.clone());
    }

    segments.push(TimeSegment::speech(current_words));

    log::debug!(
        "Extracted {} segments ({} speech) from {} words",
        segments.len(),
        segments.iter().filter(|s| s.is_speech()).count(),
        words.len()
    );

    segments
}
