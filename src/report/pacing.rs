//! Модуль отчета о темпе речи
//!
//! Этот модуль сравнивает скорость речи пользователя с эталоном,
//! полностью игнорируя паузы: длительность считается от первого
//! до последнего реального слова по пословным временным меткам,
//! а не по сырым границам сегмента, которые захватывают тишину.

use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::align::AlignmentResult;
use crate::transcript::TimeSegment;

lazy_static! {
    /// Слово считается реальным, если содержит хотя бы один буквенно-цифровой символ
    static ref REAL_WORD: Regex = Regex::new(r"\w").unwrap();
}

/// Классификация темпа речи по коэффициенту user/veo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacingTier {
    /// Темп совпадает с эталоном
    Perfect,
    /// Немного быстрее эталона
    SlightlyFast,
    /// Заметно быстрее эталона
    Fast,
    /// Критически быстрее эталона
    CriticallyFast,
    /// Немного медленнее эталона
    SlightlySlow,
    /// Заметно медленнее эталона
    Slow,
    /// Критически медленнее эталона
    CriticallySlow,
}

impl PacingTier {
    /// Получить строковое представление класса темпа
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Perfect => "perfect",
            Self::SlightlyFast => "slightly_fast",
            Self::Fast => "fast",
            Self::CriticallyFast => "critically_fast",
            Self::SlightlySlow => "slightly_slow",
            Self::Slow => "slow",
            Self::CriticallySlow => "critically_slow",
        }
    }
}

/// Классификация коэффициента темпа по семи диапазонам
///
/// Границы включаются строго как указано: 0.97 и 1.03 — это perfect.
pub fn classify_pacing(ratio: f64) -> PacingTier {
    if (0.97..=1.03).contains(&ratio) {
        PacingTier::Perfect
    } else if (0.90..0.97).contains(&ratio) {
        PacingTier::SlightlyFast
    } else if (0.75..0.90).contains(&ratio) {
        PacingTier::Fast
    } else if ratio < 0.75 {
        PacingTier::CriticallyFast
    } else if ratio <= 1.10 {
        PacingTier::SlightlySlow
    } else if ratio <= 1.25 {
        PacingTier::Slow
    } else {
        PacingTier::CriticallySlow
    }
}

/// Отчет о темпе по одной паре речевых сегментов
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacingSegment {
    /// Индекс пары речевых сегментов
    pub index: usize,
    /// Текст эталонного сегмента
    pub veo_text: String,
    /// Текст пользовательского сегмента
    pub user_text: String,
    /// Чистая длительность речи эталона (без пауз)
    pub veo_speech_duration: f64,
    /// Чистая длительность речи пользователя (без пауз)
    pub user_speech_duration: f64,
    /// Коэффициент темпа: user / veo
    pub pacing_ratio: f64,
    /// Класс темпа
    pub tier: PacingTier,
    /// Отклонение от эталона в процентах
    pub deviation_percent: f64,
    /// Совет по этому сегменту
    pub guidance: String,
}

/// Отчет о темпе речи пользователя относительно эталона
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacingReport {
    /// Время формирования отчета
    pub generated_at: DateTime<Local>,
    /// Количество проанализированных пар речевых сегментов
    pub total_segments: usize,
    /// Средний коэффициент темпа
    pub overall_ratio: f64,
    /// Среднее абсолютное отклонение от 1.0
    pub average_deviation: f64,
    /// Количество сегментов, требующих корректировки темпа
    pub segments_needing_adjustment: usize,
    /// Общий класс темпа (классификация среднего коэффициента)
    pub overall_pacing: PacingTier,
    /// Количество сегментов, посчитанных по сырой длительности
    /// из-за отсутствия пословных меток
    pub degraded_segments: usize,
    /// Отчеты по сегментам
    pub segments: Vec<PacingSegment>,
    /// Рекомендации
    pub recommendations: Vec<String>,
}

/// Построение отчета о темпе речи
///
/// Анализируются только речевые пары; паузы и резервные самосопоставления
/// эталонных сегментов без пользовательской пары учитываются как есть
/// (их коэффициент равен 1.0). Пустой вход дает корректный отчет с нулем
/// сегментов.
pub fn generate_pacing_report(results: &[AlignmentResult]) -> PacingReport {
    let speech_pairs: Vec<&AlignmentResult> = results
        .iter()
        .filter(|r| r.veo_segment.is_speech())
        .collect();

    if speech_pairs.is_empty() {
        return PacingReport {
            generated_at: Local::now(),
            total_segments: 0,
            overall_ratio: 1.0,
            average_deviation: 0.0,
            segments_needing_adjustment: 0,
            overall_pacing: PacingTier::Perfect,
            degraded_segments: 0,
            segments: Vec::new(),
            recommendations: vec![
                "No speech segments to analyze. Record narration for the reference video first."
                    .to_string(),
            ],
        };
    }

    let mut degraded_segments = 0;
    let segments: Vec<PacingSegment> = speech_pairs
        .iter()
        .enumerate()
        .map(|(index, result)| {
            let veo_duration =
                effective_speech_duration(&result.veo_segment, "reference", index, &mut degraded_segments);
            let user_duration =
                effective_speech_duration(&result.user_segment, "user", index, &mut degraded_segments);

            build_pacing_segment(index, result, veo_duration, user_duration)
        })
        .collect();

    let total = segments.len();
    let overall_ratio = segments.iter().map(|s| s.pacing_ratio).sum::<f64>() / total as f64;
    let average_deviation = segments
        .iter()
        .map(|s| (s.pacing_ratio - 1.0).abs())
        .sum::<f64>()
        / total as f64;
    let segments_needing_adjustment = segments
        .iter()
        .filter(|s| s.tier != PacingTier::Perfect)
        .count();
    let overall_pacing = classify_pacing(overall_ratio);

    log::info!(
        "Pacing report: {} speech pairs, overall ratio {:.3} ({})",
        total,
        overall_ratio,
        overall_pacing.as_str()
    );

    let recommendations = build_recommendations(overall_pacing, segments_needing_adjustment, total);

    PacingReport {
        generated_at: Local::now(),
        total_segments: total,
        overall_ratio,
        average_deviation,
        segments_needing_adjustment,
        overall_pacing,
        degraded_segments,
        segments,
        recommendations,
    }
}

/// Чистая длительность речи сегмента: от начала первого до конца последнего
/// реального слова
///
/// Сырая длительность сегмента захватывает тишину на краях, попавшую в
/// границы при извлечении, поэтому для темпа она непригодна. `None`
/// означает, что пословных меток нет и вызывающий код должен перейти
/// в деградированный режим.
pub fn speech_only_duration(segment: &TimeSegment) -> Option<f64> {
    let words = segment.words.as_ref()?;
    let real_words: Vec<_> = words.iter().filter(|w| REAL_WORD.is_match(&w.word)).collect();

    let first = real_words.first()?;
    let last = real_words.last()?;
    Some(last.end - first.start)
}

/// Чистая длительность речи с переходом в деградированный режим
///
/// Возврат к сырой длительности сегмента происходит в двух случаях:
/// пословных меток нет вовсе, либо они есть, но ни одно слово не является
/// реальным (одна пунктуация). Оба фиксируются в счетчике деградации.
fn effective_speech_duration(
    segment: &TimeSegment,
    track: &str,
    index: usize,
    degraded_segments: &mut usize,
) -> f64 {
    match speech_only_duration(segment) {
        Some(duration) => duration,
        None => {
            *degraded_segments += 1;
            if segment.words.is_some() {
                log::warn!(
                    "{} segment {} (\"{}\") has no real words among its timestamps, falling back to raw duration",
                    track,
                    index,
                    segment.text
                );
            } else {
                log::warn!(
                    "No word timestamps for {} segment {} (\"{}\"), falling back to raw duration",
                    track,
                    index,
                    segment.text
                );
            }
            segment.duration
        }
    }
}

fn build_pacing_segment(
    index: usize,
    result: &AlignmentResult,
    veo_duration: f64,
    user_duration: f64,
) -> PacingSegment {
    // Нулевая эталонная длительность дает коэффициент 0, а не деление на ноль
    let ratio = if veo_duration > 0.0 {
        user_duration / veo_duration
    } else {
        0.0
    };
    let tier = classify_pacing(ratio);
    let deviation_percent = (ratio - 1.0).abs() * 100.0;

    PacingSegment {
        index,
        veo_text: result.veo_segment.text.clone(),
        user_text: result.user_segment.text.clone(),
        veo_speech_duration: veo_duration,
        user_speech_duration: user_duration,
        pacing_ratio: ratio,
        tier,
        deviation_percent,
        guidance: tier_guidance(tier, deviation_percent),
    }
}

/// Совет по темпу для одного сегмента
fn tier_guidance(tier: PacingTier, deviation_percent: f64) -> String {
    match tier {
        PacingTier::Perfect => "Pacing matches the reference.".to_string(),
        PacingTier::SlightlyFast => format!(
            "{:.0}% faster than the reference; slow down slightly.",
            deviation_percent
        ),
        PacingTier::Fast => format!(
            "{:.0}% faster than the reference; slow down noticeably.",
            deviation_percent
        ),
        PacingTier::CriticallyFast => format!(
            "{:.0}% faster than the reference; re-record this segment at a much slower pace.",
            deviation_percent
        ),
        PacingTier::SlightlySlow => format!(
            "{:.0}% slower than the reference; speed up slightly.",
            deviation_percent
        ),
        PacingTier::Slow => format!(
            "{:.0}% slower than the reference; speed up noticeably.",
            deviation_percent
        ),
        PacingTier::CriticallySlow => format!(
            "{:.0}% slower than the reference; re-record this segment at a much faster pace.",
            deviation_percent
        ),
    }
}

/// Свободные рекомендации по всему отчету
fn build_recommendations(
    overall: PacingTier,
    needing_adjustment: usize,
    total: usize,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    match overall {
        PacingTier::Perfect => {
            recommendations.push("Overall pacing matches the reference.".to_string())
        }
        PacingTier::SlightlyFast | PacingTier::Fast => recommendations
            .push("Overall the narration is faster than the reference; slow down.".to_string()),
        PacingTier::CriticallyFast => recommendations.push(
            "The narration is far faster than the reference; re-record at a slower pace."
                .to_string(),
        ),
        PacingTier::SlightlySlow | PacingTier::Slow => recommendations
            .push("Overall the narration is slower than the reference; speed up.".to_string()),
        PacingTier::CriticallySlow => recommendations.push(
            "The narration is far slower than the reference; re-record at a faster pace."
                .to_string(),
        ),
    }

    if needing_adjustment > 0 {
        recommendations.push(format!(
            "{} of {} segment(s) deviate from the reference pacing.",
            needing_adjustment, total
        ));
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::AlignMethod;
    use crate::transcript::{SegmentKind, WordTiming};

    fn speech_with_words(words: &[(&str, f64, f64)]) -> TimeSegment {
        TimeSegment::speech(
            words
                .iter()
                .map(|(w, s, e)| WordTiming::new(*w, *s, *e))
                .collect(),
        )
    }

    fn bare_speech(text: &str, start: f64, end: f64) -> TimeSegment {
        TimeSegment {
            text: text.to_string(),
            start,
            end,
            duration: end - start,
            kind: SegmentKind::Speech,
            words: None,
        }
    }

    fn pair(veo: TimeSegment, user: TimeSegment) -> AlignmentResult {
        let ratio = user.duration / veo.duration;
        AlignmentResult {
            veo_segment: veo,
            user_segment: user,
            time_stretch_ratio: ratio,
            method: AlignMethod::Keep,
        }
    }

    #[test]
    fn test_tier_boundaries_are_inclusive_exactly_as_specified() {
        assert_eq!(classify_pacing(0.97), PacingTier::Perfect);
        assert_eq!(classify_pacing(1.03), PacingTier::Perfect);
        assert_eq!(classify_pacing(1.0), PacingTier::Perfect);
        assert_eq!(classify_pacing(0.969999), PacingTier::SlightlyFast);
        assert_eq!(classify_pacing(1.030001), PacingTier::SlightlySlow);
        assert_eq!(classify_pacing(0.90), PacingTier::SlightlyFast);
        assert_eq!(classify_pacing(0.899999), PacingTier::Fast);
        assert_eq!(classify_pacing(0.75), PacingTier::Fast);
        assert_eq!(classify_pacing(0.749999), PacingTier::CriticallyFast);
        assert_eq!(classify_pacing(1.10), PacingTier::SlightlySlow);
        assert_eq!(classify_pacing(1.100001), PacingTier::Slow);
        assert_eq!(classify_pacing(1.25), PacingTier::Slow);
        assert_eq!(classify_pacing(1.250001), PacingTier::CriticallySlow);
    }

    #[test]
    fn test_speech_only_duration_excludes_punctuation_words() {
        let segment = speech_with_words(&[
            ("—", 0.0, 0.2),
            ("Hello", 0.3, 0.7),
            ("world", 0.75, 1.2),
            ("...", 1.3, 1.6),
        ]);
        // От начала "Hello" до конца "world"
        assert!((speech_only_duration(&segment).unwrap() - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_speech_only_duration_missing_words() {
        let segment = bare_speech("no words here", 0.0, 2.0);
        assert!(speech_only_duration(&segment).is_none());
    }

    #[test]
    fn test_empty_input_gives_default_report() {
        let report = generate_pacing_report(&[]);

        assert_eq!(report.total_segments, 0);
        assert_eq!(report.overall_pacing, PacingTier::Perfect);
        assert_eq!(report.segments_needing_adjustment, 0);
        assert_eq!(report.recommendations.len(), 1);
    }

    #[test]
    fn test_pacing_uses_word_level_durations_not_raw_segment_span() {
        // Сырые границы сегментов совпадают, но слова пользователя
        // занимают лишь половину его сегмента
        let veo = speech_with_words(&[("one", 0.0, 0.5), ("two", 0.5, 1.0)]);
        let user = speech_with_words(&[("one", 0.0, 0.25), ("two", 0.25, 0.5)]);
        let results = vec![pair(veo, user)];

        let report = generate_pacing_report(&results);

        assert_eq!(report.total_segments, 1);
        assert!((report.segments[0].pacing_ratio - 0.5).abs() < 1e-9);
        assert_eq!(report.segments[0].tier, PacingTier::CriticallyFast);
        assert_eq!(report.degraded_segments, 0);
    }

    #[test]
    fn test_punctuation_only_words_fall_back_to_raw_duration() {
        // Метки есть, но реальных слов нет: деградация считается так же,
        // как при полном отсутствии меток
        let veo = speech_with_words(&[("—", 0.0, 0.5), ("...", 0.5, 1.0)]);
        let user = speech_with_words(&[("word", 0.0, 1.1)]);
        let report = generate_pacing_report(&[pair(veo, user)]);

        assert_eq!(report.degraded_segments, 1);
        // Эталон посчитан по сырой длительности 1.0
        assert!((report.segments[0].pacing_ratio - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_degraded_mode_falls_back_to_raw_duration() {
        let results = vec![pair(
            bare_speech("raw only", 0.0, 1.0),
            bare_speech("raw only", 0.0, 1.2),
        )];
        let report = generate_pacing_report(&results);

        assert_eq!(report.degraded_segments, 2);
        assert!((report.segments[0].pacing_ratio - 1.2).abs() < 1e-9);
        assert_eq!(report.segments[0].tier, PacingTier::Slow);
    }

    #[test]
    fn test_zero_reference_duration_gives_zero_ratio() {
        let results = vec![pair(
            bare_speech("instant", 1.0, 1.0),
            bare_speech("instant", 1.0, 1.5),
        )];
        let report = generate_pacing_report(&results);

        assert_eq!(report.segments[0].pacing_ratio, 0.0);
    }

    #[test]
    fn test_pauses_excluded_from_pacing() {
        let veo_pause = TimeSegment::pause("[pause]", 1.0, 2.0);
        let results = vec![
            pair(
                speech_with_words(&[("word", 0.0, 1.0)]),
                speech_with_words(&[("word", 0.0, 1.0)]),
            ),
            AlignmentResult {
                veo_segment: veo_pause.clone(),
                user_segment: veo_pause,
                time_stretch_ratio: 1.0,
                method: AlignMethod::Keep,
            },
        ];
        let report = generate_pacing_report(&results);

        assert_eq!(report.total_segments, 1);
        assert_eq!(report.overall_pacing, PacingTier::Perfect);
    }

    #[test]
    fn test_guidance_contains_percentage() {
        let results = vec![pair(
            speech_with_words(&[("line", 0.0, 1.0)]),
            speech_with_words(&[("line", 0.0, 1.2)]),
        )];
        let report = generate_pacing_report(&results);

        assert_eq!(report.segments[0].tier, PacingTier::Slow);
        assert!(report.segments[0].guidance.contains("20%"));
        assert!(report.segments[0].guidance.contains("slower"));
    }

    #[test]
    fn test_aggregates() {
        let results = vec![
            pair(
                speech_with_words(&[("a", 0.0, 1.0)]),
                speech_with_words(&[("a", 0.0, 1.2)]),
            ),
            pair(
                speech_with_words(&[("b", 2.0, 3.0)]),
                speech_with_words(&[("b", 2.0, 2.8)]),
            ),
        ];
        let report = generate_pacing_report(&results);

        assert_eq!(report.total_segments, 2);
        assert!((report.overall_ratio - 1.0).abs() < 1e-9);
        assert!((report.average_deviation - 0.2).abs() < 1e-9);
        assert_eq!(report.segments_needing_adjustment, 2);
        assert_eq!(report.overall_pacing, PacingTier::Perfect);
    }

    #[test]
    fn test_report_wire_shape() {
        let results = vec![pair(
            speech_with_words(&[("wire", 0.0, 1.0)]),
            speech_with_words(&[("wire", 0.0, 1.0)]),
        )];
        let report = generate_pacing_report(&results);
        let json = serde_json::to_value(&report).unwrap();

        assert!(json.get("overallRatio").is_some());
        assert!(json.get("overallPacing").is_some());
        assert!(json.get("segmentsNeedingAdjustment").is_some());
        assert!(json["segments"][0].get("pacingRatio").is_some());
        assert_eq!(json["segments"][0]["tier"], "perfect");
    }
}
