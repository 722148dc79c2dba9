//! Модуль отчета о коррекции времени
//!
//! Этот модуль отвечает на вопрос: сколько коррекции применил конвейер
//! и можно ли ей доверять. Коэффициенты, вышедшие за безопасный диапазон
//! растяжения, считаются свидетельством того, что автоматика не смогла
//! полностью компенсировать расхождение.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::align::similarity::text_similarity;
use crate::align::{clamp_stretch_ratio, AlignmentResult};
use crate::config::{NarrationSyncConfig, SeverityPolicy};
use crate::report::{AlignmentQuality, OverallTiming, Severity};

/// Вид примененной коррекции сегмента
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adjustment {
    /// Сегмент растянут
    Stretched,
    /// Сегмент сжат
    Compressed,
    /// Сегмент не изменялся
    Unchanged,
}

impl Adjustment {
    /// Получить строковое представление коррекции
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stretched => "stretched",
            Self::Compressed => "compressed",
            Self::Unchanged => "unchanged",
        }
    }
}

/// Отчет по одному сегменту
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentReport {
    /// Индекс эталонного сегмента
    pub index: usize,
    /// Текст эталонного сегмента
    pub veo_text: String,
    /// Текст пользовательского сегмента
    pub user_text: String,
    /// Схожесть текстов [0, 1]
    pub text_similarity: f64,
    /// Исходный коэффициент растяжения
    pub raw_ratio: f64,
    /// Примененный коэффициент (после ограничения)
    pub applied_ratio: f64,
    /// Был ли коэффициент ограничен безопасным диапазоном
    pub was_clamped: bool,
    /// Вид коррекции
    pub adjustment: Adjustment,
    /// Человекочитаемое описание изменения темпа
    pub speed_change: String,
    /// Серьезность проблемы
    pub severity: Severity,
}

/// Проблемный сегмент в ранжированном списке
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSegment {
    /// Индекс эталонного сегмента
    pub index: usize,
    /// Текст эталонного сегмента
    pub veo_text: String,
    /// Текст пользовательского сегмента
    pub user_text: String,
    /// Серьезность проблемы
    pub severity: Severity,
    /// Описание проблемы
    pub issue: String,
    /// Рекомендация по исправлению
    pub recommendation: String,
}

/// Отчет о примененной коррекции времени
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentReport {
    /// Время формирования отчета
    pub generated_at: DateTime<Local>,
    /// Количество сегментов
    pub total_segments: usize,
    /// Количество речевых сегментов
    pub speech_segments: usize,
    /// Средний коэффициент растяжения
    pub average_ratio: f64,
    /// Среднее абсолютное отклонение коэффициента от 1.0
    pub average_deviation: f64,
    /// Итоговая оценка качества выравнивания
    pub alignment_quality: AlignmentQuality,
    /// Общая оценка темпа
    pub overall_timing: OverallTiming,
    /// Использованная политика серьезности
    pub severity_policy: SeverityPolicy,
    /// Отчеты по сегментам
    pub segments: Vec<SegmentReport>,
    /// Худшие сегменты, ранжированные по серьезности проблемы
    pub top_problem_segments: Vec<ProblemSegment>,
    /// Рекомендации
    pub recommendations: Vec<String>,
}

/// Построение отчета о коррекции времени
///
/// Пустой вход дает корректный отчет с нулем сегментов и единственной
/// рекомендацией, а не ошибку.
pub fn generate_alignment_report(
    results: &[AlignmentResult],
    config: &NarrationSyncConfig,
) -> AlignmentReport {
    if results.is_empty() {
        return AlignmentReport {
            generated_at: Local::now(),
            total_segments: 0,
            speech_segments: 0,
            average_ratio: 1.0,
            average_deviation: 0.0,
            alignment_quality: AlignmentQuality::Excellent,
            overall_timing: OverallTiming::Perfect,
            severity_policy: config.severity_policy,
            segments: Vec::new(),
            top_problem_segments: Vec::new(),
            recommendations: vec![
                "No aligned segments to analyze. Record narration for the reference video first."
                    .to_string(),
            ],
        };
    }

    let segments: Vec<SegmentReport> = results
        .iter()
        .enumerate()
        .map(|(index, result)| build_segment_report(index, result, config))
        .collect();

    let total = segments.len();
    let average_ratio = results.iter().map(|r| r.time_stretch_ratio).sum::<f64>() / total as f64;
    let average_deviation = results
        .iter()
        .map(|r| (r.time_stretch_ratio - 1.0).abs())
        .sum::<f64>()
        / total as f64;
    let critical_fraction = segments
        .iter()
        .filter(|s| s.severity == Severity::Critical)
        .count() as f64
        / total as f64;

    let alignment_quality = classify_quality(average_deviation, critical_fraction);
    let overall_timing = classify_overall_timing(average_ratio);
    let top_problem_segments = rank_problem_segments(&segments, config.top_problem_limit);
    let recommendations =
        build_recommendations(&segments, alignment_quality, overall_timing);

    log::info!(
        "Alignment report: {} segments, avg ratio {:.3}, quality {}",
        total,
        average_ratio,
        alignment_quality.as_str()
    );

    AlignmentReport {
        generated_at: Local::now(),
        total_segments: total,
        speech_segments: results.iter().filter(|r| r.veo_segment.is_speech()).count(),
        average_ratio,
        average_deviation,
        alignment_quality,
        overall_timing,
        severity_policy: config.severity_policy,
        segments,
        top_problem_segments,
        recommendations,
    }
}

/// Отчет по одному сегменту выравнивания
fn build_segment_report(
    index: usize,
    result: &AlignmentResult,
    config: &NarrationSyncConfig,
) -> SegmentReport {
    let raw_ratio = result.time_stretch_ratio;
    let applied_ratio = clamp_stretch_ratio(raw_ratio);
    let was_clamped = applied_ratio != raw_ratio;
    let similarity = text_similarity(&result.veo_segment.text, &result.user_segment.text);

    let adjustment = if raw_ratio > 1.05 {
        Adjustment::Stretched
    } else if raw_ratio < 0.95 {
        Adjustment::Compressed
    } else {
        Adjustment::Unchanged
    };

    let speed_change = if raw_ratio > 1.05 {
        format!("{:.0}% slower", (raw_ratio - 1.0) * 100.0)
    } else if raw_ratio < 0.95 {
        format!("{:.0}% faster", (1.0 - raw_ratio) * 100.0)
    } else {
        "perfect match".to_string()
    };

    let severity = match config.severity_policy {
        SeverityPolicy::TextAware => classify_severity_text_aware(raw_ratio, similarity, was_clamped),
        SeverityPolicy::TimingOnly => classify_severity_timing_only(raw_ratio),
    };

    SegmentReport {
        index,
        veo_text: result.veo_segment.text.clone(),
        user_text: result.user_segment.text.clone(),
        text_similarity: similarity,
        raw_ratio,
        applied_ratio,
        was_clamped,
        adjustment,
        speed_change,
        severity,
    }
}

/// Каноническая политика серьезности: учитывает совпадение текста и
/// факт ограничения коэффициента
fn classify_severity_text_aware(ratio: f64, similarity: f64, was_clamped: bool) -> Severity {
    // Ограничение означает, что автоматика не компенсировала расхождение
    if was_clamped || similarity < 0.2 {
        return Severity::Critical;
    }
    if similarity < 0.5 {
        return Severity::Major;
    }

    let deviation = (ratio - 1.0).abs();
    if deviation < 0.05 {
        Severity::Perfect
    } else if deviation < 0.15 {
        Severity::Minor
    } else if deviation < 0.30 {
        Severity::Major
    } else {
        Severity::Critical
    }
}

/// Историческая политика серьезности: только отклонение коэффициента
fn classify_severity_timing_only(ratio: f64) -> Severity {
    let deviation = (ratio - 1.0).abs();
    if deviation < 0.05 {
        Severity::Perfect
    } else if deviation < 0.15 {
        Severity::Minor
    } else if deviation < 0.30 {
        Severity::Major
    } else {
        Severity::Critical
    }
}

/// Итоговая оценка качества по среднему отклонению и доле критичных сегментов
fn classify_quality(average_deviation: f64, critical_fraction: f64) -> AlignmentQuality {
    if average_deviation < 0.10 && critical_fraction == 0.0 {
        AlignmentQuality::Excellent
    } else if average_deviation < 0.15 && critical_fraction < 0.30 {
        AlignmentQuality::Good
    } else if average_deviation < 0.20 {
        AlignmentQuality::Acceptable
    } else if average_deviation < 0.40 && critical_fraction < 0.70 {
        // Растяжение времени поглощает и крупные поправки
        AlignmentQuality::Acceptable
    } else {
        AlignmentQuality::Poor
    }
}

/// Общая оценка темпа по среднему коэффициенту
fn classify_overall_timing(average_ratio: f64) -> OverallTiming {
    if average_ratio > 1.1 {
        OverallTiming::TooSlow
    } else if average_ratio < 0.9 {
        OverallTiming::TooFast
    } else {
        OverallTiming::Perfect
    }
}

/// Ранжирование худших сегментов
///
/// Составная оценка ставит расхождение текста выше чистого отклонения
/// темпа: сегмент с чужим текстом не исправить растяжением.
fn rank_problem_segments(segments: &[SegmentReport], limit: usize) -> Vec<ProblemSegment> {
    let mut problems: Vec<&SegmentReport> = segments
        .iter()
        .filter(|s| s.severity >= Severity::Major)
        .collect();

    problems.sort_by(|a, b| {
        let score_a = problem_score(a);
        let score_b = problem_score(b);
        score_b.partial_cmp(&score_a).unwrap_or(std::cmp::Ordering::Equal)
    });

    problems
        .into_iter()
        .take(limit)
        .map(|s| {
            let (issue, recommendation) = describe_problem(s);
            ProblemSegment {
                index: s.index,
                veo_text: s.veo_text.clone(),
                user_text: s.user_text.clone(),
                severity: s.severity,
                issue,
                recommendation,
            }
        })
        .collect()
}

fn problem_score(segment: &SegmentReport) -> f64 {
    (1.0 - segment.text_similarity) * 2.0 + (segment.raw_ratio - 1.0).abs()
}

/// Описание проблемы сегмента и рекомендация по исправлению
fn describe_problem(segment: &SegmentReport) -> (String, String) {
    if segment.was_clamped {
        (
            format!(
                "timing requires a {:.2}x adjustment but only {:.2}x is safe to apply",
                segment.raw_ratio, segment.applied_ratio
            ),
            "Re-record this segment at a pace closer to the reference.".to_string(),
        )
    } else if segment.text_similarity < 0.5 {
        (
            format!(
                "spoken text diverges from the reference (similarity {:.0}%)",
                segment.text_similarity * 100.0
            ),
            "Re-record this segment following the reference wording.".to_string(),
        )
    } else {
        (
            format!(
                "timing is off by {:.0}%",
                (segment.raw_ratio - 1.0).abs() * 100.0
            ),
            if segment.raw_ratio > 1.0 {
                "Speak this line a bit faster.".to_string()
            } else {
                "Speak this line a bit slower.".to_string()
            },
        )
    }
}

/// Свободные рекомендации по всему отчету
fn build_recommendations(
    segments: &[SegmentReport],
    quality: AlignmentQuality,
    timing: OverallTiming,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    let clamped = segments.iter().filter(|s| s.was_clamped).count();
    if clamped > 0 {
        recommendations.push(format!(
            "{} segment(s) exceeded the safe time-stretch range and could not be fully compensated; re-record them.",
            clamped
        ));
    }

    match timing {
        OverallTiming::TooSlow => recommendations
            .push("Overall the narration is slower than the reference; try speaking faster.".to_string()),
        OverallTiming::TooFast => recommendations
            .push("Overall the narration is faster than the reference; try speaking slower.".to_string()),
        OverallTiming::Perfect => {}
    }

    if quality == AlignmentQuality::Poor {
        recommendations.push(
            "Alignment quality is poor; a full re-recording will likely give a better result."
                .to_string(),
        );
    }

    if recommendations.is_empty() {
        recommendations.push("Narration aligns well with the reference video.".to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::AlignMethod;
    use crate::transcript::{SegmentKind, TimeSegment};

    fn speech(text: &str, start: f64, end: f64) -> TimeSegment {
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

    fn config() -> NarrationSyncConfig {
        NarrationSyncConfig::default()
    }

    #[test]
    fn test_empty_input_gives_default_report() {
        let report = generate_alignment_report(&[], &config());

        assert_eq!(report.total_segments, 0);
        assert_eq!(report.alignment_quality, AlignmentQuality::Excellent);
        assert_eq!(report.overall_timing, OverallTiming::Perfect);
        assert_eq!(report.recommendations.len(), 1);
        assert!(report.top_problem_segments.is_empty());
    }

    #[test]
    fn test_slow_narration_reported_too_slow() {
        let results = vec![
            pair(speech("Hello there", 0.0, 1.0), speech("Hello there", 0.0, 1.2)),
            pair(speech("How are you", 1.5, 3.0), speech("How are you", 1.2, 3.4)),
        ];
        let report = generate_alignment_report(&results, &config());

        assert_eq!(report.total_segments, 2);
        assert_eq!(report.overall_timing, OverallTiming::TooSlow);
        assert!((report.segments[0].raw_ratio - 1.2).abs() < 1e-9);
        assert_eq!(report.segments[0].adjustment, Adjustment::Stretched);
        assert_eq!(report.segments[0].speed_change, "20% slower");
        assert_eq!(report.segments[1].adjustment, Adjustment::Stretched);
    }

    #[test]
    fn test_clamped_segment_is_critical_and_ranked() {
        let results = vec![pair(
            speech("quick test", 0.0, 1.0),
            speech("quick test", 0.0, 0.1),
        )];
        let report = generate_alignment_report(&results, &config());

        let segment = &report.segments[0];
        assert!((segment.raw_ratio - 0.1).abs() < 1e-9);
        assert_eq!(segment.applied_ratio, 0.5);
        assert!(segment.was_clamped);
        assert_eq!(segment.severity, Severity::Critical);
        assert_eq!(report.top_problem_segments.len(), 1);
        assert_eq!(report.top_problem_segments[0].index, 0);
    }

    #[test]
    fn test_perfect_match_segment() {
        let results = vec![pair(speech("same line", 0.0, 2.0), speech("same line", 0.0, 2.02))];
        let report = generate_alignment_report(&results, &config());

        let segment = &report.segments[0];
        assert_eq!(segment.adjustment, Adjustment::Unchanged);
        assert_eq!(segment.speed_change, "perfect match");
        assert_eq!(segment.severity, Severity::Perfect);
        assert!(!segment.was_clamped);
        assert_eq!(report.alignment_quality, AlignmentQuality::Excellent);
    }

    #[test]
    fn test_text_mismatch_elevates_severity() {
        // Темп идеален, но текст совсем другой
        let results = vec![pair(
            speech("open the door please", 0.0, 1.0),
            speech("something entirely different", 0.0, 1.0),
        )];
        let report = generate_alignment_report(&results, &config());

        assert_eq!(report.segments[0].severity, Severity::Critical);
        assert_eq!(report.top_problem_segments.len(), 1);
        assert!(report.top_problem_segments[0]
            .issue
            .contains("diverges from the reference"));
    }

    #[test]
    fn test_timing_only_policy_ignores_text() {
        let mut config = config();
        config.severity_policy = SeverityPolicy::TimingOnly;

        let results = vec![pair(
            speech("open the door please", 0.0, 1.0),
            speech("something entirely different", 0.0, 1.0),
        )];
        let report = generate_alignment_report(&results, &config);

        assert_eq!(report.segments[0].severity, Severity::Perfect);
        assert_eq!(report.severity_policy, SeverityPolicy::TimingOnly);
    }

    #[test]
    fn test_text_mismatch_ranked_above_timing_deviation() {
        let results = vec![
            // Заметное отклонение темпа, текст совпадает
            pair(speech("matching words here", 0.0, 1.0), speech("matching words here", 0.0, 1.25)),
            // Текст расходится
            pair(speech("alpha beta gamma", 2.0, 3.0), speech("delta epsilon zeta", 2.0, 3.0)),
        ];
        let report = generate_alignment_report(&results, &config());

        assert_eq!(report.top_problem_segments[0].index, 1);
    }

    #[test]
    fn test_top_problems_limited_to_five() {
        let results: Vec<AlignmentResult> = (0..8)
            .map(|i| {
                let start = i as f64 * 2.0;
                pair(
                    speech("line one two three", start, start + 1.0),
                    speech("line one two three", start, start + 1.4),
                )
            })
            .collect();
        let report = generate_alignment_report(&results, &config());

        // Отклонение 40% дает critical у всех восьми, в списке остаются пять
        assert_eq!(report.top_problem_segments.len(), 5);
    }

    #[test]
    fn test_quality_carve_out_for_large_but_absorbable_deviation() {
        // Среднее отклонение 22.5% при половине критичных сегментов:
        // все еще acceptable за счет расширенного порога
        let deviations = [0.35, 0.35, 0.1, 0.1];
        let results: Vec<AlignmentResult> = deviations
            .iter()
            .enumerate()
            .map(|(i, dev)| {
                let start = i as f64 * 2.0;
                pair(
                    speech("steady line of words", start, start + 1.0),
                    speech("steady line of words", start, start + 1.0 + dev),
                )
            })
            .collect();
        let report = generate_alignment_report(&results, &config());

        assert_eq!(report.alignment_quality, AlignmentQuality::Acceptable);
    }

    #[test]
    fn test_report_wire_shape() {
        let results = vec![pair(speech("wire", 0.0, 1.0), speech("wire", 0.0, 1.0))];
        let report = generate_alignment_report(&results, &config());
        let json = serde_json::to_value(&report).unwrap();

        assert!(json.get("totalSegments").is_some());
        assert!(json.get("alignmentQuality").is_some());
        assert!(json.get("overallTiming").is_some());
        assert!(json.get("topProblemSegments").is_some());
        assert!(json["segments"][0].get("textSimilarity").is_some());
        assert!(json["segments"][0].get("appliedRatio").is_some());
        assert!(json["segments"][0].get("speedChange").is_some());
    }
}
