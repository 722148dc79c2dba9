//! Модуль жадного выравнивания сегментов
//!
//! Этот модуль сопоставляет эталонные сегменты с пользовательскими одним
//! проходом вперед. Это сознательное упрощение: полный DTW или выравнивание
//! по редакционному расстоянию устойчивее к дрейфу на несколько сегментов,
//! но не входит в задачу; просмотр вперед ограничен одним сегментом.

use crate::align::similarity::text_similarity;
use crate::align::{AlignMethod, AlignmentDiagnostic, AlignmentOutcome, AlignmentResult};
use crate::config::NarrationSyncConfig;
use crate::transcript::TimeSegment;

/// Выравнивание пользовательской дорожки по эталонной
///
/// Возвращает ровно по одному результату на каждый эталонный сегмент в
/// исходном порядке: на этот контракт опирается последующее растяжение
/// видео. Если пользовательская дорожка исчерпана раньше эталонной,
/// оставшиеся сегменты сопоставляются сами с собой с коэффициентом 1.0
/// и фиксируются в диагностике.
pub fn align_segments(
    veo: &[TimeSegment],
    user: &[TimeSegment],
    config: &NarrationSyncConfig,
) -> AlignmentOutcome {
    // Полные индексы нужны для позиционного поиска пауз рядом с курсором
    let user_speech: Vec<(usize, &TimeSegment)> = user
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_speech())
        .collect();

    let mut results = Vec::with_capacity(veo.len());
    let mut diagnostics = Vec::new();
    let mut user_idx = 0usize;
    let mut last_matched_full_idx: Option<usize> = None;

    for (veo_index, veo_seg) in veo.iter().enumerate() {
        if veo_seg.is_speech() {
            if user_idx >= user_speech.len() {
                log::warn!(
                    "User track exhausted at reference segment {} (\"{}\"), keeping original timing",
                    veo_index,
                    veo_seg.text
                );
                diagnostics.push(AlignmentDiagnostic::MissingUserSegment { veo_index });
                results.push(self_pair(veo_seg));
                continue;
            }

            // Просмотр на один сегмент вперед: исправляет единичную лишнюю
            // или пропущенную реплику пользователя
            let score = text_similarity(&veo_seg.text, &user_speech[user_idx].1.text);
            if score < config.lookahead_similarity_threshold && user_idx + 1 < user_speech.len() {
                let next_score =
                    text_similarity(&veo_seg.text, &user_speech[user_idx + 1].1.text);
                if next_score > score {
                    let skipped = user_speech[user_idx].1;
                    log::debug!(
                        "Lookahead skipped user segment \"{}\" at reference segment {} ({:.2} -> {:.2})",
                        skipped.text,
                        veo_index,
                        score,
                        next_score
                    );
                    diagnostics.push(AlignmentDiagnostic::LookaheadSkip {
                        veo_index,
                        skipped_text: skipped.text.clone(),
                    });
                    user_idx += 1;
                }
            }

            let (full_idx, user_seg) = user_speech[user_idx];
            let ratio = user_seg.duration / veo_seg.duration;
            results.push(AlignmentResult {
                veo_segment: veo_seg.clone(),
                user_segment: user_seg.clone(),
                time_stretch_ratio: ratio,
                method: classify_method(ratio, config),
            });
            last_matched_full_idx = Some(full_idx);
            user_idx += 1;
        } else {
            // Паузы синхронизируются нестрого: берем пользовательскую паузу
            // сразу за курсором выравнивания, если она там есть
            let candidate = last_matched_full_idx.map(|i| i + 1).unwrap_or(0);
            match user.get(candidate) {
                Some(user_seg) if !user_seg.is_speech() => {
                    let ratio = user_seg.duration / veo_seg.duration;
                    results.push(AlignmentResult {
                        veo_segment: veo_seg.clone(),
                        user_segment: user_seg.clone(),
                        time_stretch_ratio: ratio,
                        method: classify_method(ratio, config),
                    });
                }
                _ => {
                    diagnostics.push(AlignmentDiagnostic::UnmatchedPause { veo_index });
                    results.push(self_pair(veo_seg));
                }
            }
        }
    }

    if !diagnostics.is_empty() {
        log::info!(
            "Alignment finished with {} diagnostics over {} reference segments",
            diagnostics.len(),
            veo.len()
        );
    }

    AlignmentOutcome {
        results,
        diagnostics,
    }
}

/// Классификация способа подгонки по коэффициенту
fn classify_method(ratio: f64, config: &NarrationSyncConfig) -> AlignMethod {
    if ratio >= config.keep_ratio_min && ratio <= config.keep_ratio_max {
        AlignMethod::Keep
    } else if ratio > config.keep_ratio_max {
        AlignMethod::Stretch
    } else {
        AlignMethod::Compress
    }
}

/// Резервное сопоставление сегмента с самим собой (коэффициент 1.0)
fn self_pair(segment: &TimeSegment) -> AlignmentResult {
    AlignmentResult {
        veo_segment: segment.clone(),
        user_segment: segment.clone(),
        time_stretch_ratio: 1.0,
        method: AlignMethod::Keep,
    }
}
