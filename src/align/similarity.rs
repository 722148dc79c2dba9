//! Модуль оценки схожести текста
//!
//! Этот модуль содержит дешевую эвристику сопоставления текстов,
//! используемую выравнивателем. Это не метрика точности транскрипции.

use std::collections::HashSet;

/// Оценка схожести двух текстов в диапазоне [0, 1]
///
/// Тексты приводятся к нижнему регистру и разбиваются на множества слов
/// (дубликаты схлопываются), после чего вычисляется коэффициент Жаккара:
/// |пересечение| / |объединение|. Порядок слов не учитывается.
/// Если хотя бы одно множество пусто, возвращается 0.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let set_a: HashSet<String> = a.to_lowercase().split_whitespace().map(String::from).collect();
    let set_b: HashSet<String> = b.to_lowercase().split_whitespace().map(String::from).collect();

    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();

    intersection as f64 / union as f64
}
