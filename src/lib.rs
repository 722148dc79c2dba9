//! Основной файл библиотеки narration-sync с поддержкой системы прогресса
//!
//! Эта библиотека выравнивает перезаписанную пользователем наррацию по
//! эталонной ("veo") видеодорожке: группирует слова с временными метками
//! в сегменты речи и пауз, сопоставляет сегменты двух дорожек, вычисляет
//! коэффициенты растяжения времени для дальнейшей обработки видео и
//! формирует отчеты о коррекции и темпе речи.
//!
//! Временные метки слов поставляет внешний сервис транскрипции; сам движок
//! не выполняет ввод-вывод и может выполняться повторно на тех же данных.

pub mod align;
pub mod config;
pub mod error;
pub mod notification;
pub mod progress;
pub mod report;
pub mod transcript;

use serde::{Deserialize, Serialize};

use crate::align::aligner::align_segments;
use crate::align::{AlignmentDiagnostic, AlignmentResult};
use crate::config::NarrationSyncConfig;
use crate::error::{NarrationSyncError, Result};
use crate::progress::{ProcessStep, ProgressObserver, ProgressReporter, ProgressTracker};
use crate::report::pacing::{generate_pacing_report, PacingReport};
use crate::report::timing::{generate_alignment_report, AlignmentReport};
use crate::transcript::extractor::extract_segments;
use crate::transcript::{TimeSegment, WordTiming};

pub use crate::align::clamp_stretch_ratio;
pub use crate::config::SeverityPolicy;

/// Полный результат анализа наррации
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrationAnalysis {
    /// Сегменты эталонной дорожки
    pub veo_segments: Vec<TimeSegment>,
    /// Сегменты пользовательской дорожки
    pub user_segments: Vec<TimeSegment>,
    /// Результаты выравнивания, по одному на эталонный сегмент
    pub alignments: Vec<AlignmentResult>,
    /// Диагностические события выравнивания
    pub diagnostics: Vec<AlignmentDiagnostic>,
    /// Отчет о примененной коррекции времени
    pub alignment_report: AlignmentReport,
    /// Отчет о темпе речи
    pub pacing_report: PacingReport,
}

/// Основная структура для работы с библиотекой
pub struct NarrationSync {
    /// Конфигурация движка
    config: NarrationSyncConfig,
    /// Трекер прогресса
    progress_tracker: Option<ProgressTracker>,
}

impl NarrationSync {
    /// Создать новый экземпляр NarrationSync с указанной конфигурацией
    pub fn new(config: NarrationSyncConfig) -> Self {
        Self {
            config,
            progress_tracker: None,
        }
    }

    /// Создать экземпляр NarrationSync с настройками по умолчанию
    pub fn with_defaults() -> Self {
        Self::new(NarrationSyncConfig::default())
    }

    /// Создать новый экземпляр NarrationSync с репортером прогресса
    pub fn with_progress_reporter(
        config: NarrationSyncConfig,
        reporter: Box<dyn ProgressReporter>,
    ) -> Self {
        Self {
            config,
            progress_tracker: Some(ProgressTracker::with_reporter(reporter)),
        }
    }

    /// Установить репортер прогресса
    pub fn set_progress_reporter(&mut self, reporter: Box<dyn ProgressReporter>) {
        match &mut self.progress_tracker {
            Some(tracker) => tracker.set_reporter(reporter),
            None => self.progress_tracker = Some(ProgressTracker::with_reporter(reporter)),
        }
    }

    /// Добавить наблюдателя прогресса
    pub fn add_observer(&mut self, observer: Box<dyn ProgressObserver>) -> Option<usize> {
        self.progress_tracker
            .as_mut()
            .and_then(|tracker| tracker.add_observer(observer))
    }

    /// Основной метод анализа наррации
    ///
    /// Принимает слова с временными метками обеих дорожек, возвращает
    /// выравнивание и оба отчета. Сам анализ не порождает ошибок: ошибки
    /// возможны только на границе (некорректная конфигурация или метки).
    pub fn analyze(
        &self,
        veo_words: &[WordTiming],
        user_words: &[WordTiming],
    ) -> Result<NarrationAnalysis> {
        log::info!(
            "Starting narration analysis: {} reference words, {} user words",
            veo_words.len(),
            user_words.len()
        );

        self.config.validate()?;
        validate_word_timings(veo_words, "reference")?;
        validate_word_timings(user_words, "user")?;

        let tracker = self.progress_tracker.as_ref();

        // 1. Извлечение сегментов
        if let Some(t) = tracker {
            t.set_step(ProcessStep::SegmentExtraction);
            t.update_step_progress(0.0, Some("Извлечение сегментов эталона".to_string()));
        }

        let veo_segments = extract_segments(veo_words, &self.config);

        if let Some(t) = tracker {
            t.update_step_progress(50.0, Some("Извлечение сегментов пользователя".to_string()));
        }

        let user_segments = extract_segments(user_words, &self.config);

        if let Some(t) = tracker {
            t.update_step_progress(100.0, Some("Извлечение сегментов завершено".to_string()));
        }

        // 2. Выравнивание
        if let Some(t) = tracker {
            t.set_step(ProcessStep::SpeechAlignment);
            t.update_step_progress(0.0, Some("Начало выравнивания".to_string()));
        }

        let outcome = align_segments(&veo_segments, &user_segments, &self.config);

        if let Some(t) = tracker {
            t.update_step_progress(100.0, Some("Выравнивание завершено".to_string()));
        }

        // 3. Отчеты
        if let Some(t) = tracker {
            t.set_step(ProcessStep::ReportGeneration);
            t.update_step_progress(0.0, Some("Отчет о коррекции времени".to_string()));
        }

        let alignment_report = generate_alignment_report(&outcome.results, &self.config);

        if let Some(t) = tracker {
            t.update_step_progress(50.0, Some("Отчет о темпе речи".to_string()));
        }

        let pacing_report = generate_pacing_report(&outcome.results);

        if let Some(t) = tracker {
            t.update_step_progress(100.0, None);
            t.complete();
        }

        log::info!(
            "Narration analysis completed: quality {}, pacing {}",
            alignment_report.alignment_quality.as_str(),
            pacing_report.overall_pacing.as_str()
        );

        Ok(NarrationAnalysis {
            veo_segments,
            user_segments,
            alignments: outcome.results,
            diagnostics: outcome.diagnostics,
            alignment_report,
            pacing_report,
        })
    }
}

/// Проверка временных меток на границе движка
fn validate_word_timings(words: &[WordTiming], track: &str) -> Result<()> {
    for (i, word) in words.iter().enumerate() {
        if word.end < word.start {
            return Err(NarrationSyncError::InvalidTimings(format!(
                "{} track: word {} (\"{}\") ends before it starts ({} < {})",
                track, i, word.word, word.end, word.start
            )));
        }
    }
    for (i, pair) in words.windows(2).enumerate() {
        if pair[1].start < pair[0].start {
            return Err(NarrationSyncError::InvalidTimings(format!(
                "{} track: word starts are not monotonic at index {}",
                track,
                i + 1
            )));
        }
    }
    Ok(())
}

/// Публичный API для удобного использования
pub fn analyze_narration(
    veo_words: &[WordTiming],
    user_words: &[WordTiming],
) -> Result<NarrationAnalysis> {
    NarrationSync::with_defaults().analyze(veo_words, user_words)
}

/// Публичный API с поддержкой отслеживания прогресса
pub fn analyze_narration_with_progress(
    veo_words: &[WordTiming],
    user_words: &[WordTiming],
    reporter: Box<dyn ProgressReporter>,
) -> Result<NarrationAnalysis> {
    NarrationSync::with_progress_reporter(NarrationSyncConfig::default(), reporter)
        .analyze(veo_words, user_words)
}
