//! Пример использования системы прогресса
//!
//! Этот пример демонстрирует, как отслеживать прогресс анализа наррации
//! и читать итоговые отчеты.

use narration_sync::{
    config::NarrationSyncConfig,
    notification::{ConsoleProgressObserver, MemoryProgressObserver},
    progress::{DefaultProgressReporter, ProgressReporter},
    transcript::WordTiming,
    NarrationSync,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Инициализируем логирование
    env_logger::init();

    // Временные метки слов обычно приходят от сервиса транскрипции;
    // здесь они заданы вручную
    let veo_words = vec![
        WordTiming::new("Welcome", 0.0, 0.5),
        WordTiming::new("to", 0.5, 0.7),
        WordTiming::new("the", 0.7, 0.9),
        WordTiming::new("demo", 0.9, 1.4),
        WordTiming::new("Let's", 2.0, 2.4),
        WordTiming::new("begin", 2.4, 3.0),
    ];
    let user_words = vec![
        WordTiming::new("Welcome", 0.0, 0.6),
        WordTiming::new("to", 0.6, 0.8),
        WordTiming::new("the", 0.8, 1.1),
        WordTiming::new("demo", 1.1, 1.7),
        WordTiming::new("Let's", 2.5, 3.0),
        WordTiming::new("begin", 3.0, 3.8),
    ];

    println!("Пример 1: Функция-обертка с прогрессом");

    let mut reporter = DefaultProgressReporter::new();
    reporter.add_observer(Box::new(ConsoleProgressObserver::new()));

    let analysis = narration_sync::analyze_narration_with_progress(
        &veo_words,
        &user_words,
        Box::new(reporter),
    )?;

    println!(
        "Качество выравнивания: {}, темп: {}",
        analysis.alignment_report.alignment_quality.as_str(),
        analysis.pacing_report.overall_pacing.as_str()
    );
    for recommendation in &analysis.alignment_report.recommendations {
        println!("Рекомендация: {}", recommendation);
    }

    println!("\nПример 2: Объект NarrationSync с настраиваемой конфигурацией");

    let config = NarrationSyncConfig {
        top_problem_limit: 3,
        ..NarrationSyncConfig::default()
    };

    let memory_observer = MemoryProgressObserver::new();
    let mut reporter = DefaultProgressReporter::new();
    reporter.add_observer(Box::new(memory_observer.clone()));

    let mut sync = NarrationSync::with_progress_reporter(config, Box::new(reporter));
    sync.add_observer(Box::new(ConsoleProgressObserver::with_prefix("[Custom] ")));

    let analysis = sync.analyze(&veo_words, &user_words)?;

    println!(
        "Получено {} обновлений прогресса, {} сегментов выровнено",
        memory_observer.history().len(),
        analysis.alignments.len()
    );
    println!(
        "Отчет в формате JSON:\n{}",
        serde_json::to_string_pretty(&analysis.pacing_report)?
    );

    Ok(())
}
