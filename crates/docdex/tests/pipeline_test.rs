//! End-to-end pipeline tests: ingest files, persist artifacts, query.

use docdex_chunker::ParagraphChunker;
use docdex_core::NoopOcr;
use docdex_embed::{EmbedderPool, HashEmbedder};
use docdex_extract::{ExtractorRegistry, ImageExtractor, TextExtractor};
use docdex_index::{IndexState, IngestOutcome, IngestionPipeline};
use docdex_query::{RetrievalConfig, RetrievalEngine};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

const DIM: usize = 32;

fn make_stack(data_dir: &Path) -> (Arc<IngestionPipeline>, RetrievalEngine) {
    let state = Arc::new(IndexState::new(DIM));

    let mut extractors = ExtractorRegistry::new();
    extractors.register(TextExtractor::new());
    extractors.register(ImageExtractor::new(Arc::new(NoopOcr)));
    let extractors = Arc::new(extractors);

    let embedder = Arc::new(EmbedderPool::new(
        Arc::new(HashEmbedder::with_dimension(DIM)),
        2,
        Duration::from_secs(5),
    ));

    let pipeline = Arc::new(IngestionPipeline::new(
        Arc::clone(&state),
        extractors,
        ParagraphChunker::new(500).unwrap(),
        Arc::clone(&embedder),
        data_dir.to_path_buf(),
    ));

    let engine = RetrievalEngine::new(state, embedder, RetrievalConfig::default());

    (pipeline, engine)
}

#[tokio::test]
async fn test_ingest_persist_reload_stays_aligned() {
    let uploads = tempdir().unwrap();
    let data = tempdir().unwrap();
    let (pipeline, _engine) = make_stack(data.path());

    let long = "a".repeat(400);
    std::fs::write(
        uploads.path().join("report.txt"),
        format!("{long}\n\n{long}\n\n{long}"),
    )
    .unwrap();
    std::fs::write(uploads.path().join("memo.txt"), "Short memo text.").unwrap();

    let outcome = pipeline.ingest(&uploads.path().join("report.txt")).await.unwrap();
    assert_eq!(outcome, IngestOutcome::Indexed(3));

    let outcome = pipeline.ingest(&uploads.path().join("memo.txt")).await.unwrap();
    assert_eq!(outcome, IngestOutcome::Indexed(1));

    // Reload from artifacts: load validates vector/store alignment
    let reloaded = IndexState::load(data.path(), DIM).unwrap();
    assert_eq!(reloaded.len().await, 4);
    assert_eq!(reloaded.document_count().await, 2);
    assert!(reloaded.contains_document("report.txt").await);
    assert!(reloaded.contains_document("memo.txt").await);
}

#[tokio::test]
async fn test_duplicate_file_name_leaves_index_unchanged() {
    let uploads = tempdir().unwrap();
    let data = tempdir().unwrap();
    let (pipeline, _engine) = make_stack(data.path());

    let file = uploads.path().join("notes.txt");
    std::fs::write(&file, "Original notes content.").unwrap();
    pipeline.ingest(&file).await.unwrap();

    let len_before = pipeline.state().len().await;

    std::fs::write(&file, "Rewritten notes, different content entirely.").unwrap();
    let outcome = pipeline.ingest(&file).await.unwrap();

    assert_eq!(outcome, IngestOutcome::SkippedDuplicate);
    assert_eq!(pipeline.state().len().await, len_before);
}

#[tokio::test]
async fn test_three_paragraph_file_yields_three_units_one_name() {
    let uploads = tempdir().unwrap();
    let data = tempdir().unwrap();
    let (pipeline, _engine) = make_stack(data.path());

    // Three ~400-char paragraphs with max_length 500: each flushes alone
    let paragraph = "word ".repeat(80);
    let file = uploads.path().join("triple.txt");
    std::fs::write(
        &file,
        format!("{}\n\n{}\n\n{}", paragraph.trim(), paragraph.trim(), paragraph.trim()),
    )
    .unwrap();

    let outcome = pipeline.ingest(&file).await.unwrap();
    assert_eq!(outcome, IngestOutcome::Indexed(3));
    assert_eq!(pipeline.state().document_count().await, 1);

    let units = pipeline.state().all_units().await;
    assert!(units.iter().all(|(name, _)| name == "triple.txt"));
}

#[tokio::test]
async fn test_retrieve_exact_text_and_threshold_filter() {
    let uploads = tempdir().unwrap();
    let data = tempdir().unwrap();
    let (pipeline, engine) = make_stack(data.path());

    std::fs::write(
        uploads.path().join("weather.txt"),
        "Heavy rain expected across the region tomorrow.",
    )
    .unwrap();
    pipeline
        .ingest(&uploads.path().join("weather.txt"))
        .await
        .unwrap();

    // Identical text embeds to distance zero, similarity 1.0
    let results = engine
        .retrieve("Heavy rain expected across the region tomorrow.", 3, 0.5)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].document_name, "weather.txt");
    assert!((results[0].similarity - 1.0).abs() < f32::EPSILON);

    // A threshold of exactly 1.0 still admits the perfect match
    let results = engine
        .retrieve("Heavy rain expected across the region tomorrow.", 3, 1.0)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn test_retrieve_clamps_k_to_index_size() {
    let uploads = tempdir().unwrap();
    let data = tempdir().unwrap();
    let (pipeline, engine) = make_stack(data.path());

    std::fs::write(uploads.path().join("a.txt"), "First document.").unwrap();
    std::fs::write(uploads.path().join("b.txt"), "Second document.").unwrap();
    pipeline.ingest(&uploads.path().join("a.txt")).await.unwrap();
    pipeline.ingest(&uploads.path().join("b.txt")).await.unwrap();

    let results = engine.retrieve("First document.", 10, 0.0).await.unwrap();
    assert_eq!(results.len(), 2);
    // Descending similarity, best hit first
    assert!(results[0].similarity >= results[1].similarity);
    assert_eq!(results[0].document_name, "a.txt");
}

#[tokio::test]
async fn test_retrieve_on_empty_index_is_empty() {
    let data = tempdir().unwrap();
    let (_pipeline, engine) = make_stack(data.path());

    let results = engine.retrieve("anything at all", 3, 0.5).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_multi_topic_query_returns_both_documents_once() {
    let uploads = tempdir().unwrap();
    let data = tempdir().unwrap();
    let (pipeline, engine) = make_stack(data.path());

    std::fs::write(
        uploads.path().join("Weather.txt"),
        "Forecast: heavy rain tomorrow, clearing by the weekend.",
    )
    .unwrap();
    std::fs::write(
        uploads.path().join("Time.txt"),
        "All timestamps are recorded in coordinated universal time.",
    )
    .unwrap();
    pipeline
        .ingest(&uploads.path().join("Weather.txt"))
        .await
        .unwrap();
    pipeline
        .ingest(&uploads.path().join("Time.txt"))
        .await
        .unwrap();

    let results = engine.multi_topic_search("weather and time").await.unwrap();

    let names: Vec<&str> = results.iter().map(|r| r.document_name.as_str()).collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Weather.txt"));
    assert!(names.contains(&"Time.txt"));
    // Exact name matches score 1.0
    assert!(results.iter().all(|r| r.similarity == 1.0));
}

#[tokio::test]
async fn test_image_placeholder_is_indexed_but_stays_out_of_results() {
    let uploads = tempdir().unwrap();
    let data = tempdir().unwrap();
    let (pipeline, engine) = make_stack(data.path());

    std::fs::write(uploads.path().join("chart.png"), [0x89, 0x50, 0x4e, 0x47]).unwrap();
    std::fs::write(uploads.path().join("notes.txt"), "Budget discussion notes.").unwrap();

    let outcome = pipeline.ingest(&uploads.path().join("chart.png")).await.unwrap();
    assert_eq!(outcome, IngestOutcome::Indexed(1));
    pipeline.ingest(&uploads.path().join("notes.txt")).await.unwrap();

    assert_eq!(pipeline.state().len().await, 2);

    // The zero-vector placeholder never clears a meaningful threshold
    let results = engine
        .retrieve("Budget discussion notes.", 3, 0.5)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].document_name, "notes.txt");
}
