
use opic_exam::bank::{open_bank, BankSource, Category, InMemoryStore, JsonFileBank, QuestionBank, StoreBank};
use opic_exam::config::ExamConfig;
use opic_exam::{ExamAssembler, TopicCatalog, TopicMap};

use crate::test_utils::{answers, bank_json, file_bank, store_bank, temp_path, topic_map};

#[tokio::test]
async fn file_and_store_banks_agree() {
    let file = file_bank();
    let store = store_bank();
    for (category, topic) in [
        (Category::Survey, Some("travel")),
        (Category::Survey, Some("Travel ")),
        (Category::RandomQuestion, Some("weather")),
        (Category::Survey, Some("golf")),
        (Category::RandomQuestion, None),
    ] {
        assert_eq!(
            file.fetch_pool(category, topic).await.unwrap(),
            store.fetch_pool(category, topic).await.unwrap(),
            "{category} / {topic:?}"
        );
    }
}

#[tokio::test]
async fn assembler_does_not_care_about_the_source() {
    let input = answers(&["dormitory", "yoga", "international travel"]);
    let from_file = ExamAssembler::new(topic_map(), file_bank(), TopicCatalog::default())
        .assemble(&input, Some(31))
        .await
        .unwrap();
    let from_store = ExamAssembler::new(topic_map(), store_bank(), TopicCatalog::default())
        .assemble(&input, Some(31))
        .await
        .unwrap();
    assert_eq!(from_file, from_store);
}

#[tokio::test]
async fn open_bank_reads_file_and_store_sources() {
    let path = temp_path("bank.json");
    tokio::fs::write(&path, bank_json().to_string()).await.unwrap();

    for source in [BankSource::File, BankSource::Store] {
        let config = ExamConfig { bank_source: source, bank_path: path.clone(), ..ExamConfig::default() };
        let bank = open_bank(&config).await.unwrap();
        let pool = bank.fetch_pool(Category::Survey, Some("yoga")).await.unwrap();
        assert_eq!(pool.len(), 5, "{source}");
    }

    let _ = tokio::fs::remove_file(&path).await;
}

#[tokio::test]
async fn missing_and_malformed_files_are_empty() {
    let missing = temp_path("does_not_exist.json");
    let bank = JsonFileBank::load(&missing).await.unwrap();
    assert!(bank.fetch(Category::Survey, None).await.unwrap().is_empty());
    let store = InMemoryStore::load_seed(&missing).await.unwrap();
    assert!(store.is_empty());

    let malformed = temp_path("malformed.json");
    tokio::fs::write(&malformed, "{\"survey\": [").await.unwrap();
    let bank = JsonFileBank::load(&malformed).await.unwrap();
    assert!(bank.fetch(Category::Survey, None).await.unwrap().is_empty());
    let map = TopicMap::load(&malformed).await.unwrap();
    assert!(map.is_empty());
    let _ = tokio::fs::remove_file(&malformed).await;
}

#[tokio::test]
async fn reading_a_directory_is_an_io_error() {
    let dir = temp_path("bank_dir");
    tokio::fs::create_dir_all(&dir).await.unwrap();
    assert!(JsonFileBank::load(&dir).await.is_err());
    assert!(TopicMap::load(&dir).await.is_err());
    let _ = tokio::fs::remove_dir(&dir).await;
}

#[tokio::test]
async fn topic_map_file_round_trip() {
    let path = temp_path("topic_map.json");
    tokio::fs::write(&path, r#"{"Dormitory": "housing", "요가": "yoga"}"#).await.unwrap();
    let map = TopicMap::load(&path).await.unwrap();
    assert_eq!(map.resolve(&answers(&["dormitory", "요가", "chess"])), vec!["housing", "yoga"]);
    let _ = tokio::fs::remove_file(&path).await;
}

#[tokio::test]
async fn store_bank_reads_first_matching_document() {
    let store = InMemoryStore::from_seed(&bank_json());
    store
        .insert_many(vec![opic_exam::bank::QuestionDocument::new(
            Category::Survey,
            Some("yoga"),
            ["A later yoga document?"],
        )])
        .unwrap();
    let bank = StoreBank::new(store);
    let pool = bank.fetch(Category::Survey, Some("yoga")).await.unwrap();
    assert_eq!(pool.len(), 5);
    assert!(!pool.contains(&"A later yoga document?".to_string()));

    let all = bank.fetch(Category::Survey, None).await.unwrap();
    assert!(all.contains(&"A later yoga document?".to_string()));
}
