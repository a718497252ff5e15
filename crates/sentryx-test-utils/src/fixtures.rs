//! Document builders.

use serde_json::json;

use sentryx_db::{Document, MemoryStore};

/// A raw, unprocessed post.
pub fn post(id: &str, text: &str) -> Document {
    Document::new(id).with("text", text)
}

/// Raw posts with passthrough metadata, in insertion order.
pub fn sample_posts() -> Vec<Document> {
    vec![
        post("post-001", "I LOVE this!!! 😊")
            .with("label", "not_harassment")
            .with("author", "sunny_day"),
        post("post-002", "You are a stupid idiot and everyone hates you")
            .with("label", "harassment")
            .with("type", "insult")
            .with("author", "anon42")
            .with("url", "https://forum.example.org/t/1#p2"),
        post("post-003", "<p>Check out <b>this</b> article https://news.example.com/a?id=7</p>")
            .with("label", "not_harassment"),
        post("post-004", "")
            .with("label", json!(null)),
        post("post-005", "The meeting is scheduled for Tuesday at the main office")
            .with("type", json!(3)),
        post("post-006", "What a wonderful and amazing community, thank you all")
            .with("author", json!({"name": "nested"})),
    ]
}

pub fn seeded_store() -> MemoryStore {
    MemoryStore::with_documents(sample_posts())
}
