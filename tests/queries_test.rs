use chrono::{Duration, Utc};
use timeline_scraper::queries::{DEFAULT_QUERY_LIMIT, MAX_QUERY_LIMIT};
use timeline_scraper::{ScraperError, TimelineQueries, Tweet, TweetStore};
use uuid::Uuid;

async fn seeded_store(count: usize) -> TweetStore {
    let store = TweetStore::in_memory().await.unwrap();
    let now = Utc::now();
    for i in 0..count {
        let tweet = Tweet {
            id: Uuid::new_v4(),
            tweet_id: format!("{i}"),
            content: format!("post {i}"),
            author: Some(if i % 2 == 0 { "alice" } else { "bob" }.to_string()),
            tweet_url: Some(format!("https://x.com/a/status/{i}")),
            thread_selected: false,
            scraped_at: now + Duration::seconds(i as i64),
            created_at: now,
            updated_at: now,
        };
        store.insert_if_absent(&tweet).await.unwrap();
    }
    store
}

#[tokio::test]
async fn limits_are_defaulted_and_clamped() {
    let store = seeded_store(60).await;
    let queries = TimelineQueries::new(store);

    let defaulted = queries.list(None, None).await.unwrap();
    assert_eq!(defaulted.len() as i64, DEFAULT_QUERY_LIMIT);

    // Nonsense limits get pulled into range instead of erroring.
    let clamped_low = queries.recent(Some(-3)).await.unwrap();
    assert_eq!(clamped_low.len(), 1);

    let clamped_high = queries.list(Some(MAX_QUERY_LIMIT + 1000), None).await.unwrap();
    assert_eq!(clamped_high.len(), 60);
}

#[tokio::test]
async fn author_lookup_validates_and_strips_the_at_sign() {
    let store = seeded_store(4).await;
    let queries = TimelineQueries::new(store);

    let plain = queries.by_author("alice").await.unwrap();
    let with_at = queries.by_author("@alice").await.unwrap();
    assert_eq!(plain.len(), 2);
    assert_eq!(plain.len(), with_at.len());

    let err = queries.by_author("   ").await.unwrap_err();
    assert!(matches!(err, ScraperError::InvalidInput(_)));
}

#[tokio::test]
async fn delete_translates_misses_to_a_negative_result() {
    let store = seeded_store(2).await;
    let queries = TimelineQueries::new(store);

    assert!(queries.delete("0").await.unwrap());
    assert!(!queries.delete("0").await.unwrap());
    assert!(!queries.delete("no-such-id").await.unwrap());

    let err = queries.delete("  ").await.unwrap_err();
    assert!(matches!(err, ScraperError::InvalidInput(_)));
}

#[tokio::test]
async fn thread_selection_round_trips_through_the_facade() {
    let store = seeded_store(1).await;
    let queries = TimelineQueries::new(store);

    assert!(queries.set_thread_selected("0", true).await.unwrap());
    let selected = queries.recent(Some(1)).await.unwrap().remove(0);
    assert!(selected.thread_selected);

    assert!(queries.set_thread_selected("0", false).await.unwrap());
    let unselected = queries.recent(Some(1)).await.unwrap().remove(0);
    assert!(!unselected.thread_selected);

    assert!(!queries.set_thread_selected("missing", true).await.unwrap());
}

#[tokio::test]
async fn health_tracks_store_reachability() {
    let store = seeded_store(0).await;
    let queries = TimelineQueries::new(store.clone());

    assert!(queries.health().await);
    store.close().await;
    assert!(!queries.health().await);
}
