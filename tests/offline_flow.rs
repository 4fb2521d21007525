use newsdesk::app::AppContext;
use newsdesk::config::Config;
use newsdesk::domain::{Article, FeedError, FeedState, Source};

fn offline_context() -> AppContext {
    let mut config = Config::default();
    config.connectivity.offline = true;
    AppContext::in_memory(config).unwrap()
}

fn article(url: &str, title: &str) -> Article {
    let mut article = Article::new(Source {
        id: Some("the-wire".into()),
        name: "The Wire".into(),
    });
    article.url = Some(url.into());
    article.title = Some(title.into());
    article.published_at = Some("2024-05-04T08:00:00Z".into());
    article
}

#[tokio::test]
async fn offline_feeds_report_no_connection() {
    let ctx = offline_context();
    let breaking = ctx.coordinator.observe_breaking_news();
    let search = ctx.coordinator.observe_search();

    let state = ctx.coordinator.fetch_breaking_news().await.unwrap();
    assert_eq!(state, FeedState::error(FeedError::NoConnection));
    assert_eq!(*breaking.borrow(), state);

    let state = ctx.coordinator.search_now("rust").await.unwrap();
    assert_eq!(state.message().as_deref(), Some("No internet connection"));
    assert_eq!(*search.borrow(), state);
    assert_eq!(ctx.coordinator.search_feed().next_page(), 1);
}

#[tokio::test]
async fn saved_articles_work_offline() {
    let ctx = offline_context();
    let mut saved = ctx.coordinator.observe_saved();
    assert!(saved.borrow_and_update().is_empty());

    let first = article("https://example.com/1", "First");
    let second = article("https://example.com/2", "Second");
    ctx.coordinator.save(&first).unwrap();
    ctx.coordinator.save(&second).unwrap();

    saved.changed().await.unwrap();
    let list = saved.borrow_and_update().clone();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].title.as_deref(), Some("First"));
    assert_eq!(list[0].source.name, "The Wire");
    assert_eq!(list[0].published_at, first.published_at);

    ctx.coordinator.remove(&list[0]).unwrap();
    saved.changed().await.unwrap();
    let list = saved.borrow_and_update().clone();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].url.as_deref(), Some("https://example.com/2"));
}
