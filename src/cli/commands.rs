use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::{AppContext, NewsdeskError, Result};
use crate::domain::{Article, FeedSnapshot, FeedState};

pub async fn headlines(ctx: &AppContext, pages: u32, save: Option<usize>) -> Result<()> {
    let coordinator = &ctx.coordinator;
    let _rx = coordinator.observe_breaking_news();

    let mut state = coordinator.fetch_breaking_news().await;
    for _ in 1..pages {
        if !state.as_ref().is_some_and(FeedState::is_success) {
            break;
        }
        match coordinator.load_more_breaking_news().await {
            Some(next) => state = Some(next),
            None => break,
        }
    }

    finish(ctx, state, save)
}

pub async fn search(ctx: &AppContext, term: &str, pages: u32, save: Option<usize>) -> Result<()> {
    let coordinator = &ctx.coordinator;
    let _rx = coordinator.observe_search();

    let mut state = coordinator.search_now(term).await;
    for _ in 1..pages {
        if !state.as_ref().is_some_and(FeedState::is_success) {
            break;
        }
        match coordinator.load_more_search().await {
            Some(next) => state = Some(next),
            None => break,
        }
    }

    finish(ctx, state, save)
}

fn finish(
    ctx: &AppContext,
    state: Option<FeedState<FeedSnapshot>>,
    save: Option<usize>,
) -> Result<()> {
    let Some(state) = state else {
        println!("Nothing to show");
        return Ok(());
    };

    print_state(&state);
    if let Some(index) = save {
        save_result(ctx, &state, index)?;
    }
    Ok(())
}

/// Read queries from stdin and print search results as they arrive.
pub async fn prompt(ctx: &AppContext) -> Result<()> {
    let coordinator = &ctx.coordinator;
    let mut rx = coordinator.observe_search();
    rx.borrow_and_update();

    println!("Type a query to search. '+' loads more, 's N' saves result N, empty line quits.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match line.trim() {
                    "" => break,
                    "+" => {
                        if coordinator.load_more_search().await.is_none() {
                            println!("No more results");
                        }
                    }
                    cmd if cmd.starts_with("s ") => {
                        let state = coordinator.search_feed().current();
                        match cmd[2..].trim().parse::<usize>() {
                            Ok(index) => {
                                if let Err(e) = save_result(ctx, &state, index) {
                                    eprintln!("Could not save: {}", e);
                                }
                            }
                            Err(_) => eprintln!("Usage: s <result number>"),
                        }
                    }
                    term => coordinator.search(term),
                }
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                print_state(&state);
            }
        }
    }

    coordinator.close_search();
    Ok(())
}

pub fn list_saved(ctx: &AppContext) -> Result<()> {
    let saved = ctx.coordinator.saved()?;

    if saved.is_empty() {
        println!("No saved articles");
        return Ok(());
    }

    for (i, article) in saved.iter().enumerate() {
        print_article(i + 1, article);
    }
    Ok(())
}

pub fn remove_saved(ctx: &AppContext, url: &str) -> Result<()> {
    let article = ctx
        .coordinator
        .find_saved(url)?
        .ok_or_else(|| NewsdeskError::ArticleNotFound(url.to_string()))?;

    ctx.coordinator.remove(&article)?;
    println!("Removed: {}", article.display_title());
    Ok(())
}

fn save_result(ctx: &AppContext, state: &FeedState<FeedSnapshot>, index: usize) -> Result<()> {
    let article = state
        .data()
        .and_then(|snapshot| index.checked_sub(1).and_then(|i| snapshot.articles.get(i)))
        .ok_or_else(|| NewsdeskError::ArticleNotFound(format!("result #{}", index)))?;

    ctx.coordinator.save(article)?;
    println!("Saved: {}", article.display_title());
    Ok(())
}

fn print_state(state: &FeedState<FeedSnapshot>) {
    match state {
        FeedState::Loading => println!("Loading..."),
        FeedState::Success(snapshot) => print_snapshot(snapshot),
        FeedState::Error { error, data } => {
            eprintln!("An error occurred: {}", error);
            if let Some(snapshot) = data.as_ref().filter(|s| !s.is_empty()) {
                print_snapshot(snapshot);
            }
        }
    }
}

fn print_snapshot(snapshot: &FeedSnapshot) {
    if snapshot.is_empty() {
        println!("No articles");
        return;
    }

    for (i, article) in snapshot.articles.iter().enumerate() {
        print_article(i + 1, article);
    }

    match snapshot.total_results {
        Some(total) => println!("\n{} of about {} results", snapshot.len(), total),
        None => println!("\n{} results", snapshot.len()),
    }
    if snapshot.is_last_page {
        println!("(end of results)");
    }
}

fn print_article(number: usize, article: &Article) {
    let date = article
        .published_at_utc()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "          ".to_string());

    println!("{:>3}. {} {}", number, date, article.display_title());
    println!(
        "     {} {}",
        article.source.name,
        article.url.as_deref().unwrap_or("")
    );
}
