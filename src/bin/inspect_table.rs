use statscrape::{config::HttpConfig, extract::extract_table, fetch::{Fetcher, HttpFetcher}};
use std::{env, process::exit};
use url::Url;

const PREVIEW_ROWS: usize = 10;

#[tokio::main]
async fn main() {
    // Expect exactly one CLI argument: the page URL.
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <PAGE_URL>", args[0]);
        exit(1);
    }
    if let Err(e) = inspect(&args[1]).await {
        eprintln!("Error: {}", e);
        exit(1);
    }
}

/// Fetch one page and print the schema and first rows of its first table.
async fn inspect(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let url = Url::parse(url)?;
    let fetcher = HttpFetcher::new(&HttpConfig::default())?;
    let markup = fetcher.fetch(&url).await?;
    let extraction = extract_table(&markup)?;

    println!("=== Table at {} ===", url);
    println!("Columns:       {}", extraction.schema.len());
    println!("Rows:          {}", extraction.rows.len());
    println!("Dropped rows:  {}", extraction.dropped);
    println!();

    println!("=== Schema ===");
    for (i, name) in extraction.schema.fields().iter().enumerate() {
        println!("{:>3}. {}", i, name);
    }
    println!();

    println!("=== First {} rows ===", PREVIEW_ROWS.min(extraction.rows.len()));
    for row in extraction.rows.iter().take(PREVIEW_ROWS) {
        println!("{}", row.fields().join(" | "));
    }
    Ok(())
}
