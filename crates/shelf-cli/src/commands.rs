use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use shelf_client::{ClientResult, Reviews, ShelfClient};
use shelf_server::{ServerConfig, ShelfServer};
use shelf_store::{DocumentStore, JsonFileStore};
use shelf_types::{Account, Book};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Init(args) => cmd_init(args),
        Command::Config(args) => cmd_config(args),
        Command::Books(args) => cmd_books(args),
    }
}

/// Effective configuration: defaults, then the file, then flag overrides.
pub fn resolve_config(source: &ConfigSource) -> anyhow::Result<ServerConfig> {
    let mut config = match &source.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(dir) = &source.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = resolve_config(&args.source)?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if args.secret.is_some() {
        config.token_secret = args.secret;
    }

    let server = ShelfServer::new(config)?;
    println!(
        "{} Serving {} on {}",
        "✓".green().bold(),
        server.config().data_dir.display().to_string().bold(),
        server.config().bind_addr.to_string().cyan()
    );
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args.source)?;
    let created = init_data_dir(&config, args.force)?;
    println!(
        "{} Initialized Shelf data in {}",
        "✓".green().bold(),
        config.data_dir.display().to_string().bold()
    );
    println!("  Users: {}", config.users_path().display());
    println!(
        "  Books: {} ({} sample books)",
        config.books_path().display(),
        created.to_string().yellow()
    );
    Ok(())
}

/// Write an empty account list and the sample catalog. Returns the number
/// of books written.
pub fn init_data_dir(config: &ServerConfig, force: bool) -> anyhow::Result<usize> {
    let users = config.users_path();
    let books = config.books_path();
    if !force {
        for path in [&users, &books] {
            if path.exists() {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
        }
    }

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating {}", config.data_dir.display()))?;
    write_document(&users, &Vec::<Account>::new())?;
    let catalog = sample_catalog();
    write_document(&books, &catalog)?;
    tracing::info!(data_dir = %config.data_dir.display(), "initialized data directory");
    Ok(catalog.len())
}

fn write_document<T>(path: &Path, document: &T) -> anyhow::Result<()>
where
    T: serde::Serialize + serde::de::DeserializeOwned + Default,
{
    JsonFileStore::<T>::open(path)
        .replace(None, document)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args.source)?;
    print!("{}", config.to_toml_redacted()?);
    if config.token_secret.is_none() {
        eprintln!(
            "{} no token_secret set; `serve` will generate one per run",
            "warning:".yellow().bold()
        );
    }
    Ok(())
}

/// What a catalog query returned.
#[derive(Debug, PartialEq)]
pub enum QueryOutput {
    Books(Vec<Book>),
    Book(Book),
    Reviews(Reviews),
}

pub async fn run_query(client: &ShelfClient, query: &BooksQuery) -> ClientResult<QueryOutput> {
    Ok(match query {
        BooksQuery::List => QueryOutput::Books(client.list_books().await?),
        BooksQuery::Isbn { isbn } => QueryOutput::Book(client.book_by_isbn(isbn).await?),
        BooksQuery::Author { author } => QueryOutput::Books(client.books_by_author(author).await?),
        BooksQuery::Title { title } => QueryOutput::Books(client.books_by_title(title).await?),
        BooksQuery::Reviews { isbn } => QueryOutput::Reviews(client.book_reviews(isbn).await?),
    })
}

fn cmd_books(args: BooksArgs) -> anyhow::Result<()> {
    let client = ShelfClient::new(&args.url).with_context(|| format!("server URL {}", args.url))?;
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    let output = runtime
        .block_on(run_query(&client, &args.query))
        .with_context(|| format!("querying {}", client.base_url()))?;

    match output {
        QueryOutput::Books(books) => {
            for book in &books {
                print_book(book);
            }
            let noun = if books.len() == 1 { "book" } else { "books" };
            println!("{} {}", books.len().to_string().yellow(), noun);
        }
        QueryOutput::Book(book) => {
            print_book(&book);
            for (user, text) in book.reviews_or_empty() {
                println!("  {} {}", format!("{user}:").cyan(), text);
            }
        }
        QueryOutput::Reviews(reviews) => {
            if reviews.is_empty() {
                println!("{}", "no reviews".dimmed());
            }
            for (user, text) in reviews {
                println!("{} {}", format!("{user}:").cyan(), text);
            }
        }
    }
    Ok(())
}

fn print_book(book: &Book) {
    println!("{}  {} by {}", book.isbn.dimmed(), book.title.bold(), book.author);
}

fn sample_catalog() -> Vec<Book> {
    vec![
        Book::new("9780143127741", "Thinking, Fast and Slow", "Daniel Kahneman"),
        Book::new("9780062316097", "Sapiens: A Brief History of Humankind", "Yuval Noah Harari"),
        Book::new("9780374275631", "Noise: A Flaw in Human Judgment", "Daniel Kahneman, Olivier Sibony, Cass R. Sunstein"),
        Book::new("9780735211292", "Atomic Habits", "James Clear"),
        Book::new("9780525559474", "The Midnight Library", "Matt Haig"),
        Book::new("9780441172719", "Dune", "Frank Herbert"),
        Book::new("9780547928227", "The Hobbit", "J.R.R. Tolkien"),
        Book::new("9780451524935", "1984", "George Orwell"),
        Book::new("9780061120084", "To Kill a Mockingbird", "Harper Lee"),
        Book::new("9780141439518", "Pride and Prejudice", "Jane Austen"),
    ]
}
