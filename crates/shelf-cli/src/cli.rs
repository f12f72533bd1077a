use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "shelf",
    about = "Shelf: a book catalog with accounts and per-reader reviews",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Create the data directory with an empty user list and a sample catalog
    Init(InitArgs),
    /// Print the effective configuration
    Config(ConfigArgs),
    /// Query the public catalog of a running server
    Books(BooksArgs),
}

/// Where configuration comes from, and flags that override the file.
#[derive(Args, Clone, Debug, Default)]
pub struct ConfigSource {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory holding users.json and books.json
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub source: ConfigSource,
    /// Address to listen on
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Secret used to sign session tokens
    #[arg(long, env = "SHELF_TOKEN_SECRET", hide_env_values = true)]
    pub secret: Option<String>,
}

#[derive(Args)]
pub struct InitArgs {
    #[command(flatten)]
    pub source: ConfigSource,
    /// Overwrite existing data files
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub source: ConfigSource,
}

#[derive(Args)]
pub struct BooksArgs {
    /// Base URL of the Shelf server
    #[arg(long, global = true, env = "SHELF_URL", default_value = shelf_client::DEFAULT_BASE_URL)]
    pub url: String,
    #[command(subcommand)]
    pub query: BooksQuery,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum BooksQuery {
    /// List every book
    List,
    /// Look up one book by ISBN
    Isbn { isbn: String },
    /// Books whose author contains the text, ignoring case
    Author { author: String },
    /// Books whose title contains the text, ignoring case
    Title { title: String },
    /// Reviews of one book, keyed by username
    Reviews { isbn: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve_defaults() {
        let cli = Cli::try_parse_from(["shelf", "serve"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert!(args.bind.is_none());
            assert!(args.source.config.is_none());
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_serve_overrides() {
        let cli = Cli::try_parse_from([
            "shelf",
            "serve",
            "--bind",
            "0.0.0.0:8080",
            "--data-dir",
            "/srv/shelf",
            "--secret",
            "s3cret",
            "-c",
            "shelf.toml",
        ])
        .unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.bind, Some("0.0.0.0:8080".parse().unwrap()));
            assert_eq!(args.source.data_dir, Some(PathBuf::from("/srv/shelf")));
            assert_eq!(args.secret.as_deref(), Some("s3cret"));
            assert_eq!(args.source.config, Some(PathBuf::from("shelf.toml")));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_serve_rejects_bad_address() {
        assert!(Cli::try_parse_from(["shelf", "serve", "--bind", "nowhere"]).is_err());
    }

    #[test]
    fn parse_init_force() {
        let cli = Cli::try_parse_from(["shelf", "init", "--force", "--data-dir", "d"]).unwrap();
        if let Command::Init(args) = cli.command {
            assert!(args.force);
            assert_eq!(args.source.data_dir, Some(PathBuf::from("d")));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_config() {
        let cli = Cli::try_parse_from(["shelf", "config"]).unwrap();
        assert!(matches!(cli.command, Command::Config(_)));
    }

    fn parse_books(args: &[&str]) -> BooksArgs {
        let argv = ["shelf", "books"].iter().chain(args).copied();
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Books(args) => args,
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn parse_books_queries() {
        let args = parse_books(&["list"]);
        assert_eq!(args.query, BooksQuery::List);
        assert_eq!(args.url, shelf_client::DEFAULT_BASE_URL);

        assert_eq!(
            parse_books(&["isbn", "9780143127741"]).query,
            BooksQuery::Isbn { isbn: "9780143127741".into() }
        );
        assert_eq!(
            parse_books(&["author", "Daniel Kahneman"]).query,
            BooksQuery::Author { author: "Daniel Kahneman".into() }
        );
        assert_eq!(
            parse_books(&["title", "Alchemist"]).query,
            BooksQuery::Title { title: "Alchemist".into() }
        );
        assert_eq!(
            parse_books(&["reviews", "9780143127741"]).query,
            BooksQuery::Reviews { isbn: "9780143127741".into() }
        );
    }

    #[test]
    fn parse_books_url_before_or_after_query() {
        assert_eq!(parse_books(&["--url", "http://shelf:8080", "list"]).url, "http://shelf:8080");
        assert_eq!(parse_books(&["list", "--url", "http://shelf:8080"]).url, "http://shelf:8080");
    }

    #[test]
    fn parse_books_requires_query_argument() {
        assert!(Cli::try_parse_from(["shelf", "books"]).is_err());
        assert!(Cli::try_parse_from(["shelf", "books", "isbn"]).is_err());
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["shelf", "--verbose", "config"]).unwrap();
        assert!(cli.verbose);
        let cli = Cli::try_parse_from(["shelf", "init", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}
