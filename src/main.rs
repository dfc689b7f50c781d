//! searchbox CLI - drive the search-box controller against a live backend.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use searchbox::pagination::ControlKind;
use searchbox::render::ResultsBody;
use searchbox::suggestion::Key;
use searchbox::view::Status;
use searchbox::{
    Controller, ControllerConfig, Event, HttpBackend, Locale, SearchBackend, SearchEndpoint,
    Session,
};

/// searchbox - interactive search-box controller
#[derive(Parser)]
#[command(name = "searchbox")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend origin (e.g., http://localhost:8080)
    #[arg(short, long, global = true)]
    base_url: Option<String>,

    /// Display locale
    #[arg(short, long, global = true)]
    locale: Option<LocaleArg>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one search and print the rendered results
    Search(SearchArgs),

    /// Print autocomplete suggestions for a query
    Suggest {
        /// Query prefix
        query: String,
    },

    /// Line-driven search box session
    Interactive,
}

#[derive(Parser)]
struct SearchArgs {
    /// Search query
    query: String,

    /// Page number
    #[arg(short, long, default_value = "1")]
    page: u32,

    /// Search endpoint variant
    #[arg(short, long)]
    endpoint: Option<EndpointArg>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum LocaleArg {
    En,
    Fa,
}

#[derive(Clone, Copy, ValueEnum)]
enum EndpointArg {
    Search,
    Correction,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
    /// Compact single-line output
    Compact,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &cli.config {
        Some(path) => ControllerConfig::from_file(path)?,
        None => ControllerConfig::default(),
    };
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(locale) = cli.locale {
        config.locale = match locale {
            LocaleArg::En => Locale::En,
            LocaleArg::Fa => Locale::Fa,
        };
    }

    match cli.command {
        Commands::Search(args) => run_search(config, args).await,
        Commands::Suggest { query } => run_suggest(config, &query).await,
        Commands::Interactive => run_interactive(config).await,
    }
}

async fn run_search(mut config: ControllerConfig, args: SearchArgs) -> Result<()> {
    if let Some(endpoint) = args.endpoint {
        config.endpoint = match endpoint {
            EndpointArg::Search => SearchEndpoint::Search,
            EndpointArg::Correction => SearchEndpoint::Correction,
        };
    }
    if args.query.trim().is_empty() {
        anyhow::bail!("Query cannot be empty");
    }

    let backend = HttpBackend::new(&config)?;
    let mut controller = Controller::new(backend, config);
    controller.set_input(args.query.clone());
    controller.submit(&args.query, args.page).await;

    match args.format {
        OutputFormat::Text => print_view(&controller),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(controller.view())?);
        }
        OutputFormat::Compact => {
            if let Some(ResultsBody::Cards(cards)) = &controller.view().results {
                for card in cards {
                    println!("{}\t{}", card.title, card.href);
                }
            }
        }
    }

    if let Status::Error(message) = &controller.view().status {
        anyhow::bail!("{}", message);
    }
    Ok(())
}

async fn run_suggest(config: ControllerConfig, query: &str) -> Result<()> {
    let backend = HttpBackend::new(&config)?;
    let mut controller = Controller::new(backend, config);
    controller.set_input(query);
    controller.request_suggestions(query).await;
    for suggestion in controller.suggestions().items() {
        println!("{}", suggestion);
    }
    Ok(())
}

async fn run_interactive(config: ControllerConfig) -> Result<()> {
    let backend = HttpBackend::new(&config)?;
    let session = Session::new(Controller::new(backend, config));
    let tx = session.sender();

    eprintln!("Type to search. Commands: /submit /down /up /enter /pick N /fix /page N /prev /next /close /quit");

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let Some(event) = parse_line(&line) else {
                eprintln!("Unknown command: {}", line.trim());
                continue;
            };
            let stop = matches!(event, Event::Shutdown);
            if tx.send(event).is_err() || stop {
                return;
            }
        }
        let _ = tx.send(Event::Shutdown);
    });

    session
        .run(|controller| {
            print_suggestions(controller);
            print_view(controller);
        })
        .await;
    Ok(())
}

/// Maps one input line to an event.
fn parse_line(line: &str) -> Option<Event> {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return Some(Event::Input(line.to_string()));
    };

    let mut parts = command.split_whitespace();
    let name = parts.next()?;
    let arg = parts.next().and_then(|a| a.parse::<usize>().ok());

    Some(match (name, arg) {
        ("submit", _) => Event::SubmitForm,
        ("down", _) => Event::Key(Key::ArrowDown),
        ("up", _) => Event::Key(Key::ArrowUp),
        ("enter", _) => Event::Key(Key::Enter),
        ("pick", Some(n)) if n >= 1 => Event::PickSuggestion(n - 1),
        ("fix", _) => Event::ClickCorrection,
        ("page", Some(n)) => Event::ClickControl(ControlKind::Page, u32::try_from(n).ok()),
        ("prev", _) => Event::ClickControl(ControlKind::Previous, None),
        ("next", _) => Event::ClickControl(ControlKind::Next, None),
        ("close", _) => Event::ClickOutside,
        ("quit", _) | ("exit", _) => Event::Shutdown,
        _ => return None,
    })
}

fn print_suggestions<B: SearchBackend>(controller: &Controller<B>) {
    let suggestions = controller.suggestions();
    if !suggestions.is_open() {
        return;
    }
    eprintln!("Suggestions:");
    for (i, item) in suggestions.items().iter().enumerate() {
        let marker = if suggestions.selected_index() == Some(i) { '>' } else { ' ' };
        eprintln!(" {} {}. {}", marker, i + 1, item);
    }
}

fn print_view<B: SearchBackend>(controller: &Controller<B>) {
    let view = controller.view();
    match &view.status {
        Status::Empty => return,
        Status::Searching(message) | Status::Error(message) => {
            println!("{}", message);
            return;
        }
        Status::Summary { line, correction } => {
            println!("\n{}", line);
            if let Some(banner) = correction {
                println!("{} {}  (/fix)", banner.prompt, banner.text);
            }
        }
    }

    match &view.results {
        Some(ResultsBody::Cards(cards)) => {
            println!();
            for (i, card) in cards.iter().enumerate() {
                println!("{}. {}", i + 1, card.title);
                if let Some(url) = &card.display_url {
                    println!("   URL: {}", url);
                }
                if let Some(snippet) = &card.snippet {
                    let snippet: String = snippet.chars().take(150).collect();
                    println!("   {}", snippet);
                }
                if let Some(score) = &card.score {
                    println!("   {}: {}", controller.config().locale.messages().score, score);
                }
            }
        }
        Some(ResultsBody::NoResults(message)) => println!("{}", message),
        None => {}
    }

    if !view.pagination.is_empty() {
        let labels: Vec<String> = view
            .pagination
            .iter()
            .map(|control| {
                if control.active {
                    format!("[{}]", control.label)
                } else if control.disabled {
                    format!("({})", control.label)
                } else {
                    control.label.clone()
                }
            })
            .collect();
        println!("\n{}", labels.join(" "));
    }
}
