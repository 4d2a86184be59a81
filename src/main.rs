mod app;
mod config;
mod fetch;
mod logging;
mod model;
mod tmdb;
mod ui;

use app::{Action, App, FetchRequest, InputMode, ResponseOrdering};
use clap::{Parser, Subcommand};
use config::{BrowserConfig, ConfigError, FileConfig};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use fetch::Fetcher;
use model::{Genre, Movie, PosterUrls, SortBy};
use std::path::PathBuf;
use tmdb::{DiscoverQuery, MovieSource, TmdbClient};
use tokio::sync::mpsc::UnboundedReceiver;

/// Browse TMDB movies: discover by sort order and genre, or search by title
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// TMDB v3 API key
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Base URL of the TMDB API
    #[arg(long, env = "TMDB_API_BASE", global = true)]
    api_base: Option<String>,

    /// Base URL of the poster image CDN
    #[arg(long, global = true)]
    image_base: Option<String>,

    /// Poster size segment, e.g. w300
    #[arg(long, global = true)]
    poster_size: Option<String>,

    /// Which responses may replace the movie list when requests overlap
    #[arg(long, value_enum, global = true)]
    ordering: Option<ResponseOrdering>,

    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text (headless commands only)
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the TUI browser (default)
    Run,
    /// Print the genre list
    Genres,
    /// Print the first page of discovered movies
    Discover {
        /// Sort order
        #[arg(short, long, value_enum, default_value_t = SortBy::default())]
        sort: SortBy,
        /// Genre id to filter by
        #[arg(short, long)]
        genre: Option<u64>,
    },
    /// Search movies by title
    Search {
        /// Free-text query
        query: String,
    },
}

impl Cli {
    fn overrides(&self) -> FileConfig {
        FileConfig {
            api_key: self.api_key.clone(),
            api_base: self.api_base.clone(),
            image_base: self.image_base.clone(),
            poster_size: self.poster_size.clone(),
            placeholder_url: None,
            ordering: self.ordering,
            request_timeout_secs: None,
        }
    }

    fn resolve_config(&self) -> Result<BrowserConfig, ConfigError> {
        let path = self.config.clone().or_else(FileConfig::default_path);
        let file = match path {
            Some(path) => FileConfig::load(&path)?,
            None => FileConfig::default(),
        };
        BrowserConfig::resolve(self.overrides(), file)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(2);
        }
    };

    let command = cli.command.unwrap_or(Commands::Run);
    if !matches!(command, Commands::Run) {
        logging::init_stderr_logging();
        let client = TmdbClient::new(&config.api_base, &config.api_key, config.request_timeout)?;
        if let Err(e) = run_headless(command, &client, &config.posters, cli.json).await {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
        return Ok(());
    }

    let (_log_guard, log_dir) = logging::init_file_logging()?;
    let client = TmdbClient::new(&config.api_base, &config.api_key, config.request_timeout)?;

    let mut app = App::new(config.posters.clone(), config.ordering);
    let (mut fetcher, mut results) = Fetcher::new(client, app.ordering());
    fetcher.spawn_all(app.dispatch(Action::Started));

    // Init terminal
    let mut terminal = ratatui::init();
    let size = terminal.size()?;
    app.update_columns(size.width);

    // Main loop
    let result = run_app(&mut terminal, &mut app, &mut fetcher, &mut results).await;

    // Restore terminal
    ratatui::restore();
    fetcher.shutdown();

    if let Err(e) = result {
        tracing::error!(error = %e, "TUI loop failed");
        eprintln!("Error: {e} (see logs in {})", log_dir.display());
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app<S: MovieSource>(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    fetcher: &mut Fetcher<S>,
    results: &mut UnboundedReceiver<Action>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Apply every fetch that completed since the last frame
        while let Ok(action) = results.try_recv() {
            fetcher.spawn_all(app.dispatch(action));
        }

        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Poll for events with a 100ms timeout so fetch results show up promptly
        if crossterm::event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    handle_key(app, fetcher, key);
                }
                Event::Resize(width, _) => {
                    app.update_columns(width);
                }
                _ => {}
            }
        }
    }
}

fn handle_key<S: MovieSource>(app: &mut App, fetcher: &mut Fetcher<S>, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    let requests = if app.input_mode == InputMode::Editing {
        handle_search_input(app, key)
    } else if app.picker.is_some() {
        handle_picker_key(app, key)
    } else {
        handle_browse_key(app, key)
    };
    fetcher.spawn_all(requests);
}

fn handle_search_input(app: &mut App, key: KeyEvent) -> Vec<FetchRequest> {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            app.dispatch(Action::SearchSubmitted)
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            Vec::new()
        }
        KeyCode::Backspace => {
            let mut text = app.search_text.clone();
            text.pop();
            app.dispatch(Action::SearchChanged(text))
        }
        KeyCode::Char(c) => {
            let mut text = app.search_text.clone();
            text.push(c);
            app.dispatch(Action::SearchChanged(text))
        }
        _ => Vec::new(),
    }
}

fn handle_picker_key(app: &mut App, key: KeyEvent) -> Vec<FetchRequest> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.picker = None;
            Vec::new()
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.picker_next();
            Vec::new()
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.picker_prev();
            Vec::new()
        }
        KeyCode::Enter => app.picker_confirm(),
        _ => Vec::new(),
    }
}

fn handle_browse_key(app: &mut App, key: KeyEvent) -> Vec<FetchRequest> {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('/') => app.input_mode = InputMode::Editing,
        KeyCode::Char('s') => app.open_sort_picker(),
        KeyCode::Char('g') => app.open_genre_picker(),
        KeyCode::Char(' ') => app.toggle_selected(),
        KeyCode::Right | KeyCode::Char('l') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_down(),
        KeyCode::Up | KeyCode::Char('k') => app.select_up(),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),
        _ => {}
    }
    Vec::new()
}

/// Failures of the headless commands.
#[derive(Debug, thiserror::Error)]
enum HeadlessError {
    #[error(transparent)]
    Api(#[from] tmdb::ApiError),
    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

impl HeadlessError {
    fn user_message(&self) -> String {
        match self {
            HeadlessError::Api(e) => e.user_message(),
            HeadlessError::Output(e) => format!("Could not write JSON output: {}", e),
        }
    }
}

async fn run_headless(
    command: Commands,
    client: &TmdbClient,
    posters: &PosterUrls,
    json: bool,
) -> Result<(), HeadlessError> {
    let output = match command {
        Commands::Genres => format_genres(&client.genres().await?, json)?,
        Commands::Discover { sort, genre } => {
            let movies = client.discover(DiscoverQuery::first_page(sort, genre)).await?;
            format_movies(&movies, posters, json)?
        }
        Commands::Search { query } => {
            if query.is_empty() {
                return Ok(());
            }
            let movies = client.search(query).await?;
            format_movies(&movies, posters, json)?
        }
        Commands::Run => return Ok(()),
    };
    print!("{}", output);
    Ok(())
}

fn format_genres(genres: &[Genre], json: bool) -> Result<String, HeadlessError> {
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(genres)?));
    }
    let mut out = String::new();
    for genre in genres {
        out.push_str(&format!("{:>6}  {}\n", genre.id, genre.name));
    }
    Ok(out)
}

fn format_movies(movies: &[Movie], posters: &PosterUrls, json: bool) -> Result<String, HeadlessError> {
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(movies)?));
    }
    let mut out = String::new();
    for movie in movies {
        out.push_str(&format!("{:>8}  {:<7}  {}\n", movie.id, movie.rating_label(), movie.title));
        out.push_str(&format!("          {}\n", movie.display_description(false)));
        out.push_str(&format!("          {}\n", posters.url_for(movie)));
    }
    Ok(out)
}
