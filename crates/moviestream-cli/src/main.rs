//! moviestream - terminal movie and TV catalog browser backed by TMDB.

/// Local registration and login.
mod auth;
/// Catalog browsing state and event wiring.
mod browse;
/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use moviestream_api::catalog::{
    CatalogPage, CatalogQuery, Category, ContentType, fetch_catalog_page,
};
use moviestream_api::contact::{ContactClient, ContactMessage};
use moviestream_api::embed::{DEFAULT_EMBED_BASE_URL, EmbedTarget, embed_url};
use moviestream_api::tmdb::{TmdbApi, TmdbClient};
use moviestream_db::{SessionStore, SqliteKvStore, UserRecord, open_db};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::auth::{ACCESS_DENIED_MESSAGE, ACCESS_DENIED_TITLE, LoginOutcome};
use crate::browse::player::MISSING_API_KEY;
use crate::browse::{Route, RuntimeSettings};
use crate::config::{
    AppConfig, ContactConfig, TMDB_API_KEY_ENV, TmdbConfig, resolve_config_path, resolve_log_path,
};

/// User agent sent with every request.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// CLI argument parser.
#[derive(Parser)]
#[command(name = "moviestream", about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Register the local account (replaces any previous one).
    Register(RegisterArgs),
    /// Log in with the registered account.
    Login(LoginArgs),
    /// Log out (the registration is kept).
    Logout,
    /// Browse the catalog interactively.
    Browse(BrowseArgs),
    /// Print one page of a category listing.
    List(ListArgs),
    /// Print one page of search results.
    Search(SearchArgs),
    /// List the seasons of a TV show.
    Seasons(SeasonsArgs),
    /// List the episodes of one season.
    Episodes(EpisodesArgs),
    /// Print (or open) the stream address of a title.
    Embed(EmbedArgs),
    /// Send a message through the contact form relay.
    Contact(ContactArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the `register` subcommand.
#[derive(clap::Args)]
struct RegisterArgs {
    /// First name.
    #[arg(long, required = true)]
    first_name: String,
    /// Last name.
    #[arg(long, required = true)]
    last_name: String,
    /// Email address (login name).
    #[arg(long, required = true)]
    email: String,
    /// Password.
    #[arg(long, required = true)]
    password: String,
}

/// Arguments for the `login` subcommand.
#[derive(clap::Args)]
struct LoginArgs {
    /// Email address.
    #[arg(long, required = true)]
    email: String,
    /// Password.
    #[arg(long, required = true)]
    password: String,
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Start location (e.g. "/tv-shows?q=office").
    #[arg(long)]
    location: Option<String>,
}

/// Arguments for the `list` subcommand.
#[derive(clap::Args)]
struct ListArgs {
    /// Category: popular, top_rated, tv_shows.
    #[arg(long, default_value = "popular")]
    category: Category,
    /// Page number.
    #[arg(long, default_value_t = 1)]
    page: u32,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search string (e.g. "batman").
    #[arg(long, required = true)]
    query: String,
    /// Category deciding movie or TV search.
    #[arg(long, default_value = "popular")]
    category: Category,
    /// Page number.
    #[arg(long, default_value_t = 1)]
    page: u32,
}

/// Arguments for the `seasons` subcommand.
#[derive(clap::Args)]
struct SeasonsArgs {
    /// TMDB series ID.
    #[arg(long, required = true)]
    id: u64,
}

/// Arguments for the `episodes` subcommand.
#[derive(clap::Args)]
struct EpisodesArgs {
    /// TMDB series ID.
    #[arg(long, required = true)]
    id: u64,
    /// Season number.
    #[arg(long, required = true)]
    season: u32,
}

/// Arguments for the `embed` subcommand.
#[derive(clap::Args)]
struct EmbedArgs {
    /// TMDB ID.
    #[arg(long, required = true)]
    id: u64,
    /// Treat the ID as a TV show (implied by --season/--episode).
    #[arg(long)]
    tv: bool,
    /// Season number (TV only, default 1).
    #[arg(long)]
    season: Option<u32>,
    /// Episode number (TV only, default 1).
    #[arg(long)]
    episode: Option<u32>,
    /// Open the address in the system browser.
    #[arg(long)]
    open: bool,
}

/// Arguments for the `contact` subcommand.
#[derive(clap::Args)]
struct ContactArgs {
    /// Your name.
    #[arg(long, required = true)]
    name: String,
    /// Your email address.
    #[arg(long, required = true)]
    email: String,
    /// Message body.
    #[arg(long, required = true)]
    message: String,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    #[arg(long, required = true)]
    shell: Shell,
}

/// Loads `config.toml` for `dir`.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let path = resolve_config_path(dir)?;
    AppConfig::load(&path)
}

/// Opens the session store in the data directory.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
fn open_session_store(dir: Option<&PathBuf>) -> Result<SessionStore<SqliteKvStore>> {
    let conn = open_db(dir).context("failed to open database")?;
    Ok(SessionStore::new(SqliteKvStore::new(conn)))
}

/// Fails unless the user is registered and logged in.
///
/// # Errors
///
/// Returns an error describing why access is refused.
fn ensure_session(dir: Option<&PathBuf>) -> Result<UserRecord> {
    let store = open_session_store(dir)?;
    auth::require_session(&store)
}

/// Builds a `TmdbClient` from config and `TMDB_API_KEY`.
///
/// Returns `Ok(None)` when no API key is configured.
///
/// # Errors
///
/// Returns an error if the base URL is invalid or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &TmdbConfig) -> Result<Option<TmdbClient>> {
    let Some(api_key) = config.resolve_api_key(std::env::var(TMDB_API_KEY_ENV).ok()) else {
        return Ok(None);
    };

    let mut builder = TmdbClient::builder()
        .api_key(api_key)
        .user_agent(USER_AGENT);
    if let Some(base_url) = config.base_url.as_deref() {
        let normalized = if base_url.ends_with('/') {
            String::from(base_url)
        } else {
            format!("{base_url}/")
        };
        let url = Url::parse(&normalized)
            .with_context(|| format!("invalid TMDB base URL: {base_url}"))?;
        builder = builder.base_url(url);
    }
    if let Some(language) = config.language.as_deref() {
        builder = builder.language(language);
    }
    builder
        .build()
        .context("failed to build TMDB client")
        .map(Some)
}

/// Like [`build_tmdb_client`], but a missing key is an error.
///
/// # Errors
///
/// Returns an error if no API key is configured or the client fails to build.
fn require_tmdb_client(dir: Option<&PathBuf>) -> Result<TmdbClient> {
    let config = load_config(dir)?;
    build_tmdb_client(&config.tmdb)?.with_context(|| {
        format!("{MISSING_API_KEY}; set {TMDB_API_KEY_ENV} or [tmdb] api_key in config.toml")
    })
}

/// Builds a `ContactClient` from `[contact]`.
///
/// # Errors
///
/// Returns an error if a credential is missing or the client fails to build.
fn build_contact_client(config: &ContactConfig) -> Result<ContactClient> {
    let mut builder = ContactClient::builder().user_agent(USER_AGENT);
    if let Some(id) = config.service_id.as_deref() {
        builder = builder.service_id(id);
    }
    if let Some(id) = config.template_id.as_deref() {
        builder = builder.template_id(id);
    }
    if let Some(key) = config.public_key.as_deref() {
        builder = builder.public_key(key);
    }
    builder
        .build()
        .context("contact relay is not configured; fill in [contact] in config.toml")
}

/// Runs the `register` subcommand.
///
/// # Errors
///
/// Returns an error if a field is blank or the store cannot be written.
#[instrument(skip_all)]
fn run_register(args: &RegisterArgs, dir: Option<&PathBuf>) -> Result<()> {
    let store = open_session_store(dir)?;
    let user = UserRecord {
        first_name: args.first_name.trim().to_owned(),
        last_name: args.last_name.trim().to_owned(),
        email: args.email.trim().to_owned(),
        password: args.password.clone(),
    };
    auth::register(&store, &user)?;
    tracing::info!(
        "Registered {}. Run `moviestream login` to sign in.",
        user.email
    );
    Ok(())
}

/// Runs the `login` subcommand.
///
/// # Errors
///
/// Returns an error if the credentials are rejected or the store fails.
#[instrument(skip_all)]
fn run_login(args: &LoginArgs, dir: Option<&PathBuf>) -> Result<()> {
    let store = open_session_store(dir)?;
    match auth::login(&store, args.email.trim(), &args.password)? {
        LoginOutcome::Granted => {
            tracing::info!("Logged in as {}", args.email.trim());
            Ok(())
        }
        LoginOutcome::Denied => bail!("{ACCESS_DENIED_TITLE}: {ACCESS_DENIED_MESSAGE}"),
    }
}

/// Runs the `logout` subcommand.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
#[instrument(skip_all)]
fn run_logout(dir: Option<&PathBuf>) -> Result<()> {
    let store = open_session_store(dir)?;
    auth::logout(&store)?;
    tracing::info!("Logged out");
    Ok(())
}

/// Runs the `browse` subcommand (TUI).
///
/// # Errors
///
/// Returns an error if the session check, client setup, or TUI fails.
#[instrument(skip_all)]
async fn run_browse(args: &BrowseArgs, dir: Option<&PathBuf>) -> Result<()> {
    ensure_session(dir)?;
    let config = load_config(dir)?;
    let api = build_tmdb_client(&config.tmdb)?.map(Arc::new);
    if api.is_none() {
        tracing::warn!("{MISSING_API_KEY}");
    }

    let settings = RuntimeSettings {
        initial: args
            .location
            .as_deref()
            .map_or_else(Route::default, Route::parse),
        debounce: config.browse.debounce(),
        embed_base_url: config
            .player
            .embed_base_url
            .unwrap_or_else(|| String::from(DEFAULT_EMBED_BASE_URL)),
    };
    tracing::info!(location = %settings.initial, "starting browser");

    tui::run_browser(api, settings)
        .await
        .context("browser TUI failed")
}

/// Logs one catalog page as a table.
fn print_page(page: &CatalogPage) {
    if page.items.is_empty() {
        tracing::info!("No results.");
        return;
    }
    tracing::info!("ID\tYear\tRating\tTitle\tPoster");
    for item in &page.items {
        tracing::info!(
            "{}\t{}\t{:.1}\t{}\t{}",
            item.id,
            item.release_year()
                .map_or_else(|| String::from("-"), |y| y.to_string()),
            item.rating,
            item.display_title(),
            item.poster_url(),
        );
    }
    let more = if page.has_more() {
        " (more available)"
    } else {
        ""
    };
    tracing::info!(
        "Page {} of {}, {} results{more}",
        page.page,
        page.total_pages,
        page.total_results
    );
}

/// Runs the `list` subcommand.
///
/// # Errors
///
/// Returns an error if the session check, client setup, or request fails.
#[instrument(skip_all)]
async fn run_list(args: &ListArgs, dir: Option<&PathBuf>) -> Result<()> {
    ensure_session(dir)?;
    let client = require_tmdb_client(dir)?;
    let query = CatalogQuery::new(args.category, String::new()).page(args.page);
    let page = fetch_catalog_page(&client, &query)
        .await
        .with_context(|| format!("failed to load {}", args.category.label()))?;
    print_page(&page);
    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the session check, client setup, or request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    ensure_session(dir)?;
    if args.query.trim().is_empty() {
        bail!("search query must not be blank");
    }
    let client = require_tmdb_client(dir)?;
    let query = CatalogQuery::new(args.category, args.query.clone()).page(args.page);
    let page = fetch_catalog_page(&client, &query)
        .await
        .context("search request failed")?;
    print_page(&page);
    Ok(())
}

/// Runs the `seasons` subcommand.
///
/// # Errors
///
/// Returns an error if the session check, client setup, or request fails.
#[instrument(skip_all)]
async fn run_seasons(args: &SeasonsArgs, dir: Option<&PathBuf>) -> Result<()> {
    ensure_session(dir)?;
    let client = require_tmdb_client(dir)?;
    let details = client
        .tv_details(args.id)
        .await
        .context("TMDB tv details request failed")?;

    tracing::info!("{} ({} seasons)", details.name, details.number_of_seasons);
    for season in details.seasons.iter().filter(|s| s.season_number > 0) {
        tracing::info!(
            "  Season {}: {} episodes (air_date: {})",
            season.season_number,
            season.episode_count,
            season.air_date.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

/// Runs the `episodes` subcommand.
///
/// # Errors
///
/// Returns an error if the session check, client setup, or request fails.
#[instrument(skip_all)]
async fn run_episodes(args: &EpisodesArgs, dir: Option<&PathBuf>) -> Result<()> {
    ensure_session(dir)?;
    let client = require_tmdb_client(dir)?;
    let season = client
        .tv_season(args.id, args.season)
        .await
        .context("TMDB tv season request failed")?;

    tracing::info!(
        "Season {}: {}",
        season.season_number,
        season.name.as_deref().unwrap_or("-")
    );
    for ep in &season.episodes {
        tracing::info!(
            "  E{:02}: {} (air_date: {}, runtime: {}min)",
            ep.episode_number,
            ep.name,
            ep.air_date.as_deref().unwrap_or("-"),
            ep.runtime
                .map_or_else(|| String::from("-"), |r| r.to_string()),
        );
    }
    Ok(())
}

/// Runs the `embed` subcommand.
///
/// # Errors
///
/// Returns an error if the session check or config loading fails.
#[instrument(skip_all)]
fn run_embed(args: &EmbedArgs, dir: Option<&PathBuf>) -> Result<()> {
    ensure_session(dir)?;
    let config = load_config(dir)?;
    let base_url = config
        .player
        .embed_base_url
        .unwrap_or_else(|| String::from(DEFAULT_EMBED_BASE_URL));

    let content_type = if args.tv || args.season.is_some() || args.episode.is_some() {
        ContentType::Tv
    } else {
        ContentType::Movie
    };
    let url = embed_url(
        &base_url,
        EmbedTarget::new(content_type, args.id, args.season, args.episode),
    );
    tracing::info!("{url}");

    if args.open {
        open::that(&url).with_context(|| format!("failed to open {url}"))?;
    }
    Ok(())
}

/// Runs the `contact` subcommand.
///
/// # Errors
///
/// Returns an error if the form is incomplete, the relay is not
/// configured, or the relay rejects the message.
#[instrument(skip_all)]
async fn run_contact(args: &ContactArgs, dir: Option<&PathBuf>) -> Result<()> {
    let message = ContactMessage::new(&args.name, &args.email, &args.message)?;
    let config = load_config(dir)?;
    let client = build_contact_client(&config.contact)?;
    client
        .send(&message)
        .await
        .context("failed to send message")?;
    tracing::info!("Message sent. Thank you, {}!", message.name);
    Ok(())
}

/// Writes shell completions to stdout.
fn run_completions(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "moviestream", &mut io::stdout());
}

/// Picks the log destination: a file for the TUI, stdout otherwise.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
fn log_writer(command: &Commands, dir: Option<&PathBuf>) -> Result<BoxMakeWriter> {
    if !matches!(command, Commands::Browse(_)) {
        return Ok(BoxMakeWriter::new(io::stdout));
    }
    let path = resolve_log_path(dir)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BoxMakeWriter::new(Mutex::new(file)))
}

/// Initializes the tracing subscriber.
fn init_tracing(writer: BoxMakeWriter, ansi: bool) {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dir = cli.dir.as_ref();

    let tui_mode = matches!(cli.command, Commands::Browse(_));
    init_tracing(log_writer(&cli.command, dir)?, !tui_mode);

    match &cli.command {
        Commands::Register(args) => run_register(args, dir),
        Commands::Login(args) => run_login(args, dir),
        Commands::Logout => run_logout(dir),
        Commands::Browse(args) => run_browse(args, dir).await,
        Commands::List(args) => run_list(args, dir).await,
        Commands::Search(args) => run_search(args, dir).await,
        Commands::Seasons(args) => run_seasons(args, dir).await,
        Commands::Episodes(args) => run_episodes(args, dir).await,
        Commands::Embed(args) => run_embed(args, dir),
        Commands::Contact(args) => run_contact(args, dir).await,
        Commands::Completions(args) => {
            run_completions(args);
            Ok(())
        }
    }
}
