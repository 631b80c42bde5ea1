//! CLI command implementations

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use cinescope_core::CinescopeConfig;
use cinescope_search::{
    BrowseError, BrowseView, CatalogBrowser, Category, LookupClient, LookupOutcome, MovieDetails,
    MovieSummary, SearchPage, SuggestionBox, SuggestionView,
};
use clap::Subcommand;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Longest wait for the final suggestion lookup after stdin closes.
const SUGGESTION_SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Search movies by title
    Search {
        /// Free-text query
        query: String,
        /// Result page (starting at 1)
        #[arg(short, long, default_value = "1")]
        page: u32,
    },
    /// Browse a category: trending, popular, top_rated or upcoming
    Browse {
        /// Category name
        category: Category,
        /// Result page (starting at 1)
        #[arg(short, long, default_value = "1")]
        page: u32,
    },
    /// Show full details for an IMDb identifier
    Details {
        /// IMDb identifier, e.g. tt0111161
        id: String,
    },
    /// Read queries from stdin, one keystroke state per line, and print live suggestions
    Suggest,
}

/// Handle the CLI command
///
/// # Errors
/// Returns an error if the configuration is invalid, the HTTP client cannot
/// be built, the lookup fails with fallback disabled, or stdin cannot be read.
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    let config = CinescopeConfig::from_env();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let client =
        Arc::new(LookupClient::from_config(&config).context("failed to create lookup client")?);

    match command {
        Commands::Search { query, page } => {
            let outcome = client.search_by_text(&query, page).await;
            print_page(&format!("Search: {query} (page {page})"), outcome)
        }
        Commands::Browse { category, page } => {
            let query = client.query_for_category(category);
            tracing::info!(%category, %query, "Browsing category");
            let outcome = client.search_by_text(&query, page).await;
            print_page(&format!("{category} (page {page})"), outcome)
        }
        Commands::Details { id } => details(client, &id).await,
        Commands::Suggest => suggest(client, &config).await,
    }
}

fn print_page(heading: &str, outcome: LookupOutcome<SearchPage>) -> anyhow::Result<()> {
    match outcome {
        LookupOutcome::Ok { value, source } => {
            print!("{}", format_page(heading, &value));
            if let Some(reason) = source.fallback_reason() {
                println!("\n{}", fallback_notice(&BrowseError::from(reason)));
            }
            Ok(())
        }
        LookupOutcome::Failed { reason } => {
            Err(anyhow::anyhow!(BrowseError::from(&reason).user_message()))
        }
    }
}

/// Print full details for one movie
async fn details(client: Arc<LookupClient>, id: &str) -> anyhow::Result<()> {
    let browser = CatalogBrowser::new(client);

    match browser.select(id).await {
        BrowseView::Ready(details) => {
            print!("{}", format_details(&details));
            if details.summary.id != id {
                println!("\nNote: {id} could not be loaded; showing a catalog entry instead.");
            }
            Ok(())
        }
        BrowseView::Error(error) => Err(anyhow::anyhow!(error.user_message())),
        BrowseView::Superseded => Ok(()),
    }
}

/// Feed stdin lines to a debounced suggestion box and print each settled update
async fn suggest(client: Arc<LookupClient>, config: &CinescopeConfig) -> anyhow::Result<()> {
    let mut input = SuggestionBox::new(client, &config.search);
    let mut updates = input.subscribe();

    let printer = tokio::spawn(async move {
        let mut last_printed: Option<SuggestionView> = None;
        while updates.changed().await.is_ok() {
            let view = updates.borrow_and_update().clone();
            if view.loading || last_printed.as_ref() == Some(&view) {
                continue;
            }
            print!("{}", format_suggestions(&view));
            last_printed = Some(view);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        tracing::debug!(query = %line, "Query changed");
        input.on_query_change(&line);
    }

    // Let the last quiet period elapse and its lookup land.
    let mut settle = input.subscribe();
    let settled = tokio::time::timeout(SUGGESTION_SETTLE_TIMEOUT, async {
        while input.is_pending() || settle.borrow_and_update().loading {
            if settle.changed().await.is_err() {
                break;
            }
        }
    })
    .await;
    if settled.is_err() {
        tracing::warn!("Gave up waiting for the final suggestions");
    }

    drop(input);
    let _ = printer.await;
    Ok(())
}

fn format_movies(out: &mut String, movies: &[MovieSummary]) {
    if movies.is_empty() {
        out.push_str("No movies found.\n");
        return;
    }

    for movie in movies {
        let _ = writeln!(out, "{:<11} {:<6} {}", movie.id, movie.year, movie.title);
    }
}

fn format_page(heading: &str, page: &SearchPage) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{heading}");
    let _ = writeln!(out, "{:-<60}", "");
    format_movies(&mut out, &page.movies);
    let _ = writeln!(
        out,
        "\n{} of {} results",
        page.movies.len(),
        page.total_results
    );
    out
}

fn format_suggestions(view: &SuggestionView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Suggestions for \"{}\":", view.query);
    if view.suggestions.is_empty() {
        out.push_str("  (none)\n");
    }
    for movie in &view.suggestions {
        let _ = writeln!(out, "  {} ({}) [{}]", movie.title, movie.year, movie.id);
    }
    out
}

fn format_details(details: &MovieDetails) -> String {
    let summary = &details.summary;
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", summary.title, summary.year);
    let _ = writeln!(out, "{:-<60}", "");
    let _ = writeln!(out, "  Genre:     {}", details.genre);
    let _ = writeln!(out, "  Runtime:   {}", details.runtime);
    let _ = writeln!(out, "  Released:  {}", details.released);
    let _ = writeln!(out, "  Director:  {}", details.director);
    let _ = writeln!(out, "  Cast:      {}", details.cast().join(", "));
    let _ = writeln!(
        out,
        "  Rating:    {} ({} votes)",
        details.imdb_rating, details.imdb_votes
    );
    for rating in &details.ratings {
        let _ = writeln!(out, "    {}: {}", rating.source, rating.value);
    }
    let _ = writeln!(out, "  Awards:    {}", details.awards);
    let _ = writeln!(out, "  Poster:    {}", summary.poster_or_placeholder());
    let _ = writeln!(out, "\n{}", details.plot);
    out
}

fn fallback_notice(reason: &BrowseError) -> String {
    format!("Showing the offline catalog. {}", reason.user_message())
}
