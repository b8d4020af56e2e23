//! Cadence console client.
//!
//! Restores the session, navigates to a route and prints what that route
//! shows.
//!
//! # Usage
//!
//! ```bash
//! CADENCE_API_URL=http://localhost:5000/api \
//! CADENCE_TOKEN_FILE=~/.cadence/tokens.json \
//! CADENCE_LOGIN=ada CADENCE_PASSWORD=secret \
//!   cargo run --bin cadence-console -- /playlists/3
//! ```
//!
//! - `CADENCE_TOKEN_FILE`: persist tokens between runs (in memory when unset)
//! - `CADENCE_LOGIN` / `CADENCE_PASSWORD`: sign in when the guard asks for it
//! - `CADENCE_DEMO=1`: serve built-in music when the catalog is unreachable
//! - `RUST_LOG`: log filter (default `cadence=info,cadence_api=debug`)

use anyhow::Context;
use cadence_api::{
    ApiClient, ApiConfig, Credentials, FileTokenStorage, MemoryTokenStorage, MusicQuery,
    PlaylistQuery, TaskQuery, TokenStorage,
};
use cadence_router::{GuardConfig, Location, Navigation, Navigator};
use cadence_session::{SessionConfig, SessionStore};
use cadence_stores::{
    FallbackPolicy, MusicStore, PlaylistStore, StoreConfig, TaskListStore, TaskStore,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_TARGET: &str = "/dashboard";

/// Domain stores of one console run.
struct Stores {
    tasks: TaskStore,
    task_lists: TaskListStore,
    music: MusicStore,
    playlists: PlaylistStore,
}

impl Stores {
    fn new(api: &ApiClient) -> Self {
        let config = StoreConfig::default();
        let catalog = if std::env::var_os("CADENCE_DEMO").is_some() {
            config.with_fallback(FallbackPolicy::Fixtures)
        } else {
            config
        };

        Self {
            tasks: TaskStore::new(api.clone(), config),
            task_lists: TaskListStore::new(api.clone(), config),
            music: MusicStore::new(api.clone(), catalog),
            playlists: PlaylistStore::new(api.clone(), config),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence=info,cadence_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let storage: Arc<dyn TokenStorage> = match std::env::var_os("CADENCE_TOKEN_FILE") {
        Some(path) => Arc::new(
            FileTokenStorage::open(&path)
                .with_context(|| format!("opening token file {}", path.to_string_lossy()))?,
        ),
        None => Arc::new(MemoryTokenStorage::new()),
    };
    let api = ApiClient::new(ApiConfig::from_env(), storage)?;

    let session = SessionStore::new(api.clone(), SessionConfig::default());
    session.initialize().await?;

    let navigator = Navigator::new(session.clone(), GuardConfig::default());
    let listener = navigator.follow_redirects(api.subscribe_redirects());
    let stores = Stores::new(&api);

    let target = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_TARGET.to_string());
    let mut location = enter(&navigator, &target).await?;

    if location.route == "Login" {
        location = sign_in(&session, &navigator).await?.unwrap_or(location);
    }

    println!("== {} ({})", location.full_path(), location.route);
    show(&location, &session, &stores).await?;

    listener.abort();
    session.shutdown(Duration::from_secs(5)).await?;
    Ok(())
}

async fn enter(navigator: &Navigator<SessionStore>, target: &str) -> anyhow::Result<Location> {
    match navigator.navigate(target).await? {
        Navigation::Committed(location) => Ok(location),
        Navigation::Superseded => anyhow::bail!("navigation to {target} was superseded"),
    }
}

/// Sign in with the environment's credentials and continue to the route the
/// guard turned us away from. `None` when no credentials are configured.
async fn sign_in(
    session: &SessionStore,
    navigator: &Navigator<SessionStore>,
) -> anyhow::Result<Option<Location>> {
    let (Ok(login), Ok(password)) = (
        std::env::var("CADENCE_LOGIN"),
        std::env::var("CADENCE_PASSWORD"),
    ) else {
        println!("Sign-in required: set CADENCE_LOGIN and CADENCE_PASSWORD");
        return Ok(None);
    };

    let user = session.login(Credentials::new(login, password)).await?;
    tracing::info!(user = %user.username, "Signed in");

    let target = navigator.redirect_target();
    enter(navigator, &target).await.map(Some)
}

fn id_param(location: &Location) -> anyhow::Result<i64> {
    location
        .param("id")
        .context("route has no id")?
        .parse()
        .with_context(|| format!("invalid id in {}", location.path))
}

async fn show(location: &Location, session: &SessionStore, stores: &Stores) -> anyhow::Result<()> {
    match location.route {
        "Home" | "Dashboard" => {
            let dashboard = stores.tasks.fetch_dashboard().await?;
            let stats = &dashboard.stats;
            println!(
                "{} tasks, {} done, {} pending, {} overdue ({:.2}% complete)",
                stats.total_tasks,
                stats.completed_tasks,
                stats.pending_tasks,
                stats.overdue_tasks,
                stats.completion_rate
            );
            for task in &dashboard.upcoming_tasks {
                println!("  upcoming: {} [{}]", task.title, task.priority);
            }
        },
        "Tasks" => {
            for task in stores.tasks.fetch_all(TaskQuery::default()).await? {
                let mark = if task.completed { 'x' } else { ' ' };
                println!("[{mark}] #{} {} [{}]", task.id, task.title, task.priority);
            }
        },
        "TaskLists" => {
            for list in stores.task_lists.fetch_all(false).await? {
                println!(
                    "#{} {} ({}/{} done)",
                    list.id, list.title, list.completed_count, list.task_count
                );
            }
        },
        "TaskListDetail" => {
            let list = stores.task_lists.fetch_by_id(id_param(location)?, true).await?;
            println!("{}", list.title);
            for task in list.tasks.unwrap_or_default() {
                println!("  #{} {}", task.id, task.title);
            }
        },
        "Music" => {
            for track in stores.music.fetch_all(MusicQuery::default()).await? {
                println!(
                    "#{} {} - {} {}",
                    track.id,
                    track.artist,
                    track.title,
                    track.duration_formatted.unwrap_or_default()
                );
            }
        },
        "MusicSearch" => {
            let query = location.query_value("q").unwrap_or_default();
            for entry in stores.music.search(&query, None).await? {
                println!("{} - {} ({})", entry.artist, entry.title, entry.spotify_id);
            }
        },
        "Playlists" => {
            for playlist in stores.playlists.fetch_all(PlaylistQuery::default()).await? {
                println!(
                    "#{} {} ({} tracks)",
                    playlist.id, playlist.name, playlist.tracks_count
                );
            }
        },
        "PlaylistDetail" => {
            let playlist = stores.playlists.fetch_by_id(id_param(location)?, true).await?;
            println!("{}", playlist.name);
            for (position, track) in playlist.tracks.unwrap_or_default().iter().enumerate() {
                println!("  {}. {} - {}", position + 1, track.artist, track.title);
            }
        },
        "Profile" | "Users" => {
            if let Some(user) = session.user().await {
                println!("{} <{}>", session.full_name().await, user.email);
            }
        },
        _ => println!("Nothing to show"),
    }
    Ok(())
}
