use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

use anilist::{AnilistClient, ListCache, ListEntry};
use pipeline::{
    fuse, Dimension, DimensionToggles, Recommender, ScoredRec, SeenFilter, UserRecommendations,
    UserRun,
};
use report::{profile_file_name, report_file_name, write_report, write_taste_profile, UserOrigins};

/// NextAni - AniList-based anime and manga recommendations
#[derive(Parser)]
#[command(name = "nextani")]
#[command(about = "Personalized anime and manga recommendations from AniList lists", long_about = None)]
struct Cli {
    /// AniList user names; two or more produce one joint list
    #[arg(required = true)]
    users: Vec<String>,

    /// Ignore cached lists and fetch fresh data from AniList
    #[arg(short, long)]
    refresh: bool,

    /// Bias scores by tag affinity
    #[arg(short, long)]
    tags: bool,

    /// Bias scores by studio affinity
    #[arg(short, long)]
    studios: bool,

    /// Bias scores by staff affinity
    #[arg(short = 'f', long)]
    staff: bool,

    /// Bias scores by genre affinity
    #[arg(short, long)]
    genres: bool,

    /// Keep titles you have already watched in the list
    #[arg(long)]
    rewatch: bool,

    /// Keep titles already on your list in the ranking
    #[arg(long)]
    include_listed: bool,

    /// Directory cached lists are kept in
    #[arg(long, default_value = ".")]
    cache_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let toggles = DimensionToggles {
        tags: cli.tags,
        studios: cli.studios,
        staff: cli.staff,
        genres: cli.genres,
        decades: true,
    };

    let client = AnilistClient::new();
    let cache = ListCache::new(&cli.cache_dir);

    let mut lists: Vec<(String, Vec<ListEntry>)> = Vec::new();
    for user in &cli.users {
        let entries = load_user_list(&client, &cache, user, cli.refresh).await?;
        println!(
            "{} loaded {} titles for {}",
            "✓".green(),
            entries.len(),
            user.bold()
        );
        lists.push((user.clone(), entries));
    }

    // Every user gets their own ranked report and taste files; two or
    // more additionally get the fused joint report.
    let recommender =
        Recommender::new(toggles).with_exclude_listed(!cli.include_listed);
    let mut runs: Vec<UserRecommendations> = Vec::new();
    for (user, entries) in &lists {
        let result = recommender.recommend(user, entries);
        println!(
            "{} {} gives a mean score of {:.2}",
            "✓".green(),
            user.bold(),
            result.profile.mean_score
        );
        write_taste_profiles(&result)?;
        write_user_report(&cli, entries, &result)?;
        runs.push(result);
    }

    if lists.len() > 1 {
        write_joint_report(&cli, &lists, &runs)?;
    }
    Ok(())
}

/// Loads a user's list from the cache, falling back to the API.
async fn load_user_list(
    client: &AnilistClient,
    cache: &ListCache,
    user: &str,
    refresh: bool,
) -> Result<Vec<ListEntry>> {
    if !refresh {
        let cached = cache
            .load(user)
            .with_context(|| format!("Failed to read cached list for {}", user))?;
        if let Some(entries) = cached {
            info!("Using cached list for {}", user);
            return Ok(entries);
        }
    }
    let entries = client
        .fetch_user_list(user)
        .await
        .with_context(|| format!("Failed to fetch AniList data for {}", user))?;
    cache
        .store(user, &entries)
        .with_context(|| format!("Failed to cache list for {}", user))?;
    Ok(entries)
}

/// Report for one user: their own watch history is filtered out.
fn write_user_report(
    cli: &Cli,
    entries: &[ListEntry],
    result: &UserRecommendations,
) -> Result<()> {
    let filter = SeenFilter::single_user().with_rewatch(cli.rewatch);
    let seen = filter.seen_ids(entries);
    let recs = filter.apply(result.recommendations.clone(), &[seen]);

    let path = report_file_name(std::slice::from_ref(&result.user));
    let origins = [UserOrigins {
        user: &result.user,
        origins: &result.origins,
    }];
    write_report_file(&path, &recs, &origins)?;
    println!(
        "{} Wrote {} ranked titles to {}",
        "✓".green(),
        recs.len(),
        path.bold()
    );
    Ok(())
}

/// Joint report: fused scores, dropping only what every user has seen.
fn write_joint_report(
    cli: &Cli,
    lists: &[(String, Vec<ListEntry>)],
    runs: &[UserRecommendations],
) -> Result<()> {
    let user_runs: Vec<UserRun> = runs
        .iter()
        .map(|run| UserRun {
            user: run.user.clone(),
            recommendations: run.recommendations.clone(),
            own_ratings: run.own_ratings.clone(),
        })
        .collect();
    let fused = fuse(&user_runs);

    let filter = SeenFilter::joint().with_rewatch(cli.rewatch);
    let seen: Vec<_> = lists
        .iter()
        .map(|(_, entries)| filter.seen_ids(entries))
        .collect();
    let recs = filter.apply(fused, &seen);

    let path = report_file_name(&cli.users);
    let origins: Vec<UserOrigins<'_>> = runs
        .iter()
        .map(|run| UserOrigins {
            user: &run.user,
            origins: &run.origins,
        })
        .collect();
    write_report_file(&path, &recs, &origins)?;
    println!(
        "{} Wrote {} joint titles to {}",
        "✓".green(),
        recs.len(),
        path.bold()
    );
    Ok(())
}

/// Writes one taste file per affinity dimension.
fn write_taste_profiles(result: &UserRecommendations) -> Result<()> {
    for dimension in Dimension::ALL {
        let path = profile_file_name(&result.user, dimension);
        let file =
            File::create(&path).with_context(|| format!("Failed to create {}", path))?;
        let mut out = BufWriter::new(file);
        write_taste_profile(&mut out, &result.profile, dimension)
            .with_context(|| format!("Failed to write {}", path))?;
        out.flush()?;
        println!(
            "{} Wrote the {} profile for {} to {}",
            "✓".green(),
            dimension,
            result.user.bold(),
            path.bold()
        );
    }
    Ok(())
}

fn write_report_file(path: &str, recs: &[ScoredRec], users: &[UserOrigins<'_>]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path))?;
    let mut out = BufWriter::new(file);
    write_report(&mut out, recs, users).with_context(|| format!("Failed to write {}", path))?;
    out.flush()?;
    Ok(())
}
