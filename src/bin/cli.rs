use anyhow::Context;
use clap::{Parser, Subcommand};
use quiz_api::db::{self, queries::results::all_results};
use quiz_api::models::NewQuiz;
use quiz_api::telemetry::init_tracing;
use quiz_api::{QuizStore, SqliteStore};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Database path
    db_path: PathBuf,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create quizzes from a JSON array of quiz definitions
    Import { path: PathBuf },
    /// Export every submitted answer to results.csv in the given directory
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let pool = db::establish_connection(&cli.db_path.display().to_string())
        .await
        .context("Cannot connect to DB")?;
    db::run_migrations(&pool).await?;
    let store = SqliteStore::new(pool);
    match cli.command {
        Commands::Export { path } => export_results(&store, path).await.context("Cannot export"),
        Commands::Import { path } => import_quizzes(&store, path).await.context("Cannot import"),
    }
}

fn write_to(path: PathBuf, data: Vec<impl Serialize>) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut wtr = csv::Writer::from_writer(file);
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

async fn export_results(store: &SqliteStore, path: PathBuf) -> anyhow::Result<()> {
    let results = all_results(store.pool()).await?;
    if !path.exists() {
        std::fs::create_dir_all(&path)?
    }
    tracing::info!("Exporting {} answers", results.len());
    write_to(path.join("results.csv"), results)?;
    Ok(())
}

async fn import_quizzes(store: &SqliteStore, path: PathBuf) -> anyhow::Result<()> {
    let file = std::fs::File::open(&path)?;
    let quizzes: Vec<NewQuiz> = serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("{} is not a JSON array of quizzes", path.display()))?;
    for (n, quiz) in quizzes.into_iter().enumerate() {
        let id = store
            .create_quiz(quiz)
            .await
            .with_context(|| format!("Quiz #{} was rejected", n + 1))?;
        println!("{id}");
    }
    Ok(())
}
