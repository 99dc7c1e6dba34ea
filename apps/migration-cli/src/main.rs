use clap::{Parser, ValueEnum};
use db_infra::config::db::{DbKind, RuntimeEnv};
use db_infra::{build_admin_pool, orchestrate_migration};
use luckydraw::services::pool_seed::{pool_summary, seed_pool, verify_layout, DEFAULT_POOL_SPEC};
use migration::MigrationCommand;
use tracing::info;

#[derive(Clone, Copy, ValueEnum)]
enum Command {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
    /// Replace the sign pool with the default layout
    Seed,
    /// Check the sign pool against the default layout
    VerifyPool,
}

#[derive(Clone, ValueEnum)]
enum Env {
    Prod,
    Test,
}

#[derive(Clone, ValueEnum)]
enum Db {
    Postgres,
    SqliteFile,
}

#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "Lucky draw database migration and pool tool")]
struct Args {
    #[arg(value_enum)]
    command: Command,

    /// Runtime environment
    #[arg(short, long, value_enum, default_value = "test")]
    env: Env,

    /// Database type; in-memory SQLite is pointless for a one-shot command
    #[arg(short, long, value_enum, default_value = "postgres")]
    db: Db,
}

async fn run_pool_command(env: RuntimeEnv, db_kind: DbKind, seed: bool) -> Result<(), String> {
    let pool = build_admin_pool(env, db_kind)
        .await
        .map_err(|e| e.to_string())?;

    let counts = if seed {
        seed_pool(&pool, &DEFAULT_POOL_SPEC)
            .await
            .map_err(|e| e.to_string())?
    } else {
        let counts = pool_summary(&pool).await.map_err(|e| e.to_string())?;
        verify_layout(&DEFAULT_POOL_SPEC, &counts).map_err(|e| e.to_string())?;
        counts
    };

    info!(
        total = counts.total,
        drawn = counts.drawn,
        undrawn = counts.undrawn(),
        "sign pool ok"
    );
    for (level, count) in &counts.by_level {
        info!(level, count, "level");
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_env_filter("migration=info,migration_cli=info,luckydraw=info,sqlx=warn")
        .init();

    let args = Args::parse();

    let env = match args.env {
        Env::Prod => RuntimeEnv::Prod,
        Env::Test => RuntimeEnv::Test,
    };

    let db_kind = match args.db {
        Db::Postgres => DbKind::Postgres,
        Db::SqliteFile => DbKind::SqliteFile,
    };

    let migration_command = match args.command {
        Command::Up => Some(MigrationCommand::Up),
        Command::Down => Some(MigrationCommand::Down),
        Command::Fresh => Some(MigrationCommand::Fresh),
        Command::Reset => Some(MigrationCommand::Reset),
        Command::Refresh => Some(MigrationCommand::Refresh),
        Command::Status => Some(MigrationCommand::Status),
        Command::Seed | Command::VerifyPool => None,
    };

    let result = match migration_command {
        Some(command) => orchestrate_migration(env, db_kind, command)
            .await
            .map_err(|e| format!("Migration failed: {e}")),
        None => {
            let seed = matches!(args.command, Command::Seed);
            run_pool_command(env, db_kind, seed)
                .await
                .map_err(|e| format!("Pool command failed: {e}"))
        }
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
