use std::fmt::Display;

use anyhow::Result;
use cache_keys::{
    delete_template_fragment_cache, reset_workout_canonical_form,
    reset_workout_log, template_cache_name,
};
use clap::Parser;
use redis_connection::{
    CacheTrait, MemoryCache, RedisCache, config::MemoryConfig,
    connect_redis_db,
};
use sql_connection::{PostgresDbConfig, connect_postgres_db};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user_command_handlers::ProvisionApiUserHandler;
use user_commands::ProvisionApiUserCommand;

use crate::cli::{CacheBackend, CacheCommand, Cli, Commands};

mod cli;

type DynCache = dyn CacheTrait<Value = serde_json::Value>;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn build_cache(cli: &Cli) -> Result<Box<DynCache>> {
    let prefix = cli.cache_prefix();

    let cache: Box<DynCache> = match cli.cache {
        CacheBackend::Redis => {
            let pool = connect_redis_db(&cli.redis_config()).await?;
            let cache = RedisCache::<serde_json::Value>::new(pool);
            match prefix {
                Some(prefix) => Box::new(cache.with_secondary_prefix(prefix)),
                None => Box::new(cache),
            }
        }
        CacheBackend::Memory => {
            let cache =
                MemoryCache::<serde_json::Value>::new(MemoryConfig::default());
            match prefix {
                Some(prefix) => Box::new(cache.with_secondary_prefix(prefix)),
                None => Box::new(cache),
            }
        }
    };

    Ok(cache)
}

fn display_args(args: &[String]) -> Vec<&(dyn Display + Sync)> {
    args.iter().map(|arg| arg as &(dyn Display + Sync)).collect()
}

/// Runs a cache maintenance command and returns the line to print, if any
async fn run_cache_command(
    cache: &DynCache, command: &CacheCommand,
) -> Option<String> {
    match command {
        CacheCommand::ResetWorkout { workout_id } => {
            reset_workout_canonical_form(cache, *workout_id).await;
            None
        }
        CacheCommand::ResetWorkoutLog {
            user_id,
            year,
            month,
            day,
        } => {
            reset_workout_log(cache, *user_id, *year, *month, *day).await;
            None
        }
        CacheCommand::DeleteFragment {
            fragment_name,
            args,
        } => {
            let handled = delete_template_fragment_cache(
                cache,
                fragment_name,
                &display_args(args),
            )
            .await;
            Some(format!("Secondary key handled: {handled}"))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match &cli.command {
        Commands::CreateApiUser {
            username,
            email,
            creator_username,
        } => {
            let config = PostgresDbConfig::from_uri(cli.get_database_url());
            let db = connect_postgres_db(&config).await?;
            info!("Connected to database successfully");

            let handler = ProvisionApiUserHandler::new(db);
            let provisioned = handler
                .execute(ProvisionApiUserCommand::new(
                    username,
                    email,
                    creator_username,
                ))
                .await?;

            println!("{}", provisioned.success_message());
        }
        Commands::FragmentKey {
            fragment_name,
            args,
        } => {
            println!("{}", template_cache_name(fragment_name, &display_args(args)));
        }
        Commands::Cache(command) => {
            let cache = build_cache(&cli).await?;
            if let Some(line) = run_cache_command(cache.as_ref(), command).await
            {
                println!("{line}");
            }
        }
    }

    Ok(())
}
