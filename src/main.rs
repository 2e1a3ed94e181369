use crate::config::WikiConfig;
use crate::database::SqlQueries;
use crate::database::sqlite::SqliteRepository;
use crate::services::{DataService, DataServiceHandle, DataServiceOptions};
use anyhow::Context;
use axum::Router;
use sqlx::Sqlite;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod config;
mod database;
mod domain;
mod features;
mod parser;
mod services;

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub data_service: DataServiceHandle,
}

pub fn app(state: AppState) -> Router {
    features::pages::pages_router().with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // determine environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // load centralized config
    let config = WikiConfig::from_env()?;

    // query templates are fixed from here on
    let queries = SqlQueries::load(config.sql_queries_file.as_deref())?;

    // verify db exists
    if !Sqlite::database_exists(&config.database_url)
        .await
        .unwrap_or(false)
    {
        info!(url = %config.database_url, "Database not found, creating...");
        Sqlite::create_database(&config.database_url)
            .await
            .with_context(|| format!("Unable to create database at {}", config.database_url))?;
    }

    // connect to our db
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to create pool on {}", config.database_url))?;

    // the data service owns the pool from here on; handlers only see its handle
    let repo = Arc::new(SqliteRepository::new(pool, queries));
    let data_service = DataService::start(
        repo,
        DataServiceOptions {
            queue_capacity: config.queue_capacity,
            reply_timeout: config.reply_timeout,
            // no point running more statements at once than the pool has connections
            max_in_flight: config.max_connections as usize,
        },
    )
    .await?;

    let app_state = AppState { data_service };

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Could not start a HTTP server on {}", addr))?;
    info!("HTTP server running on http://{}", addr);

    axum::serve(listener, app(app_state)).await?;

    Ok(())
}
