// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::Context;
use clap::Parser;
use movie_master_api::app::{create_router, AppState, VERSION};
use movie_master_api::services::auth::{JwtConfig, JwtService};
use movie_master_api::services::email::{EmailConfig, LogMailer, Mailer, SmtpMailer};
use movie_master_api::services::logging::init_tracing;
use movie_master_api::services::store;
use movie_master_api::services::tmdb::{DefaultUser, Seeder, TmdbConfig};
use movie_master_api::services::users::UserServiceConfig;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "movie-master-api", version = VERSION, about = "Movie Master REST API")]
struct Args {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// `mysql://...` or `memory`; defaults to the in-memory store
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 10)]
    database_max_connections: u32,

    /// Skip TMDB and default user seeding
    #[arg(long)]
    skip_seed: bool,
}

fn build_mailer() -> Arc<dyn Mailer> {
    let config = match EmailConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(reason = %e, "SMTP not configured, emails will only be logged");
            return Arc::new(LogMailer);
        }
    };
    match SmtpMailer::new(&config) {
        Ok(mailer) => {
            tracing::info!(host = %config.smtp_host, port = config.smtp_port, "SMTP mailer ready");
            Arc::new(mailer)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to build SMTP transport, falling back to log mailer");
            Arc::new(LogMailer)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    tracing::info!(version = VERSION, "Starting movie-master-api");

    let store = store::connect(args.database_url.as_deref(), args.database_max_connections)
        .await
        .context("Failed to open the store")?;

    let jwt = Arc::new(JwtService::new(JwtConfig::from_env()?)?);
    let mailer = build_mailer();
    let state = AppState::new(store, jwt, mailer, UserServiceConfig::from_env());

    if args.skip_seed {
        tracing::info!("Seeding skipped");
    } else {
        Seeder::new(
            state.movies.clone(),
            state.users.clone(),
            &TmdbConfig::from_env(),
            DefaultUser::from_env(),
        )
        .run()
        .await;
    }

    let app = create_router(state)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app).await?;
    Ok(())
}
