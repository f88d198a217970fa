// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! tradebot-session: command line front end for the trading bot session.
//!
//! Usage:
//!   tradebot-session [--data-dir <DIR>] <COMMAND>
//!
//! Commands:
//!   bootstrap <URL>   Run one bootstrap against a navigation URL
//!   login             Open the OAuth flow and bootstrap from its callback
//!   status            Show the stored session and the shell it yields
//!   logout            Clear the stored session
//!
//! Reports are printed as JSON on stdout; logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use url::Url;

use tradebot_session::api;
use tradebot_session::auth::{login_url, DerivConnector};
use tradebot_session::config::{ConfigError, SessionConfig};
use tradebot_session::error::CallbackError;
use tradebot_session::session::{
    BootstrapController, BootstrapError, EventKind, SessionEvent, SessionObserver,
    SessionReconciler, Shell,
};
use tradebot_session::storage::{
    open_on_disk, CookieJar, CredentialSnapshot, CredentialStore, LoggedState, StorageError,
    StoragePaths,
};
use tradebot_session::telemetry::init_tracing;

/// CLI arguments for tradebot-session.
#[derive(Parser, Debug)]
#[command(name = "tradebot-session")]
#[command(about = "Multi-account session bootstrap for the trading bot")]
#[command(version)]
struct Args {
    /// Session data directory (overrides SESSION_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one bootstrap against a navigation URL
    Bootstrap {
        /// Navigation URL, e.g. the OAuth redirect with acct1/token1/cur1
        url: Url,
    },
    /// Print the OAuth login URL, wait for its callback and bootstrap
    Login,
    /// Show the stored session without contacting the authorizer
    Status,
    /// Clear the stored session
    Logout,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    #[error(transparent)]
    Callback(#[from] CallbackError),

    #[error("Failed to write report: {0}")]
    Report(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct StatusReport {
    shell: Shell,
    logged_state: LoggedState,
    session: CredentialSnapshot,
}

#[derive(Serialize)]
struct LogoutReport {
    logged_out: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = match SessionConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(SessionConfig::default().log_format);
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }

    init_tracing(config.log_format);

    // Install the ring crypto provider for rustls (must be done before any TLS operations)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("rustls crypto provider was already installed");
    }

    match run(args.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: SessionConfig) -> Result<(), CliError> {
    let paths = StoragePaths::new(&config.data_dir);

    match command {
        Command::Bootstrap { url } => {
            let (store, cookies) = open_on_disk(&paths)?;
            bootstrap(&config, store, cookies, &url).await
        }
        Command::Login => {
            let redirect_uri = config.redirect_uri()?;
            let login = login_url(
                &config.oauth_url,
                &config.app_id,
                &config.language,
                &redirect_uri,
            );
            eprintln!("Open this URL in a browser to log in:\n\n  {login}\n");

            let cancel = shutdown_token();
            let listener = api::bind(&config.callback_addr()).await?;
            let callback = api::serve_until_callback(listener, redirect_uri, cancel).await?;

            let (store, mut cookies) = open_on_disk(&paths)?;
            cookies.set_logged_state(true)?;
            bootstrap(&config, store, cookies, &callback).await
        }
        Command::Status => {
            let (store, cookies) = open_on_disk(&paths)?;
            let shell = match store.active_session()? {
                Some(session) => Shell::Authenticated {
                    login_id: session.login_id,
                },
                None => Shell::Login,
            };
            print_json(&StatusReport {
                shell,
                logged_state: cookies.logged_state()?,
                session: store.snapshot()?,
            })
        }
        Command::Logout => {
            let (mut store, mut cookies) = open_on_disk(&paths)?;
            store.clear()?;
            cookies.set_logged_state(false)?;
            info!("Session cleared");
            print_json(&LogoutReport { logged_out: true })
        }
    }
}

async fn bootstrap(
    config: &SessionConfig,
    store: CredentialStore,
    cookies: CookieJar,
    location: &Url,
) -> Result<(), CliError> {
    let observer = SessionObserver::new();
    let relogin_url = config.redirect_uri().ok().map(|redirect| {
        login_url(&config.oauth_url, &config.app_id, &config.language, &redirect)
    });
    observer.subscribe(EventKind::InvalidToken, move |event| {
        let SessionEvent::InvalidToken { error } = event;
        warn!(code = %error.code, "Session expired, log in again");
        if let Some(url) = &relogin_url {
            eprintln!("Session expired. Log in again with `tradebot-session login` or:\n\n  {url}\n");
        }
    });

    let reconciler = SessionReconciler::new(
        Arc::new(DerivConnector::from_config(config)),
        observer,
        config.authorize_timeout,
    );
    let mut controller = BootstrapController::new(store, cookies, reconciler)
        .with_dev_fallback(config.dev_fallback().cloned())
        .with_cancellation(shutdown_token());

    let report = controller.run(location).await?;
    print_json(&report)
}

/// Token cancelled on Ctrl-C.
fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted");
            cancel.cancel();
        }
    });
    token
}

fn print_json<T: Serialize>(report: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
