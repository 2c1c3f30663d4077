use std::future::IntoFuture;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use changebot::github::api::DEFAULT_GITHUB_URL;
use changebot::{
    create_app, create_github_client, create_sweep_process, CronToken, GithubAppClient,
    ServerState, StalePrsConfig,
};

#[derive(clap::Parser)]
struct Opts {
    /// Secret used to authenticate requests from the cron job.
    #[arg(long, env = "CRON_TOKEN")]
    cron_token: String,

    /// Github App ID.
    #[arg(long, env = "APP_ID")]
    app_id: u64,

    /// Private key used to authenticate as a Github App.
    #[arg(long, env = "PRIVATE_KEY")]
    private_key: String,

    /// Close stale pull requests. If disabled, they only receive warnings.
    #[arg(long, env = "STALE_PRS_CLOSE")]
    stale_prs_close: bool,

    /// Inactivity (in seconds) after which a stale pull request is closed.
    #[arg(long, env = "STALE_PRS_CLOSE_SECONDS")]
    stale_prs_close_seconds: u64,

    /// Inactivity (in seconds) after which a stale pull request receives a warning.
    #[arg(long, env = "STALE_PRS_WARN_SECONDS")]
    stale_prs_warn_seconds: u64,

    /// Label that prevents a pull request from being closed.
    #[arg(long, env = "KEEP_OPEN_LABEL", default_value = "keep-open")]
    keep_open_label: String,

    /// Base URL of the GitHub API.
    #[arg(long, env = "GITHUB_URL", default_value = DEFAULT_GITHUB_URL)]
    github_url: String,

    /// Port of the web server.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,
}

fn try_main(opts: Opts) -> anyhow::Result<()> {
    let config = StalePrsConfig::new(
        opts.stale_prs_close,
        Duration::from_secs(opts.stale_prs_warn_seconds),
        Duration::from_secs(opts.stale_prs_close_seconds),
    )
    .keep_open_label(opts.keep_open_label);
    if !config.has_ordered_thresholds() {
        tracing::warn!(
            "Warning threshold ({}s) is larger than the closing threshold ({}s)",
            opts.stale_prs_warn_seconds,
            opts.stale_prs_close_seconds
        );
    }
    tracing::info!("Loaded configuration: {config:?}");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Cannot build tokio runtime")?;

    let client = runtime.block_on(async {
        create_github_client(
            opts.app_id.into(),
            opts.github_url,
            opts.private_key.into_bytes().into(),
        )
    })?;
    let sweep_process = create_sweep_process(GithubAppClient::new(client), config);

    let state = ServerState::new(sweep_process.tx, CronToken::new(opts.cron_token));
    let app = create_app(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], opts.port));

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Cannot bind to {addr}"))?;
        tracing::info!("Listening on {addr}");

        tokio::select! {
            () = sweep_process.process => {
                tracing::warn!("Sweep process has ended");
                Ok(())
            },
            res = axum::serve(listener, app).into_future() => {
                tracing::warn!("Server has ended: {res:?}");
                res.context("Server failed")
            }
        }
    })?;

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    if let Err(error) = try_main(opts) {
        eprintln!("Error: {error:?}");
        std::process::exit(1);
    }
}
