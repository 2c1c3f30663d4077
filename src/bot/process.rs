use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;
use tracing::Instrument;

use crate::bot::stale::process_prs;
use crate::bot::RepositoryLoader;
use crate::config::StalePrsConfig;
use crate::utils::logging::LogError;

/// A request to sweep the open pull requests of a single repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SweepRequest {
    /// Repository name in the `owner/name` format, as received from the cron job.
    pub repository: String,
    /// App installation that has access to the repository.
    pub installation: String,
}

pub type SweepSender = mpsc::Sender<SweepRequest>;

const SWEEP_QUEUE_CAPACITY: usize = 1024;

pub struct SweepProcess {
    pub tx: SweepSender,
    pub process: Pin<Box<dyn Future<Output = ()> + Send>>,
}

/// Creates a future with a process that receives sweep requests and performs them one after
/// another.
///
/// Every request is handled at most once: it is neither retried when the sweep fails, nor
/// kept when the queue is full at the time it is sent.
pub fn create_sweep_process<Loader>(loader: Loader, config: StalePrsConfig) -> SweepProcess
where
    Loader: RepositoryLoader + Send + Sync + 'static,
    Loader::Client: 'static,
{
    let (tx, mut rx) = mpsc::channel::<SweepRequest>(SWEEP_QUEUE_CAPACITY);

    let service = async move {
        while let Some(request) = rx.recv().await {
            let span = tracing::info_span!(
                "StalePrSweep",
                repo = %request.repository,
                installation = %request.installation
            );
            tracing::debug!("Received sweep request: {request:?}");
            if let Err(error) = sweep(&loader, &config, &request)
                .instrument(span.clone())
                .await
            {
                span.log_error(error);
            }
        }
    };

    SweepProcess {
        tx,
        process: Box::pin(service),
    }
}

async fn sweep<Loader: RepositoryLoader>(
    loader: &Loader,
    config: &StalePrsConfig,
    request: &SweepRequest,
) -> anyhow::Result<()> {
    let client = loader.load_repository(&request.repository, &request.installation)?;
    let actions = process_prs(&client, config).await?;
    tracing::info!("Sweep finished, processed {} pull request(s)", actions.len());
    Ok(())
}
