// Docker container inspection and stats via bollard

mod error;
mod stats;

pub use error::{Result, RuntimeError};

use anyhow::Context;
use bollard::Docker;
use bollard::query_parameters::{InspectContainerOptions, ListContainersOptions, StatsOptions};
use futures_util::StreamExt;
use std::future::Future;
use tracing::info;

use crate::config::RuntimeConfig;
use crate::models::{ContainerMetadata, RuntimePlatform, StatsSample};

/// Seconds bollard waits on the remote TCP endpoint before failing a request.
const REMOTE_TIMEOUT_SECS: u64 = 120;

/// Container runtime as seen by the collector. Every call may fail independently.
pub trait ContainerRuntime: Send + Sync {
    /// Platform reported by the runtime at connect time.
    fn platform(&self) -> RuntimePlatform;

    /// Ids of the containers currently listed by the runtime.
    fn list_containers(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    fn inspect(&self, id: &str) -> impl Future<Output = Result<ContainerMetadata>> + Send;

    /// One point-in-time (non-streaming) stats sample.
    fn stats(&self, id: &str) -> impl Future<Output = Result<StatsSample>> + Send;
}

pub struct DockerRepo {
    docker: Docker,
    platform: RuntimePlatform,
}

impl DockerRepo {
    /// Connect to the configured endpoint (TCP when host and port are set, the local socket or
    /// named pipe otherwise) and query the platform. Unreachable runtime is an error.
    pub async fn connect(config: &RuntimeConfig) -> anyhow::Result<Self> {
        let docker = match config.remote_address() {
            Some(addr) => {
                info!("Connecting to Docker on {}...", addr);
                Docker::connect_with_http(&addr, REMOTE_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)?
            }
            None => {
                info!("Connecting to Docker on the local socket...");
                Docker::connect_with_local_defaults()?
            }
        };

        let version = docker
            .version()
            .await
            .context("Unable to connect to Docker")?;
        let platform = RuntimePlatform::from_docker(version.os.as_deref().unwrap_or_default());
        info!(
            os = version.os.as_deref().unwrap_or("unknown"),
            version = version.version.as_deref().unwrap_or("unknown"),
            windows = platform == RuntimePlatform::Windows,
            "Connected to Docker"
        );

        Ok(Self { docker, platform })
    }
}

impl ContainerRuntime for DockerRepo {
    fn platform(&self) -> RuntimePlatform {
        self.platform
    }

    async fn list_containers(&self) -> Result<Vec<String>> {
        let containers = self
            .docker
            .list_containers(Some(ListContainersOptions::default()))
            .await?;
        Ok(containers
            .into_iter()
            .filter_map(|c| c.id)
            .filter(|id| !id.is_empty())
            .collect())
    }

    async fn inspect(&self, id: &str) -> Result<ContainerMetadata> {
        let response = self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await?;
        stats::process_inspect(&response)
    }

    async fn stats(&self, id: &str) -> Result<StatsSample> {
        let options = StatsOptions {
            stream: false,
            ..Default::default()
        };
        let mut stream = self.docker.stats(id, Some(options));
        let response = stream
            .next()
            .await
            .ok_or_else(|| RuntimeError::EmptyStatsStream { id: id.to_string() })??;
        stats::process_statistics(&response, id)
    }
}
