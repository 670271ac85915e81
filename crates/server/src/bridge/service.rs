//! Bridge service task and the handle used to reach it.
//!
//! The service task is the only role holding network capability. Requests
//! arrive as envelopes over an mpsc queue and are answered through a
//! oneshot channel, which makes a double response to one request
//! impossible by construction.

use keydash_client::IconFetcher;
use keydash_core::Error;
use tokio::sync::{mpsc, oneshot};

use super::{BridgeRequest, BridgeResponse};

struct Envelope {
    request: BridgeRequest,
    reply: oneshot::Sender<BridgeResponse>,
}

/// Handle held by the dashboard side of the bridge.
///
/// Cheap to clone; all clones feed the same service task.
#[derive(Clone)]
pub struct BridgeHandle {
    tx: mpsc::Sender<Envelope>,
}

/// Spawn the bridge service task around a fetcher.
///
/// The task services requests in arrival order and stops once every
/// handle has been dropped.
pub fn spawn(fetcher: impl IconFetcher + 'static) -> BridgeHandle {
    let (tx, mut rx) = mpsc::channel::<Envelope>(64);

    tokio::spawn(async move {
        while let Some(Envelope { request, reply }) = rx.recv().await {
            let response = handle_request(&fetcher, request).await;
            // the requester may have given up waiting; nothing to do then
            let _ = reply.send(response);
        }
        tracing::debug!("bridge service stopped: all handles dropped");
    });

    BridgeHandle { tx }
}

async fn handle_request(fetcher: &impl IconFetcher, request: BridgeRequest) -> BridgeResponse {
    match request {
        BridgeRequest::Ping => BridgeResponse::ok(),
        BridgeRequest::FetchFavicon { url } => match fetcher.fetch_data_url(&url).await {
            Ok(data_url) => BridgeResponse::with_data(data_url),
            Err(e) => {
                tracing::debug!("favicon fetch failed for {}: {}", url, e);
                BridgeResponse::err(e.to_string())
            }
        },
        BridgeRequest::TestNetwork => match fetcher.probe().await {
            Ok(()) => BridgeResponse::ok(),
            Err(e) => BridgeResponse::err(e.to_string()),
        },
    }
}

impl BridgeHandle {
    /// Send a raw request and await its response.
    pub async fn request(&self, request: BridgeRequest) -> Result<BridgeResponse, Error> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Envelope { request, reply: reply_tx })
            .await
            .map_err(|_| Error::BridgeClosed)?;
        reply_rx.await.map_err(|_| Error::BridgeClosed)
    }

    /// Liveness check; false when the bridge is gone or unhealthy.
    pub async fn ping(&self) -> bool {
        match self.request(BridgeRequest::Ping).await {
            Ok(response) => response.success,
            Err(e) => {
                tracing::error!("bridge ping failed: {}", e);
                false
            }
        }
    }

    /// Fetch one candidate through the bridge.
    ///
    /// Any failure, transport or fetch, resolves to None so the caller can
    /// advance to the next candidate.
    pub async fn fetch_favicon(&self, url: &str) -> Option<String> {
        match self.request(BridgeRequest::FetchFavicon { url: url.to_string() }).await {
            Ok(BridgeResponse { success: true, data_url: Some(data), .. }) => Some(data),
            Ok(response) => {
                tracing::debug!("bridge rejected favicon {}: {:?}", url, response.error);
                None
            }
            Err(e) => {
                tracing::warn!("bridge transport error for {}: {}", url, e);
                None
            }
        }
    }

    /// Network reachability probe.
    pub async fn test_network(&self) -> Result<(), Error> {
        let response = self.request(BridgeRequest::TestNetwork).await?;
        if response.success {
            Ok(())
        } else {
            Err(Error::HttpError(response.error.unwrap_or_else(|| "probe failed".into())))
        }
    }

    /// Handle whose service is already gone, for exercising transport
    /// failure paths.
    #[cfg(test)]
    pub(crate) fn closed() -> Self {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        Self { tx }
    }
}
