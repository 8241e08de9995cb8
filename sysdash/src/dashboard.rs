//! Lifecycle glue: one store, one stream session, one health fetch.
//!
//! `start`/`stop` are the mount/unmount hooks for whatever renders the view.

use reqwest::Client;
use tracing::{info, warn};

use crate::config::DashboardConfig;
use crate::health::HealthFetcher;
use crate::session::{SessionStats, StreamSession};
use crate::store::{StateStore, ViewModel};

pub struct Dashboard {
    config: DashboardConfig,
    client: Client,
    store: StateStore,
    session: Option<StreamSession>,
    fetcher: HealthFetcher,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Result<Self, reqwest::Error> {
        // no overall timeout: the event stream stays open indefinitely
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;
        let fetcher = HealthFetcher::new(
            client.clone(),
            config.endpoints.health.clone(),
            config.health_timeout,
        );
        Ok(Self {
            config,
            client,
            store: StateStore::new(),
            session: None,
            fetcher,
        })
    }

    /// Open the stream and kick off one health fetch. Needs a tokio runtime.
    pub fn start(&mut self) {
        if self.store.is_retired() {
            warn!("dashboard already stopped; start ignored");
            return;
        }
        if self.session.is_some() {
            return;
        }
        self.open_stream();
        self.spawn_health_fetch();
    }

    /// Close the stream and retire the store. Results still in flight are dropped.
    pub fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            session.close();
        }
        if !self.store.is_retired() {
            self.store.retire();
            info!("dashboard stopped");
        }
    }

    /// Replace the stream with a fresh session and re-run the health check.
    pub fn reconnect(&mut self) {
        if self.store.is_retired() {
            return;
        }
        if let Some(old) = self.session.take() {
            old.close();
        }
        info!("reconnecting");
        self.open_stream();
        self.spawn_health_fetch();
    }

    pub fn current_view(&self) -> ViewModel {
        self.store.current_view()
    }

    pub fn stats(&self) -> SessionStats {
        self.session
            .as_ref()
            .map(StreamSession::stats)
            .unwrap_or_default()
    }

    fn open_stream(&mut self) {
        let session = StreamSession::new(self.store.clone());
        session.open(&self.config.endpoints, &self.client);
        self.session = Some(session);
    }

    fn spawn_health_fetch(&self) {
        let fetcher = self.fetcher.clone();
        let store = self.store.clone();
        tokio::spawn(async move {
            match fetcher.fetch().await {
                Ok(health) => {
                    if !store.commit_health(health) {
                        info!("health result arrived after shutdown; dropped");
                    }
                }
                // health stays absent rather than showing a made-up status
                Err(e) => warn!(url = %fetcher.endpoint(), error = %e, "health check failed"),
            }
        });
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.stop();
    }
}
