//! HTTP server configuration object.

use std::net::SocketAddr;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

use crate::inbound::http::session_config::SessionSettings;
use crate::inbound::http::state::HttpStatePorts;
use crate::inbound::ws::origin::OriginPolicy;

/// Everything [`super::create_server`] needs to serve requests.
pub struct ServerConfig {
    pub(crate) ports: HttpStatePorts,
    pub(crate) session: SessionSettings,
    pub(crate) origins: OriginPolicy,
    pub(crate) bind_addr: SocketAddr,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(ports: HttpStatePorts, session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            ports,
            session,
            origins: OriginPolicy::default(),
            bind_addr,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Accept WebSocket upgrades from these HTTPS hosts as well as localhost.
    #[must_use]
    pub fn with_origins(mut self, origins: OriginPolicy) -> Self {
        self.origins = origins;
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
