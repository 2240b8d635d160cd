//! Shared WebSocket adapter state.

use crate::domain::{MutationService, OperationRegistry, QueryService};

use super::origin::OriginPolicy;

/// Dependency bundle for the upgrade handler and per-connection sessions.
#[derive(Clone)]
pub struct WsState {
    pub registry: OperationRegistry,
    pub queries: QueryService,
    pub mutations: MutationService,
    pub origins: OriginPolicy,
}

impl WsState {
    pub fn new(
        registry: OperationRegistry,
        queries: QueryService,
        mutations: MutationService,
        origins: OriginPolicy,
    ) -> Self {
        Self {
            registry,
            queries,
            mutations,
            origins,
        }
    }
}
