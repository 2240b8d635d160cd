//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, PasswordHasher, Storage};
use crate::domain::{MutationService, OperationRegistry, QueryService};

/// Parameter object bundling the port implementations handlers depend on.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub storage: Storage,
    pub hasher: Arc<dyn PasswordHasher>,
    pub login: Arc<dyn LoginService>,
}

/// Dependency bundle for HTTP, GraphQL and WebSocket handlers.
///
/// The registry shares its services with the `queries` and `mutations`
/// fields, so every transport resolves operations the same way.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub queries: QueryService,
    pub mutations: MutationService,
    pub registry: OperationRegistry,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            storage,
            hasher,
            login,
        } = ports;
        let queries = QueryService::new(storage.clone());
        let mutations = MutationService::new(storage, hasher);
        let registry = OperationRegistry::new(queries.clone(), mutations.clone());
        Self {
            login,
            queries,
            mutations,
            registry,
        }
    }
}
