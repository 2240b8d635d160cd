//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! [`http`] holds the REST routes and session plumbing, [`graphql`] the
//! schema and its endpoint, and [`ws`] the WebSocket channel.

pub mod graphql;
pub mod http;
pub mod ws;
