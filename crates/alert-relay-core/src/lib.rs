//! # Alert-Relay Core
//!
//! Core request-processing pipeline for the alert-relay webhook service.
//!
//! The relay receives alert webhook callbacks, optionally authenticates the
//! caller with HTTP Basic credentials, reformats the payload into a chat
//! message, and forwards it to a fixed downstream chat webhook. This crate
//! contains the pipeline itself; the HTTP hosting shell lives in
//! `alert-relay-service`.
//!
//! ## Architecture
//!
//! Each environment (staging, production) is served by an ordered chain of
//! [`RelayStage`]s sharing a mutable [`RelayContext`]:
//!
//! - [`BasicAuthGate`] — rejects requests without valid Basic credentials
//!   (optional per environment).
//! - [`WebhookForwarder`] — transforms the inbound body and delivers it
//!   downstream, mapping every failure mode to a status code.
//!
//! A stage may halt the chain by returning [`StageFlow::Halt`]; the final
//! context status is the response to the original caller. No stage ever
//! surfaces error detail to the caller beyond that status code.

pub mod auth;
pub mod error;
pub mod forwarder;
pub mod payload;
pub mod pipeline;

pub use auth::BasicAuthGate;
pub use error::RelayError;
pub use forwarder::WebhookForwarder;
pub use payload::{FormattingPolicy, InboundPayload, IncidentDetails, OutboundMessage};
pub use pipeline::{run_chain, RelayContext, RelayStage, StageFlow};

/// Standard result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;
