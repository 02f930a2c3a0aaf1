//! Actor-based aggregation pipeline
//!
//! Each actor runs as an independent async task communicating via Tokio
//! channels.
//!
//! ## Architecture Overview
//!
//! ```text
//!   ┌────────────┐  ┌────────────┐       ┌────────────┐
//!   │ Listener-1 │  │ Listener-2 │  ...  │ Listener-N │   (shared UDP socket)
//!   └─────┬──────┘  └─────┬──────┘       └─────┬──────┘
//!         │  try_send     │                    │
//!         └───────────────┼────────────────────┘
//!                         │  bounded mpsc (drop on overflow)
//!               ┌─────────▼──────────┐
//!               │  CoordinatorActor  │  owns the in-memory buffer
//!               │  (flush timer)     │  flushes / rotates the active file
//!               └─────────┬──────────┘
//!                         │ spawns one task per rotated file
//!               ┌─────────▼──────────┐
//!               │  UploadDispatcher  │ ──► ObjectStore
//!               └────────────────────┘
//!
//!   Listener-k ──► AlertMatcher ──► Mailer   (independent of the buffer path)
//! ```
//!
//! ## Communication Patterns
//!
//! 1. **Forwarded lines**: fire-and-forget `try_send` into the coordinator's
//!    bounded channel; a full or closed channel drops the line silently, the
//!    way UDP already permits loss
//! 2. **Commands**: the coordinator has an mpsc command channel for control
//!    messages, with oneshot channels for request/response

pub mod coordinator;
pub mod listener;
pub mod messages;
