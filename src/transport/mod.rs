// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Transport seam.
//!
//! The compiler never talks to a connection directly. Everything goes through
//! [`Transport::send`]: a flat token list in, a raw [`redis::Value`] out.
//! Connection management, retries and timeouts belong to the implementor.
//!
//! Implementations:
//! - `redis::aio::ConnectionManager` (multiplexed, auto-reconnecting)
//! - [`RecordingTransport`]: in-memory, records commands and replays
//!   scripted replies

mod recording;

pub use recording::RecordingTransport;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::Value;
use std::sync::Arc;

use crate::error::SearchError;
use crate::token::Token;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one command (name included) and return the raw reply. Errors are
    /// propagated unchanged as [`SearchError::Transport`].
    async fn send(&self, command: Vec<Token>) -> Result<Value, SearchError>;
}

#[async_trait]
impl Transport for ConnectionManager {
    async fn send(&self, command: Vec<Token>) -> Result<Value, SearchError> {
        let mut conn = self.clone();
        let mut cmd = redis::Cmd::new();
        for token in &command {
            cmd.arg(token);
        }
        let reply: Value = cmd.query_async(&mut conn).await?;
        Ok(reply)
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, command: Vec<Token>) -> Result<Value, SearchError> {
        (**self).send(command).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn send(&self, command: Vec<Token>) -> Result<Value, SearchError> {
        (**self).send(command).await
    }
}
