// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use async_trait::async_trait;
use parking_lot::Mutex;
use redis::Value;
use std::collections::VecDeque;

use super::Transport;
use crate::error::SearchError;
use crate::token::Token;

/// In-memory transport: records every command and answers from a queue of
/// scripted replies (`OK` once the queue is empty).
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Vec<Token>>>,
    replies: Mutex<VecDeque<Result<Value, String>>>,
}

impl RecordingTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for the next command.
    pub fn push_reply(&self, reply: Value) {
        self.replies.lock().push_back(Ok(reply));
    }

    /// Queue a transport failure for the next command.
    pub fn push_error(&self, message: impl Into<String>) {
        self.replies.lock().push_back(Err(message.into()));
    }

    /// All commands sent so far, oldest first.
    #[must_use]
    pub fn commands(&self) -> Vec<Vec<Token>> {
        self.sent.lock().clone()
    }

    #[must_use]
    pub fn last_command(&self) -> Option<Vec<Token>> {
        self.sent.lock().last().cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sent.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sent.lock().is_empty()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, command: Vec<Token>) -> Result<Value, SearchError> {
        self.sent.lock().push(command);
        match self.replies.lock().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(SearchError::Transport(message.into())),
            None => Ok(Value::Okay),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_transport_is_empty() {
        let transport = RecordingTransport::new();
        assert!(transport.is_empty());
        assert_eq!(transport.len(), 0);
    }

    #[tokio::test]
    async fn test_records_and_replays() {
        let transport = RecordingTransport::new();
        transport.push_reply(Value::Int(7));

        let reply = transport.send(vec!["FT.INFO".into(), "idx".into()]).await.unwrap();
        assert_eq!(reply, Value::Int(7));

        let reply = transport.send(vec!["PING".into()]).await.unwrap();
        assert_eq!(reply, Value::Okay);

        assert_eq!(transport.len(), 2);
        assert_eq!(transport.commands()[0], ["FT.INFO", "idx"]);
    }

    #[tokio::test]
    async fn test_scripted_error() {
        let transport = RecordingTransport::new();
        transport.push_error("Unknown index name");

        let err = transport.send(vec!["FT.SEARCH".into()]).await.unwrap_err();
        assert!(matches!(err, SearchError::Transport(_)));
        assert!(err.to_string().contains("Unknown index name"));
    }
}
