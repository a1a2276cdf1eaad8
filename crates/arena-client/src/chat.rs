//! Avatar chat endpoint client
//!
//! One speaker, same stream framing as the battle. Each turn POSTs the
//! conversation so far and folds the streamed tokens into a single
//! assistant message on the [`Conversation`].

use crate::consumer::{chat_stream, StreamOutcome};
use crate::error::{ClientError, ClientResult};
use arena_core::{ArenaConfig, ChatUpdate, Conversation, CHAT_PATH};
use futures::StreamExt;
use reqwest::{Client, Url};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// How a chat turn that did not fail came to an end.
pub type ChatOutcome = StreamOutcome;

pub struct ChatClient {
    client: Client,
    url: Url,
}

impl ChatClient {
    pub fn new(config: &ArenaConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: config.endpoint(CHAT_PATH)?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Send one user message and stream the reply into `conversation`.
    ///
    /// Blank text is rejected before anything is recorded. A failed request
    /// or broken stream leaves the error reply as the last message.
    pub async fn send<F>(
        &self,
        conversation: &mut Conversation,
        text: &str,
        cancel: &CancellationToken,
        mut observer: F,
    ) -> ClientResult<ChatOutcome>
    where
        F: FnMut(&ChatUpdate, &Conversation),
    {
        let request = conversation
            .begin_turn(text)
            .ok_or(ClientError::EmptyPrompt)?;
        info!("chat {} started", request.session_id);

        let sent = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                conversation.stop();
                return Ok(ChatOutcome::Cancelled);
            }
            sent = self.client.post(self.url.clone()).json(&request).send() => sent,
        };

        let response = match sent {
            Ok(r) => r,
            Err(e) => {
                error!("chat request failed: {}", e);
                conversation.fail();
                return Err(e.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("chat error {}: {}", status, body);
            conversation.fail();
            return Err(ClientError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let events = chat_stream(response.bytes_stream());
        tokio::pin!(events);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("chat {} cancelled", request.session_id);
                    conversation.stop();
                    return Ok(ChatOutcome::Cancelled);
                }
                next = events.next() => match next {
                    Some(Ok(event)) => {
                        let Some(update) = conversation.apply(&event) else { continue };
                        observer(&update, conversation);
                        if update == ChatUpdate::Finished {
                            info!("chat {} finished", request.session_id);
                            return Ok(ChatOutcome::Finished);
                        }
                    }
                    Some(Err(e)) => {
                        warn!("chat {} stopped: {}", request.session_id, e);
                        conversation.fail();
                        return Err(e);
                    }
                    None => {
                        warn!("chat {} ended without done", request.session_id);
                        conversation.stop();
                        return Ok(ChatOutcome::Ended);
                    }
                }
            }
        }
    }
}
