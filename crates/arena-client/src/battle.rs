//! Battle endpoint client
//!
//! POSTs the prompt, streams the body through the consumer and applies the
//! resulting events to a [`Board`]. The response is owned by the read loop,
//! so every exit path (done, cancel, error) drops it and releases the
//! connection.

use crate::consumer::{event_stream, StreamOutcome};
use crate::error::{ClientError, ClientResult};
use arena_core::{ArenaConfig, BattleRequest, Board, Update, BATTLE_PATH};
use futures::StreamExt;
use reqwest::{Client, Url};
use std::time::Duration;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, error, info, warn};

/// How a battle that did not fail came to an end.
pub type BattleOutcome = StreamOutcome;

pub struct BattleClient {
    client: Client,
    url: Url,
}

impl BattleClient {
    pub fn new(config: &ArenaConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: config.endpoint(BATTLE_PATH)?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Run one battle, reporting every applied update to `observer`.
    ///
    /// The board is running for the whole call and stopped on any exit
    /// other than `Finished` (which stops it through the `done` event).
    pub async fn run<F>(
        &self,
        request: &BattleRequest,
        board: &mut Board,
        cancel: &CancellationToken,
        mut observer: F,
    ) -> ClientResult<BattleOutcome>
    where
        F: FnMut(&Update, &Board),
    {
        if request.prompt.trim().is_empty() {
            return Err(ClientError::EmptyPrompt);
        }

        board.begin();
        info!("battle {} started", request.session_id);

        let sent = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                board.stop();
                return Ok(BattleOutcome::Cancelled);
            }
            sent = self.client.post(self.url.clone()).json(request).send() => sent,
        };

        let response = match sent {
            Ok(r) => r,
            Err(e) => {
                error!("battle request failed: {}", e);
                board.stop();
                return Err(e.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("battle error {}: {}", status, body);
            board.stop();
            return Err(ClientError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let events = event_stream(response.bytes_stream());
        tokio::pin!(events);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("battle {} cancelled", request.session_id);
                    board.stop();
                    return Ok(BattleOutcome::Cancelled);
                }
                next = events.next() => match next {
                    Some(Ok(event)) => {
                        let Some(update) = board.apply(&event) else { continue };
                        observer(&update, board);
                        if update == Update::Finished {
                            info!("battle {} finished", request.session_id);
                            return Ok(BattleOutcome::Finished);
                        }
                    }
                    Some(Err(e)) => {
                        warn!("battle {} stopped: {}", request.session_id, e);
                        board.stop();
                        return Err(e);
                    }
                    None => {
                        warn!("battle {} ended without done", request.session_id);
                        board.stop();
                        return Ok(BattleOutcome::Ended);
                    }
                }
            }
        }
    }
}

/// Scoped cancellation for a battle view.
///
/// Dropping the handle cancels its token, stopping any battle running with
/// it. [`BattleHandle::reset`] cancels, clears the board and arms a fresh
/// token for the next battle.
pub struct BattleHandle {
    token: CancellationToken,
    _guard: DropGuard,
}

impl Default for BattleHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl BattleHandle {
    pub fn new() -> Self {
        let token = CancellationToken::new();
        let guard = token.clone().drop_guard();
        Self {
            token,
            _guard: guard,
        }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn reset(&mut self, board: &mut Board) {
        self.token.cancel();
        board.reset();
        *self = Self::new();
    }

    pub async fn run<F>(
        &self,
        client: &BattleClient,
        request: &BattleRequest,
        board: &mut Board,
        observer: F,
    ) -> ClientResult<BattleOutcome>
    where
        F: FnMut(&Update, &Board),
    {
        client.run(request, board, &self.token, observer).await
    }
}
