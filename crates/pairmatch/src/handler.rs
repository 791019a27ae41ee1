//! Per-connection handler: frame decoding, acknowledgments, and the writer
//! task.
//!
//! Each accepted connection gets its own Tokio task running
//! [`handle_connection`]. The flow is:
//!   1. Split the socket and spawn a writer draining the connection's outbox
//!   2. Register the connection with the orchestrator
//!   3. Loop: receive a frame → decode → dispatch → queue the ack

use pairmatch_protocol::{AckError, ChannelId, ClientEnvelope, Codec, ErrorCode};
use pairmatch_transport::{Connection, FrameReceiver, FrameSender, WebSocketConnection};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::events::{AckResponse, ServerFrame};
use crate::{OrchestratorError, OrchestratorHandle, PairmatchError};

/// Drop guard that tells the orchestrator the connection is gone when the
/// handler exits, however it exits.
///
/// `Drop` is synchronous, so the notification is sent from a spawned task.
struct DisconnectGuard {
    channel: ChannelId,
    orchestrator: OrchestratorHandle,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        let channel = self.channel;
        let orchestrator = self.orchestrator.clone();
        tokio::spawn(async move {
            let _ = orchestrator.disconnect(channel).await;
        });
    }
}

/// Just the `ack` id of an inbound frame, used to answer frames whose
/// action didn't decode.
#[derive(Deserialize)]
struct AckProbe {
    ack: Option<u64>,
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C>(
    conn: WebSocketConnection,
    orchestrator: OrchestratorHandle,
    codec: C,
) -> Result<(), PairmatchError>
where
    C: Codec + Clone,
{
    let channel = ChannelId(conn.id().into_inner());
    tracing::debug!(%channel, "handling new connection");

    let (mut sink, mut stream) = conn.split();
    let (outbox, mut inbox) = mpsc::unbounded_channel::<ServerFrame>();

    // The writer stops once the orchestrator and this handler have both
    // dropped their outbox senders.
    let writer_codec = codec.clone();
    tokio::spawn(async move {
        while let Some(frame) = inbox.recv().await {
            let bytes = match writer_codec.encode(&frame) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(%channel, error = %e, "failed to encode frame");
                    continue;
                }
            };
            if let Err(e) = sink.send(&bytes).await {
                tracing::debug!(%channel, error = %e, "send failed, stopping writer");
                break;
            }
        }
        let _ = sink.close().await;
    });

    orchestrator.connect(channel, outbox.clone()).await?;
    let _guard = DisconnectGuard {
        channel,
        orchestrator: orchestrator.clone(),
    };

    loop {
        let data = match stream.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%channel, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%channel, error = %e, "recv error");
                break;
            }
        };

        let envelope: ClientEnvelope = match codec.decode(&data) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::debug!(%channel, error = %e, "failed to decode frame");
                let error = AckError::new(ErrorCode::InvalidPayload, e.to_string());
                let frame = match codec.decode::<AckProbe>(&data).ok().and_then(|p| p.ack) {
                    Some(ack) => ServerFrame::Ack {
                        ack,
                        response: AckResponse::Error(error),
                    },
                    None => ServerFrame::Error(error),
                };
                let _ = outbox.send(frame);
                continue;
            }
        };

        let result = orchestrator.dispatch(channel, envelope.action).await;
        let gone = matches!(result, Err(OrchestratorError::Unavailable));
        let response = result.unwrap_or_else(|e| AckResponse::Error(e.to_ack()));

        if let Some(ack) = envelope.ack {
            let _ = outbox.send(ServerFrame::Ack { ack, response });
        }
        if gone {
            tracing::info!(%channel, "orchestrator gone, closing connection");
            break;
        }
    }

    // _guard drops here → disconnect fires.
    Ok(())
}
