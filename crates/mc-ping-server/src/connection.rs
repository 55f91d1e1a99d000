//! Per-connection handshake handling.
//!
//! The protocol work lives in [`Session`], a small synchronous state machine
//! that owns the connection's byte buffer; the async code around it is thin
//! transport glue. Each connection answers at most one packet and is then
//! closed.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info};

use mc_ping_proto::buffer::ByteBuf;
use mc_ping_proto::error::HandshakeError;
use mc_ping_proto::handshake::{DecodeResult, Handshake, NextState};
use mc_ping_proto::packets::PONG_PACKET;

use crate::replies::Replies;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Awaiting,
    Answered,
    Aborted,
}

/// Which precomputed reply to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReplyKind {
    /// Status response followed by the constant pong.
    Status,
    /// Kick packet only.
    Kick,
}

/// What the transport glue should do after feeding a chunk in.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Action {
    /// Keep the connection open and wait for more bytes.
    Wait,
    /// Send the reply, then close gracefully.
    Reply(ReplyKind, Handshake),
    /// Close abruptly without replying.
    Abort(HandshakeError),
}

/// Handshake state machine for one connection.
pub(crate) struct Session {
    buf: ByteBuf,
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self {
            buf: ByteBuf::new(),
            state: SessionState::Awaiting,
        }
    }

    /// Feed one chunk of transport bytes. Chunks arriving after a terminal
    /// state are ignored.
    pub fn on_data(&mut self, chunk: &[u8]) -> Action {
        if self.state != SessionState::Awaiting {
            return Action::Wait;
        }

        self.buf.append(chunk);
        self.buf.reset_cursor();
        match Handshake::try_decode(&mut self.buf) {
            DecodeResult::Incomplete => Action::Wait,
            DecodeResult::Invalid(err) => {
                self.state = SessionState::Aborted;
                Action::Abort(err)
            }
            DecodeResult::Ready(handshake) => {
                self.state = SessionState::Answered;
                let kind = match handshake.next_state {
                    NextState::Login => ReplyKind::Kick,
                    NextState::Status => ReplyKind::Status,
                };
                Action::Reply(kind, handshake)
            }
        }
    }
}

/// Drive one accepted socket to completion.
pub async fn handle(
    mut stream: TcpStream,
    peer: SocketAddr,
    replies: Arc<Replies>,
    handshake_timeout: Duration,
) {
    debug!("{peer} connected");

    match tokio::time::timeout(handshake_timeout, exchange(&mut stream, peer, &replies)).await {
        Ok(Ok(true)) => {
            // Graceful half-close so the reply flushes before the socket
            // goes away.
            let _ = stream.shutdown().await;
            debug!("{peer} disconnected successfully");
        }
        Ok(Ok(false)) => debug!("{peer} disconnected before completing a handshake"),
        Ok(Err(e)) => debug!("{peer} disconnected with error: {e}"),
        Err(_) => debug!("{peer} aborted: no handshake within {handshake_timeout:?}"),
    }
    // Dropping the stream closes it; aborted and timed-out connections get
    // no reply at all.
}

/// Read chunks until the session reaches a terminal state. Returns whether
/// a reply was sent.
async fn exchange(stream: &mut TcpStream, peer: SocketAddr, replies: &Replies) -> io::Result<bool> {
    let mut session = Session::new();
    let mut chunk = [0u8; 512];

    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(false); // peer closed first
        }

        match session.on_data(&chunk[..n]) {
            Action::Wait => continue,
            Action::Abort(err) => {
                return Err(io::Error::new(io::ErrorKind::InvalidData, err));
            }
            Action::Reply(kind, handshake) => {
                info!(
                    "{peer} sent handshake: protocol={} host={}:{} state={:?}",
                    handshake.protocol_version,
                    handshake.hostname,
                    handshake.port,
                    handshake.next_state,
                );
                match kind {
                    ReplyKind::Kick => stream.write_all(&replies.kick).await?,
                    ReplyKind::Status => {
                        stream.write_all(&replies.status).await?;
                        stream.write_all(&PONG_PACKET).await?;
                    }
                }
                return Ok(true);
            }
        }
    }
}
