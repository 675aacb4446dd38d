use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use log::trace;
use tokio::net::tcp::ReadHalf;
use tokio::net::tcp::WriteHalf;
use tokio::net::TcpStream;
use tokio_util::codec::{BytesCodec, FramedRead, FramedWrite, LengthDelimitedCodec};

use crate::error::{Error, Result};
use crate::service::ServiceCodec;

pub struct Channel<'a> {
    pub stream: FramedRead<ReadHalf<'a>, LengthDelimitedCodec>,
    pub sink: FramedWrite<WriteHalf<'a>, BytesCodec>,
}

impl<'a> Channel<'a> {
    pub fn new<CODEC: ServiceCodec>(socket: &'a mut TcpStream, codec: CODEC) -> Self {
        let (r, w) = socket.split();
        let stream = codec.read_frame(r);
        let sink = codec.write_frame(w);
        Channel { stream, sink }
    }

    /// Writes one finalized request buffer and flushes it.
    pub async fn send(&mut self, payload: Bytes) -> Result<()> {
        if payload.is_empty() {
            return Err(Error::InvalidArgument("empty payload".to_string()));
        }
        trace!("sending {} bytes", payload.len());
        self.sink.send(payload).await?;
        Ok(())
    }

    /// Waits for the next complete response frame.
    pub async fn receive(&mut self) -> Result<Bytes> {
        match self.stream.next().await {
            Some(Ok(frame)) => {
                trace!("received frame of {} bytes", frame.len());
                Ok(frame.freeze())
            }
            Some(Err(e)) => Err(Error::Io(e)),
            None => Err(Error::ConnectionClosed),
        }
    }
}
