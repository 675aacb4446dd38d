use log::{debug, warn};
use tokio::net::TcpStream;

use cas_common::config::config::ClientConfig;
use cas_common::service::io::Channel;
use cas_common::Result;

use crate::protocol::database::cas::codec::CASCodec;
use crate::protocol::database::cas::packet::CASPacket;
use crate::protocol::database::cas::parser::PacketParser;
use crate::protocol::database::cas::writer::PacketWriter;

/// One CAS connection driven request by request: every call encodes into a fresh
/// writer, waits for the complete response frame and decodes it into the packet.
pub struct CASService<'a> {
    channel: Channel<'a>,
    writer_capacity: usize,
}

impl<'a> CASService<'a> {
    pub fn new(socket: &'a mut TcpStream) -> Self {
        CASService::with_codec(socket, CASCodec::default(), ClientConfig::get_writer_capacity())
    }

    pub fn with_codec(socket: &'a mut TcpStream, codec: CASCodec, writer_capacity: usize) -> Self {
        CASService {
            channel: Channel::new::<CASCodec>(socket, codec),
            writer_capacity,
        }
    }

    /**
     * Sends `packet` and decodes the reply into it.
     *
     * A server-side refusal is not an `Err`: check `packet.response_status()`. Errors
     * returned here mean the stream is unusable and the connection should be dropped.
     */
    pub async fn request<P: CASPacket>(&mut self, packet: &mut P) -> Result<()> {
        let mut writer = PacketWriter::with_capacity(self.writer_capacity);
        packet.encode(&mut writer)?;
        debug!("{:?} request of {} bytes", packet.get_function_code(), writer.len());
        self.channel.send(writer.finalize()).await?;

        let frame = self.channel.receive().await?;
        let mut parser = PacketParser::new(frame);
        packet.decode(&mut parser)?;

        let status = packet.response_status();
        if status.is_failure() {
            warn!(
                "{:?} refused: [{}] {}",
                packet.get_function_code(),
                status.get_error_code(),
                status.get_error_message()
            );
        }
        Ok(())
    }
}
