use bytes::Bytes;

use cas_common::Result;

pub mod cas;

/**
 * Packet payload.
 */
pub trait PacketPayload {
    /**
     * Get the bytes written so far.
     *
     * @return immutable copy of the written bytes
     */
    fn get_payload(&self) -> Bytes;
}

/**
 * Database packet.
 *
 * @param <W> type of packet payload the request is written into
 * @param <P> type of parser the response is read from
 */
pub trait DatabasePacket<W: PacketPayload, P> {
    /**
     * Write packet to byte buffer. Never mutates the packet, so encoding twice
     * emits the same bytes twice.
     *
     * @param payload packet payload to be written
     */
    fn encode<'p>(&self, payload: &'p mut W) -> Result<&'p mut W>;

    /**
     * Read packet from byte buffer.
     *
     * @param parser response parser positioned at the start of the envelope
     */
    fn decode(&mut self, parser: &mut P) -> Result<&mut Self>
    where
        Self: Sized;
}
