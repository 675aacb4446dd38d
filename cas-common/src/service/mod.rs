use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{BytesCodec, FramedRead, FramedWrite, LengthDelimitedCodec};

pub mod io;

/// Framing of one wire protocol over a byte stream.
///
/// Outbound buffers are already enveloped by the packet writer, so the write
/// side passes bytes through untouched; the read side cuts complete response
/// frames out of the stream.
pub trait ServiceCodec {
    fn write_frame<T: AsyncWrite>(&self, io: T) -> FramedWrite<T, BytesCodec> {
        FramedWrite::new(io, BytesCodec::new())
    }

    fn read_frame<T: AsyncRead>(&self, io: T) -> FramedRead<T, LengthDelimitedCodec>;
}
