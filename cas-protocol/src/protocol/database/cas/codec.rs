use tokio::io::AsyncRead;
use tokio_util::codec::{FramedRead, LengthDelimitedCodec};

use cas_common::config::config::ClientConfig;
use cas_common::service::ServiceCodec;

use crate::protocol::database::cas::constant::{CAS_INFO_SIZE, DATA_LENGTH_SIZEOF};

/// Frames CAS responses: `[int length][cas info][length bytes of body]`. The length
/// field does not count the cas info, and the whole envelope is kept in the frame so
/// the packet can decode it.
pub struct CASCodec {
    max_frame_length: usize,
}

impl CASCodec {
    pub fn new(max_frame_length: usize) -> Self {
        CASCodec { max_frame_length }
    }
}

impl Default for CASCodec {
    fn default() -> Self {
        CASCodec::new(ClientConfig::get_max_frame_length())
    }
}

impl ServiceCodec for CASCodec {
    fn read_frame<T: AsyncRead>(&self, io: T) -> FramedRead<T, LengthDelimitedCodec> {
        LengthDelimitedCodec::builder()
            .length_field_offset(0)
            .length_field_length(DATA_LENGTH_SIZEOF)
            .length_adjustment((DATA_LENGTH_SIZEOF + CAS_INFO_SIZE) as isize)
            .big_endian()
            .num_skip(0)
            .max_frame_length(self.max_frame_length)
            .new_read(io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use futures::StreamExt;
    use hex_literal::hex;

    #[tokio::test]
    async fn cuts_frames_at_the_declared_body_length() {
        let stream: &[u8] = &hex!("00000004 01020304 00000000 00000009 01020304 ffffffff 00000005 00");
        let mut frames = CASCodec::new(1024).read_frame(stream);

        let first = frames.next().await.unwrap().unwrap();
        assert_eq!(&first[..], &hex!("00000004 01020304 00000000")[..]);

        let second = frames.next().await.unwrap().unwrap();
        assert_eq!(second.len(), 4 + 4 + 9);

        assert!(frames.next().await.is_none());
    }

    #[tokio::test]
    async fn partial_frame_at_eof_is_an_error() {
        let stream: &[u8] = &hex!("00000010 01020304 0000");
        let mut frames = CASCodec::new(1024).read_frame(stream);
        assert!(frames.next().await.unwrap().is_err());
    }

    #[tokio::test]
    async fn oversized_frame_is_rejected() {
        let stream: &[u8] = &hex!("00100000 01020304");
        let mut frames = CASCodec::new(64).read_frame(stream);
        assert!(frames.next().await.unwrap().is_err());
    }

    #[tokio::test]
    async fn max_frame_length_bounds_the_body_only() {
        let stream: &[u8] = &hex!("00000004 01020304 00000000");
        let mut frames = CASCodec::new(4).read_frame(stream);
        let frame = frames.next().await.unwrap().unwrap();
        assert_eq!(frame.len(), 12);

        let stream: &[u8] = &hex!("00000005 01020304 00000000 00");
        let mut frames = CASCodec::new(4).read_frame(stream);
        assert!(frames.next().await.unwrap().is_err());
    }
}
