use std::convert::TryFrom;
use std::fmt;

use log::trace;

use cas_common::{Error, Result};

use crate::protocol::database::cas::constant::{CASFunctionCode, CAS_INFO_SIZE, DATA_LENGTH_SIZEOF};
use crate::protocol::database::cas::error_message::ErrorMessages;
use crate::protocol::database::cas::parser::PacketParser;
use crate::protocol::database::cas::writer::PacketWriter;
use crate::protocol::database::DatabasePacket;

pub use self::close::CloseDatabasePacket;
pub use self::transaction::EndTransactionPacket;
pub use self::version::GetEngineVersionPacket;

pub mod close;
pub mod transaction;
pub mod version;

/// Opaque 4-byte session token the CAS hands out and expects back on every request.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct CasInfo([u8; CAS_INFO_SIZE]);

impl CasInfo {
    pub const fn new(bytes: [u8; CAS_INFO_SIZE]) -> Self {
        CasInfo(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes = <[u8; CAS_INFO_SIZE]>::try_from(bytes).map_err(|_| {
            Error::InvalidArgument(format!("cas info must be {} bytes, got {}", CAS_INFO_SIZE, bytes.len()))
        })?;
        Ok(CasInfo(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; CAS_INFO_SIZE] {
        &self.0
    }
}

impl From<[u8; CAS_INFO_SIZE]> for CasInfo {
    fn from(bytes: [u8; CAS_INFO_SIZE]) -> Self {
        CasInfo(bytes)
    }
}

impl fmt::Debug for CasInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CasInfo({:02x}{:02x}{:02x}{:02x})", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

/**
 * Outcome carried by every response body.
 *
 * A negative response code is the server refusing the request. That is a normal
 * result for the caller to surface, not a local failure, so it lives here rather
 * than in `Error`.
 */
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseStatus {
    response_code: i32,
    error_code: i32,
    error_message: String,
}

impl ResponseStatus {
    /**
     * Reads the response code and, when it is negative, the error code and the
     * NUL-terminated message that fills the rest of the body. An empty message is
     * named through `messages`.
     *
     * @param body parser confined to the response body
     */
    pub fn decode(body: &mut PacketParser, messages: &ErrorMessages<'_>) -> Result<Self> {
        let response_code = body.read_int()?;
        if response_code >= 0 {
            return Ok(ResponseStatus {
                response_code,
                ..Default::default()
            });
        }

        let error_code = body.read_int()?;
        let mut error_message = body.read_null_terminated_string(body.remaining())?;
        if error_message.is_empty() {
            if let Some(message) = messages.lookup(error_code) {
                error_message = message.to_string();
            }
        }

        Ok(ResponseStatus {
            response_code,
            error_code,
            error_message,
        })
    }

    pub fn get_response_code(&self) -> i32 {
        self.response_code
    }

    pub fn get_error_code(&self) -> i32 {
        self.error_code
    }

    pub fn get_error_message(&self) -> &str {
        &self.error_message
    }

    pub fn is_success(&self) -> bool {
        self.response_code >= 0
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }
}

/**
 * Request/response packet exchanged with the CAS.
 */
pub trait CASPacket: DatabasePacket<PacketWriter, PacketParser> {
    fn get_function_code(&self) -> CASFunctionCode;

    fn get_cas_info(&self) -> CasInfo;

    fn response_status(&self) -> &ResponseStatus;
}

/// Length declared by a request envelope of `buffer_length` total bytes: neither the
/// length field itself nor the cas info that follows it is counted.
pub(crate) fn declared_length(buffer_length: usize) -> i32 {
    (buffer_length - DATA_LENGTH_SIZEOF - CAS_INFO_SIZE) as i32
}

/// Reads the response length and echoed cas info, then cuts the body out of the
/// stream. The body is consumed as a whole even if the packet reads less of it.
pub(crate) fn read_response_envelope(parser: &mut PacketParser) -> Result<(CasInfo, PacketParser)> {
    let response_length = parser.read_int()?;
    let response_length = usize::try_from(response_length)
        .map_err(|_| Error::Protocol(format!("negative response length {}", response_length)))?;
    let cas_info = CasInfo::from_slice(&parser.read_bytes(CAS_INFO_SIZE)?)?;
    let body = parser.read_buffer(response_length)?;
    trace!("response envelope: {:?}, body of {} bytes", cas_info, response_length);
    Ok((cas_info, body))
}

/// Every packet kind this crate speaks, for callers that dispatch at runtime.
#[derive(Debug)]
pub enum CASPacketKind {
    CloseDatabase(CloseDatabasePacket),
    EndTransaction(EndTransactionPacket),
    GetEngineVersion(GetEngineVersionPacket),
}

impl DatabasePacket<PacketWriter, PacketParser> for CASPacketKind {
    fn encode<'p>(&self, payload: &'p mut PacketWriter) -> Result<&'p mut PacketWriter> {
        match self {
            CASPacketKind::CloseDatabase(packet) => packet.encode(payload),
            CASPacketKind::EndTransaction(packet) => packet.encode(payload),
            CASPacketKind::GetEngineVersion(packet) => packet.encode(payload),
        }
    }

    fn decode(&mut self, parser: &mut PacketParser) -> Result<&mut Self> {
        match self {
            CASPacketKind::CloseDatabase(packet) => {
                packet.decode(parser)?;
            }
            CASPacketKind::EndTransaction(packet) => {
                packet.decode(parser)?;
            }
            CASPacketKind::GetEngineVersion(packet) => {
                packet.decode(parser)?;
            }
        }
        Ok(self)
    }
}

impl CASPacket for CASPacketKind {
    fn get_function_code(&self) -> CASFunctionCode {
        match self {
            CASPacketKind::CloseDatabase(packet) => packet.get_function_code(),
            CASPacketKind::EndTransaction(packet) => packet.get_function_code(),
            CASPacketKind::GetEngineVersion(packet) => packet.get_function_code(),
        }
    }

    fn get_cas_info(&self) -> CasInfo {
        match self {
            CASPacketKind::CloseDatabase(packet) => packet.get_cas_info(),
            CASPacketKind::EndTransaction(packet) => packet.get_cas_info(),
            CASPacketKind::GetEngineVersion(packet) => packet.get_cas_info(),
        }
    }

    fn response_status(&self) -> &ResponseStatus {
        match self {
            CASPacketKind::CloseDatabase(packet) => packet.response_status(),
            CASPacketKind::EndTransaction(packet) => packet.response_status(),
            CASPacketKind::GetEngineVersion(packet) => packet.response_status(),
        }
    }
}

impl From<CloseDatabasePacket> for CASPacketKind {
    fn from(packet: CloseDatabasePacket) -> Self {
        CASPacketKind::CloseDatabase(packet)
    }
}

impl From<EndTransactionPacket> for CASPacketKind {
    fn from(packet: EndTransactionPacket) -> Self {
        CASPacketKind::EndTransaction(packet)
    }
}

impl From<GetEngineVersionPacket> for CASPacketKind {
    fn from(packet: GetEngineVersionPacket) -> Self {
        CASPacketKind::GetEngineVersion(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use bytes::Bytes;
    use hex_literal::hex;

    use crate::protocol::database::cas::constant::CCITransactionType;
    use crate::protocol::database::cas::error_message::CAS_ERROR_MESSAGES;

    const TOKEN: CasInfo = CasInfo::new([1, 2, 3, 4]);

    #[test]
    fn cas_info_from_slice_checks_length() {
        assert_eq!(CasInfo::from_slice(&[1, 2, 3, 4]).unwrap(), TOKEN);
        assert!(matches!(CasInfo::from_slice(&[1, 2, 3]), Err(Error::InvalidArgument(_))));
        assert_eq!(format!("{:?}", TOKEN), "CasInfo(01020304)");
    }

    #[test]
    fn declared_length_drops_length_and_cas_info() {
        assert_eq!(declared_length(9), 1);
        assert_eq!(declared_length(14), 6);
    }

    #[test]
    fn status_success_keeps_error_fields_empty() {
        let mut body = PacketParser::new(Bytes::copy_from_slice(&hex!("00000000 deadbeef")));
        let status = ResponseStatus::decode(&mut body, &CAS_ERROR_MESSAGES).unwrap();
        assert!(status.is_success());
        assert_eq!(status.get_error_code(), 0);
        assert_eq!(status.get_error_message(), "");
    }

    #[test]
    fn status_prefers_the_server_message() {
        let mut body = PacketParser::new(Bytes::copy_from_slice(&hex!("ffffffff fffffc15 6e6f00")));
        let status = ResponseStatus::decode(&mut body, &CAS_ERROR_MESSAGES).unwrap();
        assert!(status.is_failure());
        assert_eq!(status.get_error_code(), -1003);
        assert_eq!(status.get_error_message(), "no");
    }

    #[test]
    fn status_names_empty_messages_from_the_table() {
        let mut body = PacketParser::new(Bytes::copy_from_slice(&hex!("ffffffff fffffc15 00")));
        let status = ResponseStatus::decode(&mut body, &CAS_ERROR_MESSAGES).unwrap();
        assert_eq!(status.get_error_message(), "Communication error");
    }

    #[test]
    fn status_leaves_unknown_codes_unnamed() {
        let mut body = PacketParser::new(Bytes::copy_from_slice(&hex!("ffffffff 00000063 00")));
        let status = ResponseStatus::decode(&mut body, &CAS_ERROR_MESSAGES).unwrap();
        assert_eq!(status.get_error_code(), 99);
        assert_eq!(status.get_error_message(), "");
    }

    #[test]
    fn negative_response_length_is_a_protocol_error() {
        let mut parser = PacketParser::new(Bytes::copy_from_slice(&hex!("ffffffff 01020304 00000000")));
        assert!(matches!(read_response_envelope(&mut parser), Err(Error::Protocol(_))));
    }

    #[test]
    fn packet_kinds_delegate() {
        let kinds: Vec<CASPacketKind> = vec![
            CloseDatabasePacket::new(TOKEN).into(),
            EndTransactionPacket::new(TOKEN, CCITransactionType::Commit).into(),
            GetEngineVersionPacket::new(TOKEN, true).into(),
        ];

        let codes: Vec<CASFunctionCode> = kinds.iter().map(|k| k.get_function_code()).collect();
        assert_eq!(
            codes,
            vec![
                CASFunctionCode::CasFcConClose,
                CASFunctionCode::CasFcEndTran,
                CASFunctionCode::CasFcGetDbVersion,
            ]
        );

        for kind in kinds.iter() {
            let mut direct = PacketWriter::new();
            let mut writer = PacketWriter::new();
            kind.encode(&mut writer).unwrap();
            match kind {
                CASPacketKind::CloseDatabase(p) => p.encode(&mut direct).unwrap(),
                CASPacketKind::EndTransaction(p) => p.encode(&mut direct).unwrap(),
                CASPacketKind::GetEngineVersion(p) => p.encode(&mut direct).unwrap(),
            };
            assert_eq!(writer.as_slice(), direct.as_slice());
            assert_eq!(kind.get_cas_info(), TOKEN);
        }
    }

    #[test]
    fn packet_kind_decodes_into_its_variant() {
        let mut kind = CASPacketKind::from(CloseDatabasePacket::new(TOKEN));
        let mut parser = PacketParser::new(Bytes::copy_from_slice(&hex!("00000004 0a0b0c0d 00000000")));
        kind.decode(&mut parser).unwrap();
        assert!(kind.response_status().is_success());
        assert_eq!(kind.get_cas_info(), CasInfo::new([0x0a, 0x0b, 0x0c, 0x0d]));
    }
}
