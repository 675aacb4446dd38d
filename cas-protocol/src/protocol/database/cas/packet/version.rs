use log::debug;

use cas_common::Result;

use crate::protocol::database::cas::constant::{
    CASFunctionCode, AUTOCOMMIT_OFF, AUTOCOMMIT_ON, BYTE_SIZEOF, CAS_INFO_SIZE, DATA_LENGTH_SIZEOF, INT_SIZEOF,
};
use crate::protocol::database::cas::error_message::{ErrorMessages, CAS_ERROR_MESSAGES};
use crate::protocol::database::cas::packet::{
    declared_length, read_response_envelope, CASPacket, CasInfo, ResponseStatus,
};
use crate::protocol::database::cas::parser::PacketParser;
use crate::protocol::database::cas::writer::PacketWriter;
use crate::protocol::database::DatabasePacket;

/**
 * GET_DB_VERSION request for CAS.
 *
 * Request:  `[int length = 6][cas info][CAS_FC_GET_DB_VERSION][int 1][byte auto commit]`
 * Response: on success the body after the response code is the NUL-terminated
 * engine version string.
 */
#[derive(Debug)]
pub struct GetEngineVersionPacket {
    cas_info: CasInfo,
    auto_commit: bool,
    engine_version: String,
    status: ResponseStatus,
    messages: ErrorMessages<'static>,
}

impl GetEngineVersionPacket {
    pub fn new(cas_info: CasInfo, auto_commit: bool) -> Self {
        GetEngineVersionPacket {
            cas_info,
            auto_commit,
            engine_version: String::new(),
            status: ResponseStatus::default(),
            messages: CAS_ERROR_MESSAGES,
        }
    }

    pub fn with_error_messages(mut self, messages: ErrorMessages<'static>) -> Self {
        self.messages = messages;
        self
    }

    pub fn get_engine_version(&self) -> &str {
        &self.engine_version
    }
}

impl DatabasePacket<PacketWriter, PacketParser> for GetEngineVersionPacket {
    fn encode<'p>(&self, payload: &'p mut PacketWriter) -> Result<&'p mut PacketWriter> {
        let buffer_length = DATA_LENGTH_SIZEOF + CAS_INFO_SIZE + BYTE_SIZEOF + INT_SIZEOF + BYTE_SIZEOF;

        payload.write_int(declared_length(buffer_length));
        payload.write_bytes(CAS_INFO_SIZE, self.cas_info.as_bytes())?;
        payload.write_byte(CASFunctionCode::CasFcGetDbVersion.value());
        payload.write_int(BYTE_SIZEOF as i32);
        payload.write_byte(if self.auto_commit { AUTOCOMMIT_ON } else { AUTOCOMMIT_OFF });
        Ok(payload)
    }

    fn decode(&mut self, parser: &mut PacketParser) -> Result<&mut Self> {
        let (cas_info, mut body) = read_response_envelope(parser)?;
        self.cas_info = cas_info;
        self.status = ResponseStatus::decode(&mut body, &self.messages)?;
        if self.status.is_success() {
            self.engine_version = body.read_null_terminated_string(body.remaining())?;
            debug!("engine version {}", self.engine_version);
        }
        Ok(self)
    }
}

impl CASPacket for GetEngineVersionPacket {
    fn get_function_code(&self) -> CASFunctionCode {
        CASFunctionCode::CasFcGetDbVersion
    }

    fn get_cas_info(&self) -> CasInfo {
        self.cas_info
    }

    fn response_status(&self) -> &ResponseStatus {
        &self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use bytes::Bytes;
    use hex_literal::hex;

    const TOKEN: CasInfo = CasInfo::new([0, 0, 0, 9]);

    #[test]
    fn encodes_auto_commit_flag() {
        let mut writer = PacketWriter::new();
        GetEngineVersionPacket::new(TOKEN, true).encode(&mut writer).unwrap();
        GetEngineVersionPacket::new(TOKEN, false).encode(&mut writer).unwrap();
        assert_eq!(
            writer.as_slice(),
            hex!("00000006 00000009 0f 00000001 01 00000006 00000009 0f 00000001 00")
        );
    }

    #[test]
    fn decodes_version_string() {
        let mut packet = GetEngineVersionPacket::new(TOKEN, true);
        // "11.2.0.0001\0" is 12 bytes, body 16
        let mut parser = PacketParser::new(Bytes::copy_from_slice(&hex!(
            "00000010 00000009 00000000 31312e322e302e3030303100"
        )));
        packet.decode(&mut parser).unwrap();

        assert!(packet.response_status().is_success());
        assert_eq!(packet.get_engine_version(), "11.2.0.0001");
    }

    #[test]
    fn failure_leaves_version_empty() {
        let mut packet =
            GetEngineVersionPacket::new(TOKEN, true).with_error_messages(ErrorMessages::new(&[("busy", -1017)]));
        let mut parser = PacketParser::new(Bytes::copy_from_slice(&hex!("00000009 00000009 ffffffff fffffc07 00")));
        packet.decode(&mut parser).unwrap();

        assert_eq!(packet.response_status().get_error_message(), "busy");
        assert_eq!(packet.get_engine_version(), "");
    }
}
