use log::debug;

use cas_common::Result;

use crate::protocol::database::cas::constant::{CASFunctionCode, BYTE_SIZEOF, CAS_INFO_SIZE, DATA_LENGTH_SIZEOF};
use crate::protocol::database::cas::error_message::{ErrorMessages, CAS_ERROR_MESSAGES};
use crate::protocol::database::cas::packet::{
    declared_length, read_response_envelope, CASPacket, CasInfo, ResponseStatus,
};
use crate::protocol::database::cas::parser::PacketParser;
use crate::protocol::database::cas::writer::PacketWriter;
use crate::protocol::database::DatabasePacket;

/**
 * CON_CLOSE request for CAS: ends the database session identified by the cas info.
 *
 * Request:  `[int length = 1][cas info][CAS_FC_CON_CLOSE]`
 * Response: `[int length][cas info][int response code]` followed, on failure, by
 * `[int error code][NUL-terminated message]`.
 */
#[derive(Debug)]
pub struct CloseDatabasePacket {
    cas_info: CasInfo,
    status: ResponseStatus,
    messages: ErrorMessages<'static>,
}

impl CloseDatabasePacket {
    pub fn new(cas_info: CasInfo) -> Self {
        CloseDatabasePacket {
            cas_info,
            status: ResponseStatus::default(),
            messages: CAS_ERROR_MESSAGES,
        }
    }

    /// Replaces the table used to name error codes the server sends without a message.
    pub fn with_error_messages(mut self, messages: ErrorMessages<'static>) -> Self {
        self.messages = messages;
        self
    }

    pub fn get_response_code(&self) -> i32 {
        self.status.get_response_code()
    }

    pub fn get_error_code(&self) -> i32 {
        self.status.get_error_code()
    }

    pub fn get_error_message(&self) -> &str {
        self.status.get_error_message()
    }
}

impl DatabasePacket<PacketWriter, PacketParser> for CloseDatabasePacket {
    fn encode<'p>(&self, payload: &'p mut PacketWriter) -> Result<&'p mut PacketWriter> {
        let buffer_length = DATA_LENGTH_SIZEOF + CAS_INFO_SIZE + BYTE_SIZEOF;

        payload.write_int(declared_length(buffer_length));
        payload.write_bytes(CAS_INFO_SIZE, self.cas_info.as_bytes())?;
        payload.write_byte(CASFunctionCode::CasFcConClose.value());

        debug!("encoded CON_CLOSE for {:?}", self.cas_info);
        Ok(payload)
    }

    fn decode(&mut self, parser: &mut PacketParser) -> Result<&mut Self> {
        let (cas_info, mut body) = read_response_envelope(parser)?;
        self.cas_info = cas_info;
        self.status = ResponseStatus::decode(&mut body, &self.messages)?;

        debug!("decoded CON_CLOSE response {}", self.status.get_response_code());
        Ok(self)
    }
}

impl CASPacket for CloseDatabasePacket {
    fn get_function_code(&self) -> CASFunctionCode {
        CASFunctionCode::CasFcConClose
    }

    fn get_cas_info(&self) -> CasInfo {
        self.cas_info
    }

    fn response_status(&self) -> &ResponseStatus {
        &self.status
    }
}
