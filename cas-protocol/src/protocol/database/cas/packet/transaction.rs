use log::debug;

use cas_common::Result;

use crate::protocol::database::cas::constant::{
    CASFunctionCode, CCITransactionType, BYTE_SIZEOF, CAS_INFO_SIZE, DATA_LENGTH_SIZEOF, INT_SIZEOF,
};
use crate::protocol::database::cas::error_message::{ErrorMessages, CAS_ERROR_MESSAGES};
use crate::protocol::database::cas::packet::{
    declared_length, read_response_envelope, CASPacket, CasInfo, ResponseStatus,
};
use crate::protocol::database::cas::parser::PacketParser;
use crate::protocol::database::cas::writer::PacketWriter;
use crate::protocol::database::DatabasePacket;

/**
 * END_TRAN request for CAS: commits or rolls back the session's open transaction.
 *
 * Request: `[int length = 6][cas info][CAS_FC_END_TRAN][int 1][byte transaction type]`
 */
#[derive(Debug)]
pub struct EndTransactionPacket {
    cas_info: CasInfo,
    transaction_type: CCITransactionType,
    status: ResponseStatus,
    messages: ErrorMessages<'static>,
}

impl EndTransactionPacket {
    pub fn new(cas_info: CasInfo, transaction_type: CCITransactionType) -> Self {
        EndTransactionPacket {
            cas_info,
            transaction_type,
            status: ResponseStatus::default(),
            messages: CAS_ERROR_MESSAGES,
        }
    }

    pub fn with_error_messages(mut self, messages: ErrorMessages<'static>) -> Self {
        self.messages = messages;
        self
    }

    pub fn get_transaction_type(&self) -> CCITransactionType {
        self.transaction_type
    }
}

impl DatabasePacket<PacketWriter, PacketParser> for EndTransactionPacket {
    fn encode<'p>(&self, payload: &'p mut PacketWriter) -> Result<&'p mut PacketWriter> {
        let buffer_length = DATA_LENGTH_SIZEOF + CAS_INFO_SIZE + BYTE_SIZEOF + INT_SIZEOF + BYTE_SIZEOF;

        payload.write_int(declared_length(buffer_length));
        payload.write_bytes(CAS_INFO_SIZE, self.cas_info.as_bytes())?;
        payload.write_byte(CASFunctionCode::CasFcEndTran.value());
        payload.write_int(BYTE_SIZEOF as i32);
        payload.write_byte(self.transaction_type.value());

        debug!("encoded END_TRAN {:?} for {:?}", self.transaction_type, self.cas_info);
        Ok(payload)
    }

    fn decode(&mut self, parser: &mut PacketParser) -> Result<&mut Self> {
        let (cas_info, mut body) = read_response_envelope(parser)?;
        self.cas_info = cas_info;
        self.status = ResponseStatus::decode(&mut body, &self.messages)?;
        Ok(self)
    }
}

impl CASPacket for EndTransactionPacket {
    fn get_function_code(&self) -> CASFunctionCode {
        CASFunctionCode::CasFcEndTran
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

    const TOKEN: CasInfo = CasInfo::new([0xca, 0xfe, 0x00, 0x01]);

    #[test]
    fn encodes_commit_and_rollback() {
        let mut writer = PacketWriter::new();
        EndTransactionPacket::new(TOKEN, CCITransactionType::Commit)
            .encode(&mut writer)
            .unwrap();
        assert_eq!(writer.as_slice(), hex!("00000006 cafe0001 01 00000001 01"));

        let mut writer = PacketWriter::new();
        EndTransactionPacket::new(TOKEN, CCITransactionType::Rollback)
            .encode(&mut writer)
            .unwrap();
        assert_eq!(writer.as_slice(), hex!("00000006 cafe0001 01 00000001 02"));
    }

    #[test]
    fn declared_length_counts_everything_after_the_cas_info() {
        let mut writer = PacketWriter::new();
        EndTransactionPacket::new(TOKEN, CCITransactionType::Commit)
            .encode(&mut writer)
            .unwrap();
        let bytes = writer.as_slice();
        let declared = i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        assert_eq!(declared as usize, writer.len() - DATA_LENGTH_SIZEOF - CAS_INFO_SIZE);
    }

    #[test]
    fn decodes_failure_status() {
        let mut packet = EndTransactionPacket::new(TOKEN, CCITransactionType::Commit);
        let mut parser = PacketParser::new(Bytes::copy_from_slice(&hex!("00000009 cafe0001 ffffffff fffffc19 00")));
        packet.decode(&mut parser).unwrap();

        assert!(packet.response_status().is_failure());
        assert_eq!(packet.response_status().get_error_code(), -999);
        assert_eq!(packet.response_status().get_error_message(), "");
    }
}
