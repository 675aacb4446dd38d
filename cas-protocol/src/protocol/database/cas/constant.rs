use std::convert::TryFrom;

use cas_common::Error;

/// Size of the big-endian length field that opens every envelope.
pub const DATA_LENGTH_SIZEOF: usize = 4;

/// Size of the connection token ("CAS info") carried by every envelope.
pub const CAS_INFO_SIZE: usize = 4;

pub const BYTE_SIZEOF: usize = 1;
pub const SHORT_SIZEOF: usize = 2;
pub const INT_SIZEOF: usize = 4;

/// Date-time values travel as seven shorts: year, month, day, hour, minute, second, millisecond.
pub const DATETIME_SIZEOF: usize = 7 * SHORT_SIZEOF;

/// Default filler for padded fields.
pub const DEFAULT_FILLER: u8 = 0x00;

pub const AUTOCOMMIT_ON: u8 = 1;
pub const AUTOCOMMIT_OFF: u8 = 0;

///
/// Function codes for CAS requests. The byte after the connection token selects
/// the server-side operation.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CASFunctionCode {
    CasFcEndTran = 1,
    CasFcPrepare = 2,
    CasFcExecute = 3,
    CasFcGetDbParameter = 4,
    CasFcSetDbParameter = 5,
    CasFcCloseReqHandle = 6,
    CasFcCursor = 7,
    CasFcFetch = 8,
    CasFcSchemaInfo = 9,
    CasFcOidGet = 10,
    CasFcOidPut = 11,
    CasFcDeprecated1 = 12,
    CasFcDeprecated2 = 13,
    CasFcDeprecated3 = 14,
    CasFcGetDbVersion = 15,
    CasFcGetClassNumObjs = 16,
    CasFcOidCmd = 17,
    CasFcCollection = 18,
    CasFcNextResult = 19,
    CasFcExecuteBatch = 20,
    CasFcExecuteArray = 21,
    CasFcCursorUpdate = 22,
    CasFcGetAttrTypeStr = 23,
    CasFcGetQueryInfo = 24,
    CasFcDeprecated4 = 25,
    CasFcSavepoint = 26,
    CasFcParameterInfo = 27,
    CasFcXaPrepare = 28,
    CasFcXaRecover = 29,
    CasFcXaEndTran = 30,
    CasFcConClose = 31,
    CasFcCheckCas = 32,
    CasFcMakeOutRs = 33,
    CasFcGetGeneratedKeys = 34,
    CasFcLobNew = 35,
    CasFcLobWrite = 36,
    CasFcLobRead = 37,
    CasFcEndSession = 38,
    CasFcGetRowCount = 39,
    CasFcGetLastInsertId = 40,
    CasFcPrepareAndExecute = 41,
    CasFcCursorClose = 42,
    CasFcGetShardInfo = 43,
}

impl CASFunctionCode {
    pub fn value(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for CASFunctionCode {
    type Error = Error;

    fn try_from(x: u8) -> Result<Self, Self::Error> {
        let code = match x {
            1 => CASFunctionCode::CasFcEndTran,
            2 => CASFunctionCode::CasFcPrepare,
            3 => CASFunctionCode::CasFcExecute,
            4 => CASFunctionCode::CasFcGetDbParameter,
            5 => CASFunctionCode::CasFcSetDbParameter,
            6 => CASFunctionCode::CasFcCloseReqHandle,
            7 => CASFunctionCode::CasFcCursor,
            8 => CASFunctionCode::CasFcFetch,
            9 => CASFunctionCode::CasFcSchemaInfo,
            10 => CASFunctionCode::CasFcOidGet,
            11 => CASFunctionCode::CasFcOidPut,
            12 => CASFunctionCode::CasFcDeprecated1,
            13 => CASFunctionCode::CasFcDeprecated2,
            14 => CASFunctionCode::CasFcDeprecated3,
            15 => CASFunctionCode::CasFcGetDbVersion,
            16 => CASFunctionCode::CasFcGetClassNumObjs,
            17 => CASFunctionCode::CasFcOidCmd,
            18 => CASFunctionCode::CasFcCollection,
            19 => CASFunctionCode::CasFcNextResult,
            20 => CASFunctionCode::CasFcExecuteBatch,
            21 => CASFunctionCode::CasFcExecuteArray,
            22 => CASFunctionCode::CasFcCursorUpdate,
            23 => CASFunctionCode::CasFcGetAttrTypeStr,
            24 => CASFunctionCode::CasFcGetQueryInfo,
            25 => CASFunctionCode::CasFcDeprecated4,
            26 => CASFunctionCode::CasFcSavepoint,
            27 => CASFunctionCode::CasFcParameterInfo,
            28 => CASFunctionCode::CasFcXaPrepare,
            29 => CASFunctionCode::CasFcXaRecover,
            30 => CASFunctionCode::CasFcXaEndTran,
            31 => CASFunctionCode::CasFcConClose,
            32 => CASFunctionCode::CasFcCheckCas,
            33 => CASFunctionCode::CasFcMakeOutRs,
            34 => CASFunctionCode::CasFcGetGeneratedKeys,
            35 => CASFunctionCode::CasFcLobNew,
            36 => CASFunctionCode::CasFcLobWrite,
            37 => CASFunctionCode::CasFcLobRead,
            38 => CASFunctionCode::CasFcEndSession,
            39 => CASFunctionCode::CasFcGetRowCount,
            40 => CASFunctionCode::CasFcGetLastInsertId,
            41 => CASFunctionCode::CasFcPrepareAndExecute,
            42 => CASFunctionCode::CasFcCursorClose,
            43 => CASFunctionCode::CasFcGetShardInfo,
            _ => return Err(Error::InvalidArgument(format!("unknown CAS function code {}", x))),
        };
        Ok(code)
    }
}

///
/// Transaction outcome requested by an end-transaction packet.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CCITransactionType {
    Commit = 1,
    Rollback = 2,
}

impl CCITransactionType {
    pub fn value(&self) -> u8 {
        *self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_codes_round_trip_through_their_byte() {
        for x in 1u8..=43 {
            let code = CASFunctionCode::try_from(x).unwrap();
            assert_eq!(code.value(), x);
        }
    }

    #[test]
    fn connection_close_is_31() {
        assert_eq!(CASFunctionCode::CasFcConClose.value(), 0x1f);
        assert_eq!(CASFunctionCode::CasFcGetDbVersion.value(), 15);
        assert_eq!(CASFunctionCode::CasFcEndTran.value(), 1);
    }

    #[test]
    fn unknown_function_codes_are_rejected() {
        assert!(matches!(CASFunctionCode::try_from(0), Err(Error::InvalidArgument(_))));
        assert!(matches!(CASFunctionCode::try_from(44), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn datetime_is_seven_shorts() {
        assert_eq!(DATETIME_SIZEOF, 14);
    }
}
