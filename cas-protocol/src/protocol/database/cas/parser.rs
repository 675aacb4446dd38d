use bytes::{Buf, Bytes};
use chrono::{NaiveDate, NaiveDateTime};

use cas_common::{Error, Result};

use crate::protocol::database::cas::constant::{BYTE_SIZEOF, DATETIME_SIZEOF, INT_SIZEOF, SHORT_SIZEOF};

/**
 * Reader over a received response buffer, mirroring the writer's encodings.
 *
 * Every read checks that the buffer holds the bytes it needs before consuming any;
 * a short buffer yields `Error::Underrun` and leaves the position untouched.
 */
#[derive(Debug, Clone)]
pub struct PacketParser {
    buffer: Bytes,
}

/// The seven big-endian shorts a date-time value is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateTimeFields {
    pub year: u16,
    pub month: u16,
    pub day: u16,
    pub hour: u16,
    pub minute: u16,
    pub second: u16,
    pub millisecond: u16,
}

impl DateTimeFields {
    /// `None` when the fields do not name a real calendar instant (e.g. a bare time value).
    pub fn to_naive_date_time(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(i32::from(self.year), u32::from(self.month), u32::from(self.day)).and_then(|date| {
            date.and_hms_milli_opt(
                u32::from(self.hour),
                u32::from(self.minute),
                u32::from(self.second),
                u32::from(self.millisecond),
            )
        })
    }
}

impl PacketParser {
    pub fn new(buffer: Bytes) -> Self {
        PacketParser { buffer }
    }

    pub fn remaining(&self) -> usize {
        self.buffer.remaining()
    }

    pub fn is_empty(&self) -> bool {
        !self.buffer.has_remaining()
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        self.ensure(BYTE_SIZEOF)?;
        Ok(self.buffer.get_u8())
    }

    pub fn read_short(&mut self) -> Result<i16> {
        self.ensure(SHORT_SIZEOF)?;
        Ok(self.buffer.get_i16())
    }

    pub fn read_int(&mut self) -> Result<i32> {
        self.ensure(INT_SIZEOF)?;
        Ok(self.buffer.get_i32())
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<Bytes> {
        self.ensure(count)?;
        Ok(self.buffer.split_to(count))
    }

    /// Consumes `count` bytes and returns a parser confined to them.
    pub fn read_buffer(&mut self, count: usize) -> Result<PacketParser> {
        Ok(PacketParser::new(self.read_bytes(count)?))
    }

    /// Consumes exactly `length` bytes; the string ends at the first NUL among them.
    pub fn read_null_terminated_string(&mut self, length: usize) -> Result<String> {
        let raw = self.read_bytes(length)?;
        let end = raw.iter().position(|b| *b == 0).unwrap_or_else(|| raw.len());
        Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
    }

    pub fn read_date_time(&mut self) -> Result<DateTimeFields> {
        self.ensure(DATETIME_SIZEOF)?;
        Ok(DateTimeFields {
            year: self.buffer.get_u16(),
            month: self.buffer.get_u16(),
            day: self.buffer.get_u16(),
            hour: self.buffer.get_u16(),
            minute: self.buffer.get_u16(),
            second: self.buffer.get_u16(),
            millisecond: self.buffer.get_u16(),
        })
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        let remaining = self.buffer.remaining();
        if remaining < needed {
            return Err(Error::Underrun { needed, remaining });
        }
        Ok(())
    }
}

impl From<Bytes> for PacketParser {
    fn from(buffer: Bytes) -> Self {
        PacketParser::new(buffer)
    }
}
