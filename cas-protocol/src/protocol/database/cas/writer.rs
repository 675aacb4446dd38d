use std::convert::TryFrom;

use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;
use chrono::{Datelike, NaiveDateTime, Timelike};

use cas_common::{Error, Result};

use crate::protocol::database::cas::constant::{BYTE_SIZEOF, DATETIME_SIZEOF, INT_SIZEOF, SHORT_SIZEOF};
use crate::protocol::database::PacketPayload;

/**
 * Append-only request buffer with big-endian primitive encoders.
 *
 * The backing storage is owned exclusively by the writer. When an append does not
 * fit, new storage of `capacity + count` bytes is allocated and the written prefix
 * is copied over before the append goes ahead; old storage is dropped, never aliased.
 */
#[derive(Debug, Default)]
pub struct PacketWriter {
    storage: Box<[u8]>,
    length: usize,
}

impl PacketWriter {
    pub fn new() -> Self {
        PacketWriter {
            storage: Box::default(),
            length: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        PacketWriter {
            storage: vec![0u8; capacity].into_boxed_slice(),
            length: 0,
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.storage[..self.length]
    }

    /// Immutable copy of exactly the bytes written, independent of spare capacity.
    pub fn finalize(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_slice())
    }

    pub fn write_byte(&mut self, value: u8) {
        self.allocate(BYTE_SIZEOF);
        self.storage[self.length] = value;
        self.length += BYTE_SIZEOF;
    }

    /// Writes a character as a single byte. Only code points up to U+00FF fit.
    pub fn write_char(&mut self, value: char) -> Result<()> {
        let byte = u8::try_from(u32::from(value))
            .map_err(|_| Error::InvalidArgument(format!("char {:?} does not fit in one byte", value)))?;
        self.write_byte(byte);
        Ok(())
    }

    /// Writes the first `count` bytes of `values`.
    pub fn write_bytes(&mut self, count: usize, values: &[u8]) -> Result<()> {
        if values.len() < count {
            return Err(Error::InvalidArgument(format!(
                "cannot write {} bytes from {} values",
                count,
                values.len()
            )));
        }
        self.put_slice(&values[..count]);
        Ok(())
    }

    pub fn write_short(&mut self, value: i16) {
        self.allocate(SHORT_SIZEOF);
        BigEndian::write_i16(&mut self.storage[self.length..], value);
        self.length += SHORT_SIZEOF;
    }

    pub fn write_int(&mut self, value: i32) {
        self.allocate(INT_SIZEOF);
        BigEndian::write_i32(&mut self.storage[self.length..], value);
        self.length += INT_SIZEOF;
    }

    pub fn write_filler(&mut self, count: usize, filler: u8) {
        self.allocate(count);
        for b in &mut self.storage[self.length..self.length + count] {
            *b = filler;
        }
        self.length += count;
    }

    /// Writes `len + 1` as an int, the string bytes, then a NUL. `None` is written as the empty string.
    pub fn write_null_terminated_string(&mut self, value: Option<&str>) -> Result<()> {
        let value = value.unwrap_or("");
        let declared = i32::try_from(value.len() + BYTE_SIZEOF)
            .map_err(|_| Error::InvalidArgument(format!("string of {} bytes is too long", value.len())))?;

        self.allocate(INT_SIZEOF + value.len() + BYTE_SIZEOF);
        self.write_int(declared);
        self.put_slice(value.as_bytes());
        self.write_byte(0);
        Ok(())
    }

    /// Writes exactly `fixed_length` bytes: the string truncated to fit, padded with `filler`.
    pub fn write_fixed_length_string(&mut self, value: Option<&str>, filler: u8, fixed_length: usize) {
        let bytes = value.unwrap_or("").as_bytes();
        let count = bytes.len().min(fixed_length);

        self.allocate(fixed_length);
        self.put_slice(&bytes[..count]);
        self.write_filler(fixed_length - count, filler);
    }

    pub fn write_date(&mut self, year: u16, month: u16, day: u16) {
        self.write_date_time_fields([year, month, day, 0, 0, 0, 0]);
    }

    pub fn write_time(&mut self, hour: u16, minute: u16, second: u16) {
        self.write_date_time_fields([0, 0, 0, hour, minute, second, 0]);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn write_date_time(
        &mut self,
        year: u16,
        month: u16,
        day: u16,
        hour: u16,
        minute: u16,
        second: u16,
        millisecond: u16,
    ) {
        self.write_date_time_fields([year, month, day, hour, minute, second, millisecond]);
    }

    pub fn write_timestamp(&mut self, year: u16, month: u16, day: u16, hour: u16, minute: u16, second: u16) {
        self.write_date_time_fields([year, month, day, hour, minute, second, 0]);
    }

    /// Date-time with millisecond precision taken from a chrono value.
    pub fn write_naive_date_time(&mut self, value: &NaiveDateTime) -> Result<()> {
        let year = u16::try_from(value.year())
            .map_err(|_| Error::InvalidArgument(format!("year {} is out of range", value.year())))?;
        // leap seconds carry nanoseconds past one second
        let millisecond = (value.nanosecond() / 1_000_000).min(999) as u16;
        self.write_date_time(
            year,
            value.month() as u16,
            value.day() as u16,
            value.hour() as u16,
            value.minute() as u16,
            value.second() as u16,
            millisecond,
        );
        Ok(())
    }

    /// Appends a pre-encoded buffer verbatim.
    pub fn write_raw_bytes(&mut self, value: &[u8]) {
        self.put_slice(value);
    }

    fn write_date_time_fields(&mut self, fields: [u16; 7]) {
        self.allocate(DATETIME_SIZEOF);
        for field in fields.iter() {
            BigEndian::write_u16(&mut self.storage[self.length..], *field);
            self.length += SHORT_SIZEOF;
        }
    }

    fn put_slice(&mut self, value: &[u8]) {
        self.allocate(value.len());
        self.storage[self.length..self.length + value.len()].copy_from_slice(value);
        self.length += value.len();
    }

    fn allocate(&mut self, count: usize) {
        let remaining = self.storage.len() - self.length;
        if remaining >= count {
            return;
        }

        let mut storage = vec![0u8; self.storage.len() + count].into_boxed_slice();
        storage[..self.length].copy_from_slice(&self.storage[..self.length]);
        self.storage = storage;
    }
}

impl PacketPayload for PacketWriter {
    fn get_payload(&self) -> Bytes {
        self.finalize()
    }
}
