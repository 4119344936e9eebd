//! Host-side frame decoding
//!
//! Inverse of the framing done by [`SpyBuffer`](crate::SpyBuffer): removes
//! byte stuffing, verifies the checksum and splits the header from the
//! payload.

use crate::buffer::{hdlc, MAX_PAYLOAD};
use crate::records::SpyRecord;

/// A decoded record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub sequence: u8,
    pub record: u8,
    pub timestamp: u32,
    pub payload: heapless::Vec<u8, MAX_PAYLOAD>,
}

/// Reasons a frame is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Fewer bytes than sequence, record, timestamp and checksum
    TooShort,
    /// Payload larger than any record the target can produce
    TooLong,
    /// Escape byte at the end of the frame
    DanglingEscape,
    /// Checksum mismatch
    Checksum,
}

impl Frame {
    /// Decode one frame body (bytes between two flags, flag excluded)
    pub fn decode(stuffed: &[u8]) -> Result<Self, FrameError> {
        let mut raw = heapless::Vec::<u8, { MAX_PAYLOAD + 7 }>::new();
        let mut escaped = false;
        for &byte in stuffed {
            let byte = if escaped {
                escaped = false;
                byte ^ hdlc::ESC_XOR
            } else if byte == hdlc::ESC {
                escaped = true;
                continue;
            } else {
                byte
            };
            raw.push(byte).map_err(|_| FrameError::TooLong)?;
        }
        if escaped {
            return Err(FrameError::DanglingEscape);
        }
        if raw.len() < 7 {
            return Err(FrameError::TooShort);
        }

        let (body, checksum) = raw.split_at(raw.len() - 1);
        let sum = body.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
        if !sum != checksum[0] {
            return Err(FrameError::Checksum);
        }

        let mut payload = heapless::Vec::new();
        payload
            .extend_from_slice(&body[6..])
            .map_err(|_| FrameError::TooLong)?;

        Ok(Frame {
            sequence: body[0],
            record: body[1],
            timestamp: u32::from_le_bytes([body[2], body[3], body[4], body[5]]),
            payload,
        })
    }

    /// Record type, if it is one this crate declares
    pub fn kind(&self) -> Option<SpyRecord> {
        SpyRecord::from_u8(self.record)
    }

    /// Little-endian u16 at `offset` in the payload
    pub fn u16_at(&self, offset: usize) -> Option<u16> {
        let bytes = self.payload.get(offset..offset + 2)?;
        Some(u16::from_le_bytes([bytes[0], bytes[1]]))
    }
}

/// Iterate over the frames in a captured byte stream.
///
/// Bytes after the last flag are treated as an incomplete frame and skipped.
pub fn frames(stream: &[u8]) -> impl Iterator<Item = Result<Frame, FrameError>> + '_ {
    let complete = match stream.iter().rposition(|&b| b == hdlc::FLAG) {
        Some(last) => &stream[..last],
        None => &[][..],
    };
    complete
        .split(|&b| b == hdlc::FLAG)
        .filter(|body| !body.is_empty())
        .map(Frame::decode)
}
