//! Spy buffer management
//!
//! Handles record filtering, HDLC framing and the output ring buffer.

use crate::records::SpyRecord;

/// HDLC protocol constants
pub mod hdlc {
    /// HDLC flag byte (frame delimiter)
    pub const FLAG: u8 = 0x7E;
    /// HDLC escape byte
    pub const ESC: u8 = 0x7D;
    /// XOR mask for escaped bytes
    pub const ESC_XOR: u8 = 0x20;
}

/// Largest record payload
pub const MAX_PAYLOAD: usize = 128;

/// Largest stuffed frame: every byte escaped, plus header, checksum and flag
const MAX_FRAME: usize = 2 * (MAX_PAYLOAD + 7) + 1;

/// Record payload assembled outside the buffer.
///
/// Fields past [`MAX_PAYLOAD`] are dropped.
#[derive(Debug, Clone, Default)]
pub struct Payload {
    data: heapless::Vec<u8, MAX_PAYLOAD>,
}

impl Payload {
    pub const fn new() -> Self {
        Self {
            data: heapless::Vec::new(),
        }
    }

    pub fn u8(&mut self, value: u8) -> &mut Self {
        let _ = self.data.push(value);
        self
    }

    pub fn u16(&mut self, value: u16) -> &mut Self {
        let _ = self.data.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn u32(&mut self, value: u32) -> &mut Self {
        let _ = self.data.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Add zero-terminated string
    pub fn str(&mut self, value: &str) -> &mut Self {
        let _ = self.data.extend_from_slice(value.as_bytes());
        let _ = self.data.push(0);
        self
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Trace buffer: filters, framing and an overwrite-free ring
pub struct SpyBuffer<const N: usize> {
    /// Ring buffer storage
    data: [u8; N],
    /// Write index (head)
    head: usize,
    /// Read index (tail)
    tail: usize,
    /// Number of bytes in buffer
    used: usize,
    /// Sequence number for HDLC frames
    sequence: u8,
    /// Current record being built
    current: Option<RecordBuilder>,
    /// Global filter (record types)
    global_filter: u128,
    /// Local filter (spy ids)
    local_filter: u128,
    /// Timestamp counter
    timestamp: u32,
    /// Frames dropped because the ring was full
    dropped: u32,
}

/// Record under construction
struct RecordBuilder {
    record: SpyRecord,
    timestamp: u32,
    data: Payload,
}

impl<const N: usize> SpyBuffer<N> {
    /// Create new buffer with every maskable record disabled
    pub const fn new() -> Self {
        Self {
            data: [0; N],
            head: 0,
            tail: 0,
            used: 0,
            sequence: 0,
            current: None,
            global_filter: 0,
            local_filter: u128::MAX,
            timestamp: 0,
            dropped: 0,
        }
    }

    /// Reset buffer and filters
    pub fn init(&mut self) {
        *self = Self::new();
    }

    pub fn set_global_filter(&mut self, record: SpyRecord, enable: bool) {
        let bit = 1u128 << (record as u8);
        if enable {
            self.global_filter |= bit;
        } else {
            self.global_filter &= !bit;
        }
    }

    pub fn set_global_filter_mask(&mut self, mask: u128) {
        self.global_filter = mask;
    }

    pub fn set_local_filter(&mut self, spy_id: u8, enable: bool) {
        if spy_id < 128 {
            let bit = 1u128 << spy_id;
            if enable {
                self.local_filter |= bit;
            } else {
                self.local_filter &= !bit;
            }
        }
    }

    pub fn set_local_filter_mask(&mut self, mask: u128) {
        self.local_filter = mask;
    }

    /// Check if record passes filters
    fn passes_filters(&self, record: SpyRecord, spy_id: u8) -> bool {
        if record.is_non_maskable() {
            return true;
        }

        let global_pass = (self.global_filter & (1u128 << (record as u8))) != 0;

        // Spy id 0 always passes
        let local_pass = spy_id == 0 || spy_id >= 128 || (self.local_filter & (1u128 << spy_id)) != 0;

        global_pass && local_pass
    }

    /// Begin a record.
    ///
    /// Returns `false` when filtered out; the data calls that follow are then
    /// ignored until the next `begin`.
    pub fn begin(&mut self, record: SpyRecord, spy_id: u8) -> bool {
        if self.current.is_some() {
            self.end();
        }

        if !self.passes_filters(record, spy_id) {
            return false;
        }

        self.timestamp = self.timestamp.wrapping_add(1);
        self.current = Some(RecordBuilder {
            record,
            timestamp: self.timestamp,
            data: Payload::new(),
        });

        true
    }

    /// End current record and commit it to the ring
    pub fn end(&mut self) {
        if let Some(record) = self.current.take() {
            self.commit(record.record, record.timestamp, record.data.as_bytes());
        }
    }

    /// Filter and commit a complete record in one step.
    ///
    /// Returns `false` when filtered out. A record opened with `begin` stays
    /// open.
    pub fn record(&mut self, record: SpyRecord, spy_id: u8, payload: &[u8]) -> bool {
        if !self.passes_filters(record, spy_id) {
            return false;
        }

        self.timestamp = self.timestamp.wrapping_add(1);
        let len = payload.len().min(MAX_PAYLOAD);
        self.commit(record, self.timestamp, &payload[..len]);
        true
    }

    fn commit(&mut self, record: SpyRecord, timestamp: u32, data: &[u8]) {
        let mut frame = heapless::Vec::<u8, MAX_FRAME>::new();

        // Checksum: ~(sequence + record type + timestamp + data)
        let ts_bytes = timestamp.to_le_bytes();
        let mut checksum = self.sequence.wrapping_add(record as u8);
        for &byte in ts_bytes.iter().chain(data.iter()) {
            checksum = checksum.wrapping_add(byte);
        }
        checksum = !checksum;

        let add_byte = |frame: &mut heapless::Vec<u8, MAX_FRAME>, byte: u8| {
            if byte == hdlc::FLAG || byte == hdlc::ESC {
                let _ = frame.push(hdlc::ESC);
                let _ = frame.push(byte ^ hdlc::ESC_XOR);
            } else {
                let _ = frame.push(byte);
            }
        };

        add_byte(&mut frame, self.sequence);
        add_byte(&mut frame, record as u8);
        for &byte in ts_bytes.iter().chain(data.iter()) {
            add_byte(&mut frame, byte);
        }
        add_byte(&mut frame, checksum);

        // Flag is never stuffed
        let _ = frame.push(hdlc::FLAG);

        // Whole frames only: a truncated frame would desynchronise the host
        if N - self.used < frame.len() {
            self.dropped = self.dropped.wrapping_add(1);
            return;
        }

        for &byte in &frame {
            self.data[self.head] = byte;
            self.head = (self.head + 1) % N;
            self.used += 1;
        }

        self.sequence = self.sequence.wrapping_add(1);
    }

    /// Read available bytes from buffer
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let mut n = 0;
        while n < buf.len() && self.used > 0 {
            buf[n] = self.data[self.tail];
            self.tail = (self.tail + 1) % N;
            self.used -= 1;
            n += 1;
        }
        n
    }

    /// Pop a single byte
    pub fn get_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        (self.read(&mut byte) == 1).then_some(byte[0])
    }

    /// Number of bytes available to read
    pub fn available(&self) -> usize {
        self.used
    }

    /// Number of frames dropped on overflow
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    pub fn u8(&mut self, value: u8) {
        if let Some(record) = self.current.as_mut() {
            record.data.u8(value);
        }
    }

    pub fn u16(&mut self, value: u16) {
        if let Some(record) = self.current.as_mut() {
            record.data.u16(value);
        }
    }

    pub fn u32(&mut self, value: u32) {
        if let Some(record) = self.current.as_mut() {
            record.data.u32(value);
        }
    }

    /// Add zero-terminated string
    pub fn str(&mut self, value: &str) {
        if let Some(record) = self.current.as_mut() {
            record.data.str(value);
        }
    }

    /// Emit the non-maskable target description record
    pub fn target_info(&mut self, version: &str, target_name: &str) {
        let mut payload = Payload::new();
        payload
            .str(version)
            .u8(if cfg!(target_endian = "big") { 1 } else { 0 })
            .str(target_name);
        self.record(SpyRecord::TargetInfo, 0, payload.as_bytes());
    }
}

impl<const N: usize> Default for SpyBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
