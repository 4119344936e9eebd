//! Framing and filtering tests for hsm-spy

use hsm_spy::frame::{frames, Frame, FrameError};
use hsm_spy::{filters, hdlc, Payload, SpyBuffer, SpyRecord, MAX_PAYLOAD};

fn drain<const N: usize>(buf: &mut SpyBuffer<N>) -> Vec<u8> {
    let mut out = vec![0u8; buf.available()];
    let n = buf.read(&mut out);
    out.truncate(n);
    out
}

#[test]
fn test_maskable_records_filtered_by_default() {
    let mut buf: SpyBuffer<256> = SpyBuffer::new();
    assert!(!buf.begin(SpyRecord::SmTran, 1));
    buf.u16(5);
    buf.end();
    assert_eq!(buf.available(), 0);
}

#[test]
fn test_non_maskable_records_always_pass() {
    let mut buf: SpyBuffer<256> = SpyBuffer::new();
    assert!(buf.begin(SpyRecord::StateDict, 3));
    buf.u8(3);
    buf.u16(1);
    buf.str("LED_OFF");
    buf.end();

    let bytes = drain(&mut buf);
    let decoded: Vec<Frame> = frames(&bytes).collect::<Result<_, _>>().unwrap();
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].kind(), Some(SpyRecord::StateDict));
    assert_eq!(decoded[0].u16_at(1), Some(1));
    assert_eq!(&decoded[0].payload[3..], b"LED_OFF\0");
}

#[test]
fn test_frames_carry_sequence_and_timestamp() {
    let mut buf: SpyBuffer<256> = SpyBuffer::new();
    buf.set_global_filter_mask(filters::SM);

    for state in 0..3u16 {
        assert!(buf.begin(SpyRecord::SmStateEntry, 1));
        buf.u8(1);
        buf.u16(state);
        buf.end();
    }

    let bytes = drain(&mut buf);
    let decoded: Vec<Frame> = frames(&bytes).collect::<Result<_, _>>().unwrap();
    assert_eq!(decoded.len(), 3);
    for (i, frame) in decoded.iter().enumerate() {
        assert_eq!(frame.sequence, i as u8);
        assert_eq!(frame.timestamp, i as u32 + 1);
        assert_eq!(frame.u16_at(1), Some(i as u16));
    }
}

#[test]
fn test_local_filter_blocks_spy_id() {
    let mut buf: SpyBuffer<256> = SpyBuffer::new();
    buf.set_global_filter_mask(filters::ALL);
    buf.set_local_filter(7, false);

    assert!(!buf.begin(SpyRecord::SmDispatch, 7));
    assert!(buf.begin(SpyRecord::SmDispatch, 8));
    buf.end();
    // spy id 0 is never filtered locally
    buf.set_local_filter_mask(0);
    assert!(buf.begin(SpyRecord::SmDispatch, 0));
    buf.end();

    let bytes = drain(&mut buf);
    assert_eq!(frames(&bytes).count(), 2);
}

#[test]
fn test_flag_and_escape_bytes_are_stuffed() {
    let mut buf: SpyBuffer<256> = SpyBuffer::new();
    buf.set_global_filter(SpyRecord::SmTran, true);
    assert!(buf.begin(SpyRecord::SmTran, 1));
    buf.u8(hdlc::FLAG);
    buf.u8(hdlc::ESC);
    buf.end();

    let bytes = drain(&mut buf);
    // only the trailing delimiter is a bare flag
    assert_eq!(bytes.iter().filter(|&&b| b == hdlc::FLAG).count(), 1);
    let frame = frames(&bytes).next().unwrap().unwrap();
    assert_eq!(&frame.payload[..], &[hdlc::FLAG, hdlc::ESC]);
}

#[test]
fn test_corrupted_frame_rejected() {
    let mut buf: SpyBuffer<256> = SpyBuffer::new();
    buf.set_global_filter_mask(filters::ALL);
    buf.begin(SpyRecord::SmIgnored, 1);
    buf.u16(0x1234);
    buf.end();

    let mut bytes = drain(&mut buf);
    bytes[7] ^= 0x01;
    assert_eq!(frames(&bytes).next(), Some(Err(FrameError::Checksum)));
    assert_eq!(Frame::decode(&[1, 2, 3]), Err(FrameError::TooShort));
    assert_eq!(Frame::decode(&[1, 2, 3, 4, 5, 6, 7, hdlc::ESC]), Err(FrameError::DanglingEscape));
}

#[test]
fn test_full_buffer_drops_whole_frames() {
    let mut buf: SpyBuffer<16> = SpyBuffer::new();
    buf.set_global_filter_mask(filters::ALL);

    // 2 header + 4 timestamp + 2 data + checksum + flag = 10 bytes
    buf.begin(SpyRecord::SmDispatch, 1);
    buf.u16(1);
    buf.end();
    assert_eq!(buf.available(), 10);

    buf.begin(SpyRecord::SmDispatch, 1);
    buf.u16(2);
    buf.end();
    assert_eq!(buf.available(), 10);
    assert_eq!(buf.dropped(), 1);

    let bytes = drain(&mut buf);
    assert_eq!(frames(&bytes).filter(Result::is_ok).count(), 1);
}

#[test]
fn test_target_info_record() {
    let mut buf: SpyBuffer<256> = SpyBuffer::new();
    buf.target_info("0.1.0", "host");

    let bytes = drain(&mut buf);
    let frame = frames(&bytes).next().unwrap().unwrap();
    assert_eq!(frame.kind(), Some(SpyRecord::TargetInfo));
    assert!(frame.payload.starts_with(b"0.1.0\0"));
    assert!(frame.payload.ends_with(b"host\0"));
}

#[test]
fn test_record_commits_whole_payload() {
    let mut buf: SpyBuffer<256> = SpyBuffer::new();
    buf.set_global_filter_mask(filters::SM);

    // an open piecewise record is left alone
    assert!(buf.begin(SpyRecord::SmStateExit, 2));
    buf.u8(2);

    let mut payload = Payload::new();
    payload.u8(1).u16(7).str("ON");
    assert!(buf.record(SpyRecord::SmStateEntry, 1, payload.as_bytes()));

    buf.u16(9);
    buf.end();

    let bytes = drain(&mut buf);
    let decoded: Vec<Frame> = frames(&bytes).collect::<Result<_, _>>().unwrap();
    let entry = &decoded[0];
    assert_eq!(entry.kind(), Some(SpyRecord::SmStateEntry));
    assert_eq!(&entry.payload[..], &[1, 7, 0, b'O', b'N', 0]);
    let exit = decoded.last().unwrap();
    assert_eq!(exit.kind(), Some(SpyRecord::SmStateExit));
    assert_eq!(&exit.payload[..], &[2, 9, 0]);
}

#[test]
fn test_payload_truncated_at_capacity() {
    let mut payload = Payload::new();
    for i in 0..MAX_PAYLOAD as u16 {
        payload.u16(i);
    }
    assert_eq!(payload.as_bytes().len(), MAX_PAYLOAD);
}
