mod common;

use approx::assert_abs_diff_eq;
use common::{build_ser_header, build_ser_with_frames, write_test_ser};
use flowtrack_core::error::FlowTrackError;
use flowtrack_core::io::ser::SerReader;

#[test]
fn test_parse_8bit_mono() {
    let frames = vec![vec![0u8, 51, 102, 153, 204, 255], vec![255u8; 6]];
    let file = write_test_ser(&build_ser_with_frames(3, 2, &frames));
    let reader = SerReader::open(file.path()).unwrap();

    assert_eq!(reader.frame_count(), 2);
    assert_eq!(reader.header.width, 3);
    assert_eq!(reader.header.height, 2);

    let frame = reader.read_frame(0).unwrap();
    assert_eq!(frame.dimensions(), (3, 2));
    assert_abs_diff_eq!(frame.data[[0, 1]], 0.2, epsilon = 1e-6);
    assert_abs_diff_eq!(frame.data[[1, 2]], 1.0, epsilon = 1e-6);
    assert_eq!(reader.read_frame(1).unwrap().metadata.frame_index, 1);
}

#[test]
fn test_parse_16bit_mono() {
    let mut buf = build_ser_header(2, 1, 16, 1, 0);
    buf.extend_from_slice(&0u16.to_le_bytes());
    buf.extend_from_slice(&65535u16.to_le_bytes());
    let file = write_test_ser(&buf);

    let frame = SerReader::open(file.path()).unwrap().read_frame(0).unwrap();
    assert_eq!(frame.data[[0, 0]], 0.0);
    assert_abs_diff_eq!(frame.data[[0, 1]], 1.0, epsilon = 1e-6);
}

#[test]
fn test_rgb_reduced_to_luminance() {
    let mut buf = build_ser_header(1, 1, 8, 1, 100);
    buf.extend_from_slice(&[255, 0, 0]);
    let file = write_test_ser(&buf);

    let frame = SerReader::open(file.path()).unwrap().read_frame(0).unwrap();
    assert_abs_diff_eq!(frame.data[[0, 0]], 0.299, epsilon = 1e-3);
}

#[test]
fn test_bgr_channel_order() {
    let mut buf = build_ser_header(1, 1, 8, 1, 101);
    buf.extend_from_slice(&[255, 0, 0]);
    let file = write_test_ser(&buf);

    let frame = SerReader::open(file.path()).unwrap().read_frame(0).unwrap();
    assert_abs_diff_eq!(frame.data[[0, 0]], 0.114, epsilon = 1e-3);
}

#[test]
fn test_timestamps_from_trailer() {
    let mut buf = build_ser_with_frames(1, 1, &[vec![0], vec![1]]);
    buf.extend_from_slice(&111u64.to_le_bytes());
    buf.extend_from_slice(&222u64.to_le_bytes());
    let file = write_test_ser(&buf);

    let reader = SerReader::open(file.path()).unwrap();
    assert_eq!(reader.read_frame(1).unwrap().metadata.timestamp_us, Some(222));
}

#[test]
fn test_no_trailer_no_timestamp() {
    let file = write_test_ser(&build_ser_with_frames(1, 1, &[vec![0]]));
    let reader = SerReader::open(file.path()).unwrap();
    assert_eq!(reader.read_frame(0).unwrap().metadata.timestamp_us, None);
}

#[test]
fn test_frames_iterator() {
    let frames: Vec<Vec<u8>> = (0..4).map(|i| vec![i * 10; 4]).collect();
    let file = write_test_ser(&build_ser_with_frames(2, 2, &frames));
    let reader = SerReader::open(file.path()).unwrap();

    let decoded: Vec<_> = reader.frames().collect::<Result<_, _>>().unwrap();
    assert_eq!(decoded.len(), 4);
    assert_abs_diff_eq!(decoded[3].data[[1, 1]], 30.0 / 255.0, epsilon = 1e-6);
}

#[test]
fn test_frame_index_out_of_range() {
    let file = write_test_ser(&build_ser_with_frames(1, 1, &[vec![0]]));
    let reader = SerReader::open(file.path()).unwrap();
    assert!(matches!(
        reader.read_frame(1),
        Err(FlowTrackError::FrameIndexOutOfRange { index: 1, total: 1 })
    ));
}

#[test]
fn test_bad_magic_rejected() {
    let mut buf = build_ser_with_frames(1, 1, &[vec![0]]);
    buf[0] = b'X';
    let file = write_test_ser(&buf);
    assert!(matches!(
        SerReader::open(file.path()),
        Err(FlowTrackError::InvalidSer(_))
    ));
}

#[test]
fn test_truncated_file_rejected() {
    let mut buf = build_ser_with_frames(4, 4, &[vec![0; 16], vec![0; 16]]);
    buf.truncate(buf.len() - 5);
    let file = write_test_ser(&buf);
    assert!(matches!(
        SerReader::open(file.path()),
        Err(FlowTrackError::InvalidSer(_))
    ));
}

#[test]
fn test_tiny_file_rejected() {
    let file = write_test_ser(b"LUCAM");
    assert!(SerReader::open(file.path()).is_err());
}

#[test]
fn test_zero_width_rejected() {
    let file = write_test_ser(&build_ser_header(0, 4, 8, 0, 0));
    assert!(matches!(
        SerReader::open(file.path()),
        Err(FlowTrackError::InvalidDimensions { .. })
    ));
}
