use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use hsdcube_core::{
    CameraModel, CaptureFile, FormatError, LoadError, SourceError, load_capture_file,
    make_capture_report,
};

fn temp_path(name: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("hsdcube_{unique}_{name}"))
}

#[test]
fn loads_custom_capture_from_disk() {
    let layout = CameraModel::Custom.layout();
    let path = temp_path("custom.hsd");
    let payload: Vec<u8> = (0..layout.total_file_size).map(|i| (i % 253) as u8).collect();
    fs::write(&path, &payload).unwrap();

    let capture = load_capture_file(&path);
    let opened = CaptureFile::open(&path);
    let _ = fs::remove_file(&path);

    let capture = capture.expect("load capture");
    assert_eq!(capture.layout.camera, CameraModel::Custom);
    assert_eq!(capture.header_len, 0);
    assert_eq!(capture.cube.shape(), (300, 350, 141));
    // Band-interleaved rows: (y=0, band=1) starts right after the first row.
    assert_eq!(capture.cube.get(0, 0, 1), Some((350 % 253) as u16));

    let opened = opened.expect("open capture");
    let report = make_capture_report("custom.hsd", &capture, opened.modified());
    assert_eq!(report.input.bytes, layout.total_file_size);
    assert_eq!(report.cube.shape, [300, 350, 141]);
    assert!(report.input.modified.is_some());
}

#[test]
fn rejects_unsupported_size_before_reading() {
    let path = temp_path("short.hsd");
    fs::write(&path, [0u8; 64]).unwrap();

    let err = match CaptureFile::open(&path) {
        Ok(_) => panic!("expected unsupported size to be rejected"),
        Err(err) => err,
    };
    let loaded = load_capture_file(&path);
    let _ = fs::remove_file(&path);

    assert!(matches!(
        err,
        SourceError::Format(FormatError::UnsupportedFormat { length: 64 })
    ));
    let loaded = loaded.unwrap_err();
    assert_eq!(loaded.unsupported_length(), Some(64));
    assert_eq!(loaded.to_string(), "unsupported file size: 64 bytes");
}

#[test]
fn missing_file_is_io_error() {
    let path = temp_path("missing.hsd");
    let err = load_capture_file(&path).unwrap_err();
    assert!(matches!(err, LoadError::Source(SourceError::Io(_))));
}

#[test]
fn directory_is_not_a_capture() {
    let err = CaptureFile::open(&std::env::temp_dir()).unwrap_err();
    assert!(matches!(err, SourceError::NotAFile { .. }));
}
