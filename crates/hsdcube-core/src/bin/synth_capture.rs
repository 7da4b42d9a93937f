use std::env;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use hsdcube_core::{CameraModel, LayoutSpec, SampleWidth};

const HEADER_FILL: u8 = 0x00;
const ROW_CHUNK: usize = 64 * 1024;

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        eprintln!("usage: synth_capture <camera> <output>");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), String> {
    let mut args = env::args().skip(1);
    let camera = args.next().ok_or("missing camera model")?;
    let output = args.next().map(PathBuf::from).ok_or("missing output path")?;

    let camera: CameraModel = camera.parse().map_err(|err| {
        let known = CameraModel::ALL
            .iter()
            .map(|model| model.slug())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} (known: {})", err, known)
    })?;
    write_capture(&output, &camera.layout())
}

/// Header of zeros followed by a ramp payload, one sample index at a time.
fn write_capture(path: &Path, layout: &LayoutSpec) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create {}: {}", parent.display(), err))?;
        }
    }
    let header_len = layout
        .header_len_for(layout.total_file_size)
        .ok_or("layout payload exceeds its file size")?;

    let file =
        File::create(path).map_err(|err| format!("failed to create {}: {}", path.display(), err))?;
    let mut writer = BufWriter::new(file);
    let write_err = |err: std::io::Error| format!("failed to write {}: {}", path.display(), err);

    let header = vec![HEADER_FILL; header_len as usize];
    writer.write_all(&header).map_err(write_err)?;

    let mut chunk = Vec::with_capacity(ROW_CHUNK * 2);
    for index in 0..layout.sample_count() {
        match layout.sample_width {
            SampleWidth::U8 => chunk.push((index % 256) as u8),
            SampleWidth::U16 => chunk.extend_from_slice(&((index % 4096) as u16).to_le_bytes()),
        }
        if chunk.len() >= ROW_CHUNK {
            writer.write_all(&chunk).map_err(write_err)?;
            chunk.clear();
        }
    }
    writer.write_all(&chunk).map_err(write_err)?;
    writer.flush().map_err(write_err)?;

    println!(
        "wrote {} capture ({} bytes) -> {}",
        layout.camera,
        layout.total_file_size,
        path.display()
    );
    Ok(())
}
