use std::path::PathBuf;
use std::time::Duration;

use gallery_engine::{inspect_file, DurationProbe, FfprobeProbe, MediaProbe, Mp4Probe, ProbeError};
use tempfile::TempDir;

fn iso_box(kind: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 8);
    out.extend_from_slice(&(body.len() as u32 + 8).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(body);
    out
}

fn ftyp() -> Vec<u8> {
    iso_box(b"ftyp", b"isom\0\0\x02\0isomiso2mp41")
}

fn mvhd_v0(timescale: u32, duration: u32) -> Vec<u8> {
    let mut body = vec![0u8, 0, 0, 0];
    body.extend_from_slice(&1u32.to_be_bytes());
    body.extend_from_slice(&2u32.to_be_bytes());
    body.extend_from_slice(&timescale.to_be_bytes());
    body.extend_from_slice(&duration.to_be_bytes());
    body.extend_from_slice(&[0u8; 80]);
    iso_box(b"mvhd", &body)
}

fn mvhd_v1(timescale: u32, duration: u64) -> Vec<u8> {
    let mut body = vec![1u8, 0, 0, 0];
    body.extend_from_slice(&1u64.to_be_bytes());
    body.extend_from_slice(&2u64.to_be_bytes());
    body.extend_from_slice(&timescale.to_be_bytes());
    body.extend_from_slice(&duration.to_be_bytes());
    body.extend_from_slice(&[0u8; 80]);
    iso_box(b"mvhd", &body)
}

fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).expect("write fixture");
    path
}

#[tokio::test]
async fn reads_version_zero_header_after_media_data() {
    let dir = TempDir::new().unwrap();
    let mut bytes = ftyp();
    bytes.extend(iso_box(b"free", &[]));
    bytes.extend(iso_box(b"mdat", &[0xAB; 256]));
    bytes.extend(iso_box(b"moov", &mvhd_v0(1000, 90_500)));
    let path = write(&dir, "clip.mp4", &bytes);

    let duration = Mp4Probe.probe(&path).await.expect("duration");
    assert_eq!(duration, Duration::from_millis(90_500));
}

#[tokio::test]
async fn reads_version_one_header() {
    let dir = TempDir::new().unwrap();
    let mut bytes = ftyp();
    let mut moov_body = mvhd_v1(600, 600 * 150);
    moov_body.extend(iso_box(b"trak", &[0u8; 16]));
    bytes.extend(iso_box(b"moov", &moov_body));
    let path = write(&dir, "long.mov", &bytes);

    let duration = MediaProbe::default().probe(&path).await.expect("duration");
    assert_eq!(duration, Duration::from_secs(150));
}

#[tokio::test]
async fn unknown_duration_is_an_error() {
    let dir = TempDir::new().unwrap();
    let mut bytes = ftyp();
    bytes.extend(iso_box(b"moov", &mvhd_v0(1000, u32::MAX)));
    let path = write(&dir, "live.mp4", &bytes);

    let err = Mp4Probe.probe(&path).await.unwrap_err();
    assert!(matches!(err, ProbeError::UnknownDuration), "{err}");
}

#[tokio::test]
async fn overflowing_duration_is_an_error() {
    let dir = TempDir::new().unwrap();
    let mut bytes = ftyp();
    bytes.extend(iso_box(b"moov", &mvhd_v1(1, u64::MAX - 1)));
    let path = write(&dir, "forever.mp4", &bytes);

    let err = Mp4Probe.probe(&path).await.unwrap_err();
    assert!(matches!(err, ProbeError::UnknownDuration), "{err}");
}

#[tokio::test]
async fn rejects_non_iso_media() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "fake.mp4", b"RIFF\x10\0\0\0AVI LIST this is not an mp4 at all");

    let err = Mp4Probe.probe(&path).await.unwrap_err();
    assert!(matches!(err, ProbeError::NotIsoMedia(_)), "{err}");
}

#[tokio::test]
async fn missing_movie_box_is_reported() {
    let dir = TempDir::new().unwrap();
    let mut bytes = ftyp();
    bytes.extend(iso_box(b"mdat", &[0u8; 32]));
    let path = write(&dir, "truncated.mp4", &bytes);

    let err = Mp4Probe.probe(&path).await.unwrap_err();
    assert!(matches!(err, ProbeError::MissingBox("moov")), "{err}");
}

#[tokio::test]
async fn missing_ffprobe_binary_is_a_probe_error() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "clip.avi", b"RIFF");
    let probe = MediaProbe::new(FfprobeProbe::new(dir.path().join("no-such-ffprobe")));

    let err = probe.probe(&path).await.unwrap_err();
    assert!(matches!(err, ProbeError::Ffprobe(_)), "{err}");
}

#[cfg(unix)]
#[tokio::test]
async fn ffprobe_output_out_of_range_is_an_error() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = write(&dir, "clip.avi", b"RIFF");
    for (name, output) in [("huge", "1e30"), ("negative", "-4.5")] {
        let script = write(
            &dir,
            &format!("ffprobe-{name}"),
            format!("#!/bin/sh\necho {output}\n").as_bytes(),
        );
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let err = FfprobeProbe::new(script.clone()).probe(&path).await.unwrap_err();
        assert!(matches!(err, ProbeError::UnknownDuration), "{output}: {err}");
    }
}

#[test]
fn inspect_guesses_mime_type_from_extension() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "tour.mp4", &[0u8; 2048]);

    let candidate = inspect_file(&path).expect("candidate");
    assert_eq!(candidate.name, "tour.mp4");
    assert_eq!(candidate.size_bytes, 2048);
    assert_eq!(candidate.mime_type.as_deref(), Some("video/mp4"));

    assert!(inspect_file(dir.path()).is_err());
}
