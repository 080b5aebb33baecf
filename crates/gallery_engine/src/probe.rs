//! Local file inspection and media duration probing.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_logging::engine_debug;
use gallery_core::FileCandidate;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

const ISO_BMFF_EXTENSIONS: &[&str] = &["mp4", "m4v", "mov", "3gp"];

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not an ISO media file: {0}")]
    NotIsoMedia(String),
    #[error("missing {0} box")]
    MissingBox(&'static str),
    #[error("media header does not declare a duration")]
    UnknownDuration,
    #[error("ffprobe failed: {0}")]
    Ffprobe(String),
}

/// Reads the playback duration of a local media file.
#[async_trait::async_trait]
pub trait DurationProbe: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<Duration, ProbeError>;
}

/// Stats a picked file into a validation candidate; the MIME type is guessed
/// from the extension.
pub fn inspect_file(path: &Path) -> std::io::Result<FileCandidate> {
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} is not a file", path.display()),
        ));
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime_type = mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string());
    Ok(FileCandidate {
        path: path.to_path_buf(),
        name,
        size_bytes: metadata.len(),
        mime_type,
    })
}

/// Native probe for MP4/QuickTime: reads `moov/mvhd` without decoding samples.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mp4Probe;

#[async_trait::async_trait]
impl DurationProbe for Mp4Probe {
    async fn probe(&self, path: &Path) -> Result<Duration, ProbeError> {
        let mut file = File::open(path).await?;
        let len = file.metadata().await?.len();

        let (first, _) = read_box_header(&mut file, 0, len)
            .await?
            .ok_or_else(|| ProbeError::NotIsoMedia("file too short".into()))?;
        if !looks_like_iso_media(&first.kind) {
            return Err(ProbeError::NotIsoMedia(format!(
                "unexpected leading box {:?}",
                String::from_utf8_lossy(&first.kind)
            )));
        }

        let moov = find_box(&mut file, 0, len, b"moov")
            .await?
            .ok_or(ProbeError::MissingBox("moov"))?;
        let mvhd = find_box(&mut file, moov.body_start, moov.end, b"mvhd")
            .await?
            .ok_or(ProbeError::MissingBox("mvhd"))?;

        file.seek(SeekFrom::Start(mvhd.body_start)).await?;
        let version = file.read_u8().await?;
        let mut flags = [0u8; 3];
        file.read_exact(&mut flags).await?;
        let (timescale, duration) = if version == 1 {
            let _created = file.read_u64().await?;
            let _modified = file.read_u64().await?;
            let timescale = file.read_u32().await?;
            let duration = file.read_u64().await?;
            (timescale, (duration != u64::MAX).then_some(duration))
        } else {
            let _created = file.read_u32().await?;
            let _modified = file.read_u32().await?;
            let timescale = file.read_u32().await?;
            let duration = file.read_u32().await?;
            (timescale, (duration != u32::MAX).then_some(u64::from(duration)))
        };
        let duration = duration.ok_or(ProbeError::UnknownDuration)?;
        if timescale == 0 {
            return Err(ProbeError::UnknownDuration);
        }
        let secs = duration as f64 / f64::from(timescale);
        engine_debug!("mvhd duration {:.3}s in {}", secs, path.display());
        Duration::try_from_secs_f64(secs).map_err(|_| ProbeError::UnknownDuration)
    }
}

/// Shells out to `ffprobe` for containers the native probe does not read.
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    binary: PathBuf,
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("ffprobe"),
        }
    }
}

impl FfprobeProbe {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait::async_trait]
impl DurationProbe for FfprobeProbe {
    async fn probe(&self, path: &Path) -> Result<Duration, ProbeError> {
        let output = tokio::process::Command::new(&self.binary)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|err| ProbeError::Ffprobe(err.to_string()))?;
        if !output.status.success() {
            return Err(ProbeError::Ffprobe(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let secs: f64 = stdout
            .trim()
            .parse()
            .map_err(|_| ProbeError::Ffprobe(format!("unexpected output {:?}", stdout.trim())))?;
        Duration::try_from_secs_f64(secs).map_err(|_| ProbeError::UnknownDuration)
    }
}

/// Native probe for ISO media, `ffprobe` for everything else.
#[derive(Debug, Clone, Default)]
pub struct MediaProbe {
    mp4: Mp4Probe,
    fallback: FfprobeProbe,
}

impl MediaProbe {
    pub fn new(fallback: FfprobeProbe) -> Self {
        Self {
            mp4: Mp4Probe,
            fallback,
        }
    }
}

#[async_trait::async_trait]
impl DurationProbe for MediaProbe {
    async fn probe(&self, path: &Path) -> Result<Duration, ProbeError> {
        let is_iso = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                ISO_BMFF_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            });
        if is_iso {
            self.mp4.probe(path).await
        } else {
            self.fallback.probe(path).await
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct BoxHeader {
    kind: [u8; 4],
}

#[derive(Debug, Clone, Copy)]
struct BoxSpan {
    body_start: u64,
    end: u64,
}

fn looks_like_iso_media(kind: &[u8; 4]) -> bool {
    matches!(
        kind,
        b"ftyp" | b"moov" | b"mdat" | b"free" | b"skip" | b"wide" | b"pnot"
    )
}

/// Reads the box header at `offset`; `None` when fewer than 8 bytes remain.
async fn read_box_header(
    file: &mut File,
    offset: u64,
    limit: u64,
) -> Result<Option<(BoxHeader, BoxSpan)>, ProbeError> {
    if offset + 8 > limit {
        return Ok(None);
    }
    file.seek(SeekFrom::Start(offset)).await?;
    let size = u64::from(file.read_u32().await?);
    let mut kind = [0u8; 4];
    file.read_exact(&mut kind).await?;
    let (header_len, total) = match size {
        0 => (8, limit - offset),
        1 => (16, file.read_u64().await?),
        n => (8, n),
    };
    if total < header_len || offset.saturating_add(total) > limit {
        return Err(ProbeError::NotIsoMedia(format!(
            "box {:?} at {} overruns its container",
            String::from_utf8_lossy(&kind),
            offset
        )));
    }
    Ok(Some((
        BoxHeader { kind },
        BoxSpan {
            body_start: offset + header_len,
            end: offset + total,
        },
    )))
}

async fn find_box(
    file: &mut File,
    start: u64,
    end: u64,
    wanted: &[u8; 4],
) -> Result<Option<BoxSpan>, ProbeError> {
    let mut offset = start;
    while let Some((header, span)) = read_box_header(file, offset, end).await? {
        if &header.kind == wanted {
            return Ok(Some(span));
        }
        offset = span.end;
    }
    Ok(None)
}
