use std::{
    io::Cursor,
    path::{Path, PathBuf},
};

use futures::future::{FutureExt as _, LocalBoxFuture};

use crate::foundation::error::LoadError;

/// Environment primitive that actually fetches media.
///
/// Each returned future must complete exactly once, with success or failure. The loader
/// calls these from the task of an admitted request, never for queued, cancelled or
/// unspawnable requests, and never retries.
pub trait MediaSource {
    /// Fetch and decode the image at `src`.
    fn load_image(&self, src: &str) -> LocalBoxFuture<'static, Result<(), LoadError>>;

    /// Fetch the audio at `src` until it is ready to play.
    fn load_audio(&self, src: &str) -> LocalBoxFuture<'static, Result<(), LoadError>>;
}

/// [`MediaSource`] backed by files under a root directory.
///
/// Images are fully decoded with the `image` crate. Audio is accepted when the file is
/// non-empty and starts with a recognised container signature.
#[derive(Clone, Debug)]
pub struct FsMediaSource {
    root: PathBuf,
}

impl FsMediaSource {
    /// Resolve keys relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory keys are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a resource key to a file path under the root.
    pub fn resolve(&self, src: &str) -> Result<PathBuf, LoadError> {
        Ok(self.root.join(normalize_rel_path(src)?))
    }

    fn read(&self, src: &str) -> Result<Vec<u8>, LoadError> {
        let path = self.resolve(src)?;
        std::fs::read(&path).map_err(|e| LoadError::io(src, format!("{}: {e}", path.display())))
    }
}

impl MediaSource for FsMediaSource {
    fn load_image(&self, src: &str) -> LocalBoxFuture<'static, Result<(), LoadError>> {
        let this = self.clone();
        let src = src.to_string();
        async move {
            let bytes = this.read(&src)?;
            image::ImageReader::new(Cursor::new(bytes))
                .with_guessed_format()
                .map_err(|e| LoadError::decode(&src, e.to_string()))?
                .decode()
                .map_err(|e| LoadError::decode(&src, e.to_string()))?;
            Ok(())
        }
        .boxed_local()
    }

    fn load_audio(&self, src: &str) -> LocalBoxFuture<'static, Result<(), LoadError>> {
        let this = self.clone();
        let src = src.to_string();
        async move {
            let bytes = this.read(&src)?;
            if bytes.is_empty() {
                return Err(LoadError::decode(&src, "empty audio file"));
            }
            match sniff_audio_container(&bytes) {
                Some(_) => Ok(()),
                None => Err(LoadError::unsupported(&src)),
            }
        }
        .boxed_local()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Audio containers recognised by [`sniff_audio_container`].
pub enum AudioContainer {
    /// Ogg (Vorbis/Opus).
    Ogg,
    /// MPEG audio, with or without an ID3 tag.
    Mp3,
    /// RIFF/WAVE.
    Wav,
    /// Native FLAC.
    Flac,
    /// ISO base media (M4A/AAC).
    Mp4,
}

/// Identify the container from leading bytes.
pub fn sniff_audio_container(bytes: &[u8]) -> Option<AudioContainer> {
    if bytes.starts_with(b"OggS") {
        return Some(AudioContainer::Ogg);
    }
    if bytes.starts_with(b"fLaC") {
        return Some(AudioContainer::Flac);
    }
    if bytes.starts_with(b"ID3") {
        return Some(AudioContainer::Mp3);
    }
    // MPEG frame sync: 11 set bits
    if bytes.len() >= 2 && bytes[0] == 0xFF && (bytes[1] & 0xE0) == 0xE0 {
        return Some(AudioContainer::Mp3);
    }
    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE" {
        return Some(AudioContainer::Wav);
    }
    if bytes.len() >= 8 && &bytes[4..8] == b"ftyp" {
        return Some(AudioContainer::Mp4);
    }
    None
}

/// Canonical form of a resource key: `/`-separated, without empty or `.` segments.
///
/// Keys resolve under the media root only, so absolute or drive-qualified keys, `..`
/// segments, and keys naming no file are rejected with [`LoadError::InvalidKey`].
pub fn normalize_rel_path(src: &str) -> Result<String, LoadError> {
    let invalid = |reason| LoadError::InvalidKey {
        src: src.to_string(),
        reason,
    };

    let unified = src.replace('\\', "/");
    if unified.starts_with('/') {
        return Err(invalid("absolute keys are not allowed"));
    }

    let mut segments = unified
        .split('/')
        .filter(|seg| !seg.is_empty() && *seg != ".")
        .peekable();
    if segments.peek().is_some_and(|first| first.ends_with(':')) {
        return Err(invalid("drive-qualified keys are not allowed"));
    }

    let kept: Vec<&str> = segments.collect();
    if kept.contains(&"..") {
        return Err(invalid("key escapes the media root"));
    }
    if kept.is_empty() {
        return Err(invalid("key names no file"));
    }
    Ok(kept.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
