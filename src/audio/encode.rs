// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::debug;

use super::error::AudioError;
use super::AudioSegment;
use crate::config;

/// Writes a segment to an audio file.
pub trait Encoder {
    /// The file extension of files written by this encoder.
    fn extension(&self) -> &'static str;

    /// Encodes the segment into a file at the given path, replacing any existing file.
    fn encode(&self, segment: &AudioSegment<'_>, path: &Path) -> Result<(), AudioError>;
}

/// Picks an encoder that matches the container of the input file. WAV input is
/// written back as WAV; everything else is encoded to MP3.
pub fn encoder_for(
    input: &Path,
    ffmpeg: &config::Ffmpeg,
) -> Result<Box<dyn Encoder>, AudioError> {
    let is_wav = input
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));

    if is_wav {
        Ok(Box::new(WavEncoder))
    } else {
        Ok(Box::new(FfmpegEncoder::new(ffmpeg)?))
    }
}

/// Encodes MP3 files by piping raw PCM through an ffmpeg process.
#[derive(Clone, Debug)]
pub struct FfmpegEncoder {
    binary: PathBuf,
    bitrate: Option<String>,
}

impl FfmpegEncoder {
    /// Locates the ffmpeg binary. A configured path is used as is when it exists,
    /// otherwise it is looked up on the PATH.
    pub fn new(config: &config::Ffmpeg) -> Result<FfmpegEncoder, AudioError> {
        let configured = config.path();
        let binary = if Path::new(configured).is_file() {
            PathBuf::from(configured)
        } else {
            which::which(configured)
                .map_err(|_| AudioError::EncoderNotFound(configured.to_string()))?
        };
        debug!(binary = ?binary, "Using ffmpeg");

        Ok(FfmpegEncoder {
            binary,
            bitrate: config.bitrate().map(str::to_string),
        })
    }

    fn args(&self, segment: &AudioSegment<'_>, path: &Path) -> Vec<String> {
        let mut args: Vec<String> = [
            "-hide_banner",
            "-loglevel",
            "error",
            "-y",
            "-f",
            "f32le",
            "-ar",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        args.push(segment.sample_rate().to_string());
        args.push("-ac".to_string());
        args.push(segment.channels().to_string());
        args.extend(["-i", "pipe:0", "-f", "mp3"].iter().map(|s| s.to_string()));
        if let Some(bitrate) = &self.bitrate {
            args.push("-b:a".to_string());
            args.push(bitrate.clone());
        }
        args.push(path.to_string_lossy().to_string());
        args
    }
}

impl Encoder for FfmpegEncoder {
    fn extension(&self) -> &'static str {
        "mp3"
    }

    fn encode(&self, segment: &AudioSegment<'_>, path: &Path) -> Result<(), AudioError> {
        let args = self.args(segment, path);
        debug!("Running {} {}", self.binary.display(), args.join(" "));

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        let pcm: Vec<u8> = segment
            .samples()
            .iter()
            .flat_map(|sample| sample.to_le_bytes())
            .collect();

        // PCM is written from its own thread while stderr is drained here, so
        // neither pipe can fill up and stall the other. Dropping stdin at the
        // end of the thread is what lets ffmpeg see EOF.
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || -> io::Result<()> {
                stdin.write_all(&pcm)?;
                stdin.flush()
            })
        });

        let output = child.wait_with_output()?;
        let write_result = match writer {
            Some(writer) => writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("ffmpeg stdin writer panicked"))),
            None => Ok(()),
        };

        if !output.status.success() {
            return Err(AudioError::EncoderFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        write_result?;

        Ok(())
    }
}

/// Writes 16 bit PCM WAV files.
#[derive(Clone, Copy, Debug, Default)]
pub struct WavEncoder;

impl Encoder for WavEncoder {
    fn extension(&self) -> &'static str {
        "wav"
    }

    fn encode(&self, segment: &AudioSegment<'_>, path: &Path) -> Result<(), AudioError> {
        let mut writer = WavWriter::create(
            path,
            WavSpec {
                channels: segment.channels(),
                sample_rate: segment.sample_rate(),
                bits_per_sample: 16,
                sample_format: SampleFormat::Int,
            },
        )?;

        for sample in segment.samples() {
            let scaled = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(scaled)?;
        }
        writer.finalize()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{decode_file, DecodedAudio};
    use crate::testutil::audio_test_utils::bursts;

    #[test]
    fn test_wav_encoder_round_trip() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("clip.wav");
        let audio = bursts(8000, 100, &[400], 0, 100);
        let segment = audio.segment(100, 500);

        WavEncoder.encode(&segment, &path).unwrap();

        let decoded = decode_file(&path).unwrap();
        assert_eq!(decoded.channels(), 1);
        assert_eq!(decoded.sample_rate(), 8000);
        assert_eq!(decoded.len_ms(), 400);
        assert!((decoded.samples()[0] - 0.3).abs() < 1e-3);
    }

    #[test]
    fn test_encoder_for_picks_by_extension() {
        let ffmpeg = config::Ffmpeg::default();
        let encoder = encoder_for(Path::new("/tmp/a_string.WAV"), &ffmpeg).unwrap();
        assert_eq!(encoder.extension(), "wav");
    }

    #[test]
    fn test_missing_ffmpeg() {
        let ffmpeg = config::Ffmpeg::new("definitely-not-an-ffmpeg-binary", None);
        let result = FfmpegEncoder::new(&ffmpeg);
        assert!(matches!(result, Err(AudioError::EncoderNotFound(_))));

        let result = encoder_for(Path::new("g_string.mp3"), &ffmpeg);
        assert!(matches!(result, Err(AudioError::EncoderNotFound(_))));
    }

    #[test]
    fn test_ffmpeg_args() {
        let tempdir = tempfile::tempdir().unwrap();
        // Any existing file works as a configured binary path.
        let fake_binary = tempdir.path().join("ffmpeg");
        std::fs::write(&fake_binary, b"").unwrap();
        let ffmpeg = config::Ffmpeg::new(
            fake_binary.to_str().unwrap(),
            Some("192k".to_string()),
        );
        let encoder = FfmpegEncoder::new(&ffmpeg).unwrap();
        assert_eq!(encoder.binary, fake_binary);

        let audio = DecodedAudio::new(vec![0.0; 4000], 2, 2000);
        let args = encoder.args(&audio.segment(0, 1000), Path::new("out.mp3"));
        assert_eq!(
            args,
            vec![
                "-hide_banner",
                "-loglevel",
                "error",
                "-y",
                "-f",
                "f32le",
                "-ar",
                "2000",
                "-ac",
                "2",
                "-i",
                "pipe:0",
                "-f",
                "mp3",
                "-b:a",
                "192k",
                "out.mp3",
            ]
        );
    }

    /// Writes an executable shell script that stands in for ffmpeg.
    #[cfg(unix)]
    fn script_encoder(dir: &Path, name: &str, body: &str) -> FfmpegEncoder {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        FfmpegEncoder::new(&config::Ffmpeg::new(path.to_str().unwrap(), None)).unwrap()
    }

    #[cfg(unix)]
    #[test]
    fn test_ffmpeg_encode_with_script_binaries() {
        let tempdir = tempfile::tempdir().unwrap();
        // All scripts are written before any of them is run.
        // The output path is the last argument; the raw PCM is copied there.
        let copy = script_encoder(
            tempdir.path(),
            "copy-ffmpeg",
            r#"for last; do :; done; cat > "$last""#,
        );
        // Fills stderr well past a pipe buffer before reading any input.
        let chatty = script_encoder(
            tempdir.path(),
            "chatty-ffmpeg",
            "head -c 262144 /dev/zero >&2; cat > /dev/null",
        );
        let failing = script_encoder(
            tempdir.path(),
            "failing-ffmpeg",
            "cat > /dev/null; echo boom >&2; exit 3",
        );
        let early_exit = script_encoder(tempdir.path(), "early-ffmpeg", "echo boom >&2; exit 3");

        let audio = bursts(8000, 0, &[500], 0, 0);
        let path = tempdir.path().join("clip.mp3");
        copy.encode(&audio.segment(0, 500), &path).unwrap();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written.len(), 4000 * 4);
        assert_eq!(written[..4], 0.3f32.to_le_bytes());

        // More PCM than a pipe holds, while the encoder is busy writing stderr.
        let long = bursts(44100, 0, &[1000], 0, 0);
        chatty
            .encode(&long.segment(0, 1000), &tempdir.path().join("long.mp3"))
            .unwrap();

        for encoder in [failing, early_exit] {
            let result = encoder.encode(&long.segment(0, 1000), &path);
            match result {
                Err(AudioError::EncoderFailed { status, stderr }) => {
                    assert!(status.contains('3'), "{}", status);
                    assert_eq!(stderr, "boom");
                }
                other => panic!("unexpected result {:?}", other),
            }
        }
    }

    #[test]
    fn test_ffmpeg_encode_when_available() {
        let ffmpeg = config::Ffmpeg::default();
        let Ok(encoder) = FfmpegEncoder::new(&ffmpeg) else {
            // ffmpeg isn't installed on this machine.
            return;
        };

        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("clip.mp3");
        let audio = bursts(44100, 0, &[500], 0, 0);
        encoder.encode(&audio.segment(0, 500), &path).unwrap();

        let decoded = decode_file(&path).unwrap();
        assert_eq!(decoded.sample_rate(), 44100);
        assert!(decoded.len_ms() > 400);
    }
}
