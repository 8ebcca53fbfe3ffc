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
use std::fs::File;
use std::path::Path;

use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, Packet};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;
use symphonia::default::{get_codecs, get_probe};
use tracing::{debug, info};

use super::error::AudioError;
use super::DecodedAudio;

/// Decodes an entire audio file (MP3, WAV, FLAC, etc.) into memory.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<DecodedAudio, AudioError> {
    let path = path.as_ref();
    info!(path = ?path, "Loading audio file");

    // Include the path in the error so the user sees which file failed.
    let file = File::open(path).map_err(|e| {
        AudioError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    // Give the format registry a hint from the extension.
    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }

    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts: FormatOptions = Default::default();
    let probed = get_probe().format(&hint, mss, &fmt_opts, &meta_opts)?;
    let mut format_reader = probed.format;

    let track = format_reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AudioError::NoAudioTrack(path.to_path_buf()))?;

    let track_id = track.id;
    let params = track.codec_params.clone();
    let sample_rate = params
        .sample_rate
        .ok_or_else(|| AudioError::MissingSampleRate(path.to_path_buf()))?;

    let decoder_opts: DecoderOptions = Default::default();
    let mut decoder = get_codecs().make(&params, &decoder_opts)?;

    // Container metadata is preferred, but some formats only reveal the channel
    // count once the first packet is decoded.
    let mut channels = params.channels.map(|c| c.count()).unwrap_or(0);
    let mut samples = Vec::new();
    while let Some((decoded, decoded_channels)) =
        read_and_decode_next_packet_for_track(format_reader.as_mut(), decoder.as_mut(), track_id)?
    {
        if channels == 0 {
            channels = decoded_channels;
        }
        samples.extend_from_slice(&decoded);
    }

    if channels == 0 {
        return Err(AudioError::NoAudioTrack(path.to_path_buf()));
    }
    if samples.is_empty() {
        return Err(AudioError::EmptyAudio(path.to_path_buf()));
    }

    let audio = DecodedAudio::new(samples, channels as u16, sample_rate);
    info!(
        path = ?path,
        channels = audio.channels(),
        sample_rate = audio.sample_rate(),
        duration = ?audio.duration(),
        "Decoded audio file"
    );
    Ok(audio)
}

/// Reads the next packet. `Ok(None)` signals the end of the stream.
fn read_next_packet(format_reader: &mut dyn FormatReader) -> Result<Option<Packet>, AudioError> {
    match format_reader.next_packet() {
        Ok(packet) => Ok(Some(packet)),
        Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            Ok(None)
        }
        // Some decoders return DecodeError at EOF instead of IoError.
        Err(SymphoniaError::DecodeError(_)) => Ok(None),
        Err(e) => Err(AudioError::Symphonia(e)),
    }
}

/// Reads and decodes the next packet for the given track, resetting the decoder when asked to.
/// Returns the interleaved samples and the channel count observed in the decoded buffer.
fn read_and_decode_next_packet_for_track(
    format_reader: &mut dyn FormatReader,
    decoder: &mut dyn Decoder,
    track_id: u32,
) -> Result<Option<(Vec<f32>, usize)>, AudioError> {
    loop {
        let packet = match read_next_packet(format_reader) {
            Ok(Some(packet)) => packet,
            Ok(None) => return Ok(None),
            Err(AudioError::Symphonia(SymphoniaError::ResetRequired)) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(e),
        };
        if packet.track_id() != track_id {
            continue;
        }
        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                decoder.decode(&packet)?
            }
            // A corrupt frame in the middle of an MP3 is skipped, not fatal.
            Err(SymphoniaError::DecodeError(e)) => {
                debug!(error = %e, "Skipping undecodable packet");
                continue;
            }
            Err(e) => return Err(AudioError::Symphonia(e)),
        };
        let (samples, channels) = decode_buffer_to_f32(decoded);
        // Header packets decode to zero frames.
        if channels > 0 && !samples.is_empty() {
            return Ok(Some((samples, channels)));
        }
    }
}

/// Converts a decoded buffer to interleaved f32 samples.
fn decode_buffer_to_f32(decoded: AudioBufferRef) -> (Vec<f32>, usize) {
    match decoded {
        AudioBufferRef::F32(buf) => interleave_planar_samples(&buf, |sample| sample),
        AudioBufferRef::F64(buf) => interleave_planar_samples(&buf, |sample| sample as f32),
        AudioBufferRef::S8(buf) => interleave_planar_samples(&buf, scale_s8),
        AudioBufferRef::S16(buf) => interleave_planar_samples(&buf, scale_s16),
        AudioBufferRef::S24(buf) => interleave_planar_samples(&buf, |sample| {
            scale_s24(sample.inner())
        }),
        AudioBufferRef::S32(buf) => interleave_planar_samples(&buf, scale_s32),
        AudioBufferRef::U8(buf) => interleave_planar_samples(&buf, scale_u8),
        AudioBufferRef::U16(buf) => interleave_planar_samples(&buf, scale_u16),
        AudioBufferRef::U24(buf) => interleave_planar_samples(&buf, |sample| {
            scale_u24(sample.inner())
        }),
        AudioBufferRef::U32(buf) => interleave_planar_samples(&buf, scale_u32),
    }
}

fn interleave_planar_samples<T, F>(buf: &AudioBuffer<T>, convert: F) -> (Vec<f32>, usize)
where
    T: Sample,
    F: Fn(T) -> f32,
{
    let frames = buf.frames();
    let channels = buf.spec().channels.count();
    let planes = buf.planes();
    let mut samples = Vec::with_capacity(frames * channels);
    for frame_idx in 0..frames {
        for plane in planes.planes().iter().take(channels) {
            samples.push(convert(plane[frame_idx]));
        }
    }
    (samples, channels)
}

#[inline]
pub(crate) fn scale_s8(sample: i8) -> f32 {
    sample as f32 / (1i64 << 7) as f32
}

#[inline]
pub(crate) fn scale_s16(sample: i16) -> f32 {
    sample as f32 / (1i64 << 15) as f32
}

#[inline]
pub(crate) fn scale_s24(sample: i32) -> f32 {
    sample as f32 / (1i64 << 23) as f32
}

#[inline]
pub(crate) fn scale_s32(sample: i32) -> f32 {
    sample as f32 / (1i64 << 31) as f32
}

#[inline]
pub(crate) fn scale_u8(sample: u8) -> f32 {
    (sample as f32 / u8::MAX as f32) * 2.0 - 1.0
}

#[inline]
pub(crate) fn scale_u16(sample: u16) -> f32 {
    (sample as f32 / u16::MAX as f32) * 2.0 - 1.0
}

#[inline]
pub(crate) fn scale_u24(sample: u32) -> f32 {
    let max = (1u32 << 24) - 1;
    (sample as f32 / max as f32) * 2.0 - 1.0
}

#[inline]
pub(crate) fn scale_u32(sample: u32) -> f32 {
    (sample as f32 / u32::MAX as f32) * 2.0 - 1.0
}
