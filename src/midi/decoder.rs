use std::collections::{BTreeMap, VecDeque};

use log::{debug, trace, warn};

use super::model::{DecodedSmf, NoteEvent, TrackMeta};
use super::varlen::read_varlen;
use super::{DecodeError, Result};
use crate::models::TimeSignature;

const HEADER_TAG: &[u8; 4] = b"MThd";
const TRACK_TAG: &[u8; 4] = b"MTrk";

const META_EVENT: u8 = 0xFF;
const SYSEX_START: u8 = 0xF0;
const SYSEX_ESCAPE: u8 = 0xF7;

const META_TRACK_NAME: u8 = 0x03;
const META_TEMPO: u8 = 0x51;
const META_TIME_SIGNATURE: u8 = 0x58;

/// Decode a Standard MIDI File into timing, track metadata and notes.
///
/// Every track must decode cleanly; a single malformed track fails the whole
/// file.
pub fn decode_smf(data: &[u8]) -> Result<DecodedSmf> {
    let mut reader = ByteReader::new(data);

    reader.expect_tag(HEADER_TAG)?;
    let header_len = reader.read_u32()?;
    if header_len < 6 {
        return Err(DecodeError::ShortHeader(header_len));
    }
    let header_end = reader.position() + header_len as usize;
    let format = reader.read_u16()?;
    let track_count = reader.read_u16()?;
    let division = reader.read_u16()?;
    reader.seek(header_end);

    if division & 0x8000 != 0 {
        return Err(DecodeError::SmpteDivision(division));
    }
    if division == 0 {
        return Err(DecodeError::ZeroDivision);
    }

    debug!(
        "SMF header: format {}, {} tracks, {} ticks per quarter",
        format, track_count, division
    );

    let mut tracks = Vec::with_capacity(track_count as usize);
    let mut notes = Vec::new();

    for track_index in 0..track_count as usize {
        reader.expect_tag(TRACK_TAG)?;
        let track_len = reader.read_u32()? as usize;
        let track_end = reader.position() + track_len;

        let mut track = TrackDecoder::new(track_index);
        while reader.position() < track_end {
            track.decode_event(&mut reader)?;
        }
        if reader.position() != track_end {
            warn!(
                "Track {} overran its declared length by {} bytes",
                track_index,
                reader.position() - track_end
            );
        }
        reader.seek(track_end);

        let (meta, track_notes) = track.finish();
        debug!(
            "Track {} ({}): {} notes",
            track_index,
            meta.track_name.as_deref().unwrap_or("unnamed"),
            track_notes.len()
        );
        tracks.push(meta);
        notes.extend(track_notes);
    }

    Ok(DecodedSmf {
        format,
        ticks_per_quarter: division,
        tracks,
        notes,
    })
}

/// Bounds-checked big-endian cursor over the whole file
struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    fn peek_u8(&self) -> Result<u8> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or(DecodeError::Truncated { offset: self.pos })
    }

    fn read_u8(&mut self) -> Result<u8> {
        let byte = self.peek_u8()?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(DecodeError::Truncated {
                offset: self.data.len().max(self.pos),
            })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_varlen(&mut self) -> Result<u64> {
        let (value, next) = read_varlen(self.data, self.pos)?;
        self.pos = next;
        Ok(value)
    }

    fn expect_tag(&mut self, tag: &[u8; 4]) -> Result<()> {
        let offset = self.pos;
        let found = self.read_bytes(4)?;
        if found != tag {
            return Err(DecodeError::BadTag {
                expected: String::from_utf8_lossy(tag).into_owned(),
                found: String::from_utf8_lossy(found).into_owned(),
                offset,
            });
        }
        Ok(())
    }
}

/// Open notes are keyed by (channel, pitch)
type OpenKey = (u8, u8);

/// (start_tick, velocity) of a note that has not been released yet
type OpenNote = (u64, u8);

/// Event state for a single MTrk chunk
struct TrackDecoder {
    track_index: usize,
    tick: u64,
    running_status: Option<u8>,
    open: BTreeMap<OpenKey, VecDeque<OpenNote>>,
    meta: TrackMeta,
    notes: Vec<NoteEvent>,
}

impl TrackDecoder {
    fn new(track_index: usize) -> Self {
        Self {
            track_index,
            tick: 0,
            running_status: None,
            open: BTreeMap::new(),
            meta: TrackMeta::default(),
            notes: Vec::new(),
        }
    }

    fn decode_event(&mut self, reader: &mut ByteReader) -> Result<()> {
        let delta_offset = reader.position();
        let delta = reader.read_varlen()?;
        self.tick = self
            .tick
            .checked_add(delta)
            .ok_or(DecodeError::TickOverflow { offset: delta_offset })?;

        let status_offset = reader.position();
        let next = reader.peek_u8()?;
        let status = if next < 0x80 {
            self.running_status
                .ok_or(DecodeError::RunningStatusWithoutStatus { offset: status_offset })?
        } else {
            reader.read_u8()?;
            self.running_status = Some(next);
            next
        };

        match status {
            META_EVENT => {
                let meta_type = reader.read_u8()?;
                let len = reader.read_varlen()? as usize;
                let payload = reader.read_bytes(len)?;
                self.running_status = None;
                self.apply_meta(meta_type, payload);
            }
            SYSEX_START | SYSEX_ESCAPE => {
                let len = reader.read_varlen()? as usize;
                reader.read_bytes(len)?;
                self.running_status = None;
            }
            _ => {
                let channel = status & 0x0F;
                match status & 0xF0 {
                    0x80 => {
                        let pitch = reader.read_u8()?;
                        reader.read_u8()?;
                        self.close_note(channel, pitch);
                    }
                    0x90 => {
                        let pitch = reader.read_u8()?;
                        let velocity = reader.read_u8()?;
                        if velocity == 0 {
                            self.close_note(channel, pitch);
                        } else {
                            self.open
                                .entry((channel, pitch))
                                .or_default()
                                .push_back((self.tick, velocity));
                        }
                    }
                    0xA0 | 0xB0 | 0xE0 => {
                        reader.read_bytes(2)?;
                    }
                    0xC0 | 0xD0 => {
                        reader.read_u8()?;
                    }
                    _ => {
                        return Err(DecodeError::UnknownStatus {
                            status,
                            offset: status_offset,
                        })
                    }
                }
            }
        }
        Ok(())
    }

    fn apply_meta(&mut self, meta_type: u8, payload: &[u8]) {
        match meta_type {
            META_TRACK_NAME => {
                if self.meta.track_name.is_none() {
                    self.meta.track_name = Some(String::from_utf8_lossy(payload).into_owned());
                }
            }
            META_TEMPO if payload.len() == 3 => {
                if self.meta.tempo_us_per_quarter.is_none() {
                    let tempo = u32::from(payload[0]) << 16
                        | u32::from(payload[1]) << 8
                        | u32::from(payload[2]);
                    if tempo == 0 {
                        warn!("Track {}: ignoring tempo of 0 us per quarter", self.track_index);
                    } else {
                        self.meta.tempo_us_per_quarter = Some(tempo);
                    }
                }
            }
            META_TIME_SIGNATURE if payload.len() >= 2 => {
                if self.meta.time_signature.is_none() {
                    match 1u32.checked_shl(u32::from(payload[1])) {
                        Some(beat_type) => {
                            self.meta.time_signature =
                                Some(TimeSignature::new(u32::from(payload[0]), beat_type));
                        }
                        None => warn!(
                            "Track {}: ignoring time signature with denominator exponent {}",
                            self.track_index, payload[1]
                        ),
                    }
                }
            }
            _ => {}
        }
    }

    fn close_note(&mut self, channel: u8, pitch: u8) {
        let opened = self
            .open
            .get_mut(&(channel, pitch))
            .and_then(|queue| queue.pop_front());

        match opened {
            Some((start_tick, velocity)) => self.notes.push(NoteEvent {
                pitch,
                start_tick,
                end_tick: self.tick,
                velocity,
                channel,
                track_index: self.track_index,
            }),
            None => trace!(
                "Track {}: note-off for channel {} pitch {} at tick {} with no open note",
                self.track_index,
                channel,
                pitch,
                self.tick
            ),
        }
    }

    /// Close anything still sounding at the track's last tick
    fn finish(mut self) -> (TrackMeta, Vec<NoteEvent>) {
        let end_tick = self.tick;
        for ((channel, pitch), queue) in std::mem::take(&mut self.open) {
            for (start_tick, velocity) in queue {
                self.notes.push(NoteEvent {
                    pitch,
                    start_tick,
                    end_tick,
                    velocity,
                    channel,
                    track_index: self.track_index,
                });
            }
        }
        (self.meta, self.notes)
    }
}
