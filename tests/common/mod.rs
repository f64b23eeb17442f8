// Shared SMF fixtures for integration tests
//
// Well-formed files are written with midly; malformed ones are assembled
// byte by byte.

#![allow(dead_code)]

use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};

pub const TPQ: u16 = 480;
pub const QUARTER: u32 = TPQ as u32;

/// Note in absolute ticks
#[derive(Debug, Clone, Copy)]
pub struct FixtureNote {
    pub start: u32,
    pub duration: u32,
    pub pitch: u8,
    pub velocity: u8,
    pub channel: u8,
}

pub fn note(start: u32, duration: u32, pitch: u8) -> FixtureNote {
    FixtureNote {
        start,
        duration,
        pitch,
        velocity: 100,
        channel: 0,
    }
}

impl FixtureNote {
    pub fn velocity(mut self, velocity: u8) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FixtureTrack {
    pub name: Option<String>,
    pub tempo_us: Option<u32>,
    pub time_signature: Option<(u8, u8)>,
    pub notes: Vec<FixtureNote>,
}

impl FixtureTrack {
    pub fn new(notes: Vec<FixtureNote>) -> Self {
        Self {
            notes,
            ..Self::default()
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn tempo_bpm(mut self, bpm: u32) -> Self {
        self.tempo_us = Some(60_000_000 / bpm);
        self
    }

    pub fn time_signature(mut self, beats: u8, beat_type: u8) -> Self {
        self.time_signature = Some((beats, beat_type));
        self
    }
}

/// `count` back-to-back quarter notes
pub fn quarters(count: u32, pitch: u8) -> Vec<FixtureNote> {
    (0..count).map(|i| note(i * QUARTER, QUARTER, pitch)).collect()
}

/// `count` quarter-note chords of `size` notes each
pub fn chords(count: u32, size: u8, root: u8) -> Vec<FixtureNote> {
    (0..count)
        .flat_map(|i| (0..size).map(move |k| note(i * QUARTER, QUARTER, root + k * 4)))
        .collect()
}

/// Write a format 1 SMF with the given tracks
pub fn write_smf(tpq: u16, tracks: &[FixtureTrack]) -> Vec<u8> {
    let smf = Smf {
        header: Header {
            format: Format::Parallel,
            timing: Timing::Metrical(tpq.into()),
        },
        tracks: tracks.iter().map(build_track).collect(),
    };

    let mut out = Vec::new();
    smf.write(&mut out).expect("fixture SMF should serialize");
    out
}

fn build_track(track: &FixtureTrack) -> Track<'_> {
    // (absolute tick, note-offs before note-ons at the same tick, event)
    let mut timed: Vec<(u32, u8, TrackEventKind<'_>)> = Vec::new();

    if let Some(name) = &track.name {
        timed.push((0, 0, TrackEventKind::Meta(MetaMessage::TrackName(name.as_bytes()))));
    }
    if let Some(us) = track.tempo_us {
        timed.push((0, 0, TrackEventKind::Meta(MetaMessage::Tempo(us.into()))));
    }
    if let Some((beats, beat_type)) = track.time_signature {
        let power = beat_type.trailing_zeros() as u8;
        timed.push((
            0,
            0,
            TrackEventKind::Meta(MetaMessage::TimeSignature(beats, power, 24, 8)),
        ));
    }

    for n in &track.notes {
        timed.push((
            n.start,
            2,
            TrackEventKind::Midi {
                channel: n.channel.into(),
                message: MidiMessage::NoteOn {
                    key: n.pitch.into(),
                    vel: n.velocity.into(),
                },
            },
        ));
        timed.push((
            n.start + n.duration,
            1,
            TrackEventKind::Midi {
                channel: n.channel.into(),
                message: MidiMessage::NoteOff {
                    key: n.pitch.into(),
                    vel: 0.into(),
                },
            },
        ));
    }

    timed.sort_by_key(|(tick, order, _)| (*tick, *order));

    let mut events = Vec::with_capacity(timed.len() + 1);
    let mut previous = 0u32;
    for (tick, _, kind) in timed {
        events.push(TrackEvent {
            delta: (tick - previous).into(),
            kind,
        });
        previous = tick;
    }
    events.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    events
}

/// Hand-assembled SMF for inputs midly refuses to write
pub fn raw_smf(division: u16, tracks: &[Vec<u8>]) -> Vec<u8> {
    let mut out = b"MThd".to_vec();
    out.extend_from_slice(&6u32.to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    out.extend_from_slice(&division.to_be_bytes());
    for track in tracks {
        out.extend_from_slice(b"MTrk");
        out.extend_from_slice(&(track.len() as u32).to_be_bytes());
        out.extend_from_slice(track);
    }
    out
}

/// Parse emitted MusicXML (the DOCTYPE needs DTD support enabled)
pub fn parse_xml(xml: &str) -> roxmltree::Document<'_> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    roxmltree::Document::parse_with_options(xml, options).expect("output should be well-formed XML")
}

pub fn child<'a, 'input>(node: roxmltree::Node<'a, 'input>, name: &str) -> roxmltree::Node<'a, 'input> {
    node.children()
        .find(|c| c.has_tag_name(name))
        .unwrap_or_else(|| panic!("<{}> has no <{}> child", node.tag_name().name(), name))
}

pub fn child_text<'a>(node: roxmltree::Node<'a, '_>, name: &str) -> &'a str {
    child(node, name).text().unwrap_or("")
}

pub fn elements<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    name: &'static str,
) -> Vec<roxmltree::Node<'a, 'input>> {
    node.children().filter(|c| c.has_tag_name(name)).collect()
}
