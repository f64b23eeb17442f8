//! MusicXML emitter - consumes a `ScoreDocument` and produces MusicXML text
//!
//! Output is MusicXML 3.1 partwise with two-space indentation. Element order
//! inside `<note>` follows the schema: pitch or rest, tie, duration, type,
//! dot, notations.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::errors::{ConversionError, Result};
use crate::ir::*;

const DOCTYPE: &str = r#"score-partwise PUBLIC "-//Recordare//DTD MusicXML 3.1 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd""#;

const MUSICXML_VERSION: &str = "3.1";

/// Thin element-level layer over the quick-xml writer
struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Start(element))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Empty(element))?;
        Ok(())
    }

    /// `<name>text</name>` on one line
    fn text(&mut self, name: &str, text: &str) -> Result<()> {
        self.start(name, &[])?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    fn finish(self) -> Result<String> {
        let mut xml = String::from_utf8(self.writer.into_inner())
            .map_err(|e| ConversionError::Serialization(e.to_string()))?;
        xml.push('\n');
        Ok(xml)
    }
}

/// Render a score as a complete MusicXML document
pub fn emit_musicxml(doc: &ScoreDocument) -> Result<String> {
    let mut out = XmlOut::new();

    out.writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    out.writer
        .write_event(Event::DocType(BytesText::from_escaped(DOCTYPE)))?;

    out.start("score-partwise", &[("version", MUSICXML_VERSION)])?;

    out.start("work", &[])?;
    out.text("work-title", &doc.title)?;
    out.end("work")?;

    emit_part_list(&mut out, &doc.part)?;

    out.start("part", &[("id", doc.part.id.as_str())])?;
    for measure in &doc.measures {
        emit_measure(&mut out, measure)?;
    }
    out.end("part")?;

    out.end("score-partwise")?;
    out.finish()
}

fn emit_part_list(out: &mut XmlOut, part: &PartInfo) -> Result<()> {
    out.start("part-list", &[])?;
    out.start("score-part", &[("id", part.id.as_str())])?;
    out.text("part-name", &part.name)?;

    out.start("score-instrument", &[("id", part.instrument_id.as_str())])?;
    out.text("instrument-name", &part.instrument_name)?;
    out.end("score-instrument")?;

    out.start("midi-instrument", &[("id", part.instrument_id.as_str())])?;
    out.text("midi-channel", &part.midi_channel.to_string())?;
    out.text("midi-program", &part.midi_program.to_string())?;
    out.end("midi-instrument")?;

    out.end("score-part")?;
    out.end("part-list")
}

fn emit_measure(out: &mut XmlOut, measure: &Measure) -> Result<()> {
    let number = measure.number.to_string();
    out.start("measure", &[("number", number.as_str())])?;

    if let Some(attributes) = &measure.attributes {
        emit_attributes(out, attributes)?;
    }
    if let Some(direction) = &measure.direction {
        emit_direction(out, direction)?;
    }
    for notation in &measure.notations {
        emit_notation(out, notation)?;
    }
    if let Some(barline) = &measure.barline {
        out.start("barline", &[("location", barline.location)])?;
        out.text("bar-style", barline.bar_style)?;
        out.end("barline")?;
    }

    out.end("measure")
}

fn emit_attributes(out: &mut XmlOut, attributes: &MeasureAttributes) -> Result<()> {
    out.start("attributes", &[])?;
    out.text("divisions", &attributes.divisions.to_string())?;

    out.start("time", &[])?;
    out.text("beats", &attributes.time.beats.to_string())?;
    out.text("beat-type", &attributes.time.beat_type.to_string())?;
    out.end("time")?;

    out.start("clef", &[])?;
    out.text("sign", attributes.clef.sign)?;
    out.text("line", &attributes.clef.line.to_string())?;
    out.end("clef")?;

    out.end("attributes")
}

fn emit_direction(out: &mut XmlOut, direction: &TempoDirection) -> Result<()> {
    out.start("direction", &[("placement", "above")])?;
    out.start("direction-type", &[])?;
    out.start("metronome", &[])?;
    out.text("beat-unit", direction.beat_unit.xml_name())?;
    out.text("per-minute", &direction.per_minute.to_string())?;
    out.end("metronome")?;
    out.end("direction-type")?;

    let tempo = format_tempo(direction.sound_tempo);
    out.empty("sound", &[("tempo", tempo.as_str())])?;
    out.end("direction")
}

fn emit_notation(out: &mut XmlOut, notation: &Notation) -> Result<()> {
    out.start("note", &[])?;
    match notation {
        Notation::Rest { duration, notated } => {
            out.empty("rest", &[])?;
            out.text("duration", &duration.to_string())?;
            emit_type(out, notated)?;
        }
        Notation::Note {
            pitch,
            duration,
            notated,
            tie_start,
            tie_stop,
            ..
        } => {
            emit_pitch(out, pitch)?;
            if *tie_start {
                out.empty("tie", &[("type", "start")])?;
            }
            if *tie_stop {
                out.empty("tie", &[("type", "stop")])?;
            }
            out.text("duration", &duration.to_string())?;
            emit_type(out, notated)?;

            if *tie_start || *tie_stop {
                out.start("notations", &[])?;
                if *tie_start {
                    out.empty("tied", &[("type", "start")])?;
                }
                if *tie_stop {
                    out.empty("tied", &[("type", "stop")])?;
                }
                out.end("notations")?;
            }
        }
    }
    out.end("note")
}

fn emit_pitch(out: &mut XmlOut, pitch: &PitchInfo) -> Result<()> {
    out.start("pitch", &[])?;
    out.text("step", pitch.step)?;
    if pitch.alter != 0 {
        out.text("alter", &pitch.alter.to_string())?;
    }
    out.text("octave", &pitch.octave.to_string())?;
    out.end("pitch")
}

fn emit_type(out: &mut XmlOut, notated: &Option<NotatedType>) -> Result<()> {
    if let Some(notated) = notated {
        out.text("type", notated.note_type.xml_name())?;
        for _ in 0..notated.dots {
            out.empty("dot", &[])?;
        }
    }
    Ok(())
}

/// Tempo for `<sound tempo>`: whole numbers keep one decimal (`120.0`)
fn format_tempo(bpm: f64) -> String {
    if bpm.fract() == 0.0 {
        format!("{:.1}", bpm)
    } else {
        format!("{}", bpm)
    }
}
