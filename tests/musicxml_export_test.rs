// End-to-end MIDI -> MusicXML export tests
//
// Fixtures are written with midly, converted, and the output is checked
// structurally with roxmltree.

mod common;

use common::*;
use gayageum_score::{convert_midi_to_musicxml, ConversionSettings, TimeSignature};

fn convert(data: &[u8], settings: &ConversionSettings) -> String {
    convert_midi_to_musicxml(data, settings)
        .expect("conversion should succeed")
        .musicxml
}

#[test]
fn test_two_quarters_at_120_bpm() {
    let data = write_smf(
        TPQ,
        &[
            FixtureTrack::new(vec![note(0, QUARTER, 60), note(QUARTER, QUARTER, 62)])
                .named("Melody")
                .tempo_bpm(120)
                .time_signature(4, 4),
            FixtureTrack::new(chords(4, 3, 48)).named("Chords"),
        ],
    );

    let xml = convert(&data, &ConversionSettings::default());
    let doc = parse_xml(&xml);
    let root = doc.root_element();
    assert_eq!(root.tag_name().name(), "score-partwise");
    assert_eq!(root.attribute("version"), Some("3.1"));

    let part = child(root, "part");
    let measures = elements(part, "measure");
    assert_eq!(measures.len(), 1);
    let first = measures[0];
    assert_eq!(first.attribute("number"), Some("1"));

    let attributes = child(first, "attributes");
    assert_eq!(child_text(attributes, "divisions"), "8");

    let metronome = child(child(child(first, "direction"), "direction-type"), "metronome");
    assert_eq!(child_text(metronome, "beat-unit"), "quarter");
    assert_eq!(child_text(metronome, "per-minute"), "120");

    let notes = elements(first, "note");
    let pitched: Vec<_> = notes.iter().filter(|n| n.children().any(|c| c.has_tag_name("pitch"))).collect();
    assert_eq!(pitched.len(), 2);
    for n in &pitched {
        assert_eq!(child_text(**n, "duration"), "8");
        assert_eq!(child_text(**n, "type"), "quarter");
    }
    assert_eq!(child_text(child(*pitched[0], "pitch"), "step"), "C");
    assert_eq!(child_text(child(*pitched[1], "pitch"), "step"), "D");

    // No padding rest after the last note
    assert_eq!(notes.len(), 2);
}

#[test]
fn test_part_list_and_header() {
    let data = write_smf(TPQ, &[FixtureTrack::new(quarters(4, 67))]);
    let settings = ConversionSettings {
        title: Some("Arirang".to_string()),
        instrument: "25-string gayageum".to_string(),
        ..ConversionSettings::default()
    };
    let xml = convert(&data, &settings);

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
    assert!(xml.contains(
        "<!DOCTYPE score-partwise PUBLIC \"-//Recordare//DTD MusicXML 3.1 Partwise//EN\" \"http://www.musicxml.org/dtds/partwise.dtd\">"
    ));
    assert!(xml.ends_with("</score-partwise>\n"));

    let doc = parse_xml(&xml);
    let root = doc.root_element();
    assert_eq!(child_text(child(root, "work"), "work-title"), "Arirang");

    let score_part = child(child(root, "part-list"), "score-part");
    assert_eq!(score_part.attribute("id"), Some("P1"));
    assert_eq!(child_text(score_part, "part-name"), "25-string gayageum");

    let instrument = child(score_part, "score-instrument");
    assert_eq!(instrument.attribute("id"), Some("P1-I1"));
    assert_eq!(child_text(instrument, "instrument-name"), "25-string gayageum");

    let midi = child(score_part, "midi-instrument");
    assert_eq!(midi.attribute("id"), Some("P1-I1"));
    assert_eq!(child_text(midi, "midi-channel"), "1");
    assert_eq!(child_text(midi, "midi-program"), "0");

    assert_eq!(child(root, "part").attribute("id"), Some("P1"));
}

#[test]
fn test_note_crossing_barline_is_tied() {
    // Dotted half starting on beat 3 of 4/4: 16 units in bar 1, 8 in bar 2
    let data = write_smf(
        TPQ,
        &[FixtureTrack::new(vec![note(0, 2 * QUARTER, 60), note(2 * QUARTER, 3 * QUARTER, 64)])],
    );
    let xml = convert(&data, &ConversionSettings::default());
    let doc = parse_xml(&xml);
    let measures = elements(child(doc.root_element(), "part"), "measure");
    assert_eq!(measures.len(), 2);

    let first_notes = elements(measures[0], "note");
    let second_notes = elements(measures[1], "note");
    assert_eq!(first_notes.len(), 2);
    assert_eq!(second_notes.len(), 1);

    let start = first_notes[1];
    let stop = second_notes[0];
    assert_eq!(child_text(start, "duration"), "16");
    assert_eq!(child_text(stop, "duration"), "8");
    assert_eq!(child(start, "tie").attribute("type"), Some("start"));
    assert_eq!(child(stop, "tie").attribute("type"), Some("stop"));
    assert_eq!(child(child(start, "notations"), "tied").attribute("type"), Some("start"));
    assert_eq!(child(child(stop, "notations"), "tied").attribute("type"), Some("stop"));

    // Only the last measure carries the final barline
    assert!(elements(measures[0], "barline").is_empty());
    let barline = child(measures[1], "barline");
    assert_eq!(barline.attribute("location"), Some("right"));
    assert_eq!(child_text(barline, "bar-style"), "light-heavy");
}

#[test]
fn test_gaps_become_typed_rests() {
    // Leading eighth rest, then a gap of a dotted quarter
    let data = write_smf(
        TPQ,
        &[FixtureTrack::new(vec![
            note(QUARTER / 2, QUARTER, 60),
            note(3 * QUARTER, QUARTER, 62),
        ])],
    );
    let xml = convert(&data, &ConversionSettings::default());
    let doc = parse_xml(&xml);
    let measure = child(child(doc.root_element(), "part"), "measure");
    let notes = elements(measure, "note");

    let rests: Vec<_> = notes
        .iter()
        .filter(|n| n.children().any(|c| c.has_tag_name("rest")))
        .collect();
    assert_eq!(rests.len(), 2);
    assert_eq!(child_text(*rests[0], "duration"), "4");
    assert_eq!(child_text(*rests[0], "type"), "eighth");
    assert_eq!(child_text(*rests[1], "duration"), "12");
    assert_eq!(child_text(*rests[1], "type"), "quarter");
    assert_eq!(elements(*rests[1], "dot").len(), 1);
}

#[test]
fn test_unnotatable_duration_keeps_numeric_duration() {
    // 11 thirty-seconds: no single type/dot combination fits
    let data = write_smf(TPQ, &[FixtureTrack::new(vec![note(0, 11 * 60, 72)])]);
    let xml = convert(&data, &ConversionSettings::default());
    let doc = parse_xml(&xml);
    let measure = child(child(doc.root_element(), "part"), "measure");
    let first = elements(measure, "note")[0];

    assert_eq!(child_text(first, "duration"), "11");
    assert!(elements(first, "type").is_empty());
    assert!(elements(first, "dot").is_empty());
}

#[test]
fn test_black_keys_spelled_as_sharps() {
    let data = write_smf(TPQ, &[FixtureTrack::new(vec![note(0, QUARTER, 66)])]);
    let xml = convert(&data, &ConversionSettings::default());
    let doc = parse_xml(&xml);
    let measure = child(child(doc.root_element(), "part"), "measure");
    let pitch = child(elements(measure, "note")[0], "pitch");

    assert_eq!(child_text(pitch, "step"), "F");
    assert_eq!(child_text(pitch, "alter"), "1");
    assert_eq!(child_text(pitch, "octave"), "4");
}

#[test]
fn test_file_meter_and_fractional_tempo() {
    // 6/8 at 100 BPM written as 600000 us per quarter; override tempo to 97.5
    let data = write_smf(
        TPQ,
        &[FixtureTrack::new(quarters(6, 60)).tempo_bpm(100).time_signature(6, 8)],
    );
    let settings = ConversionSettings {
        tempo_override: Some(97.5),
        ..ConversionSettings::default()
    };
    let result = convert_midi_to_musicxml(&data, &settings).expect("conversion should succeed");
    assert_eq!(result.report.time_signature, TimeSignature::new(6, 8));
    assert_eq!(result.report.measure_count, 2);

    let doc = parse_xml(&result.musicxml);
    let first = child(child(doc.root_element(), "part"), "measure");
    let time = child(child(first, "attributes"), "time");
    assert_eq!(child_text(time, "beats"), "6");
    assert_eq!(child_text(time, "beat-type"), "8");

    let direction = child(first, "direction");
    assert_eq!(direction.attribute("placement"), Some("above"));
    assert_eq!(child(direction, "sound").attribute("tempo"), Some("97.5"));
    let metronome = child(child(direction, "direction-type"), "metronome");
    assert_eq!(child_text(metronome, "per-minute"), "98");
}

#[test]
fn test_finer_grid_changes_divisions() {
    let data = write_smf(TPQ, &[FixtureTrack::new(quarters(2, 60))]);
    let settings = ConversionSettings {
        grid: 64,
        ..ConversionSettings::default()
    };
    let xml = convert(&data, &settings);
    let doc = parse_xml(&xml);
    let measure = child(child(doc.root_element(), "part"), "measure");

    assert_eq!(child_text(child(measure, "attributes"), "divisions"), "16");
    assert_eq!(child_text(elements(measure, "note")[0], "duration"), "16");
}

#[test]
fn test_output_is_byte_stable() {
    let data = write_smf(TPQ, &[FixtureTrack::new(chords(8, 2, 55)).named("Duet")]);
    let first = convert(&data, &ConversionSettings::default());
    let second = convert(&data, &ConversionSettings::default());
    assert_eq!(first, second);
}
