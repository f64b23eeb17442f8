use std::env;
use std::path::Path;
use std::process::ExitCode;

use log::{debug, error};

use gayageum_score::config::cli::USAGE;
use gayageum_score::config::{CliArgs, CliCommand};
use gayageum_score::job::{self, CallbackPayload};
use gayageum_score::{convert_file, ConversionError, ConversionReport};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let command = match CliArgs::parse(env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("error: {}", err);
            eprintln!();
            eprint!("{}", USAGE);
            return ExitCode::from(2);
        }
    };

    match command {
        CliCommand::Help => {
            print!("{}", USAGE);
            ExitCode::SUCCESS
        }
        CliCommand::Convert(args) => run(&args),
    }
}

fn run(args: &CliArgs) -> ExitCode {
    let storage_root = env::var(job::STORAGE_ROOT_ENV).ok();
    let outcome = args
        .output_path(storage_root.as_deref())
        .and_then(|output| {
            let report = convert_file(&args.input, &output, &args.settings)?;
            Ok((output, report))
        });

    match outcome {
        Ok((output, report)) => {
            print_summary(args, &output, &report);
            if let Some(job_id) = &args.job_id {
                match job::job_output_key(job_id) {
                    Ok(key) => print_payload(&CallbackPayload::completed(key)),
                    Err(err) => print_payload(&CallbackPayload::failed(&err)),
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_failure(&err);
            if args.job_id.is_some() {
                print_payload(&CallbackPayload::failed(&err));
            }
            ExitCode::FAILURE
        }
    }
}

fn report_failure(err: &ConversionError) {
    debug!("Conversion failed: {:?}", err);
    eprintln!("error [{}]: {}", err.kind(), err);
}

fn print_payload(payload: &CallbackPayload) {
    match payload.to_json() {
        Ok(json) => println!("{}", json),
        Err(err) => error!("Could not encode callback payload: {}", err),
    }
}

fn print_summary(args: &CliArgs, output: &Path, report: &ConversionReport) {
    println!("=== MIDI -> MusicXML (Gayageum solo) ===");
    println!("Input MIDI        : {}", args.input.display());
    println!(
        "Chosen track      : {} ({})",
        report.track_index, report.track_name
    );
    println!(
        "Tempo / Time      : {:.2} BPM, {}",
        report.tempo_bpm, report.time_signature
    );
    println!(
        "Quantize grid     : 1/{} (divisions_per_quarter={})",
        report.grid, report.divisions_per_quarter
    );
    println!("Pitch range       : {}", report.pitch_range_label());
    println!(
        "Score             : {} measures, {} notes, {} rests",
        report.measure_count, report.note_count, report.rest_count
    );
    println!("Output MusicXML   : {}", output.display());
    println!("Open the .musicxml in MuseScore and export to PDF if needed.");
}
