//! Command-line argument parsing for `midi-to-gayageum`
//!
//! Flags accept both `--flag value` and `--flag=value`.

use std::path::{Path, PathBuf};

use super::defaults::{OUTPUT_EXTENSION, OUTPUT_SUFFIX};
use super::ConversionSettings;
use crate::errors::{ConversionError, Result};
use crate::job;

pub const USAGE: &str = "\
Convert MIDI -> Gayageum solo MusicXML (staff notation).

Usage: midi-to-gayageum <MIDI> [options]

Arguments:
  <MIDI>                 input .mid/.midi file

Options:
  -o, --out <PATH>       output .musicxml path (default: <MIDI stem>_gayageum.musicxml)
      --track-index <N>  force track index (0-based)
      --track-name <S>   choose the first track whose name contains S
      --tempo <BPM>      tempo override (default: from MIDI, else 120)
      --time <N/D>       time signature override (default: from MIDI, else 4/4)
      --grid <N>         quantize grid as note denominator, divisible by 4 (default 32)
      --title <TEXT>     work title
      --instrument <S>   instrument name shown in the score (default \"Gayageum (solo)\")
      --job-id <ID>      write to $LOCAL_STORAGE_ROOT/output/<ID>/score.musicxml and
                         print a callback payload
  -h, --help             print this help
";

/// What the binary should do
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    Help,
    Convert(CliArgs),
}

/// Parsed arguments for a conversion run
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub job_id: Option<String>,
    pub settings: ConversionSettings,
}

impl CliArgs {
    /// Parse arguments, not including the program name
    pub fn parse<I, S>(args: I) -> Result<CliCommand>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let mut input: Option<PathBuf> = None;
        let mut output: Option<PathBuf> = None;
        let mut job_id: Option<String> = None;
        let mut settings = ConversionSettings::default();

        while let Some(arg) = args.next() {
            if arg == "-h" || arg == "--help" {
                return Ok(CliCommand::Help);
            }

            if !arg.starts_with('-') || arg == "-" {
                if let Some(first) = &input {
                    return Err(invalid(format!(
                        "unexpected argument '{}' (input is already '{}')",
                        arg,
                        first.display()
                    )));
                }
                input = Some(PathBuf::from(arg));
                continue;
            }

            let (flag, inline_value) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => {
                    (flag.to_string(), Some(value.to_string()))
                }
                _ => (arg.clone(), None),
            };
            let mut value = || -> Result<String> {
                match inline_value.clone() {
                    Some(value) => Ok(value),
                    None => args
                        .next()
                        .ok_or_else(|| invalid(format!("{} requires a value", flag))),
                }
            };

            match flag.as_str() {
                "-o" | "--out" => output = Some(PathBuf::from(value()?)),
                "--track-index" => {
                    settings.track_index = Some(parse_number(&flag, &value()?)?);
                }
                "--track-name" => settings.track_name = Some(value()?),
                "--tempo" => settings.tempo_override = Some(parse_number(&flag, &value()?)?),
                "--time" => settings.time_override = Some(value()?.parse()?),
                "--grid" => settings.grid = parse_number(&flag, &value()?)?,
                "--title" => settings.title = Some(value()?),
                "--instrument" => settings.instrument = value()?,
                "--job-id" => job_id = Some(value()?),
                _ => return Err(invalid(format!("unknown option '{}'", flag))),
            }
        }

        let input = input.ok_or_else(|| invalid("missing input MIDI file".to_string()))?;
        if output.is_some() && job_id.is_some() {
            return Err(invalid(
                "--out and --job-id cannot be used together".to_string(),
            ));
        }
        settings.validate()?;

        Ok(CliCommand::Convert(CliArgs {
            input,
            output,
            job_id,
            settings,
        }))
    }

    /// Where the score is written.
    ///
    /// Job runs go under `storage_root`; otherwise `--out`, else the default
    /// path next to the input.
    pub fn output_path(&self, storage_root: Option<&str>) -> Result<PathBuf> {
        if let Some(job_id) = &self.job_id {
            let root = storage_root.filter(|r| !r.is_empty()).ok_or_else(|| {
                invalid(format!(
                    "{} is not set (required by --job-id)",
                    job::STORAGE_ROOT_ENV
                ))
            })?;
            return job::job_output_path(Path::new(root), job_id);
        }
        Ok(self
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input)))
    }
}

/// `song.mid` -> `song_gayageum.musicxml`, in the same directory
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut path = input.with_extension("").into_os_string();
    path.push(OUTPUT_SUFFIX);
    path.push(".");
    path.push(OUTPUT_EXTENSION);
    PathBuf::from(path)
}

fn parse_number<T: std::str::FromStr>(flag: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| invalid(format!("{} expects a number, got '{}'", flag, raw)))
}

fn invalid(message: String) -> ConversionError {
    ConversionError::InvalidConfiguration(message)
}
