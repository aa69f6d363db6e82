use anyhow::{bail, Context, Result};
use clap::Parser;
use reality_rom_order::{create_sink, detect, open_source, Config, Converter, RomOrdering};
use std::fs;
use std::io::{self, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Convert N64 ROM images between the z64, n64 and v64 byte orderings
#[derive(Parser)]
#[command(name = "rom-convert", version)]
struct Args {
    /// ROM image to read
    input: PathBuf,

    /// Where to write the converted image. Its extension picks the target
    /// format unless --to is given
    output: Option<PathBuf>,

    /// Target format: z64, n64 or v64
    #[arg(short, long, requires = "output", conflicts_with = "detect")]
    to: Option<RomOrdering>,

    /// Only print the format of INPUT
    #[arg(short, long)]
    detect: bool,

    /// Log each step
    #[arg(short, long)]
    verbose: bool,
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Picks the format to write, from `--to` or the output's extension.
fn target(to: Option<RomOrdering>, output: &Path, from: RomOrdering) -> Result<RomOrdering> {
    let to = match to.or_else(|| RomOrdering::from_path(output)) {
        Some(to) => to,
        None => bail!(
            "can't tell the target format from {}, pass --to z64, n64 or v64",
            output.display()
        ),
    };

    if from == to {
        bail!("input is already {}", from);
    }

    Ok(to)
}

fn check_output(input: &Path, output: &Path) -> Result<()> {
    if same_file(input, output) {
        bail!("won't overwrite {} in place", input.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if args.verbose { "debug" } else { "info" })
        }))
        .with_writer(io::stderr)
        .init();

    let mut input = open_source(&args.input)?;
    let from = detect(&mut input).with_context(|| args.input.display().to_string())?;

    let output = match &args.output {
        Some(output) if !args.detect => output,
        _ => {
            println!("{}: {}", args.input.display(), from);
            return Ok(());
        }
    };

    let to = target(args.to, output, from)
        .with_context(|| args.input.display().to_string())?;

    check_output(&args.input, output)?;

    let converter = Converter::from_config(&Config::default())?;
    let mut sink = create_sink(output)?;

    input.seek(SeekFrom::Start(0))?;

    let report = converter
        .convert(from, to, &mut input, &mut sink)
        .with_context(|| format!("converting to {}", output.display()))?;

    if report.bytes_dropped > 0 {
        warn!(
            "{} trailing bytes of {} did not fill a {} byte chunk and were left out",
            report.bytes_dropped,
            args.input.display(),
            converter.chunk_size()
        );
    }

    info!(
        "{} -> {}: wrote {} bytes to {}",
        from,
        to,
        report.bytes_written,
        output.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::tempdir;

    #[test]
    fn args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn to_needs_output() {
        assert!(Args::try_parse_from(&["rom-convert", "r.z64", "--to", "n64"]).is_err());
        assert!(
            Args::try_parse_from(&["rom-convert", "r.z64", "o.bin", "--to", "n64", "-d"]).is_err()
        );

        let args = Args::try_parse_from(&["rom-convert", "r.z64", "o.bin", "--to", "n64"]).unwrap();
        assert_eq!(args.to, Some(RomOrdering::LittleEndian));
    }

    #[test]
    fn target_from_extension_or_flag() {
        let from = RomOrdering::BigEndian;

        assert_eq!(
            target(None, Path::new("out.v64"), from).unwrap(),
            RomOrdering::ByteSwapped
        );
        assert_eq!(
            target(Some(RomOrdering::LittleEndian), Path::new("out.v64"), from).unwrap(),
            RomOrdering::LittleEndian
        );
    }

    #[test]
    fn target_unknown() {
        let err = target(None, Path::new("out.bin"), RomOrdering::BigEndian).unwrap_err();

        assert!(err.to_string().contains("can't tell the target format"));
    }

    #[test]
    fn target_same_as_source() {
        let err = target(None, Path::new("out.n64"), RomOrdering::LittleEndian).unwrap_err();

        assert!(err.to_string().contains("already"));
    }

    #[test]
    fn refuse_in_place() {
        let dir = tempdir().unwrap();
        let rom = dir.path().join("game.z64");
        fs::write(&rom, RomOrdering::BigEndian.magic()).unwrap();

        assert!(check_output(&rom, &rom).is_err());
        assert!(check_output(&rom, &dir.path().join(".").join("game.z64")).is_err());
        assert!(check_output(&rom, &dir.path().join("game.v64")).is_ok());
    }
}
