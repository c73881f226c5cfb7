//! mal-convert CLI - Convert a MAL XML export to AniMehList JSON
//!
//! ```bash
//! mal-convert animelist.xml out/animelist.json
//! mal-convert animelist.xml out.json --include-dropped --no-infer-season
//! mal-convert animelist.xml out.json -v --log-format json
//! ```

use clap::{Parser, ValueEnum};
use malconv::{convert_file, ConvertOptions, LogConfig, LogFormat, LOGGER};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mal-convert")]
#[command(about = "Convert a MAL XML export to the app's JSON format", long_about = None)]
struct Cli {
    /// Path to MAL XML export
    input_xml: PathBuf,

    /// Path to write JSON
    output_json: PathBuf,

    /// Include MAL entries with status Dropped (mapped to PLAN, notes include 'MAL: Dropped')
    #[arg(long)]
    include_dropped: bool,

    /// Disable season inference from titles
    #[arg(long)]
    no_infer_season: bool,

    /// Add the MAL anime id to the notes ('MAL ID: <id>')
    #[arg(long)]
    mal_id_notes: bool,

    /// Print progress to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Progress output format (with --verbose)
    #[arg(long, value_enum, default_value_t = LogFormatArg::Text)]
    log_format: LogFormatArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

impl Cli {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            include_dropped: self.include_dropped,
            infer_season: !self.no_infer_season,
            mal_id_in_notes: self.mal_id_notes,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    LOGGER.configure(LogConfig {
        enabled: cli.verbose,
        format: cli.log_format.into(),
    });

    let options = cli.options();

    if let Err(e) = convert_file(&cli.input_xml, &cli.output_json, &options) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    println!("Wrote {}", cli.output_json.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let cli = Cli::try_parse_from(["mal-convert", "in.xml", "out.json"]).unwrap();
        assert_eq!(cli.options(), ConvertOptions::default());
        assert!(!cli.verbose);
        assert_eq!(LogFormat::from(cli.log_format), LogFormat::Text);
    }

    #[test]
    fn test_no_infer_season_flag() {
        let cli = Cli::try_parse_from(["mal-convert", "in.xml", "out.json", "--no-infer-season"])
            .unwrap();
        let options = cli.options();
        assert!(!options.infer_season);
        assert!(!options.include_dropped);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "mal-convert",
            "in.xml",
            "out/list.json",
            "--include-dropped",
            "--mal-id-notes",
            "-v",
            "--log-format",
            "json",
        ])
        .unwrap();
        let options = cli.options();
        assert!(options.include_dropped);
        assert!(options.mal_id_in_notes);
        assert!(options.infer_season);
        assert!(cli.verbose);
        assert_eq!(LogFormat::from(cli.log_format), LogFormat::Json);
        assert_eq!(cli.output_json, PathBuf::from("out/list.json"));
    }

    #[test]
    fn test_missing_output_path_rejected() {
        assert!(Cli::try_parse_from(["mal-convert", "in.xml"]).is_err());
    }
}
