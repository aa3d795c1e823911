use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Prepare HYPE model input files from watershed attribute tables
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write GeoClass.txt from a table of soil-landcover combinations
    #[command(name = "geoclass")]
    GeoClass(GeoClassArgs),

    /// Align subbasin attribute tables and write GeoData.txt
    #[command(name = "geodata")]
    GeoData(GeoDataArgs),

    /// Append default parameters to par.txt
    Par(ParArgs),
}

#[derive(Args, Debug)]
pub struct GeoClassArgs {
    /// Table of class combinations (csv/txt, or a GeoPackage with --layer)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Layer to read when the input is a GeoPackage
    #[arg(long)]
    pub layer: Option<String>,

    #[arg(short, long, default_value = "GeoClass.txt")]
    pub output: PathBuf,

    /// JSON object of logical -> physical column names
    #[arg(short, long)]
    pub mapping: Option<PathBuf>,

    /// First line of the file
    #[arg(long, default_value = hype_rs::geoclass::DEFAULT_COMMENT)]
    pub comment: String,
}

#[derive(Args, Debug)]
pub struct GeoDataArgs {
    /// JSON file listing the tables, their identifiers and rename mappings
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct ParArgs {
    /// JSON file holding the default parameter dictionaries
    #[arg(short, long)]
    pub library: PathBuf,

    #[arg(short, long, default_value = "par.txt")]
    pub output: PathBuf,

    #[arg(long, default_value_t = 12)]
    pub soil_number: usize,

    #[arg(long, default_value = "usda")]
    pub soil_type: String,

    #[arg(long, default_value_t = 19)]
    pub land_cover_number: usize,

    #[arg(long, default_value = "cec")]
    pub land_cover_type: String,
}

pub fn get_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_par_defaults() {
        let cli = Cli::try_parse_from(["hype_rs", "par", "--library", "defaults.json"]).unwrap();
        let Command::Par(args) = cli.command else {
            panic!("expected par subcommand");
        };
        assert_eq!(args.soil_number, 12);
        assert_eq!(args.soil_type, "usda");
        assert_eq!(args.land_cover_number, 19);
        assert_eq!(args.land_cover_type, "cec");
        assert_eq!(args.output, PathBuf::from("par.txt"));
    }

    #[test]
    fn test_geoclass_comment_and_verbosity() {
        let cli =
            Cli::try_parse_from(["hype_rs", "geoclass", "-i", "slc.csv", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::GeoClass(args) = cli.command else {
            panic!("expected geoclass subcommand");
        };
        assert_eq!(args.comment, "! HYPE GeoClass");
        assert!(args.mapping.is_none());
    }
}
