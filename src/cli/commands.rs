use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::output::{DocumentSections, OutputFormat};

/// Harvests toolchain settings from an arduino-cli probe build
#[derive(Parser, Debug)]
#[command(
    name = "arduino-harvest",
    about = "Harvests compiler, linker and archiver settings from arduino-cli",
    version,
    author,
    long_about = "arduino-harvest compiles a throwaway probe sketch with arduino-cli in verbose \
                  mode and mines the transcript for the compilers, flags, include paths, linker \
                  and archiver it used, so that other build systems can compile Arduino code \
                  the same way."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        conflicts_with = "quiet",
        help = "Turn on debugging output (same as --verbose)"
    )]
    pub debug: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Run a probe build and harvest its settings",
        long_about = "Compiles a probe sketch for the given board and emits the detected \
                      settings as a document.\n\n\
                      Examples:\n  \
                      arduino-harvest harvest -b arduino:avr:uno -o build/arduino -d -i -p\n  \
                      arduino-harvest harvest -b arduino:avr:mega -l Wire SPI -o out -d -g"
    )]
    Harvest(HarvestArgs),

    #[command(
        about = "Harvest settings from a captured transcript",
        long_about = "Mines the output of an earlier `arduino-cli compile -v --clean` run \
                      instead of building.\n\n\
                      Examples:\n  \
                      arduino-harvest mine -t build.log -s harvest_a1b2c3 -o out -d\n  \
                      arduino-cli compile -v --clean -b arduino:avr:uno probe | \
                      arduino-harvest mine -t - -s probe -o out -d"
    )]
    Mine(MineArgs),
}

/// Switches and formatting shared by both subcommands
#[derive(Args, Debug, Clone)]
pub struct DocumentArgs {
    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Output destination for the pre-compiled arduino core"
    )]
    pub output: PathBuf,

    #[arg(
        short = 'j',
        long,
        value_name = "PATH",
        help = "File to write the document to (default: stdout)"
    )]
    pub json_file: Option<PathBuf>,

    #[arg(short = 'd', long, help = "Detect build tools and flags")]
    pub detect_settings: bool,

    #[arg(short = 'i', long, help = "List include directories")]
    pub includes: bool,

    #[arg(short = 'p', long, help = "Capture post-link steps")]
    pub post_link: bool,

    #[arg(
        short = 'g',
        long,
        help = "Copy the sketch cache into the output directory"
    )]
    pub generate_code: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "json",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

impl DocumentArgs {
    pub fn sections(&self) -> DocumentSections {
        DocumentSections {
            detect: self.detect_settings,
            includes: self.includes,
            post_link: self.post_link,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct HarvestArgs {
    #[arg(
        short = 'b',
        long,
        value_name = "FQBN",
        help = "Target board FQBN supplied to the arduino build"
    )]
    pub board: String,

    #[arg(
        short = 'l',
        long,
        value_name = "NAME",
        num_args = 0..,
        help = "Arduino libraries to include in the probe sketch (e.g. Wire)"
    )]
    pub libraries: Vec<String>,

    #[arg(
        long,
        value_name = "PROP",
        num_args = 0..,
        help = "Build properties passed as --build-property"
    )]
    pub properties: Vec<String>,

    #[command(flatten)]
    pub document: DocumentArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct MineArgs {
    #[arg(
        short = 't',
        long,
        value_name = "FILE",
        help = "Captured arduino-cli output, or - for stdin"
    )]
    pub transcript: PathBuf,

    #[arg(
        short = 's',
        long,
        value_name = "NAME",
        help = "Name of the sketch directory the transcript was built from"
    )]
    pub sketch_name: String,

    #[arg(
        long,
        value_name = "DIR",
        num_args = 0..,
        help = "Extra directories to look for the toolchain programs in"
    )]
    pub search_path: Vec<PathBuf>,

    #[command(flatten)]
    pub document: DocumentArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Yaml => OutputFormat::Yaml,
        }
    }
}
