//! hclpath cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Change the work directory
    ///
    /// Can be specified multiple times. Note that all
    /// paths on the way to the final path must exist.
    ///
    /// This is equivalent to running { cd <directory>; hclpath ... }
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read attributes
    #[command(alias = "attr")]
    Attribute(AttributeCommand),

    /// Print debug information for development
    Dev(DevCommand),
}

#[derive(Parser, Debug)]
pub struct AttributeCommand {
    #[command(subcommand)]
    pub command: AttributeSubCommand,
}

#[derive(Subcommand, Debug)]
pub enum AttributeSubCommand {
    /// Print the value of the attribute at an address
    ///
    /// Reads HCL from stdin unless a file is given. Prints nothing when
    /// the attribute does not exist.
    Get(GetCommand),
}

#[derive(Parser, Debug)]
pub struct GetCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[clap(flatten)]
    pub output: OutputArgs,

    /// Address of the attribute, e.g. resource.aws_instance.foo.ami
    pub address: String,
}

#[derive(Parser, Debug)]
pub struct InputArgs {
    /// Read this file instead of stdin
    #[clap(short = 'f', long = "file", global(true))]
    pub file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Default, Debug)]
pub enum OutputFormat {
    /// the value as written in the source
    #[default]
    Raw,
    /// an hcl document with just the attribute
    Hcl,
    Json,
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Raw => f.write_str("raw"),
            OutputFormat::Hcl => f.write_str("hcl"),
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}

#[derive(Parser, Debug)]
pub struct DevCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[command(subcommand)]
    pub command: DevSubCommand,
}

#[derive(Subcommand, Debug)]
pub enum DevSubCommand {
    /// Parsed document
    Body,
    /// Blocks matching a block address
    Blocks { address: String },
    /// Token stream of the attribute at an address
    Tokens { address: String },
}
