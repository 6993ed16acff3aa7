use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rustcare-validate")]
#[command(about = "Check request payloads against RustCare write-path schemas")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (YAML, TOML or JSON)
    #[arg(short, long, global = true, env = "RUSTCARE_VALIDATION_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a payload and print `{ isError, error }`
    Check(CheckArgs),
    /// List the built-in endpoint schemas
    Endpoints,
    /// Classify a schema descriptor and print its rules
    Describe(DescribeArgs),
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["schema", "endpoint"])))]
pub struct CheckArgs {
    /// Payload file, or `-` to read standard input
    #[arg(short, long)]
    pub payload: String,

    /// Schema descriptor file (.json, .yaml or .yml)
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    /// Built-in endpoint schema, e.g. `supplier`
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Print the result on a single line
    #[arg(long)]
    pub compact: bool,
}

#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Schema descriptor file (.json, .yaml or .yml)
    #[arg(short, long)]
    pub schema: PathBuf,
}
