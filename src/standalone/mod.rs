use clap::{Parser, Subcommand};

pub mod engine;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Join two relations on their shared key and write the joined rows
    Submit {
        /// Glob spec for the left relation's input partitions
        #[arg(short, long)]
        left: String,

        /// Glob spec for the right relation's input partitions
        #[arg(short, long)]
        right: String,

        /// Output directory
        #[arg(short, long)]
        output: String,

        /// Number of reduce tasks (output partitions)
        #[arg(short = 'n', long, default_value_t = 16)]
        reduce_tasks: u32,
    },
}

/// One pipeline run as the engine consumes it: where each relation's
/// partitions live, where joined output goes, and how wide the reduce
/// phase fans out.
#[derive(Debug, Clone)]
pub struct Job {
    pub left: String,
    pub right: String,
    pub output: String,
    pub reduce_tasks: u32,
}
