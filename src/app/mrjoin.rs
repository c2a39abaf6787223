use anyhow::Result;
use clap::Parser;
use mrjoin::standalone::engine::{perform_map, perform_reduce};
use mrjoin::standalone::{Args, Commands, Job};
use tracing::info;

fn parse_args() -> (Job, u8) {
    let args = Args::parse();
    let verbose = args.verbose;
    match args.command {
        Commands::Submit {
            left,
            right,
            output,
            reduce_tasks,
        } => (
            Job {
                left,
                right,
                output,
                reduce_tasks,
            },
            verbose,
        ),
    }
}

fn run_join_job(job: &Job) -> Result<()> {
    /*  The map pass also shuffles: tagged pairs are routed straight into
     *  their reduce buckets, which is all the grouping a standalone run
     *  needs.
     */
    let buckets = perform_map(job)?;
    perform_reduce(job, buckets)
}

fn main() -> Result<()> {
    let (job, verbose) = parse_args();
    let filter = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "join submitted: left={} right={} output={} reduce_tasks={}",
        job.left, job.right, job.output, job.reduce_tasks
    );
    run_join_job(&job)
}
