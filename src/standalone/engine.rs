use anyhow::{ensure, Context, Result};
use dashmap::DashMap;
use glob::glob;
use itertools::Itertools;
use std::fs::{self, File};
use std::io::Write;
use tracing::{debug, info, warn};

use crate::join::{joiner, tagger};
use crate::standalone::Job;
use crate::{ihash, KeyValue, Side};

// types related to this engine
type BucketIndex = u32;
type Buckets = DashMap<BucketIndex, Vec<KeyValue>>;

/// Runs the map phase over both relations and shuffles the tagged pairs
/// into reduce buckets.
///
/// Every file matched by a relation's glob is one partition; the
/// partition's relation identity is fixed before any record in it is read.
/// The left relation is enumerated before the right, and `glob` yields
/// paths in sorted order, so arrival order into each bucket is
/// reproducible across runs of the same input.
pub fn perform_map(job: &Job) -> Result<Buckets> {
    ensure!(job.reduce_tasks > 0, "need at least one reduce task");
    let buckets: Buckets = Buckets::new();
    tag_relation(Side::Left, &job.left, job.reduce_tasks, &buckets)?;
    tag_relation(Side::Right, &job.right, job.reduce_tasks, &buckets)?;
    Ok(buckets)
}

fn tag_relation(side: Side, pattern: &str, n_reduce: u32, buckets: &Buckets) -> Result<()> {
    let mut n_partitions = 0usize;
    let mut n_records = 0usize;
    for entry in glob(pattern)? {
        // A partition we cannot enumerate or read fails the run; skipping
        // it would silently drop that partition's records from the join.
        let pathspec = entry?;
        let content = fs::read_to_string(&pathspec)
            .with_context(|| format!("failed to read partition {}", pathspec.display()))?;
        let mut partition_records = 0usize;
        for record in content.lines() {
            let kv = tagger::tag(side, record)
                .with_context(|| format!("bad record in partition {}", pathspec.display()))?;
            let bucket_no = ihash(&kv.key) % n_reduce;
            buckets.entry(bucket_no).or_default().push(kv);
            partition_records += 1;
        }
        debug!(
            "tagged {} records from {:?} partition {}",
            partition_records,
            side,
            pathspec.display()
        );
        n_partitions += 1;
        n_records += partition_records;
    }
    if n_partitions == 0 {
        warn!("{:?} relation matched no partitions under {}", side, pattern);
    }
    info!(
        "map phase: {:?} relation tagged {} records across {} partitions",
        side, n_records, n_partitions
    );
    Ok(())
}

/// Runs the reduce phase: groups each bucket's pairs by key, hands every
/// complete group to the joiner, and writes the joined rows to one
/// `mr-out-<bucket>` file per non-empty bucket.
pub fn perform_reduce(job: &Job, buckets: Buckets) -> Result<()> {
    fs::create_dir_all(&job.output)
        .with_context(|| format!("failed to create output directory {}", job.output))?;
    info!("reduce phase: {} buckets into {}", buckets.len(), job.output);
    for (reduce_id, mut bkt) in buckets.into_iter() {
        let out_pathspec = format!("{}/mr-out-{}", &job.output, reduce_id);
        let mut out_file = File::create(&out_pathspec)
            .with_context(|| format!("failed to create {}", out_pathspec))?;
        // Stable sort: payloads sharing a key must keep arrival order or
        // the joiner's row order would drift between runs.
        bkt.sort_by_key(KeyValue::key);
        let mut rows = 0usize;
        for (key, value_group) in &bkt.into_iter().chunk_by(KeyValue::key) {
            let values = value_group.map(KeyValue::into_value);
            let out = joiner::join_group(&key, values)?;
            rows += out.iter().filter(|&&b| b == b'\n').count();
            out_file.write_all(&out)?;
        }
        debug!("bucket {}: wrote {} joined rows", reduce_id, rows);
    }
    Ok(())
}
