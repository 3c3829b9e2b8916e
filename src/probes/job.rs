//! Batch-job accounting: the job id the scheduler prolog wrote for this
//! node, stored as a STRING metric so reporting can attribute a cycle's
//! numbers to a job.

use std::path::PathBuf;

use super::Probe;
use crate::collect::collect_single;
use crate::registry::Registry;

pub const DEFAULT_JOBID_FILE: &str = "/var/run/cluster_jobid";

pub struct JobProbe {
    jobid_path: PathBuf,
}

impl JobProbe {
    pub fn new(jobid_path: impl Into<PathBuf>) -> Self {
        Self {
            jobid_path: jobid_path.into(),
        }
    }
}

impl Probe for JobProbe {
    fn name(&self) -> &'static str {
        "job"
    }

    fn collect(&self, registry: &mut Registry) {
        // Absent between jobs; job_id simply reports unavailable then.
        collect_single(registry, &self.jobid_path, "job_id");
    }
}
