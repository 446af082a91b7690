//! CSV job-list loading.
//!
//! One job per line: `left_x,right_x,top_y,p_x,p_y,a,b,iter_limit`.
//! Every parse problem is fatal and names the file, line and field, so a
//! bad list aborts the run before any rendering starts.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use fractbench_core::{JobSpec, JobSpecError};
use thiserror::Error;

const FIELD_NAMES: [&str; 8] = [
    "left_x",
    "right_x",
    "top_y",
    "p_x",
    "p_y",
    "a",
    "b",
    "iter_limit",
];

#[derive(Debug, Error)]
pub enum JobListError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: expected {expected} fields, found {found}")]
    MissingFields {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("{path}:{line}: field {field} ({name}) {problem}")]
    BadField {
        path: PathBuf,
        line: usize,
        field: usize,
        name: &'static str,
        problem: String,
    },

    #[error("{path}:{line}: {source}")]
    InvalidSpec {
        path: PathBuf,
        line: usize,
        #[source]
        source: JobSpecError,
    },
}

/// Load and concatenate every listed file into one job sequence.
pub fn load_job_lists(paths: &[PathBuf]) -> Result<Vec<JobSpec>, JobListError> {
    let mut jobs = Vec::new();
    for path in paths {
        load_job_list(path, &mut jobs)?;
    }
    Ok(jobs)
}

fn load_job_list(path: &Path, jobs: &mut Vec<JobSpec>) -> Result<(), JobListError> {
    let file = File::open(path).map_err(|source| JobListError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| JobListError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        jobs.push(parse_line(path, number + 1, &line)?);
    }
    Ok(())
}

fn parse_line(path: &Path, number: usize, line: &str) -> Result<JobSpec, JobListError> {
    let cells: Vec<&str> = line.split(',').map(str::trim).collect();
    if cells.len() < FIELD_NAMES.len() {
        return Err(JobListError::MissingFields {
            path: path.to_path_buf(),
            line: number,
            expected: FIELD_NAMES.len(),
            found: cells.len(),
        });
    }

    let spec = JobSpec {
        left_x: cell(path, number, &cells, 0)?,
        right_x: cell(path, number, &cells, 1)?,
        top_y: cell(path, number, &cells, 2)?,
        p_x: cell(path, number, &cells, 3)?,
        p_y: cell(path, number, &cells, 4)?,
        a: cell(path, number, &cells, 5)?,
        b: cell(path, number, &cells, 6)?,
        iter_limit: cell(path, number, &cells, 7)?,
    };

    spec.validate()
        .map_err(|source| JobListError::InvalidSpec {
            path: path.to_path_buf(),
            line: number,
            source,
        })?;
    Ok(spec)
}

fn cell<T>(path: &Path, line: usize, cells: &[&str], index: usize) -> Result<T, JobListError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let bad = |problem: String| JobListError::BadField {
        path: path.to_path_buf(),
        line,
        field: index + 1,
        name: FIELD_NAMES[index],
        problem,
    };

    let raw = cells[index];
    if raw.is_empty() {
        return Err(bad("is empty".into()));
    }
    raw.parse().map_err(|e: T::Err| bad(format!("is invalid: {e}")))
}
