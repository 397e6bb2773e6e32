//! Adjacency de-duplication.
//!
//! Problems are often re-posted to a neighbouring "mirror" contest under the
//! same name. Two problems are treated as the same when their names match and
//! their contest ids differ by at most one. There is no canonical problem
//! registry behind this; the heuristic is kept exactly as observed, since a
//! stricter identity would change ladder contents.

use std::collections::HashSet;

use crate::problem::Problem;
use crate::types::identifiers::ProblemIdentity;

/// Output of one pass over an ordered candidate list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedupOutcome {
    /// Surviving problems, in input order.
    pub kept: Vec<Problem>,
    /// Identities dropped as adjacency duplicates, in input order.
    pub suppressed: Vec<ProblemIdentity>,
    /// Candidates examined before the scan stopped.
    pub scanned: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct DedupWindow {
    bound: usize,
}

impl DedupWindow {
    pub fn new(bound: usize) -> Self {
        Self { bound }
    }

    pub fn bound(&self) -> usize {
        self.bound
    }

    /// Walk `candidates` in order and drop adjacency duplicates.
    ///
    /// Each candidate is checked against the identities seen *before* it and
    /// then recorded whether or not it survives, so a dropped duplicate still
    /// shadows its own neighbours further down the list. Scanning stops as
    /// soon as `bound` problems survive.
    pub fn filter(&self, candidates: Vec<Problem>) -> DedupOutcome {
        let mut seen: HashSet<ProblemIdentity> = HashSet::with_capacity(candidates.len());
        let mut outcome = DedupOutcome {
            kept: Vec::with_capacity(self.bound.min(candidates.len())),
            ..DedupOutcome::default()
        };

        for problem in candidates {
            if outcome.kept.len() >= self.bound {
                break;
            }
            outcome.scanned += 1;

            let identity = problem.identity();
            let duplicate = identity.neighbours().any(|n| seen.contains(&n));
            seen.insert(identity.clone());

            if duplicate {
                outcome.suppressed.push(identity);
            } else {
                outcome.kept.push(problem);
            }
        }

        debug_assert!(outcome.kept.len() <= self.bound);
        outcome
    }
}
