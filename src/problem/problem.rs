use serde::{Deserialize, Serialize};

use crate::types::identifiers::ProblemIdentity;

/// A practice problem as handed over by the problem store.
///
/// The engine only reads problems; it never mutates one after fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub contest_id: i64,
    /// Problem label, unique within its contest.
    pub name: String,
    pub rating: i64,
    /// Popularity score; candidates arrive ordered by it, highest first.
    pub frequency: f64,
}

impl Problem {
    pub fn new(contest_id: i64, name: impl Into<String>, rating: i64, frequency: f64) -> Self {
        Self {
            contest_id,
            name: name.into(),
            rating,
            frequency,
        }
    }

    pub fn identity(&self) -> ProblemIdentity {
        ProblemIdentity::new(self.contest_id, self.name.as_str())
    }
}
