pub mod problem;
pub mod range;

pub use crate::types::identifiers::ProblemIdentity;
pub use problem::Problem;
pub use range::{RatingRange, END_PARAM, START_PARAM};
