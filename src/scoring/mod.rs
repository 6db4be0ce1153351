/// Category scoring and aggregation.
///
/// `calculator` produces one `CategoryScore` per category for a job/candidate
/// pair; `aggregate` folds them into the overall relevance score using the
/// weight table.

pub mod aggregate;
pub mod calculator;
pub mod category;
pub mod score;
pub mod weights;

pub use aggregate::aggregate;
pub use calculator::{CategoryScoreCalculator, JobProfile};
pub use category::{Category, IndividualScore};
pub use score::CategoryScore;
pub use weights::WeightTable;
