// Core processing stages, in pipeline order

pub mod harvest;
pub mod dates;
pub mod classify;
pub mod exclusion;
pub mod merge;
pub mod recency;
pub mod rollup;
