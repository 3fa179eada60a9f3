pub mod reporting;
pub mod scenarios;
