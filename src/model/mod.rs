pub mod decision;
pub mod input;
