// Matching pipeline: per-document stages, corpus collection and the runner.

pub mod collector;
pub mod corpus;
pub mod document;
