// Multi-tier topic matching: exact, strong fuzzy and weak fuzzy.

pub mod exact;
pub mod fuzzy;
pub mod models;
pub mod redundancy;
pub mod topic;
