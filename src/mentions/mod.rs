// Corpus-wide mention tables: deduplication and count statistics.

pub mod dedup;
pub mod stats;
