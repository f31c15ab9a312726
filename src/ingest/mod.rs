/// Data ingestion from the INPE queimadas CSV archive.
///
/// Each concern gets its own file: `inpe` owns key/URL construction and the
/// single-file fetcher, `slots` and `range` own the two concurrent
/// aggregation paths, and `loader` turns fetched snapshots into records.

pub mod inpe;
pub mod loader;
pub mod range;
pub mod slots;

#[cfg(test)]
pub(crate) mod fixtures;
