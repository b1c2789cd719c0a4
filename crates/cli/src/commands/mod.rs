pub(crate) mod catalog;
pub(crate) mod ingest;
pub(crate) mod serve;
pub(crate) mod trigger;
