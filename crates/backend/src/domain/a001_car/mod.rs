pub mod error;
pub mod repository;
pub mod service;
pub mod service_enrichment;

#[cfg(test)]
pub(crate) mod test_support;
