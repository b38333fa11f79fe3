pub mod ingest;
pub mod layer_setup;
