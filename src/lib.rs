pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod ensembl;
pub mod error;
pub mod fetch;
pub mod fs_util;
pub mod gencode;
pub mod manifest;
pub mod output;
pub mod plan;
pub mod tx2gene;
