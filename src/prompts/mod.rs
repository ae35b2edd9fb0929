//! Prompt templates embedded at build time

pub mod embedded;
