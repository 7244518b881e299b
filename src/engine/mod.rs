pub mod engine;
pub mod protocol;
pub mod controller;
pub mod activity_source;

pub mod prompt_builder;
pub mod llm_client;
pub mod response_parser;
pub mod clipboard;
