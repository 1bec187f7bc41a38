pub mod columns;
pub mod config;
pub mod filter;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod state;
pub mod stats;
pub mod stderr_buffer;
pub mod tui;
