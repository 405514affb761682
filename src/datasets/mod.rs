pub mod analysis;
pub mod catalog;
pub mod downloader;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod profiler;
pub mod storage;
pub mod visualizer;
