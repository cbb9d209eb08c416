pub mod aligned_segment;
pub mod alignment_config;
pub mod alignment_engine;
pub mod alignment_run;
pub mod match_strategy;
pub mod multi_window_strategy;
pub mod placeholder_timing;
pub mod segment_summarizer;
pub mod single_window_strategy;
