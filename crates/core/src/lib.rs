pub mod alignment;
pub mod lyrics;
pub mod matching;
pub mod output;
pub mod pipeline;
pub mod shared;
pub mod transcript;
