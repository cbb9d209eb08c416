pub mod json_writer;
pub mod lrc_writer;
pub mod srt_writer;
pub mod text_writer;
pub mod timestamp;
pub mod writer_factory;
