pub mod line_grouper;
pub mod lyrics_document;
pub mod lyrics_writer;
