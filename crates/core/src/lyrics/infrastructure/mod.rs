pub mod lyrics_file_reader;
pub mod lyrics_parsers;
