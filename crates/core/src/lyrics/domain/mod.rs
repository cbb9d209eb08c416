pub mod lyric_line;
pub mod lyrics_source;
pub mod text_normalizer;
