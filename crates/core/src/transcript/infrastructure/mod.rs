pub mod json_transcript_reader;
