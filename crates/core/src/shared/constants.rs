pub const GENERATOR_NAME: &str = "lyricsync";
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory name used under the platform config directory.
pub const SETTINGS_DIR_NAME: &str = "lyricsync";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Languages written without spaces between words. Whisper-style recognizers
/// split these into sub-word tokens, so scoring ignores whitespace for them.
pub const UNSPACED_LANGUAGES: &[&str] = &["ko", "ja", "zh", "th"];

pub const LRC_EXTENSIONS: &[&str] = &["lrc"];
pub const SRT_EXTENSIONS: &[&str] = &["srt"];

/// Suffix appended to the song stem for synchronized outputs.
pub const SYNCED_SUFFIX: &str = "_synced";
/// Suffix appended to the song stem for transcription-only outputs.
pub const TRANSCRIPT_SUFFIX: &str = "_transcript";
