use regex::Regex;
use std::sync::LazyLock;

/// Noise tokens stripped from imported filenames: download-site tags and
/// common video/audio descriptors. Ordered longest-first so the alternation
/// prefers whole phrases over their substrings ("Official Audio" before
/// "Audio", bracketed forms before bare ones).
const NOISE_TOKENS: &[&str] = &[
    "SoundLoadMate.com",
    "(Official Video)",
    "[Official Audio]",
    "Official Video",
    "Official Audio",
    "Visualizer",
    "SoundCloud",
    "[YouTube]",
    "(Lyrics)",
    "[Lyrics]",
    "(Audio)",
    "YouTube",
    "Lyrics",
    "Audio",
];

// Single compiled alternation over every noise token, case-insensitive.
static NOISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = NOISE_TOKENS
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i){alternation}")).unwrap()
});

// Runs of two or more spaces (spaces only, other whitespace is left alone)
static MULTI_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(" {2,}").unwrap());

/// Separator characters stripped from the end of a cleaned name.
const TRAILING_SEPARATORS: &[char] = &['-', '–', '—', ':', '|', '.', ' '];

/// Turn a raw filename stem into a usable song title.
///
/// Underscores become spaces, every occurrence of a known noise token is
/// removed (repeatedly, until none remain), bracket pairs emptied by the
/// removal are dropped, space runs collapse, and trailing separator
/// fragments like " - " or ":" are stripped.
///
/// Pure and idempotent: cleaning an already-clean name is a no-op.
pub fn clean_song_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return raw.to_string();
    }

    let mut cleaned = trimmed.replace('_', " ");

    // A removal can expose a fresh occurrence ("AuAudiodio"), so run the
    // alternation to a fixed point rather than a single pass.
    while NOISE_RE.is_match(&cleaned) {
        cleaned = NOISE_RE.replace_all(&cleaned, "").into_owned();
    }

    // Bracket pairs the token removal emptied out
    cleaned = cleaned.replace("()", "").replace("[]", "").replace("{}", "");

    cleaned = MULTI_SPACE_RE.replace_all(&cleaned, " ").into_owned();

    let mut cleaned = cleaned.trim().to_string();

    // Trailing "-", ":", "|" fragments left where a token used to be
    while cleaned.ends_with(TRAILING_SEPARATORS) {
        cleaned.pop();
        cleaned.truncate(cleaned.trim_end().len());
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Basic cleanup ===

    #[test]
    fn test_underscores_become_spaces() {
        assert_eq!(clean_song_name("My_Song_Name"), "My Song Name");
    }

    #[test]
    fn test_plain_name_untouched() {
        assert_eq!(clean_song_name("Midnight City"), "Midnight City");
    }

    #[test]
    fn test_leading_trailing_whitespace_trimmed() {
        assert_eq!(clean_song_name("  Midnight City  "), "Midnight City");
    }

    #[test]
    fn test_empty_and_whitespace_only_returned_as_is() {
        assert_eq!(clean_song_name(""), "");
        assert_eq!(clean_song_name("   "), "   ");
    }

    // === Noise token removal ===

    #[test]
    fn test_bracketed_official_audio() {
        assert_eq!(
            clean_song_name("My Song_Name [Official Audio]"),
            "My Song Name"
        );
    }

    #[test]
    fn test_parenthesized_official_video() {
        assert_eq!(clean_song_name("Strobe (Official Video)"), "Strobe");
    }

    #[test]
    fn test_download_site_tag() {
        assert_eq!(clean_song_name("Strobe - SoundLoadMate.com"), "Strobe");
    }

    #[test]
    fn test_case_insensitive_removal() {
        assert_eq!(clean_song_name("Strobe [OFFICIAL AUDIO]"), "Strobe");
        assert_eq!(clean_song_name("Strobe (official video)"), "Strobe");
        assert_eq!(clean_song_name("Strobe youtube"), "Strobe");
    }

    #[test]
    fn test_token_repeated_in_name() {
        assert_eq!(clean_song_name("Strobe YouTube YouTube YouTube"), "Strobe");
    }

    #[test]
    fn test_removal_exposing_new_occurrence() {
        // Stripping the inner "Audio" leaves a fresh "Audio" behind
        assert_eq!(clean_song_name("Strobe AuAudiodio"), "Strobe");
    }

    #[test]
    fn test_phrase_preferred_over_substring() {
        // "Official Audio" must go as one phrase, not leave "Official" behind
        assert_eq!(clean_song_name("Strobe Official Audio"), "Strobe");
    }

    #[test]
    fn test_multiple_distinct_tokens() {
        assert_eq!(
            clean_song_name("Strobe [Lyrics] (Official Video) SoundCloud"),
            "Strobe"
        );
    }

    // === Brackets and separators ===

    #[test]
    fn test_emptied_brackets_dropped() {
        assert_eq!(clean_song_name("Strobe (Audio)"), "Strobe");
        assert_eq!(clean_song_name("Strobe [YouTube]"), "Strobe");
        assert_eq!(clean_song_name("Strobe {Visualizer}"), "Strobe");
    }

    #[test]
    fn test_space_runs_collapsed() {
        assert_eq!(
            clean_song_name("Strobe    Extended   Mix"),
            "Strobe Extended Mix"
        );
    }

    #[test]
    fn test_trailing_dash_stripped() {
        assert_eq!(clean_song_name("Strobe - YouTube"), "Strobe");
        assert_eq!(clean_song_name("Strobe -"), "Strobe");
    }

    #[test]
    fn test_trailing_separator_runs_stripped() {
        assert_eq!(clean_song_name("Strobe - : |"), "Strobe");
        assert_eq!(clean_song_name("Strobe..."), "Strobe");
        assert_eq!(clean_song_name("Strobe – — :"), "Strobe");
    }

    #[test]
    fn test_interior_separators_kept() {
        assert_eq!(clean_song_name("Artist - Strobe"), "Artist - Strobe");
    }

    // === Idempotence ===

    #[test]
    fn test_idempotent() {
        let inputs = [
            "My Song_Name [Official Audio]",
            "Strobe - SoundLoadMate.com",
            "Strobe (Official Video) [Lyrics]",
            "  weird   _ input _  (Audio) - ",
            "plain name",
            "",
            "   ",
            "Artist - Title (Radio Edit)",
        ];
        for raw in inputs {
            let once = clean_song_name(raw);
            let twice = clean_song_name(&once);
            assert_eq!(once, twice, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_unrelated_brackets_survive() {
        assert_eq!(clean_song_name("Strobe (Radio Edit)"), "Strobe (Radio Edit)");
    }
}
