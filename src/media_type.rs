//! Media type detection.
//!
//! Two small pieces shared by the extractor registry and the recorder: a
//! MIME-to-extension table for declared content types, and a magic-byte
//! sniffer for the audio/video containers podcast hosts actually serve.
//! Sniffing wins over the declared header because servers mislabel media
//! often enough to matter.

/// Fallback extension when neither sniffing nor the header identifies the bytes.
pub const GENERIC_EXTENSION: &str = "bin";

/// Map a MIME type (with optional parameters) to a file extension.
///
/// Covers the feed and media types this pipeline meets; anything else is
/// `None` rather than a guess.
pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
    let essence = mime.split(';').next().unwrap_or("").trim();
    match essence.to_ascii_lowercase().as_str() {
        "application/rss+xml" => Some("rss"),
        "audio/mpeg" | "audio/mp3" => Some("mp3"),
        "audio/mp4" | "audio/x-m4a" | "audio/m4a" => Some("m4a"),
        "audio/aac" => Some("aac"),
        "audio/ogg" | "application/ogg" => Some("ogg"),
        "audio/opus" => Some("opus"),
        "audio/wav" | "audio/x-wav" | "audio/wave" => Some("wav"),
        "audio/flac" | "audio/x-flac" => Some("flac"),
        "audio/webm" => Some("weba"),
        "video/mp4" => Some("mp4"),
        "video/webm" => Some("webm"),
        _ => None,
    }
}

/// Sniff a file extension from leading magic bytes.
pub fn sniff(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"ID3") {
        return Some("mp3");
    }
    // Bare MPEG audio frame sync: 11 set bits.
    if bytes.len() >= 2 && bytes[0] == 0xFF && (bytes[1] & 0xE0) == 0xE0 {
        return Some("mp3");
    }
    if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WAVE" {
        return Some("wav");
    }
    if bytes.starts_with(b"OggS") {
        return Some("ogg");
    }
    if bytes.starts_with(b"fLaC") {
        return Some("flac");
    }
    // ISO base media file format: size box then "ftyp" at offset 4.
    if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" {
        let brand = &bytes[8..12];
        if brand.starts_with(b"M4A") || brand.starts_with(b"M4B") {
            return Some("m4a");
        }
        return Some("mp4");
    }
    // EBML header (Matroska / WebM).
    if bytes.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return Some("webm");
    }
    None
}

/// Determine the extension for downloaded media bytes.
///
/// Sniffed magic bytes take precedence over the declared content type; when
/// both fail, the generic binary extension is used.
pub fn media_extension(bytes: &[u8], declared_content_type: Option<&str>) -> &'static str {
    sniff(bytes)
        .or_else(|| declared_content_type.and_then(extension_for_mime))
        .unwrap_or(GENERIC_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniffs_id3_tagged_mp3() {
        assert_eq!(sniff(b"ID3\x04\x00\x00\x00\x00\x00\x00"), Some("mp3"));
    }

    #[test]
    fn test_sniffs_bare_mpeg_frame() {
        assert_eq!(sniff(&[0xFF, 0xFB, 0x90, 0x00]), Some("mp3"));
    }

    #[test]
    fn test_sniffs_wav() {
        assert_eq!(sniff(b"RIFF\x24\x00\x00\x00WAVEfmt "), Some("wav"));
    }

    #[test]
    fn test_sniffs_m4a_brand() {
        assert_eq!(sniff(b"\x00\x00\x00\x20ftypM4A \x00\x00\x00\x00"), Some("m4a"));
    }

    #[test]
    fn test_sniffing_wins_over_header() {
        // Server claims mp4 but the bytes are an Ogg container.
        let ext = media_extension(b"OggS\x00\x02\x00\x00", Some("video/mp4"));
        assert_eq!(ext, "ogg");
    }

    #[test]
    fn test_header_used_when_bytes_unrecognized() {
        let ext = media_extension(b"unrecognizable", Some("audio/mpeg"));
        assert_eq!(ext, "mp3");
    }

    #[test]
    fn test_generic_fallback() {
        assert_eq!(media_extension(b"unrecognizable", None), GENERIC_EXTENSION);
        assert_eq!(media_extension(b"", Some("application/x-unknown")), GENERIC_EXTENSION);
    }

    #[test]
    fn test_mime_table_handles_parameters() {
        assert_eq!(extension_for_mime("application/rss+xml; charset=utf-8"), Some("rss"));
        assert_eq!(extension_for_mime("text/html"), None);
    }
}
