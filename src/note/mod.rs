use chrono::{NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};

use crate::download::DownloadResult;
use crate::platform::VideoReference;
use crate::transcribe::TranscriptResult;
use crate::{ClipperError, Result};

/// A rendered note; immutable after composition
#[derive(Debug, Clone)]
pub struct Note {
    pub filename: String,
    pub content: String,
}

/// Filename for the note, derived from the note-creation timestamp
pub fn note_filename(timestamp: NaiveDateTime) -> String {
    format!("{}-video-clip.md", timestamp.format("%Y-%m-%d-%H-%M-%S"))
}

/// Filename used when the downloaded audio is kept next to the note
pub fn audio_filename(timestamp: NaiveDateTime, extension: &str) -> String {
    format!(
        "{}-video-clip.{extension}",
        timestamp.format("%Y-%m-%d-%H-%M-%S")
    )
}

/// Render the note: YAML frontmatter, source link, summary, full transcript.
pub fn compose(
    video: &VideoReference,
    download: &DownloadResult,
    transcript: &TranscriptResult,
    timestamp: NaiveDateTime,
) -> Note {
    let title = download.title.as_deref().unwrap_or("Untitled");
    let creator = download.creator.as_deref().unwrap_or("Unknown");
    let upload_date = format_upload_date(download.upload_date.as_deref(), timestamp.date());
    let duration = format_duration(download.duration_seconds);
    let created = timestamp.format("%Y-%m-%d %H:%M:%S");
    let summary = summarize(&transcript.text, 2);

    let content = format!(
        r#"---
title: "{title}"
platform: {platform}
creator: "{creator}"
upload_date: {upload_date}
duration: "{duration}"
source_url: "{url}"
created: {created}
tags:
  - video-clip
  - {slug}
---

# {title}

## Source

[Watch Original Video]({url})

**Platform:** {platform}
**Creator:** {creator}
**Duration:** {duration}

## Summary

{summary}

## Transcript

{transcript}
"#,
        title = title.replace('"', "'"),
        platform = video.platform.name(),
        creator = creator.replace('"', "'"),
        url = video.url,
        slug = video.platform.slug(),
        transcript = transcript.text,
    );

    Note {
        filename: note_filename(timestamp),
        content,
    }
}

/// Write the note into `output_dir`, creating the directory if needed.
pub fn write(note: &Note, output_dir: &Path) -> Result<PathBuf> {
    fs_err::create_dir_all(output_dir)
        .map_err(|e| ClipperError::WriteFailed(e.to_string()))?;

    let path = output_dir.join(&note.filename);
    fs_err::write(&path, &note.content).map_err(|e| ClipperError::WriteFailed(e.to_string()))?;

    Ok(path)
}

/// First `max_sentences` sentences of the transcript.
///
/// A sentence ends at `.`, `!`, or `?` followed by whitespace; a transcript
/// with no terminating punctuation is returned whole.
pub fn summarize(transcript: &str, max_sentences: usize) -> String {
    let text = transcript.trim();
    if max_sentences == 0 {
        return String::new();
    }

    let mut seen = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            match chars.peek() {
                Some(&(_, next)) if next.is_whitespace() => {
                    seen += 1;
                    if seen == max_sentences {
                        return text[..i + c.len_utf8()].to_string();
                    }
                }
                Some(_) => {}
                None => break,
            }
        }
    }

    text.to_string()
}

/// Reformat yt-dlp's YYYYMMDD upload date as YYYY-MM-DD, falling back to the
/// note date when the source reports none.
fn format_upload_date(raw: Option<&str>, fallback: NaiveDate) -> String {
    if let Some(date) = raw {
        if date.len() == 8 && date.bytes().all(|b| b.is_ascii_digit()) {
            return format!("{}-{}-{}", &date[..4], &date[4..6], &date[6..8]);
        }
    }
    fallback.format("%Y-%m-%d").to_string()
}

/// Format a duration in seconds as MM:SS or HH:MM:SS
fn format_duration(seconds: Option<f64>) -> String {
    let total = match seconds {
        Some(s) if s > 0.0 => s as u64,
        _ => return "Unknown".to_string(),
    };

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}
