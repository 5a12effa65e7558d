//! Pipe-delimited CSV import/export for bookmarks.
//!
//! Pipeline:
//!   raw &str
//!     └─ Reader::read_record()  → Vec<String> (one per row)
//!          └─ parse_row()       → ImportedBookmark
//!               └─ BookmarkStore::import() → stored Bookmark
//!
//! The format is `|`-delimited with RFC 4180-style quoting: a field
//! containing the delimiter, a quote, or a line break is wrapped in
//! double quotes, with embedded quotes doubled. The first record must
//! be the exact seven-column [`HEADER`]; import is fail-fast with no
//! rollback.

use std::{iter::Peekable, str::Chars};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::{
  bookmark::{Bookmark, ImportedBookmark},
  error::{Error, Result},
  store::BookmarkStore,
};

/// Mandatory column names, in order.
pub const HEADER: [&str; 7] =
  ["title", "url", "tags", "notes", "document", "created_at", "updated_at"];

const DELIMITER: char = '|';

// ─── Reader ──────────────────────────────────────────────────────────────────

struct Reader<'a> {
  chars: Peekable<Chars<'a>>,
}

impl<'a> Reader<'a> {
  fn new(input: &'a str) -> Self {
    Reader {
      chars: input.chars().peekable(),
    }
  }

  /// Read the next record, or `None` at end of input.
  ///
  /// Blank lines (including the conventional trailing newline) are
  /// skipped. A quote opens a quoted field only at the start of the
  /// field; inside one, `""` is a literal quote and line breaks are
  /// data. An unterminated quoted field is a format error.
  fn read_record(&mut self) -> Result<Option<Vec<String>>> {
    while matches!(self.chars.peek(), Some('\n' | '\r')) {
      self.chars.next();
    }
    if self.chars.peek().is_none() {
      return Ok(None);
    }

    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    loop {
      let Some(c) = self.chars.next() else {
        if in_quotes {
          return Err(Error::Format("unterminated quoted field".to_string()));
        }
        fields.push(field);
        return Ok(Some(fields));
      };

      if in_quotes {
        if c == '"' {
          if self.chars.peek() == Some(&'"') {
            self.chars.next();
            field.push('"');
          } else {
            in_quotes = false;
          }
        } else {
          field.push(c);
        }
        continue;
      }

      match c {
        DELIMITER => fields.push(std::mem::take(&mut field)),
        '"' if field.is_empty() => in_quotes = true,
        '\r' => {
          if self.chars.peek() == Some(&'\n') {
            self.chars.next();
          }
          fields.push(field);
          return Ok(Some(fields));
        }
        '\n' => {
          fields.push(field);
          return Ok(Some(fields));
        }
        _ => field.push(c),
      }
    }
  }
}

// ─── Row parsing ─────────────────────────────────────────────────────────────

fn parse_row(fields: &[String]) -> Result<ImportedBookmark> {
  if fields.len() != HEADER.len() {
    return Err(Error::Format(format!(
      "expected {} fields per row, got {}",
      HEADER.len(),
      fields.len()
    )));
  }
  Ok(ImportedBookmark {
    title:      fields[0].clone(),
    url:        fields[1].clone(),
    tags:       split_tags(&fields[2]),
    notes:      fields[3].clone(),
    document:   fields[4].clone(),
    created_at: parse_timestamp("created_at", &fields[5])?,
    updated_at: parse_timestamp("updated_at", &fields[6])?,
  })
}

/// Split a semicolon-separated tag list, the syntax shared by the CSV
/// tags column and user-facing tag arguments. An empty field means no
/// tags, never one empty tag.
pub fn split_tags(field: &str) -> Vec<String> {
  if field.is_empty() {
    return Vec::new();
  }
  field.split(';').map(str::to_string).collect()
}

fn parse_timestamp(column: &str, value: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(value)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| {
      Error::Format(format!(
        "{column}: invalid RFC 3339 timestamp {value:?}: {e}"
      ))
    })
}

// ─── Writer ──────────────────────────────────────────────────────────────────

/// Quote a field only when it contains the delimiter, a quote, or a
/// line break; embedded quotes are doubled.
fn write_field(out: &mut String, field: &str) {
  if field.contains([DELIMITER, '"', '\n', '\r']) {
    out.push('"');
    for c in field.chars() {
      if c == '"' {
        out.push('"');
      }
      out.push(c);
    }
    out.push('"');
  } else {
    out.push_str(field);
  }
}

fn write_record(out: &mut String, record: &Bookmark) {
  let columns = [
    record.title.clone(),
    record.url.clone(),
    record.tags.join(";"),
    record.notes.clone(),
    record.document.clone(),
    record.created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
    record.updated_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
  ];
  for (i, column) in columns.iter().enumerate() {
    if i > 0 {
      out.push(DELIMITER);
    }
    write_field(out, column);
  }
  out.push('\n');
}

// ─── Pipelines ───────────────────────────────────────────────────────────────

/// Import `input` into `store`, one row at a time.
///
/// The header is checked before any row is touched; every row then goes
/// through [`BookmarkStore::import`], so per-row validation and
/// uniqueness apply. Fail-fast with no rollback: the first malformed or
/// rejected row aborts the run with its error, and rows imported before
/// it stay committed. Returns the number of rows imported.
pub async fn import_csv<S: BookmarkStore>(
  store: &S,
  input: &str,
) -> Result<u64> {
  let mut reader = Reader::new(input);
  let header = reader
    .read_record()?
    .ok_or_else(|| Error::Format("missing header row".to_string()))?;
  if header != HEADER {
    return Err(Error::Format(format!(
      "invalid header: expected {:?}",
      HEADER.join("|")
    )));
  }

  let mut imported = 0u64;
  while let Some(fields) = reader.read_record()? {
    let row = parse_row(&fields)?;
    let stored = store.import(row).await?;
    tracing::debug!(id = stored.id, title = %stored.title, "imported bookmark");
    imported += 1;
  }
  Ok(imported)
}

/// Serialise the whole store back into the import format, in insertion
/// order. An exported file re-imports faithfully into an empty store.
pub async fn export_csv<S: BookmarkStore>(store: &S) -> Result<String> {
  let mut out = String::new();
  out.push_str(&HEADER.join("|"));
  out.push('\n');
  for summary in store.list().await? {
    let record = store.get(summary.id).await?;
    write_record(&mut out, &record);
  }
  Ok(out)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn record(input: &str) -> Option<Vec<String>> {
    Reader::new(input).read_record().unwrap()
  }

  fn fields(row: &[&str]) -> Vec<String> {
    row.iter().map(|s| s.to_string()).collect()
  }

  // ── Reader ────────────────────────────────────────────────────────

  #[test]
  fn empty_input_yields_no_record() {
    assert_eq!(record(""), None);
    assert_eq!(record("\n\n"), None);
  }

  #[test]
  fn plain_fields_split_on_pipe() {
    assert_eq!(
      record("a|b|c\n"),
      Some(vec!["a".into(), "b".into(), "c".into()])
    );
  }

  #[test]
  fn empty_fields_are_preserved() {
    assert_eq!(
      record("a||c\n"),
      Some(vec!["a".into(), "".into(), "c".into()])
    );
  }

  #[test]
  fn quoted_field_may_contain_the_delimiter() {
    assert_eq!(record("\"a|b\"|c\n"), Some(vec!["a|b".into(), "c".into()]));
  }

  #[test]
  fn doubled_quote_unescapes() {
    assert_eq!(
      record("\"say \"\"hi\"\"\"|x\n"),
      Some(vec!["say \"hi\"".into(), "x".into()])
    );
  }

  #[test]
  fn quoted_field_may_span_lines() {
    assert_eq!(record("\"a\nb\"|c\n"), Some(vec!["a\nb".into(), "c".into()]));
  }

  #[test]
  fn crlf_ends_a_record() {
    assert_eq!(record("a|b\r\nc|d\n"), Some(vec!["a".into(), "b".into()]));
  }

  #[test]
  fn missing_final_newline_is_fine() {
    assert_eq!(record("a|b"), Some(vec!["a".into(), "b".into()]));
  }

  #[test]
  fn unterminated_quote_is_an_error() {
    let r = Reader::new("\"abc").read_record();
    assert!(matches!(r, Err(Error::Format(_))));
  }

  #[test]
  fn reader_walks_successive_records() {
    let mut r = Reader::new("a|b\nc|d\n");
    assert_eq!(r.read_record().unwrap(), Some(vec!["a".into(), "b".into()]));
    assert_eq!(r.read_record().unwrap(), Some(vec!["c".into(), "d".into()]));
    assert_eq!(r.read_record().unwrap(), None);
  }

  #[test]
  fn blank_lines_between_records_are_skipped() {
    let mut r = Reader::new("a|b\n\n\nc|d\n");
    assert_eq!(r.read_record().unwrap(), Some(vec!["a".into(), "b".into()]));
    assert_eq!(r.read_record().unwrap(), Some(vec!["c".into(), "d".into()]));
  }

  // ── Row parsing ───────────────────────────────────────────────────

  #[test]
  fn row_with_all_columns_parses() {
    let row = fields(&[
      "test title",
      "https://test.com",
      "tag",
      "test Note",
      "",
      "2020-03-04T18:23:43Z",
      "2020-03-04T18:23:43Z",
    ]);
    let bm = parse_row(&row).unwrap();
    assert_eq!(bm.title, "test title");
    assert_eq!(bm.url, "https://test.com");
    assert_eq!(bm.tags, vec!["tag"]);
    assert_eq!(bm.notes, "test Note");
    assert_eq!(bm.document, "");
    assert_eq!(
      bm.created_at,
      Utc.with_ymd_and_hms(2020, 3, 4, 18, 23, 43).unwrap()
    );
    assert_eq!(bm.created_at, bm.updated_at);
  }

  #[test]
  fn tags_split_on_semicolons() {
    let row = fields(&[
      "t", "u", "rust;async;db", "", "", "2020-01-01T00:00:00Z",
      "2020-01-01T00:00:00Z",
    ]);
    let bm = parse_row(&row).unwrap();
    assert_eq!(bm.tags, vec!["rust", "async", "db"]);
  }

  #[test]
  fn empty_tags_field_means_no_tags() {
    let row = fields(&[
      "t", "u", "", "", "", "2020-01-01T00:00:00Z", "2020-01-01T00:00:00Z",
    ]);
    let bm = parse_row(&row).unwrap();
    assert!(bm.tags.is_empty());
  }

  #[test]
  fn bad_timestamp_is_a_format_error_naming_the_column() {
    let row = fields(&[
      "t", "u", "", "", "", "not-a-time", "2020-01-01T00:00:00Z",
    ]);
    let err = parse_row(&row).unwrap_err();
    let Error::Format(msg) = err else {
      panic!("expected Format")
    };
    assert!(msg.contains("created_at"));
  }

  #[test]
  fn short_row_is_a_format_error() {
    let err = parse_row(&fields(&["t", "u"])).unwrap_err();
    assert!(matches!(err, Error::Format(_)));
  }

  // ── Writer ────────────────────────────────────────────────────────

  #[test]
  fn write_field_quotes_only_when_needed() {
    let mut out = String::new();
    write_field(&mut out, "plain");
    assert_eq!(out, "plain");

    out.clear();
    write_field(&mut out, "a|b");
    assert_eq!(out, "\"a|b\"");

    out.clear();
    write_field(&mut out, "say \"hi\"");
    assert_eq!(out, "\"say \"\"hi\"\"\"");
  }

  #[test]
  fn timestamps_export_with_z_suffix() {
    let bm = sample_bookmark();
    let mut out = String::new();
    write_record(&mut out, &bm);
    assert!(out.contains("2020-03-04T18:23:43Z"));
  }

  #[test]
  fn written_record_reads_back_identically() {
    let mut bm = sample_bookmark();
    bm.title = "pipe | in title".to_string();
    bm.notes = "line one\nline two".to_string();
    let mut out = String::new();
    write_record(&mut out, &bm);

    let row = Reader::new(&out).read_record().unwrap().unwrap();
    let back = parse_row(&row).unwrap();
    assert_eq!(back.title, bm.title);
    assert_eq!(back.url, bm.url);
    assert_eq!(back.tags, bm.tags);
    assert_eq!(back.notes, bm.notes);
    assert_eq!(back.document, bm.document);
    assert_eq!(back.created_at, bm.created_at);
    assert_eq!(back.updated_at, bm.updated_at);
  }

  fn sample_bookmark() -> Bookmark {
    let at = Utc.with_ymd_and_hms(2020, 3, 4, 18, 23, 43).unwrap();
    Bookmark {
      id:         1,
      title:      "test title".to_string(),
      url:        "https://test.com".to_string(),
      tags:       vec!["rust".to_string(), "async".to_string()],
      notes:      "test Note".to_string(),
      document:   String::new(),
      created_at: at,
      updated_at: at,
    }
  }
}
