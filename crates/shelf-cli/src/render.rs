//! Plain-text output for bookmark records.

use anyhow::{Result, bail};
use shelf_core::bookmark::{Bookmark, BookmarkSummary};

/// Column order used by `list` when `--fields` is not given.
pub const DEFAULT_FIELDS: &str = "id;title;url;tags;created_at;updated_at";

/// Print one full record, one field per line. The cached document is
/// summarised by size rather than dumped.
pub fn print_bookmark(bookmark: &Bookmark) {
  println!("id:          {}", bookmark.id);
  println!("title:       {}", bookmark.title);
  println!("url:         {}", bookmark.url);
  println!("tags:        {}", bookmark.tags.join(";"));
  println!("notes:       {}", bookmark.notes);
  println!("created_at:  {}", bookmark.created_at.to_rfc3339());
  println!("updated_at:  {}", bookmark.updated_at.to_rfc3339());
  if !bookmark.document.is_empty() {
    println!("document:    {} bytes cached", bookmark.document.len());
  }
}

/// Print the selected columns of each summary, tab-separated, one
/// record per line.
pub fn print_summaries(
  summaries: &[BookmarkSummary],
  selector: &str,
) -> Result<()> {
  let fields = parse_fields(selector)?;
  for summary in summaries {
    let row: Vec<String> = fields.iter().map(|f| f.extract(summary)).collect();
    println!("{}", row.join("\t"));
  }
  Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
  Id,
  Title,
  Url,
  Tags,
  CreatedAt,
  UpdatedAt,
}

impl Field {
  fn parse(name: &str) -> Result<Self> {
    Ok(match name {
      "id" => Field::Id,
      "title" => Field::Title,
      "url" => Field::Url,
      "tags" => Field::Tags,
      "created_at" => Field::CreatedAt,
      "updated_at" => Field::UpdatedAt,
      other => {
        bail!("unknown field {other:?} (expected one of {DEFAULT_FIELDS})")
      }
    })
  }

  fn extract(&self, summary: &BookmarkSummary) -> String {
    match self {
      Field::Id => summary.id.to_string(),
      Field::Title => summary.title.clone(),
      Field::Url => summary.url.clone(),
      Field::Tags => summary.tags.join(";"),
      Field::CreatedAt => summary.created_at.to_rfc3339(),
      Field::UpdatedAt => summary.updated_at.to_rfc3339(),
    }
  }
}

fn parse_fields(selector: &str) -> Result<Vec<Field>> {
  let fields = selector
    .split(';')
    .map(str::trim)
    .filter(|name| !name.is_empty())
    .map(Field::parse)
    .collect::<Result<Vec<_>>>()?;
  if fields.is_empty() {
    bail!("no fields selected");
  }
  Ok(fields)
}
