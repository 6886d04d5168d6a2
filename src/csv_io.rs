// CSV import/export for the roster and grouping results.
//
// Import takes the first field of each line as the name (quoting disabled --
// the format is "substring before the first comma", not full CSV). Export
// emits a UTF-8 BOM, a fixed header row, then one row per (team, member)
// pair; the byte sequence is what Excel expects for UTF-8 CSV.

use std::io::Read;

use chrono::NaiveDate;
use tracing::warn;

use crate::grouping::Team;

/// Byte-order mark prepended to exports so spreadsheet tools pick up UTF-8.
pub const UTF8_BOM: &str = "\u{feff}";

/// Fixed export header row: group column, member-name column.
pub const EXPORT_HEADER: [&str; 2] = ["組別", "成員姓名"];

/// Header-like tokens dropped during roster import (case-insensitive).
const HEADER_TOKENS: [&str; 2] = ["姓名", "name"];

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Tokenize free-text pasted names: split on newline or comma, trim each
/// token, drop empties. No quoting support.
pub fn parse_pasted_names(text: &str) -> Vec<String> {
    text.split(['\n', ','])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse roster CSV text: the first field of each non-blank line is the name
/// candidate. Handles both `\n` and `\r\n` line endings. Names that are
/// empty after trimming, or that match a known header token, are dropped.
pub fn parse_roster_csv<R: Read>(rdr: R) -> Result<Vec<String>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(rdr);

    let mut names = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => {
                let name = record.get(0).unwrap_or("").trim();
                if name.is_empty() || is_header_token(name) {
                    continue;
                }
                names.push(name.to_string());
            }
            Err(e) => {
                warn!("skipping malformed CSV row: {}", e);
            }
        }
    }
    Ok(names)
}

fn is_header_token(name: &str) -> bool {
    HEADER_TOKENS
        .iter()
        .any(|token| name.eq_ignore_ascii_case(token))
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Encode a grouping result as the export byte sequence: BOM, header row,
/// then `teamName,memberName` rows in team order then member order.
pub fn encode_teams(teams: &[Team]) -> Result<Vec<u8>, csv::Error> {
    let mut buf: Vec<u8> = Vec::from(UTF8_BOM.as_bytes());
    {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(&mut buf);
        writer.write_record(EXPORT_HEADER)?;
        for team in teams {
            for member in &team.members {
                writer.write_record([team.name.as_str(), member.name.as_str()])?;
            }
        }
        writer.flush()?;
    }
    Ok(buf)
}

/// Decode an export blob back into ordered `(team name, member name)` pairs,
/// ignoring the BOM and header row. The inverse of `encode_teams` for the
/// data rows.
pub fn decode_teams(bytes: &[u8]) -> Result<Vec<(String, String)>, csv::Error> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(&text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());

    let mut pairs = Vec::new();
    for result in reader.records() {
        let record = result?;
        let team = record.get(0).unwrap_or("").to_string();
        let member = record.get(1).unwrap_or("").to_string();
        pairs.push((team, member));
    }
    Ok(pairs)
}

/// Export file name for a grouping run on the given date.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("分組結果_{}.csv", date.format("%Y-%m-%d"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
