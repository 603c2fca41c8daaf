use anyhow::{Result, bail};

/// Overall ranking fields every export carries alongside the per-section sets.
pub const RANK: &str = "Rank";
pub const OVERALL_NAME: &str = "Score Name";
pub const OVERALL_SCORE: &str = "Score(100%)";
pub const SECTIONS_TOTAL: &str = "Sections(60%)";
pub const COMPOSITION_TOTAL: &str = "Composition(40%)";

pub const SECTION_COUNT: usize = 6;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

/// Positional fields aligned with the owning table's header list.
/// Immutable once parsed; sorting produces index views, never touches records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<String>,
}

impl Record {
    pub fn field(&self, idx: usize) -> &str {
        self.fields.get(idx).map(String::as_str).unwrap_or("")
    }
}

impl Table {
    pub fn header_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Value of `header` on `record`, empty text on any miss.
    pub fn value<'a>(&self, record: &'a Record, header: &str) -> &'a str {
        self.header_index(header)
            .map(|idx| record.field(idx))
            .unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parse the wide-horizontal rankings export. First line is the header row,
/// every following line one positional record. No quoted-field support:
/// values containing literal commas will misalign columns (known limitation
/// of the export format, tolerated rather than fixed).
///
/// Only a dataset with zero non-blank lines is an error; malformed rows
/// degrade to empty fields.
pub fn parse_table(raw: &str) -> Result<Table> {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        // Some exports terminate every line with a '$' sentinel.
        .map(|line| line.strip_suffix('$').unwrap_or(line))
        .collect();

    let Some((header_line, data_lines)) = lines.split_first() else {
        bail!("rankings data has no header row");
    };

    let headers: Vec<String> = header_line
        .split(',')
        .map(|h| h.trim().to_string())
        .collect();

    let records = data_lines
        .iter()
        .map(|line| {
            let cols: Vec<&str> = line.split(',').collect();
            let fields = (0..headers.len())
                .map(|i| cols.get(i).map(|v| v.trim()).unwrap_or("").to_string())
                .collect();
            Record { fields }
        })
        .collect();

    Ok(Table { headers, records })
}

pub fn section_name_header(section: usize) -> String {
    format!("S{section} Name")
}

pub fn section_score_header(section: usize) -> String {
    format!("S{section} Score")
}

pub fn section_trick_header(section: usize) -> String {
    format!("S{section} Trick")
}

/// Headers `S1 Name` .. `S6 Name` carry per-section competitor names.
pub fn is_section_name_header(header: &str) -> bool {
    section_header_index(header, " Name").is_some()
}

pub fn is_section_trick_header(header: &str) -> bool {
    section_header_index(header, " Trick").is_some()
}

fn section_header_index(header: &str, suffix: &str) -> Option<usize> {
    let rest = header.trim().strip_prefix('S')?.strip_suffix(suffix)?;
    let section = rest.parse::<usize>().ok()?;
    (1..=SECTION_COUNT).contains(&section).then_some(section)
}

/// Any column whose title contains the word `Name` holds competitor names
/// (the per-section sets plus the overall `Score Name` column).
pub fn is_name_header(header: &str) -> bool {
    header
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|word| word == "Name")
}
