// Cell normalization: turns raw name/tag cells into display entries.
//
// Steps, in order (each toggleable through `NormalizeOptions`):
//   1. drop rows missing the name or tag cell
//   2. recode the name through the source encoding into UTF-8
//   3. strip all whitespace from both cells
//   4. drop rows whose tag is an excluded sentinel (default "PT")
//   5. format as "{name}{sep}({tag})", or just "{name}" without a tag column
//   6. apply literal artifact fixes (default "TM(" -> " (")
//   7. collapse spaces and re-split at lowercase->uppercase transitions

use crate::config::Config;
use crate::table::DecodedTable;

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeOptions {
    pub name_column: usize,
    /// `None` runs in name-only mode.
    pub tag_column: Option<usize>,
    pub recode_names: bool,
    pub strip_whitespace: bool,
    pub excluded_tags: Vec<String>,
    pub tag_separator: String,
    pub artifact_fixes: Vec<(String, String)>,
    pub split_case_transitions: bool,
    /// Cell values treated as absent, e.g. `""` or `"NA"`.
    pub missing_markers: Vec<String>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        NormalizeOptions::from_config(&Config::default())
    }
}

impl NormalizeOptions {
    pub fn from_config(config: &Config) -> Self {
        let n = &config.normalize;
        NormalizeOptions {
            name_column: config.columns.name,
            tag_column: config.columns.tag_column(),
            recode_names: n.recode_names,
            strip_whitespace: n.strip_whitespace,
            excluded_tags: n.excluded_tags.clone(),
            tag_separator: n.tag_separator.clone(),
            artifact_fixes: n.artifact_fixes.clone(),
            split_case_transitions: n.split_case_transitions,
            missing_markers: n.missing_markers.clone(),
        }
    }

    /// Minimum table width needed to address every configured column.
    pub fn required_columns(&self) -> usize {
        self.tag_column
            .map_or(self.name_column, |tag| tag.max(self.name_column))
            + 1
    }

    fn cell<'a>(&self, row: &'a [String], column: usize) -> Option<&'a str> {
        row.get(column)
            .map(String::as_str)
            .filter(|value| !self.missing_markers.iter().any(|m| m == value))
    }
}

/// Entries produced from one table, with counts of what was left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub entries: Vec<String>,
    /// Rows missing a required cell (or whose name cleaned down to nothing).
    pub missing: usize,
    /// Rows dropped by the excluded-tag rule.
    pub excluded: usize,
}

/// Run the normalization steps over every row of `table`, preserving row order.
pub fn normalize_rows(table: &DecodedTable, opts: &NormalizeOptions) -> Normalized {
    let mut out = Normalized::default();

    for row in &table.rows {
        let Some(raw_name) = opts.cell(row, opts.name_column) else {
            out.missing += 1;
            continue;
        };
        let raw_tag = match opts.tag_column {
            Some(column) => match opts.cell(row, column) {
                Some(tag) => Some(tag),
                None => {
                    out.missing += 1;
                    continue;
                }
            },
            None => None,
        };

        let mut name = if opts.recode_names {
            table.recode(raw_name)
        } else {
            raw_name.to_string()
        };
        let mut tag = raw_tag.map(str::to_string);

        if opts.strip_whitespace {
            name = strip_whitespace(&name);
            tag = tag.as_deref().map(strip_whitespace);
        }

        if name.is_empty() {
            out.missing += 1;
            continue;
        }

        if let Some(t) = &tag {
            if opts.excluded_tags.iter().any(|excluded| excluded == t) {
                out.excluded += 1;
                continue;
            }
        }

        let mut entry = format_entry(&name, tag.as_deref(), &opts.tag_separator);
        entry = apply_artifact_fixes(&entry, &opts.artifact_fixes);
        if opts.split_case_transitions {
            entry = split_case_transitions(&entry);
        }
        out.entries.push(entry);
    }

    out
}

// ---------------------------------------------------------------------------
// Pure string transforms
// ---------------------------------------------------------------------------

/// Remove every whitespace character, not only the ends.
pub fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// `"{name}{sep}({tag})"`, or the bare name when there is no tag.
pub fn format_entry(name: &str, tag: Option<&str>, separator: &str) -> String {
    match tag {
        Some(tag) => format!("{name}{separator}({tag})"),
        None => name.to_string(),
    }
}

/// Apply each `(from, to)` replacement in order.
pub fn apply_artifact_fixes(s: &str, fixes: &[(String, String)]) -> String {
    fixes
        .iter()
        .fold(s.to_string(), |acc, (from, to)| acc.replace(from.as_str(), to))
}

/// Drop all whitespace, then insert one space wherever a lowercase letter is
/// directly followed by an uppercase one: `DeLaCruz` -> `De La Cruz`.
///
/// Heuristic. Names with intentional inner capitals split wrongly
/// (`McDonald` -> `Mc Donald`), and lowercase particles stay glued to nothing
/// only when followed by a capital (`vanDijk` -> `van Dijk`).
pub fn split_case_transitions(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev: Option<char> = None;
    for c in s.chars().filter(|c| !c.is_whitespace()) {
        if prev.is_some_and(char::is_lowercase) && c.is_uppercase() {
            out.push(' ');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
