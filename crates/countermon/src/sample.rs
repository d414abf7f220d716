//! Parsing of the sampler's tabular output.
//!
//! `typeperf` prints comma-separated rows with every field double-quoted:
//! a header row naming the counters (first column is the PDH timestamp
//! column), then one row of raw values per sample. On normal termination it
//! prints a sentinel row beginning with `Exiting`; nothing after that row is
//! data, even if more text follows.

/// Prefix of the sentinel row marking normal sampler termination.
pub const SENTINEL_PREFIX: &str = "Exiting";

/// One parsed sampling pass: the machine-qualified counter paths from the
/// header, plus the raw value rows aligned with them. The timestamp column
/// is dropped from both.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Sample {
    counters: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Sample {
    /// Parses raw sampler output.
    ///
    /// Lines are consumed until the sentinel row or end of input. Output
    /// with no header or no data rows yields an empty sample; the caller
    /// decides what an empty run means (zero metrics, passing status).
    pub fn parse(raw: &str) -> Sample {
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

        let mut counters: Vec<String> = Vec::new();
        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut saw_header = false;

        for line in raw.lines() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            if line.trim_start_matches('"').starts_with(SENTINEL_PREFIX) {
                break;
            }

            let mut fields = split_fields(line);
            // Drop the timestamp column (header label / per-row timestamp).
            fields.remove(0);

            if !saw_header {
                counters = fields;
                saw_header = true;
                continue;
            }

            if fields.len() != counters.len() {
                tracing::warn!(
                    expected = counters.len(),
                    got = fields.len(),
                    "Row width differs from header; unmatched cells are ignored"
                );
            }
            rows.push(fields);
        }

        Sample { counters, rows }
    }

    /// Iterates over every (counter path, raw value) cell across all rows,
    /// in row order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.rows.iter().flat_map(move |row| {
            self.counters
                .iter()
                .zip(row.iter())
                .map(|(c, v)| (c.as_str(), v.as_str()))
        })
    }

    /// Counter paths from the header row.
    pub fn counters(&self) -> &[String] {
        &self.counters
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the pass produced no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Splits one output line into fields, honoring double-quoting. A doubled
/// quote inside a quoted field is an escaped quote.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TYPICAL: &str = concat!(
        "\"(PDH-CSV 4.0)\",\"\\\\WEB01\\Memory\\Available MBytes\",",
        "\"\\\\WEB01\\Processor(_Total)\\% Processor Time\"\n",
        "\"06/17/2015 12:00:00.000\",\"4242.000000\",\"3.141590\"\n",
        "Exiting, please wait...\n",
    );

    #[test]
    fn test_parse_typical_output() {
        let sample = Sample::parse(TYPICAL);

        assert_eq!(sample.row_count(), 1);
        assert_eq!(
            sample.counters(),
            &[
                r"\\WEB01\Memory\Available MBytes".to_string(),
                r"\\WEB01\Processor(_Total)\% Processor Time".to_string(),
            ]
        );
        let cells: Vec<_> = sample.cells().collect();
        assert_eq!(
            cells,
            vec![
                (r"\\WEB01\Memory\Available MBytes", "4242.000000"),
                (r"\\WEB01\Processor(_Total)\% Processor Time", "3.141590"),
            ]
        );
    }

    #[test]
    fn test_sentinel_stops_processing() {
        let raw = concat!(
            "\"(PDH-CSV 4.0)\",\"\\\\H\\Memory\\Available MBytes\"\n",
            "\"06/17/2015 12:00:00.000\",\"100.0\"\n",
            "\"Exiting, please wait...\"\n",
            "\"06/17/2015 12:00:01.000\",\"200.0\"\n",
        );
        let sample = Sample::parse(raw);

        assert_eq!(sample.row_count(), 1);
        let cells: Vec<_> = sample.cells().collect();
        assert_eq!(cells, vec![(r"\\H\Memory\Available MBytes", "100.0")]);
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let raw = "\r\n\"(PDH-CSV 4.0)\",\"\\\\H\\System\\Processes\"\r\n\"06/17/2015 12:00:00.000\",\"321.0\"\r\n";
        let sample = Sample::parse(raw);

        assert_eq!(sample.row_count(), 1);
        assert_eq!(sample.cells().next(), Some((r"\\H\System\Processes", "321.0")));
    }

    #[test]
    fn test_bom_is_stripped() {
        let raw = "\u{feff}\"(PDH-CSV 4.0)\",\"\\\\H\\System\\Processes\"\n\"t\",\"1.0\"\n";
        let sample = Sample::parse(raw);
        assert_eq!(sample.cells().next(), Some((r"\\H\System\Processes", "1.0")));
    }

    #[test]
    fn test_empty_output_is_empty_sample() {
        assert!(Sample::parse("").is_empty());
        assert!(Sample::parse("\n\n").is_empty());
    }

    #[test]
    fn test_header_only_is_empty_sample() {
        let raw = "\"(PDH-CSV 4.0)\",\"\\\\H\\System\\Processes\"\nExiting, please wait...\n";
        let sample = Sample::parse(raw);
        assert!(sample.is_empty());
        assert_eq!(sample.counters().len(), 1);
    }

    #[test]
    fn test_split_fields_quoted_comma() {
        assert_eq!(
            split_fields("\"a\",\"b,c\",\"d\""),
            vec!["a", "b,c", "d"]
        );
    }

    #[test]
    fn test_split_fields_escaped_quote() {
        assert_eq!(split_fields("\"a\"\"b\",\"c\""), vec!["a\"b", "c"]);
    }

    #[test]
    fn test_split_fields_unquoted() {
        assert_eq!(split_fields("a,b"), vec!["a", "b"]);
    }

    #[test]
    fn test_short_row_ignores_missing_cells() {
        let raw = concat!(
            "\"(PDH-CSV 4.0)\",\"\\\\H\\A\\B\",\"\\\\H\\C\\D\"\n",
            "\"t\",\"1.0\"\n",
        );
        let sample = Sample::parse(raw);
        let cells: Vec<_> = sample.cells().collect();
        assert_eq!(cells, vec![(r"\\H\A\B", "1.0")]);
    }
}
