use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::Context;

use crate::fp::Item;
use crate::Result;

/// A parsed pattern file, keyed by sorted itemset.
///
/// Parsing treats format problems as fatal. Inconsistent content (the same
/// itemset appearing twice) is a diagnostic, recorded and carried into the
/// diff report rather than aborting the run.
#[derive(Debug, Default)]
pub struct PatternSet {
    patterns: BTreeMap<Vec<Item>, f64>,
    duplicates: Vec<Vec<Item>>,
}

impl PatternSet {
    /// Parse `item,item,...:support` lines.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut set = PatternSet::default();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("reading pattern line {}", line_no + 1))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (items_part, support_part) = line
                .split_once(':')
                .with_context(|| format!("line {}: missing ':' separator", line_no + 1))?;
            let support: f64 = support_part
                .trim()
                .parse()
                .with_context(|| format!("line {}: invalid support {support_part:?}", line_no + 1))?;

            let mut items = Vec::new();
            for token in items_part.split(',') {
                let item = token
                    .trim()
                    .parse::<usize>()
                    .with_context(|| format!("line {}: invalid item {token:?}", line_no + 1))?;
                items.push(item);
            }
            items.sort_unstable();

            if set.patterns.insert(items.clone(), support).is_some() {
                set.duplicates.push(items);
            }
        }
        Ok(set)
    }

    pub fn parse_file(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Self::parse(BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Support of an itemset, if present. `items` need not be sorted.
    pub fn support(&self, items: &[Item]) -> Option<f64> {
        let mut key = items.to_vec();
        key.sort_unstable();
        self.patterns.get(&key).copied()
    }

    pub fn duplicates(&self) -> &[Vec<Item>] {
        &self.duplicates
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Vec<Item>, f64)> {
        self.patterns.iter().map(|(items, &support)| (items, support))
    }

    /// Compare this set against the expected one, collecting every
    /// discrepancy rather than stopping at the first.
    pub fn diff(&self, expected: &Self) -> DiffReport {
        let mut report = DiffReport {
            duplicates: self.duplicates.clone(),
            ..DiffReport::default()
        };

        for (items, support) in &self.patterns {
            match expected.patterns.get(items) {
                None => report.unexpected.push(items.clone()),
                // Both sides come from the same 4-decimal rendering, so
                // matching supports are bit-identical after parsing.
                Some(&want) if want != *support => {
                    report.mismatched.push((items.clone(), *support, want));
                }
                Some(_) => {}
            }
        }
        for items in expected.patterns.keys() {
            if !self.patterns.contains_key(items) {
                report.missing.push(items.clone());
            }
        }
        report
    }
}

/// Discrepancies between an emitted pattern set and the expected one.
#[derive(Debug, Default)]
pub struct DiffReport {
    pub missing: Vec<Vec<Item>>,
    pub unexpected: Vec<Vec<Item>>,
    pub mismatched: Vec<(Vec<Item>, f64, f64)>,
    pub duplicates: Vec<Vec<Item>>,
}

impl DiffReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty()
            && self.unexpected.is_empty()
            && self.mismatched.is_empty()
            && self.duplicates.is_empty()
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for items in &self.duplicates {
            writeln!(f, "repeated pattern: {}", render_items(items))?;
        }
        for items in &self.missing {
            writeln!(f, "missing pattern: {}", render_items(items))?;
        }
        for items in &self.unexpected {
            writeln!(f, "unexpected pattern: {}", render_items(items))?;
        }
        for (items, got, want) in &self.mismatched {
            writeln!(
                f,
                "support mismatch for {}: got {got:.4}, expected {want:.4}",
                render_items(items)
            )?;
        }
        Ok(())
    }
}

fn render_items(items: &[Item]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sorts_itemsets() {
        let set = PatternSet::parse("3,1,2:0.5000\n7:1.0000\n".as_bytes()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.support(&[2, 3, 1]), Some(0.5));
        assert_eq!(set.support(&[7]), Some(1.0));
        assert_eq!(set.support(&[9]), None);
    }

    #[test]
    fn duplicate_patterns_are_diagnostics_not_errors() {
        let set = PatternSet::parse("1,2:0.5000\n2,1:0.5000\n".as_bytes()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.duplicates(), &[vec![1, 2]]);
        assert!(!set.diff(&set).is_clean());
    }

    #[test]
    fn diff_reports_every_discrepancy() {
        let actual = PatternSet::parse("1:0.5000\n2:0.2500\n1,2:0.2500\n".as_bytes()).unwrap();
        let expected = PatternSet::parse("1:0.5000\n2:0.5000\n3:0.2500\n".as_bytes()).unwrap();

        let report = actual.diff(&expected);
        assert_eq!(report.missing, vec![vec![3]]);
        assert_eq!(report.unexpected, vec![vec![1, 2]]);
        assert_eq!(report.mismatched, vec![(vec![2], 0.25, 0.5)]);
        assert!(!report.is_clean());

        let rendered = report.to_string();
        assert!(rendered.contains("missing pattern: 3"));
        assert!(rendered.contains("support mismatch for 2"));
    }

    #[test]
    fn malformed_lines_are_fatal() {
        assert!(PatternSet::parse("1,2\n".as_bytes()).is_err());
        assert!(PatternSet::parse("1,x:0.5\n".as_bytes()).is_err());
        assert!(PatternSet::parse("1:high\n".as_bytes()).is_err());
    }
}
