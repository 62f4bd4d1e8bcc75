use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::Context;

use crate::fp::{FrequencyTable, Transaction};
use crate::Result;

/// Read comma-separated integer transactions, one per line, counting item
/// frequencies in the same pass.
///
/// Malformed tokens are fatal; the error carries the line and token. Blank
/// lines are skipped.
pub fn read_transactions<R: BufRead>(reader: R) -> Result<(Vec<Transaction>, FrequencyTable)> {
    let mut transactions = Vec::new();
    let mut item_freq = FrequencyTable::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading transaction line {}", line_no + 1))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut trxn = Transaction::new();
        for token in line.split(',') {
            let item = token
                .trim()
                .parse::<usize>()
                .with_context(|| format!("line {}: invalid item {token:?}", line_no + 1))?;
            item_freq.add(item, 1);
            trxn.push(item);
        }
        transactions.push(trxn);
    }

    Ok((transactions, item_freq))
}

pub fn read_transactions_file(path: &Path) -> Result<(Vec<Transaction>, FrequencyTable)> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_transactions(BufReader::new(file))
}
