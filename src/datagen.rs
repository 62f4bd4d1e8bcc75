use std::io::{self, Write};

use rand::seq::index;
use rand::Rng;

use crate::fp::Transaction;

/// Draw `count` random transactions over items `0..universe`, each holding a
/// uniform number of distinct items in `1..=max_len`.
pub fn generate_transactions<R: Rng>(
    rng: &mut R,
    count: usize,
    universe: usize,
    max_len: usize,
) -> Vec<Transaction> {
    let max_len = max_len.min(universe).max(1);
    (0..count)
        .map(|_| {
            let len = rng.random_range(1..=max_len);
            index::sample(rng, universe, len).into_iter().collect()
        })
        .collect()
}

/// Render transactions as comma-separated lines, the shape the input
/// collaborator reads back.
pub fn write_transactions<W: Write>(writer: &mut W, transactions: &[Transaction]) -> io::Result<()> {
    for trxn in transactions {
        let mut first = true;
        for &item in trxn {
            if first {
                write!(writer, "{item}")?;
                first = false;
            } else {
                write!(writer, ",{item}")?;
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}
