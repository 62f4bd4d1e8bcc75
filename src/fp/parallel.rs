use std::io::Write;

use anyhow::anyhow;
use tracing::debug;

use crate::output::{PatternBuffer, PatternSink};
use crate::Result;

use super::combinations::{enumerate_from, split_units, Unit};
use super::freq::Item;

/// Upper bound on combination workers regardless of core count.
pub const MAX_WORKERS: usize = 16;

/// Private buffer size; a worker hands its buffer to the sink when it fills.
pub const FLUSH_CAPACITY: usize = 64 * 1024;

/// Chains shorter than this are enumerated on the caller's thread; the whole
/// enumeration is cheaper than spawning workers for it.
const SEQUENTIAL_CUTOFF: usize = 16;

/// Splits single-path power-set enumeration across a fixed set of worker
/// threads, each writing through its own bounded buffer.
pub struct CombinationDispatcher {
    workers: usize,
    flush_capacity: usize,
}

impl CombinationDispatcher {
    /// Size the pool from the requested thread count, defaulting to the
    /// available cores, capped at [`MAX_WORKERS`].
    pub fn new(requested: Option<usize>) -> Self {
        let workers = requested.unwrap_or_else(num_cpus::get).clamp(1, MAX_WORKERS);
        Self {
            workers,
            flush_capacity: FLUSH_CAPACITY,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn flush_capacity(&self) -> usize {
        self.flush_capacity
    }

    /// Emit every non-empty subset of `chain`, extended with `base`, at the
    /// support of its deepest selected node.
    ///
    /// Short chains run on the caller's thread into `caller_buffer`; longer
    /// ones are split into frontier units handed round-robin to scoped
    /// workers. Units partition the subset space, so each pattern is emitted
    /// exactly once either way.
    pub fn enumerate<W: Write + Send>(
        &self,
        chain: &[(Item, usize)],
        base: &[Item],
        sink: &PatternSink<W>,
        caller_buffer: &mut PatternBuffer,
    ) -> Result<()> {
        if self.workers == 1 || chain.len() < SEQUENTIAL_CUTOFF {
            return enumerate_units(chain, base, vec![Unit::root()], sink, caller_buffer);
        }

        let units = split_units(chain.len(), self.workers);
        debug!(
            chain = chain.len(),
            units = units.len(),
            workers = self.workers,
            "splitting single-path enumeration"
        );

        let total = caller_buffer.total();
        let outcome = crossbeam::thread::scope(|s| {
            let handles: Vec<_> = (0..self.workers)
                .map(|worker_id| {
                    let assigned: Vec<Unit> = units
                        .iter()
                        .skip(worker_id)
                        .step_by(self.workers)
                        .cloned()
                        .collect();
                    s.spawn(move |_| -> Result<()> {
                        let mut buffer = PatternBuffer::new(self.flush_capacity, total);
                        enumerate_units(chain, base, assigned, sink, &mut buffer)?;
                        buffer.flush(sink)?;
                        Ok(())
                    })
                })
                .collect();

            let mut first_err = Ok(());
            for handle in handles {
                match handle.join() {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        if first_err.is_ok() {
                            first_err = Err(e);
                        }
                    }
                    Err(_) => {
                        if first_err.is_ok() {
                            first_err = Err(anyhow!("combination worker panicked"));
                        }
                    }
                }
            }
            first_err
        })
        .map_err(|_| anyhow!("combination worker panicked"))?;
        outcome
    }
}

/// Run the sequential enumeration for each assigned unit, formatting into
/// `buffer`. `chosen` indices arrive in descending order, so the deepest
/// selected chain node, whose count is the subset's support, comes first.
fn enumerate_units<W: Write>(
    chain: &[(Item, usize)],
    base: &[Item],
    units: Vec<Unit>,
    sink: &PatternSink<W>,
    buffer: &mut PatternBuffer,
) -> Result<()> {
    let mut scratch: Vec<Item> = Vec::with_capacity(chain.len());
    for unit in units {
        enumerate_from(chain.len(), unit, &mut |chosen| {
            let count = chain[chosen[0]].1;
            scratch.clear();
            scratch.extend(chosen.iter().rev().map(|&pos| chain[pos].0));
            buffer.record(sink, base, &scratch, count)?;
            Ok(())
        })?;
    }
    Ok(())
}
