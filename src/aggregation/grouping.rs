//! Per-group fee tallies.
//!
//! Students are tallied into named groups (class names, levels) in a single
//! pass; groups come out sorted by name so report output is deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::rounding::whole_percent;

/// Fee collection figures for one class or level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeGroupSummary {
    /// The class name or level name.
    pub name: String,
    /// Students counted in the group.
    pub total: usize,
    /// Students in the group with a payment in the month.
    pub paid: usize,
    /// Students in the group without a payment in the month.
    pub unpaid: usize,
    /// `paid / total` as a whole percent; 0 when the group is empty.
    pub rate: u32,
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    paid: usize,
    unpaid: usize,
}

/// Accumulates paid/unpaid counts per group name.
#[derive(Debug, Default)]
pub(crate) struct FeeGroupAccumulator<'a> {
    groups: BTreeMap<&'a str, Tally>,
}

impl<'a> FeeGroupAccumulator<'a> {
    /// Makes sure a group is reported even if nothing is recorded into it.
    pub(crate) fn seed(&mut self, name: &'a str) {
        self.groups.entry(name).or_default();
    }

    /// Counts one student into a group.
    pub(crate) fn record(&mut self, name: &'a str, paid: bool) {
        let tally = self.groups.entry(name).or_default();
        if paid {
            tally.paid += 1;
        } else {
            tally.unpaid += 1;
        }
    }

    /// Produces the summaries, sorted by group name.
    pub(crate) fn finish(self) -> Vec<FeeGroupSummary> {
        self.groups
            .into_iter()
            .map(|(name, tally)| {
                let total = tally.paid + tally.unpaid;
                FeeGroupSummary {
                    name: name.to_string(),
                    total,
                    paid: tally.paid,
                    unpaid: tally.unpaid,
                    rate: whole_percent(tally.paid, total),
                }
            })
            .collect()
    }
}
