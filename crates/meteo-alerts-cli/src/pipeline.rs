//! Feed items → assembled records → time filter.

use meteo_alerts::{assemble_all, AlertRecord, RawItem, Strategy};
use tracing::{info, warn};

use crate::filter::{self, Cutoff};

/// Counts reported after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub items: usize,
    pub failed: usize,
    pub kept: usize,
}

/// Assemble every item and apply the optional cutoff.
///
/// Items whose description cannot be parsed still produce a record with
/// their pass-through fields; the failure is logged and counted.
pub fn process(
    items: &[RawItem],
    strategy: Strategy,
    cutoff: Option<&Cutoff>,
) -> (Vec<AlertRecord>, Summary) {
    let assemblies = assemble_all(items, strategy);

    let mut failed = 0;
    let mut records = Vec::with_capacity(assemblies.len());
    for assembly in assemblies {
        if let Some(err) = &assembly.error {
            failed += 1;
            warn!(title = %assembly.record.title, error = %err, "could not extract alert table");
        }
        records.push(assembly.record);
    }

    let records = filter::apply(records, cutoff);
    let summary = Summary {
        items: items.len(),
        failed,
        kept: records.len(),
    };
    info!(
        items = summary.items,
        failed = summary.failed,
        kept = summary.kept,
        %strategy,
        "processed alert feed"
    );
    (records, summary)
}
