use narrator_batch::JobGroup;
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Strategy for generating group names usable as directory names
pub fn group_name_strategy() -> impl Strategy<Value = String> {
    "[a-z]{2}"
}

/// Strategy for generating job identifiers usable as file stems
pub fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,11}"
}

/// Strategy for generating non-blank payload texts
pub fn payload_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ,.!?]{0,30}"
}

/// Strategy for generating a batch of groups with unique names and identifiers
pub fn job_groups_strategy() -> impl Strategy<Value = Vec<JobGroup>> {
    prop::collection::btree_map(
        group_name_strategy(),
        prop::collection::btree_map(identifier_strategy(), payload_strategy(), 0..6),
        1..4,
    )
    .prop_map(|groups: BTreeMap<String, BTreeMap<String, String>>| {
        groups
            .into_iter()
            .map(|(name, jobs)| {
                let parameter = format!("voice-{name}");
                JobGroup::from_entries(name, parameter, jobs).unwrap()
            })
            .collect()
    })
}

/// A batch plus one flag per job: `(seeded, failing)`
///
/// Seeded jobs get an artifact before the run; failing jobs make the
/// converter return an error.
pub fn batch_scenario_strategy() -> impl Strategy<Value = (Vec<JobGroup>, Vec<(bool, bool)>)> {
    job_groups_strategy().prop_flat_map(|groups| {
        let total = groups.iter().map(JobGroup::len).sum::<usize>();
        (
            Just(groups),
            prop::collection::vec((any::<bool>(), any::<bool>()), total),
        )
    })
}
