//! Rule set change detection

use crate::core::models::Rule;
use std::collections::HashMap;

/// Whether `new` differs from `old` in a way that invalidates counters
///
/// Rules are matched by id. A differing count, a new id, or a differing
/// payload, priority or status counts as a change. Payloads compare
/// structurally, so re-encoding a rule is never a change. Names and
/// timestamps are ignored.
pub fn changed(old: &[Rule], new: &[Rule]) -> bool {
    if old.len() != new.len() {
        return true;
    }

    let old_by_id: HashMap<i32, &Rule> = old.iter().map(|r| (r.rule_id, r)).collect();
    new.iter().any(|rule| match old_by_id.get(&rule.rule_id) {
        None => true,
        Some(previous) => {
            previous.config != rule.config
                || previous.priority != rule.priority
                || previous.status != rule.status
        }
    })
}
