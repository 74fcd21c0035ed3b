//! Interactive mutual-exclusion engine.
//!
//! Options in the same group are alternatives: once one of them holds an active value,
//! the others are disabled with a reason naming the conflict. Disabling is tracked per
//! group so an option that sits in several groups stays disabled until every group
//! that disabled it lets go.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::registry::OptionName;
use crate::state::OptionValue;

/// A statically defined group of alternative options.
#[derive(Debug, Clone, Copy)]
pub struct ExclusionGroup {
    /// Group identifier used in disable reasons.
    pub name: &'static str,
    /// Members in declaration order.
    pub members: &'static [OptionName],
}

/// Groups enforced while options are edited.
pub const EXCLUSION_GROUPS: &[ExclusionGroup] = &[
    ExclusionGroup {
        name: "target_input",
        members: &[
            OptionName::Url,
            OptionName::Direct,
            OptionName::LogFile,
            OptionName::BulkFile,
            OptionName::RequestFile,
            OptionName::GoogleDork,
        ],
    },
    ExclusionGroup {
        name: "user_agent_type",
        members: &[
            OptionName::UserAgent,
            OptionName::RandomAgent,
            OptionName::Mobile,
        ],
    },
    ExclusionGroup {
        name: "proxy_type",
        members: &[OptionName::Proxy, OptionName::Tor],
    },
    ExclusionGroup {
        name: "shell_access",
        members: &[OptionName::SqlShell, OptionName::OsShell, OptionName::OsCmd],
    },
    ExclusionGroup {
        name: "data_output",
        members: &[OptionName::DumpAll, OptionName::SqlQuery, OptionName::Dump],
    },
    ExclusionGroup {
        name: "crawl_vs_threads",
        members: &[OptionName::Crawl, OptionName::Threads],
    },
    ExclusionGroup {
        name: "batch_vs_wizard",
        members: &[OptionName::Batch, OptionName::Wizard],
    },
];

/// Enable/disable notification produced by an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// The option became selectable again.
    Enabled(OptionName),
    /// The option became unselectable, with a human-readable reason.
    Disabled {
        /// Option that was disabled.
        option: OptionName,
        /// Why it was disabled.
        reason: String,
    },
}

/// Mutual-exclusion state for one option set.
///
/// Mutated from a single writer; callers that process UI events concurrently must
/// serialise `update` calls.
#[derive(Debug, Clone)]
pub struct ExclusionEngine {
    /// Static groups.
    groups: &'static [ExclusionGroup],
    /// Option → indices of the groups that contain it.
    membership: HashMap<OptionName, Vec<usize>>,
    /// Last recorded value per option.
    values: HashMap<OptionName, OptionValue>,
    /// Option → (group index → reason) for every group currently disabling it.
    disabled: HashMap<OptionName, BTreeMap<usize, String>>,
}

impl Default for ExclusionEngine {
    fn default() -> Self {
        Self::new(EXCLUSION_GROUPS)
    }
}

impl ExclusionEngine {
    /// What: Build an engine and its membership index from a group table.
    ///
    /// Inputs:
    /// - `groups`: Static group definitions; membership may overlap.
    #[must_use]
    pub fn new(groups: &'static [ExclusionGroup]) -> Self {
        let mut membership: HashMap<OptionName, Vec<usize>> = HashMap::new();
        for (idx, group) in groups.iter().enumerate() {
            for member in group.members {
                membership.entry(*member).or_default().push(idx);
            }
        }
        Self {
            groups,
            membership,
            values: HashMap::new(),
            disabled: HashMap::new(),
        }
    }

    /// What: Record a new value for `name` and propagate exclusions.
    ///
    /// Inputs:
    /// - `name`: Option that changed.
    /// - `value`: Its new value.
    ///
    /// Output:
    /// - Enable/disable transitions caused by this update, in the order they happened.
    ///
    /// Details:
    /// - Re-recording an identical value is a no-op, which absorbs repeated change
    ///   events from widgets.
    /// - An active value disables every other member of each group `name` belongs to.
    /// - An inactive value recomputes each of those groups from scratch.
    pub fn update(&mut self, name: OptionName, value: OptionValue) -> Vec<StateChange> {
        let previous = self.values.insert(name, value.clone());
        if previous.as_ref() == Some(&value) {
            return Vec::new();
        }
        let Some(groups) = self.membership.get(&name).cloned() else {
            return Vec::new();
        };
        let mut changes = Vec::new();
        for gidx in groups {
            if value.is_active() {
                self.claim_group(gidx, name, &mut changes);
            } else {
                self.reevaluate_group(gidx, &mut changes);
            }
        }
        changes
    }

    /// What: String-keyed variant of [`update`](Self::update) for loosely typed callers.
    ///
    /// Output:
    /// - Transitions, or an empty list when `key` names no registered option.
    pub fn update_key(&mut self, key: &str, value: OptionValue) -> Vec<StateChange> {
        match key.parse::<OptionName>() {
            Ok(name) => self.update(name, value),
            Err(_) => {
                tracing::trace!(key, "[Exclusion] ignoring unknown option");
                Vec::new()
            }
        }
    }

    /// `name` won group `gidx`: disable every other member.
    fn claim_group(&mut self, gidx: usize, name: OptionName, changes: &mut Vec<StateChange>) {
        let group = self.groups[gidx];
        self.clear_reason(name, gidx, changes);
        for member in group.members.iter().copied().filter(|m| *m != name) {
            let reason = format!(
                "Disabled: conflicts with '{name}' in {} group",
                group.name
            );
            self.add_reason(member, gidx, reason, changes);
        }
    }

    /// Recompute group `gidx` after one of its members became inactive.
    fn reevaluate_group(&mut self, gidx: usize, changes: &mut Vec<StateChange>) {
        let group = self.groups[gidx];
        let active: Vec<OptionName> = group
            .members
            .iter()
            .copied()
            .filter(|m| self.values.get(m).is_some_and(OptionValue::is_active))
            .collect();
        if active.len() <= 1 {
            for member in group.members {
                self.clear_reason(*member, gidx, changes);
            }
            return;
        }
        // Several members active at once: keep the first, disable the rest.
        let keep = active[0];
        tracing::debug!(
            group = group.name,
            active = active.len(),
            "[Exclusion] inconsistent group state; keeping first active option"
        );
        self.clear_reason(keep, gidx, changes);
        for member in group.members.iter().copied().filter(|m| *m != keep) {
            let reason = format!(
                "Disabled: conflicts with active options in {} group",
                group.name
            );
            self.add_reason(member, gidx, reason, changes);
        }
    }

    fn add_reason(
        &mut self,
        option: OptionName,
        gidx: usize,
        reason: String,
        changes: &mut Vec<StateChange>,
    ) {
        let reasons = self.disabled.entry(option).or_default();
        let was_enabled = reasons.is_empty();
        reasons.insert(gidx, reason.clone());
        if was_enabled {
            changes.push(StateChange::Disabled { option, reason });
        }
    }

    fn clear_reason(&mut self, option: OptionName, gidx: usize, changes: &mut Vec<StateChange>) {
        let Some(reasons) = self.disabled.get_mut(&option) else {
            return;
        };
        if reasons.remove(&gidx).is_some() && reasons.is_empty() {
            self.disabled.remove(&option);
            changes.push(StateChange::Enabled(option));
        }
    }

    /// Whether `name` is currently enabled.
    #[must_use]
    pub fn is_enabled(&self, name: OptionName) -> bool {
        !self.disabled.contains_key(&name)
    }

    /// Current disable reason for `name` (first disabling group), if disabled.
    #[must_use]
    pub fn reason(&self, name: OptionName) -> Option<&str> {
        self.disabled
            .get(&name)
            .and_then(|r| r.values().next())
            .map(String::as_str)
    }

    /// Set of currently disabled options.
    #[must_use]
    pub fn disabled_options(&self) -> BTreeSet<OptionName> {
        self.disabled.keys().copied().collect()
    }

    /// Members of `group` that hold an active value and are enabled.
    #[must_use]
    pub fn active_members(&self, group: &ExclusionGroup) -> Vec<OptionName> {
        group
            .members
            .iter()
            .copied()
            .filter(|m| self.is_enabled(*m))
            .filter(|m| self.values.get(m).is_some_and(OptionValue::is_active))
            .collect()
    }

    /// Groups this engine enforces.
    #[must_use]
    pub const fn groups(&self) -> &'static [ExclusionGroup] {
        self.groups
    }

    /// What: Forget every recorded value and re-enable everything.
    ///
    /// Output:
    /// - One `Enabled` transition per option that was disabled.
    pub fn reset_all(&mut self) -> Vec<StateChange> {
        let mut changes: Vec<StateChange> = self
            .disabled_options()
            .into_iter()
            .map(StateChange::Enabled)
            .collect();
        changes.sort_by_key(|c| match c {
            StateChange::Enabled(o) | StateChange::Disabled { option: o, .. } => *o,
        });
        self.disabled.clear();
        self.values.clear();
        changes
    }
}

/// What: Functional form of [`ExclusionEngine::update`].
///
/// Inputs:
/// - `state`: Engine state, consumed.
/// - `name`/`value`: The change to apply.
///
/// Output:
/// - The updated state; transitions are discarded (query the state instead).
#[must_use]
pub fn apply_update(mut state: ExclusionEngine, name: OptionName, value: OptionValue) -> ExclusionEngine {
    state.update(name, value);
    state
}
