//! Corporate-action book — per-instrument queues of pending actions.

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::{DateTime, Utc};

use crate::domain::CorporateAction;

use super::state::{Diagnostic, DiagnosticKind};

/// Pending corporate actions, ordered per instrument by effective time.
///
/// Actions referencing instruments the run does not know are dropped with
/// a recorded warning at construction — bad reference data must not kill
/// an otherwise valid run.
#[derive(Debug, Default)]
pub struct ActionBook {
    pending: HashMap<String, VecDeque<CorporateAction>>,
}

impl ActionBook {
    pub fn new(
        actions: Vec<CorporateAction>,
        registered: &HashSet<String>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Self {
        let mut by_symbol: HashMap<String, Vec<CorporateAction>> = HashMap::new();
        for action in actions {
            if !registered.contains(&action.symbol) {
                diagnostics.push(Diagnostic::new(
                    None,
                    DiagnosticKind::UnknownActionInstrument,
                    format!(
                        "corporate action for unregistered instrument '{}' (effective {}) dropped",
                        action.symbol, action.effective
                    ),
                ));
                continue;
            }
            by_symbol.entry(action.symbol.clone()).or_default().push(action);
        }

        let pending = by_symbol
            .into_iter()
            .map(|(symbol, mut actions)| {
                // Stable: equal effective times keep input order.
                actions.sort_by_key(|a| a.effective);
                (symbol, actions.into())
            })
            .collect();
        Self { pending }
    }

    /// Pop every action for `symbol` effective at or before `now`,
    /// in effective-time order. Each action is returned exactly once.
    pub fn due(&mut self, symbol: &str, now: DateTime<Utc>) -> Vec<CorporateAction> {
        let Some(queue) = self.pending.get_mut(symbol) else {
            return Vec::new();
        };
        let mut due = Vec::new();
        while queue.front().is_some_and(|a| a.effective <= now) {
            if let Some(action) = queue.pop_front() {
                due.push(action);
            }
        }
        due
    }

    /// Actions still waiting for their effective tick.
    pub fn pending_total(&self) -> usize {
        self.pending.values().map(VecDeque::len).sum()
    }
}
