// ── Reconciler ──
//
// Generic desired-vs-observed diff. The plan partitions the union of
// identities into delete (observed only), update (both) and create
// (desired only). Application order is fixed: every delete, then every
// update, then every create. Each identity is applied independently;
// failures are collected into the report rather than stopping the run.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use strum::Display;
use tracing::{debug, info, warn};

use crate::error::{CoreError, SyncFailure};
use crate::model::EntityKind;

/// One side of a sync: how to key records and how to apply each action.
#[allow(async_fn_in_trait)]
pub trait SyncTarget {
    type Desired;
    type Observed;
    type Key: Ord + Clone + fmt::Display;

    fn kind(&self) -> EntityKind;
    fn desired_key(&self, desired: &Self::Desired) -> Self::Key;
    fn observed_key(&self, observed: &Self::Observed) -> Self::Key;

    async fn delete(&self, observed: &Self::Observed) -> Result<(), CoreError>;
    async fn update(&self, desired: &Self::Desired, observed: &Self::Observed)
    -> Result<(), CoreError>;
    async fn create(&self, desired: &Self::Desired) -> Result<(), CoreError>;
}

/// The three disjoint action sets, each sorted by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncPlan<K> {
    pub to_delete: Vec<K>,
    pub to_update: Vec<K>,
    pub to_create: Vec<K>,
}

impl<K> SyncPlan<K> {
    pub fn is_noop(&self) -> bool {
        self.to_delete.is_empty() && self.to_create.is_empty()
    }

    pub fn len(&self) -> usize {
        self.to_delete.len() + self.to_update.len() + self.to_create.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition desired and observed identities.
pub fn plan<K: Ord + Clone>(
    desired: impl IntoIterator<Item = K>,
    observed: impl IntoIterator<Item = K>,
) -> SyncPlan<K> {
    let desired: std::collections::BTreeSet<K> = desired.into_iter().collect();
    let observed: std::collections::BTreeSet<K> = observed.into_iter().collect();
    SyncPlan {
        to_delete: observed.difference(&desired).cloned().collect(),
        to_update: desired.intersection(&observed).cloned().collect(),
        to_create: desired.difference(&observed).cloned().collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Delete,
    Update,
    Create,
}

/// Result of applying one action.
#[derive(Debug)]
pub struct SyncOutcome {
    pub identity: String,
    pub phase: Phase,
    pub error: Option<CoreError>,
}

impl SyncOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-identity outcomes of one sync run, in application order.
#[derive(Debug)]
pub struct SyncReport {
    pub kind: EntityKind,
    pub plan: SyncPlan<String>,
    pub outcomes: Vec<SyncOutcome>,
}

impl SyncReport {
    pub fn empty(kind: EntityKind) -> Self {
        Self {
            kind,
            plan: SyncPlan {
                to_delete: Vec::new(),
                to_update: Vec::new(),
                to_create: Vec::new(),
            },
            outcomes: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Fold another report's outcomes into this one.
    pub fn absorb(&mut self, other: SyncReport) {
        self.plan.to_delete.extend(other.plan.to_delete);
        self.plan.to_update.extend(other.plan.to_update);
        self.plan.to_create.extend(other.plan.to_create);
        self.outcomes.extend(other.outcomes);
    }

    /// Record an action applied outside [`reconcile`].
    pub fn record(&mut self, identity: impl Into<String>, phase: Phase, result: Result<(), CoreError>) {
        self.outcomes.push(SyncOutcome {
            identity: identity.into(),
            phase,
            error: result.err(),
        });
    }

    /// `Ok` when every action succeeded, otherwise the aggregate failure.
    pub fn into_result(self) -> Result<Self, CoreError> {
        self.check()?;
        Ok(self)
    }

    /// Borrowing form of [`SyncReport::into_result`].
    pub fn check(&self) -> Result<(), CoreError> {
        if self.is_success() {
            return Ok(());
        }
        let failures = self
            .outcomes
            .iter()
            .filter_map(|o| {
                o.error.as_ref().map(|e| SyncFailure {
                    identity: o.identity.clone(),
                    phase: o.phase.to_string(),
                    cause: e.to_string(),
                })
            })
            .collect();
        Err(CoreError::SyncFailed {
            kind: self.kind.to_string(),
            total: self.outcomes.len(),
            failures,
        })
    }
}

/// Diff and apply. Never returns early: every planned action is attempted.
pub async fn reconcile<T: SyncTarget>(
    target: &T,
    desired: Vec<T::Desired>,
    observed: Vec<T::Observed>,
) -> SyncReport {
    let kind = target.kind();
    let desired = index(desired, |d| target.desired_key(d), kind);
    let observed = index(observed, |o| target.observed_key(o), kind);
    let plan = plan(desired.keys().cloned(), observed.keys().cloned());
    info!(
        %kind,
        delete = plan.to_delete.len(),
        update = plan.to_update.len(),
        create = plan.to_create.len(),
        "sync plan"
    );

    let mut outcomes = Vec::with_capacity(plan.len());
    for key in &plan.to_delete {
        if let Some(obs) = observed.get(key) {
            let result = target.delete(obs).await;
            outcomes.push(outcome(key, Phase::Delete, result));
        }
    }
    for key in &plan.to_update {
        if let (Some(want), Some(obs)) = (desired.get(key), observed.get(key)) {
            let result = target.update(want, obs).await;
            outcomes.push(outcome(key, Phase::Update, result));
        }
    }
    for key in &plan.to_create {
        if let Some(want) = desired.get(key) {
            let result = target.create(want).await;
            outcomes.push(outcome(key, Phase::Create, result));
        }
    }

    SyncReport {
        kind,
        plan: SyncPlan {
            to_delete: plan.to_delete.iter().map(ToString::to_string).collect(),
            to_update: plan.to_update.iter().map(ToString::to_string).collect(),
            to_create: plan.to_create.iter().map(ToString::to_string).collect(),
        },
        outcomes,
    }
}

/// Key records; a duplicate key keeps the last record.
fn index<K: Ord + fmt::Display, V>(
    items: Vec<V>,
    key: impl Fn(&V) -> K,
    kind: EntityKind,
) -> BTreeMap<K, V> {
    let mut map = BTreeMap::new();
    for item in items {
        let k = key(&item);
        if map.contains_key(&k) {
            warn!(%kind, key = %k, "duplicate identity, keeping the last one");
        }
        map.insert(k, item);
    }
    map
}

fn outcome<K: fmt::Display>(key: &K, phase: Phase, result: Result<(), CoreError>) -> SyncOutcome {
    match &result {
        Ok(()) => debug!(identity = %key, %phase, "applied"),
        Err(e) => warn!(identity = %key, %phase, error = %e, "failed"),
    }
    SyncOutcome {
        identity: key.to_string(),
        phase,
        error: result.err(),
    }
}
