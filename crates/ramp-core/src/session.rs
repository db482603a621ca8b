//! Optimistic mutation sessions.
//!
//! A caller begins a [`PendingMutation`] from the record it currently shows,
//! displays the optimistic version straight away, then resolves the pending
//! mutation with the repository's result. The outcome carries either the
//! confirmed record or the error together with the snapshot to restore.
//!
//! ```rust,ignore
//! let pending = PendingMutation::rename(shown.clone(), "New name");
//! pending.apply_to(&mut visible);
//! let outcome = pending.resolve(repo.rename(&id, "New name", Some(&actor), &here).await);
//! outcome.apply_to(&mut visible);
//! ```

use serde::Serialize;

use crate::{
  Error, Result,
  merge::with_rating,
  point::{AccessibilityPoint, ActorId, IconRef, PointId, RatingValue},
};

/// The three states a mutation passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationState {
  Pending,
  Confirmed,
  RolledBack,
}

/// A tentative change shown before the repository confirms it.
#[derive(Debug, Clone)]
pub struct PendingMutation {
  snapshot:   AccessibilityPoint,
  optimistic: AccessibilityPoint,
}

impl PendingMutation {
  /// Start a mutation from the last known-good record.
  pub fn begin(
    snapshot: AccessibilityPoint,
    change: impl FnOnce(&mut AccessibilityPoint),
  ) -> Self {
    let mut optimistic = snapshot.clone();
    change(&mut optimistic);
    Self { snapshot, optimistic }
  }

  pub fn rename(snapshot: AccessibilityPoint, name: impl Into<String>) -> Self {
    let name = name.into();
    Self::begin(snapshot, |p| p.name = name)
  }

  pub fn set_icon(snapshot: AccessibilityPoint, icon: IconRef) -> Self {
    Self::begin(snapshot, |p| p.custom_icon = Some(icon))
  }

  pub fn rate(snapshot: AccessibilityPoint, actor: &ActorId, value: RatingValue) -> Self {
    let optimistic = with_rating(snapshot.clone(), actor, value);
    Self { snapshot, optimistic }
  }

  pub fn id(&self) -> &PointId { &self.snapshot.id }

  pub fn state(&self) -> MutationState { MutationState::Pending }

  pub fn snapshot(&self) -> &AccessibilityPoint { &self.snapshot }

  pub fn optimistic(&self) -> &AccessibilityPoint { &self.optimistic }

  /// Show the optimistic record in `points`.
  pub fn apply_to(&self, points: &mut [AccessibilityPoint]) {
    replace_by_id(points, &self.optimistic);
  }

  /// Settle the mutation with the repository's answer.
  pub fn resolve(self, result: Result<AccessibilityPoint>) -> MutationOutcome {
    match result {
      Ok(confirmed) => MutationOutcome::Confirmed(confirmed),
      Err(error) => MutationOutcome::RolledBack { error, restore: self.snapshot },
    }
  }
}

/// The settled form of a [`PendingMutation`].
#[derive(Debug)]
pub enum MutationOutcome {
  /// The repository's canonical record replaces the optimistic one.
  Confirmed(AccessibilityPoint),
  /// The mutation failed; `restore` is the pre-mutation record.
  RolledBack {
    error:   Error,
    restore: AccessibilityPoint,
  },
}

impl MutationOutcome {
  pub fn state(&self) -> MutationState {
    match self {
      Self::Confirmed(_) => MutationState::Confirmed,
      Self::RolledBack { .. } => MutationState::RolledBack,
    }
  }

  /// The record the caller should display now.
  pub fn record(&self) -> &AccessibilityPoint {
    match self {
      Self::Confirmed(point) => point,
      Self::RolledBack { restore, .. } => restore,
    }
  }

  pub fn error(&self) -> Option<&Error> {
    match self {
      Self::Confirmed(_) => None,
      Self::RolledBack { error, .. } => Some(error),
    }
  }

  /// Replace the optimistic record in `points` with the settled one.
  pub fn apply_to(&self, points: &mut [AccessibilityPoint]) {
    replace_by_id(points, self.record());
  }

  pub fn into_result(self) -> Result<AccessibilityPoint> {
    match self {
      Self::Confirmed(point) => Ok(point),
      Self::RolledBack { error, .. } => Err(error),
    }
  }
}

fn replace_by_id(points: &mut [AccessibilityPoint], record: &AccessibilityPoint) {
  for slot in points.iter_mut().filter(|p| p.id == record.id) {
    *slot = record.clone();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seed::SeedSet;

  fn shown() -> Vec<AccessibilityPoint> { SeedSet::builtin().points().to_vec() }

  #[test]
  fn confirmed_mutation_replaces_optimistic_record() {
    let mut visible = shown();
    let pending = PendingMutation::rename(visible[1].clone(), "Optimistic");
    pending.apply_to(&mut visible);
    assert_eq!(visible[1].name, "Optimistic");
    assert_eq!(pending.state(), MutationState::Pending);

    let mut confirmed = pending.optimistic().clone();
    confirmed.creator_id = Some(ActorId::new("alice"));
    let outcome = pending.resolve(Ok(confirmed.clone()));
    outcome.apply_to(&mut visible);

    assert_eq!(outcome.state(), MutationState::Confirmed);
    assert_eq!(visible[1], confirmed);
  }

  #[test]
  fn failed_mutation_restores_snapshot() {
    let mut visible = shown();
    let before = visible.clone();
    let value = RatingValue::try_from(3).unwrap();
    let pending = PendingMutation::rate(visible[0].clone(), &ActorId::new("bob"), value);
    pending.apply_to(&mut visible);
    assert_eq!(visible[0].ratings.len(), 1);

    let outcome = pending.resolve(Err(Error::Unauthorized));
    assert_eq!(outcome.state(), MutationState::RolledBack);
    assert!(matches!(outcome.error(), Some(Error::Unauthorized)));

    outcome.apply_to(&mut visible);
    assert_eq!(visible, before);
  }

  #[test]
  fn icon_mutation_only_touches_icon() {
    let original = shown()[2].clone();
    let icon = IconRef::new("data:image/png;base64,AAAA").unwrap();
    let pending = PendingMutation::set_icon(original.clone(), icon.clone());
    assert_eq!(pending.optimistic().custom_icon, Some(icon));
    assert_eq!(pending.optimistic().name, original.name);
    assert_eq!(pending.snapshot(), &original);
    assert_eq!(pending.id(), &original.id);
  }
}
