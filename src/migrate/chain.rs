//! Change-set chain validation and ordering.
//!
//! Change-sets form a singly linked list: each names its predecessor, the
//! root names none, and the head is the change-set no other names. The
//! chain is validated up front so a malformed history is rejected before
//! any DDL runs.

use std::collections::HashMap;

use super::{ChangeSet, MigrationError};

pub struct Chain {
	ordered: Vec<&'static ChangeSet>,
}

impl Chain {
	pub fn new(revisions: &'static [ChangeSet]) -> Result<Self, MigrationError> {
		let mut by_revision = HashMap::new();

		for changeset in revisions {
			if by_revision
				.insert(changeset.revision, changeset)
				.is_some()
			{
				return Err(MigrationError::DuplicateRevision(
					changeset.revision.into(),
				));
			}
		}

		let mut root: Option<&'static ChangeSet> = None;
		let mut successors: HashMap<&str, &'static ChangeSet> = HashMap::new();

		for changeset in revisions {
			let Some(parent) = changeset.parent else {
				if let Some(root) = root {
					return Err(MigrationError::MultipleRoots(
						changeset.revision.into(),
						root.revision.into(),
					));
				}

				root = Some(changeset);
				continue;
			};

			if !by_revision.contains_key(parent) {
				return Err(MigrationError::UnknownParent {
					revision: changeset.revision.into(),
					parent: parent.into(),
				});
			}

			if let Some(sibling) = successors.insert(parent, changeset) {
				return Err(MigrationError::Fork {
					parent: parent.into(),
					children: (changeset.revision.into(), sibling.revision.into()),
				});
			}
		}

		let Some(root) = root else {
			return Err(MigrationError::NoRoot);
		};

		let mut ordered = vec![root];

		while let Some(next) = successors.get(ordered[ordered.len() - 1].revision).copied() {
			ordered.push(next);
		}

		// Anything not reached from the root is disconnected (or cyclic).
		if ordered.len() != revisions.len() {
			let reached: Vec<_> = ordered.iter().map(|c| c.revision).collect();

			for changeset in revisions {
				if !reached.contains(&changeset.revision) {
					return Err(MigrationError::Unreachable(changeset.revision.into()));
				}
			}
		}

		Ok(Self { ordered })
	}

	/// All change-sets, root first.
	pub fn ordered(&self) -> &[&'static ChangeSet] {
		&self.ordered
	}

	/// The change-set no other change-set names as its parent.
	pub fn head(&self) -> &'static ChangeSet {
		self.ordered[self.ordered.len() - 1]
	}

	fn position(&self, revision: &str) -> Result<usize, MigrationError> {
		self.ordered
			.iter()
			.position(|changeset| changeset.revision == revision)
			.ok_or_else(|| MigrationError::UnknownRevision(revision.into()))
	}

	/// Change-sets that must be applied, in order, to move the store from
	/// `current` (`None` for an empty store) up to `target`.
	pub fn pending(
		&self,
		current: Option<&str>,
		target: &str,
	) -> Result<&[&'static ChangeSet], MigrationError> {
		let target = self.position(target)?;
		let first = match current {
			Some(current) => {
				let current = self.position(current)?;

				if target < current {
					return Err(MigrationError::TargetBehind {
						target: self.ordered[target].revision.into(),
						current: self.ordered[current].revision.into(),
					});
				}

				current + 1
			}
			None => 0,
		};

		Ok(&self.ordered[first..=target])
	}

	/// Change-sets that must be reverted, newest first, to move the store
	/// from `current` back down to `target` (`None` to revert everything).
	pub fn rollback(
		&self,
		current: Option<&str>,
		target: Option<&str>,
	) -> Result<Vec<&'static ChangeSet>, MigrationError> {
		let Some(current) = current else {
			// Nothing applied, nothing to revert.
			return match target {
				None => Ok(Vec::new()),
				Some(target) => Err(MigrationError::UnknownRevision(target.into())),
			};
		};

		let current = self.position(current)?;
		let first = match target {
			Some(target) => {
				let target = self.position(target)?;

				if target > current {
					return Err(MigrationError::TargetAhead {
						target: self.ordered[target].revision.into(),
						current: self.ordered[current].revision.into(),
					});
				}

				target + 1
			}
			None => 0,
		};

		Ok(self.ordered[first..=current].iter().rev().copied().collect())
	}
}
