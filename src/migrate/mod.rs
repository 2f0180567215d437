//! Linear, reversible schema migrations.
//!
//! The schema history is a chain of [`ChangeSet`]s ([`revisions::REVISIONS`]),
//! each holding an `upgrade` and an inverse `downgrade` sequence of
//! [`step::Step`]s. The runner walks the chain strictly in order, one
//! transaction per change-set, and records the applied revision in the
//! `schema_revision` table. Errors here are fatal at startup, never surfaced
//! to request handlers.

pub mod chain;
pub mod revisions;
pub mod step;

pub use chain::Chain;
pub use revisions::REVISIONS;

use step::Step;

use crate::Database;

/// One reversible schema modification with a stable identifier and a pointer
/// to its predecessor.
#[derive(Debug)]
pub struct ChangeSet {
	pub revision: &'static str,
	pub parent: Option<&'static str>,
	pub comment: &'static str,
	pub upgrade: &'static [Step],
	pub downgrade: &'static [Step],
}

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
	#[error("duplicate revision {0}")]
	DuplicateRevision(String),
	#[error("revision {revision} names unknown parent {parent}")]
	UnknownParent { revision: String, parent: String },
	#[error("multiple root revisions: {0} and {1}")]
	MultipleRoots(String, String),
	#[error("no root revision")]
	NoRoot,
	#[error("revisions {children:?} both name {parent} as parent")]
	Fork {
		parent: String,
		children: (String, String),
	},
	#[error("revision {0} is not reachable from the root")]
	Unreachable(String),
	#[error("revision {0} is not part of the chain")]
	UnknownRevision(String),
	#[error("target revision {target} precedes the applied revision {current}")]
	TargetBehind { target: String, current: String },
	#[error("target revision {target} succeeds the applied revision {current}")]
	TargetAhead { target: String, current: String },
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

const REVISION_TABLE_DDL: &str =
	"CREATE TABLE IF NOT EXISTS \"schema_revision\" (\"revision\" TEXT NOT NULL)";

/// The revision currently applied to the store, `None` for an empty store.
pub async fn current(pool: &Database) -> Result<Option<String>, MigrationError> {
	sqlx::query(REVISION_TABLE_DDL).execute(pool).await?;

	Ok(
		sqlx::query_scalar::<_, String>("SELECT \"revision\" FROM \"schema_revision\"")
			.fetch_optional(pool)
			.await?,
	)
}

/// Applies every change-set between the store's current revision and
/// `target` (the chain head when `None`), in chain order.
pub async fn upgrade(
	pool: &Database,
	chain: &Chain,
	target: Option<&str>,
) -> Result<(), MigrationError> {
	let current = current(pool).await?;
	let target = target.unwrap_or(chain.head().revision);

	for changeset in chain.pending(current.as_deref(), target)? {
		run(pool, changeset.upgrade, Some(changeset.revision)).await?;
		tracing::info!(revision = changeset.revision, "applied change-set");
	}

	Ok(())
}

/// Reverts change-sets, newest first, until `target` is the applied revision
/// (`None` reverts the entire chain).
pub async fn downgrade(
	pool: &Database,
	chain: &Chain,
	target: Option<&str>,
) -> Result<(), MigrationError> {
	let current = current(pool).await?;

	for changeset in chain.rollback(current.as_deref(), target)? {
		run(pool, changeset.downgrade, changeset.parent).await?;
		tracing::info!(revision = changeset.revision, "reverted change-set");
	}

	Ok(())
}

/// Brings the store from whatever revision it is at to the chain head.
pub async fn to_head(pool: &Database) -> Result<(), MigrationError> {
	let chain = Chain::new(REVISIONS)?;

	upgrade(pool, &chain, None).await
}

/// Runs one side of a change-set and records the resulting revision, all in
/// a single transaction.
async fn run(
	pool: &Database,
	steps: &[Step],
	revision_after: Option<&str>,
) -> Result<(), MigrationError> {
	let mut tx = pool.begin().await?;

	for step in steps {
		for statement in step.statements() {
			sqlx::query(&statement).execute(&mut *tx).await?;
		}
	}

	sqlx::query("DELETE FROM \"schema_revision\"")
		.execute(&mut *tx)
		.await?;

	if let Some(revision) = revision_after {
		sqlx::query("INSERT INTO \"schema_revision\" (\"revision\") VALUES ($1)")
			.bind(revision)
			.execute(&mut *tx)
			.await?;
	}

	tx.commit().await?;

	Ok(())
}

#[cfg(test)]
mod test {
	use super::*;

	async fn table_names(pool: &Database) -> Vec<String> {
		sqlx::query_scalar::<_, String>(
			"SELECT table_name FROM information_schema.tables \
			 WHERE table_schema = 'public' ORDER BY table_name",
		)
		.fetch_all(pool)
		.await
		.unwrap()
	}

	#[sqlx::test]
	async fn test_upgrade_to_head_creates_all_tables(pool: Database) {
		to_head(&pool).await.unwrap();

		assert_eq!(
			table_names(&pool).await,
			["posts", "schema_revision", "users", "votes"]
		);
		assert_eq!(
			current(&pool).await.unwrap().as_deref(),
			Some("create-votes-table")
		);
	}

	#[sqlx::test]
	async fn test_upgrade_is_idempotent_at_head(pool: Database) {
		to_head(&pool).await.unwrap();
		to_head(&pool).await.unwrap();

		assert_eq!(
			current(&pool).await.unwrap().as_deref(),
			Some("create-votes-table")
		);
	}

	#[sqlx::test]
	async fn test_round_trip_restores_empty_schema(pool: Database) {
		let chain = Chain::new(REVISIONS).unwrap();

		upgrade(&pool, &chain, None).await.unwrap();
		downgrade(&pool, &chain, None).await.unwrap();

		// Only the runner's own bookkeeping table survives.
		assert_eq!(table_names(&pool).await, ["schema_revision"]);
		assert_eq!(current(&pool).await.unwrap(), None);
	}

	#[sqlx::test]
	async fn test_partial_downgrade_stops_at_target(pool: Database) {
		let chain = Chain::new(REVISIONS).unwrap();

		upgrade(&pool, &chain, None).await.unwrap();
		downgrade(&pool, &chain, Some("add-users-table"))
			.await
			.unwrap();

		assert_eq!(
			current(&pool).await.unwrap().as_deref(),
			Some("add-users-table")
		);
		assert_eq!(
			table_names(&pool).await,
			["posts", "schema_revision", "users"]
		);
	}

	#[sqlx::test]
	async fn test_content_backfill_tolerates_existing_rows(pool: Database) {
		let chain = Chain::new(REVISIONS).unwrap();

		upgrade(&pool, &chain, Some("create-posts-table"))
			.await
			.unwrap();

		sqlx::query("INSERT INTO posts (title) VALUES ('early post')")
			.execute(&pool)
			.await
			.unwrap();

		upgrade(&pool, &chain, Some("add-post-content"))
			.await
			.unwrap();

		let content: String =
			sqlx::query_scalar("SELECT content FROM posts WHERE title = 'early post'")
				.fetch_one(&pool)
				.await
				.unwrap();

		assert_eq!(content, "");
	}

	#[sqlx::test]
	async fn test_post_owner_rejects_existing_rows(pool: Database) {
		let chain = Chain::new(REVISIONS).unwrap();

		upgrade(&pool, &chain, Some("add-users-table")).await.unwrap();

		sqlx::query("INSERT INTO posts (title, content) VALUES ('orphan', '')")
			.execute(&pool)
			.await
			.unwrap();

		// No owner to backfill with; the change-set documents that it must
		// run before any posts exist, and the database enforces it.
		let result = upgrade(&pool, &chain, Some("add-post-owner")).await;

		assert!(matches!(result, Err(MigrationError::Database(..))));
		assert_eq!(
			current(&pool).await.unwrap().as_deref(),
			Some("add-users-table")
		);
	}

	#[sqlx::test]
	async fn test_unknown_applied_revision_is_rejected(pool: Database) {
		let chain = Chain::new(REVISIONS).unwrap();

		upgrade(&pool, &chain, None).await.unwrap();

		sqlx::query("UPDATE schema_revision SET revision = 'not-in-chain'")
			.execute(&pool)
			.await
			.unwrap();

		assert!(matches!(
			upgrade(&pool, &chain, None).await,
			Err(MigrationError::UnknownRevision(..))
		));
	}
}
