//! The schema history, root first.
//!
//! Each change-set names its predecessor; the runner orders them by linkage,
//! not by position in this list.

use super::{
	ChangeSet,
	step::{ColumnDef, ColumnType, Step, TableConstraint},
};

pub static REVISIONS: &[ChangeSet] = &[
	ChangeSet {
		revision: "create-posts-table",
		parent: None,
		comment: "create posts table",
		upgrade: &[Step::CreateTable {
			table: "posts",
			columns: &[
				ColumnDef {
					name: "id",
					ty: ColumnType::Serial,
					nullable: false,
					default: None,
				},
				ColumnDef {
					name: "title",
					ty: ColumnType::Text,
					nullable: false,
					default: None,
				},
			],
			constraints: &[TableConstraint::PrimaryKey(&["id"])],
		}],
		downgrade: &[Step::DropTable { table: "posts" }],
	},
	ChangeSet {
		revision: "add-post-content",
		parent: Some("create-posts-table"),
		comment: "add content column to posts table",
		upgrade: &[Step::AddColumn {
			table: "posts",
			column: ColumnDef {
				name: "content",
				ty: ColumnType::Text,
				nullable: false,
				default: None,
			},
			// Existing posts get an empty body rather than failing the DDL.
			fill_with: Some("''"),
		}],
		downgrade: &[Step::DropColumn {
			table: "posts",
			column: "content",
		}],
	},
	ChangeSet {
		revision: "add-users-table",
		parent: Some("add-post-content"),
		comment: "add users table",
		upgrade: &[Step::CreateTable {
			table: "users",
			columns: &[
				ColumnDef {
					name: "id",
					ty: ColumnType::Serial,
					nullable: false,
					default: None,
				},
				ColumnDef {
					name: "email",
					ty: ColumnType::Text,
					nullable: false,
					default: None,
				},
				ColumnDef {
					name: "password",
					ty: ColumnType::Text,
					nullable: false,
					default: None,
				},
				ColumnDef {
					name: "created_at",
					ty: ColumnType::TimestampTz,
					nullable: false,
					default: Some("now()"),
				},
			],
			constraints: &[
				TableConstraint::PrimaryKey(&["id"]),
				TableConstraint::Unique {
					name: "users_email_key",
					columns: &["email"],
				},
			],
		}],
		downgrade: &[Step::DropTable { table: "users" }],
	},
	// Must run while `posts` is still empty: there is no valid owner to
	// backfill, so the NOT NULL addition is rejected by the database if any
	// posts already exist.
	ChangeSet {
		revision: "add-post-owner",
		parent: Some("add-users-table"),
		comment: "add foreign key to posts table",
		upgrade: &[
			Step::AddColumn {
				table: "posts",
				column: ColumnDef {
					name: "owner_id",
					ty: ColumnType::Integer,
					nullable: false,
					default: None,
				},
				fill_with: None,
			},
			Step::AddForeignKey {
				name: "posts_users_fk",
				table: "posts",
				columns: &["owner_id"],
				references: "users",
				referenced_columns: &["id"],
				cascade_delete: true,
			},
		],
		downgrade: &[
			Step::DropConstraint {
				table: "posts",
				name: "posts_users_fk",
			},
			Step::DropColumn {
				table: "posts",
				column: "owner_id",
			},
		],
	},
	ChangeSet {
		revision: "add-post-flags",
		parent: Some("add-post-owner"),
		comment: "add published and created_at columns to posts table",
		upgrade: &[
			Step::AddColumn {
				table: "posts",
				column: ColumnDef {
					name: "published",
					ty: ColumnType::Boolean,
					nullable: false,
					default: Some("TRUE"),
				},
				fill_with: None,
			},
			Step::AddColumn {
				table: "posts",
				column: ColumnDef {
					name: "created_at",
					ty: ColumnType::TimestampTz,
					nullable: false,
					default: Some("now()"),
				},
				fill_with: None,
			},
		],
		downgrade: &[
			Step::DropColumn {
				table: "posts",
				column: "published",
			},
			Step::DropColumn {
				table: "posts",
				column: "created_at",
			},
		],
	},
	ChangeSet {
		revision: "add-user-phone-number",
		parent: Some("add-post-flags"),
		comment: "add phone number to users table",
		upgrade: &[Step::AddColumn {
			table: "users",
			column: ColumnDef {
				name: "phone_number",
				ty: ColumnType::Text,
				nullable: true,
				default: None,
			},
			fill_with: None,
		}],
		downgrade: &[Step::DropColumn {
			table: "users",
			column: "phone_number",
		}],
	},
	ChangeSet {
		revision: "create-votes-table",
		parent: Some("add-user-phone-number"),
		comment: "create votes table",
		upgrade: &[Step::CreateTable {
			table: "votes",
			columns: &[
				ColumnDef {
					name: "user_id",
					ty: ColumnType::Integer,
					nullable: false,
					default: None,
				},
				ColumnDef {
					name: "post_id",
					ty: ColumnType::Integer,
					nullable: false,
					default: None,
				},
			],
			constraints: &[
				TableConstraint::PrimaryKey(&["user_id", "post_id"]),
				TableConstraint::ForeignKey {
					name: "votes_users_fk",
					columns: &["user_id"],
					references: "users",
					referenced_columns: &["id"],
					cascade_delete: true,
				},
				TableConstraint::ForeignKey {
					name: "votes_posts_fk",
					columns: &["post_id"],
					references: "posts",
					referenced_columns: &["id"],
					cascade_delete: true,
				},
			],
		}],
		downgrade: &[Step::DropTable { table: "votes" }],
	},
];
