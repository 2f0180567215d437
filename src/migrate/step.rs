//! Schema-altering primitives and their rendering to Postgres DDL.

/// Column types used by the schema. Only what the chain needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
	Integer,
	Serial,
	Text,
	Boolean,
	TimestampTz,
}

impl ColumnType {
	fn sql(self) -> &'static str {
		match self {
			Self::Integer => "INTEGER",
			Self::Serial => "SERIAL",
			Self::Text => "TEXT",
			Self::Boolean => "BOOLEAN",
			Self::TimestampTz => "TIMESTAMPTZ",
		}
	}
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
	pub name: &'static str,
	pub ty: ColumnType,
	pub nullable: bool,
	/// Raw SQL expression, e.g. `now()` or `TRUE`.
	pub default: Option<&'static str>,
}

impl ColumnDef {
	fn sql(&self) -> String {
		let mut sql = format!("{} {}", quote(self.name), self.ty.sql());

		if let Some(default) = self.default {
			sql.push_str(" DEFAULT ");
			sql.push_str(default);
		}

		if !self.nullable {
			sql.push_str(" NOT NULL");
		}

		sql
	}
}

#[derive(Debug, Clone, Copy)]
pub enum TableConstraint {
	PrimaryKey(&'static [&'static str]),
	Unique {
		name: &'static str,
		columns: &'static [&'static str],
	},
	ForeignKey {
		name: &'static str,
		columns: &'static [&'static str],
		references: &'static str,
		referenced_columns: &'static [&'static str],
		cascade_delete: bool,
	},
}

impl TableConstraint {
	fn sql(&self) -> String {
		match self {
			Self::PrimaryKey(columns) => format!("PRIMARY KEY ({})", quote_list(columns)),
			Self::Unique { name, columns } => {
				format!("CONSTRAINT {} UNIQUE ({})", quote(name), quote_list(columns))
			}
			Self::ForeignKey {
				name,
				columns,
				references,
				referenced_columns,
				cascade_delete,
			} => {
				let mut sql = format!(
					"CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
					quote(name),
					quote_list(columns),
					quote(references),
					quote_list(referenced_columns),
				);

				if *cascade_delete {
					sql.push_str(" ON DELETE CASCADE");
				}

				sql
			}
		}
	}
}

/// One schema-altering primitive. A step renders to one or more DDL/DML
/// statements, executed in order within the change-set's transaction.
#[derive(Debug, Clone, Copy)]
pub enum Step {
	CreateTable {
		table: &'static str,
		columns: &'static [ColumnDef],
		constraints: &'static [TableConstraint],
	},
	DropTable {
		table: &'static str,
	},
	AddColumn {
		table: &'static str,
		column: ColumnDef,
		/// Raw SQL expression used to backfill existing rows when adding a
		/// NOT NULL column without a default. When absent, the column is
		/// added in one statement and the database rejects it if the table
		/// already holds rows.
		fill_with: Option<&'static str>,
	},
	DropColumn {
		table: &'static str,
		column: &'static str,
	},
	AddForeignKey {
		name: &'static str,
		table: &'static str,
		columns: &'static [&'static str],
		references: &'static str,
		referenced_columns: &'static [&'static str],
		cascade_delete: bool,
	},
	DropConstraint {
		table: &'static str,
		name: &'static str,
	},
}

impl Step {
	pub fn statements(&self) -> Vec<String> {
		match *self {
			Self::CreateTable {
				table,
				columns,
				constraints,
			} => {
				let items = columns
					.iter()
					.map(ColumnDef::sql)
					.chain(constraints.iter().map(TableConstraint::sql))
					.collect::<Vec<_>>()
					.join(", ");

				vec![format!("CREATE TABLE {} ({items})", quote(table))]
			}
			Self::DropTable { table } => vec![format!("DROP TABLE {}", quote(table))],
			Self::AddColumn {
				table,
				column,
				fill_with,
			} => {
				let needs_backfill =
					!column.nullable && column.default.is_none() && fill_with.is_some();

				if !needs_backfill {
					return vec![format!(
						"ALTER TABLE {} ADD COLUMN {}",
						quote(table),
						column.sql()
					)];
				}

				// Add as nullable, backfill, then tighten. This keeps the
				// step applicable to a table that already holds rows.
				let nullable = ColumnDef {
					nullable: true,
					..column
				};

				vec![
					format!("ALTER TABLE {} ADD COLUMN {}", quote(table), nullable.sql()),
					format!(
						"UPDATE {} SET {} = {}",
						quote(table),
						quote(column.name),
						fill_with.unwrap_or_default(),
					),
					format!(
						"ALTER TABLE {} ALTER COLUMN {} SET NOT NULL",
						quote(table),
						quote(column.name),
					),
				]
			}
			Self::DropColumn { table, column } => vec![format!(
				"ALTER TABLE {} DROP COLUMN {}",
				quote(table),
				quote(column)
			)],
			Self::AddForeignKey {
				name,
				table,
				columns,
				references,
				referenced_columns,
				cascade_delete,
			} => {
				let constraint = TableConstraint::ForeignKey {
					name,
					columns,
					references,
					referenced_columns,
					cascade_delete,
				};

				vec![format!(
					"ALTER TABLE {} ADD {}",
					quote(table),
					constraint.sql()
				)]
			}
			Self::DropConstraint { table, name } => vec![format!(
				"ALTER TABLE {} DROP CONSTRAINT {}",
				quote(table),
				quote(name)
			)],
		}
	}
}

fn quote(ident: &str) -> String {
	format!("\"{ident}\"")
}

fn quote_list(idents: &[&str]) -> String {
	idents
		.iter()
		.map(|ident| quote(ident))
		.collect::<Vec<_>>()
		.join(", ")
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_create_table_sql() {
		let step = Step::CreateTable {
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
			],
			constraints: &[
				TableConstraint::PrimaryKey(&["id"]),
				TableConstraint::Unique {
					name: "users_email_key",
					columns: &["email"],
				},
			],
		};

		assert_eq!(
			step.statements(),
			["CREATE TABLE \"users\" (\"id\" SERIAL NOT NULL, \"email\" TEXT NOT NULL, \
			 PRIMARY KEY (\"id\"), CONSTRAINT \"users_email_key\" UNIQUE (\"email\"))"]
		);
	}

	#[test]
	fn test_add_column_without_backfill_is_one_statement() {
		let step = Step::AddColumn {
			table: "posts",
			column: ColumnDef {
				name: "owner_id",
				ty: ColumnType::Integer,
				nullable: false,
				default: None,
			},
			fill_with: None,
		};

		assert_eq!(
			step.statements(),
			["ALTER TABLE \"posts\" ADD COLUMN \"owner_id\" INTEGER NOT NULL"]
		);
	}

	#[test]
	fn test_add_column_with_backfill_adds_then_tightens() {
		let step = Step::AddColumn {
			table: "posts",
			column: ColumnDef {
				name: "content",
				ty: ColumnType::Text,
				nullable: false,
				default: None,
			},
			fill_with: Some("''"),
		};

		assert_eq!(
			step.statements(),
			[
				"ALTER TABLE \"posts\" ADD COLUMN \"content\" TEXT",
				"UPDATE \"posts\" SET \"content\" = ''",
				"ALTER TABLE \"posts\" ALTER COLUMN \"content\" SET NOT NULL",
			]
		);
	}

	#[test]
	fn test_add_column_with_default_ignores_backfill() {
		let step = Step::AddColumn {
			table: "posts",
			column: ColumnDef {
				name: "published",
				ty: ColumnType::Boolean,
				nullable: false,
				default: Some("TRUE"),
			},
			fill_with: Some("TRUE"),
		};

		assert_eq!(
			step.statements(),
			["ALTER TABLE \"posts\" ADD COLUMN \"published\" BOOLEAN DEFAULT TRUE NOT NULL"]
		);
	}

	#[test]
	fn test_foreign_key_sql() {
		let step = Step::AddForeignKey {
			name: "posts_users_fk",
			table: "posts",
			columns: &["owner_id"],
			references: "users",
			referenced_columns: &["id"],
			cascade_delete: true,
		};

		assert_eq!(
			step.statements(),
			["ALTER TABLE \"posts\" ADD CONSTRAINT \"posts_users_fk\" FOREIGN KEY \
			 (\"owner_id\") REFERENCES \"users\" (\"id\") ON DELETE CASCADE"]
		);
	}
}
