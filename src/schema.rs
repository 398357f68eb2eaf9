//! Table definitions and additive schema bootstrap.
//!
//! Every table is created with `CREATE TABLE IF NOT EXISTS` and then each
//! declared column is ensured with `ADD COLUMN IF NOT EXISTS`, so adding a
//! column here is enough to roll it out. Columns are never dropped or altered.

use sqlx::PgPool;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub definition: &'static str,
    pub primary_key: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Index {
    pub name: &'static str,
    pub column: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub indexes: &'static [Index],
}

const fn key(name: &'static str, definition: &'static str) -> Column {
    Column {
        name,
        definition,
        primary_key: true,
    }
}

const fn column(name: &'static str, definition: &'static str) -> Column {
    Column {
        name,
        definition,
        primary_key: false,
    }
}

pub const RISK_ITEMS: Table = Table {
    name: "risk_items",
    columns: &[
        key("id", "TEXT PRIMARY KEY"),
        column("description", "TEXT NOT NULL DEFAULT ''"),
        column("category", "TEXT NOT NULL DEFAULT ''"),
        column("impact", "TEXT NOT NULL DEFAULT ''"),
        column("likelihood", "TEXT NOT NULL DEFAULT ''"),
        column("status", "TEXT NOT NULL DEFAULT ''"),
        column("created_at", "TIMESTAMPTZ NOT NULL DEFAULT NOW()"),
        column("updated_at", "TIMESTAMPTZ NOT NULL DEFAULT NOW()"),
        column("deleted_at", "TIMESTAMPTZ"),
    ],
    indexes: &[Index {
        name: "idx_risk_items_deleted_at",
        column: "deleted_at",
    }],
};

/// Checklist entries; no HTTP operations use this table yet.
pub const COMPLIANCE_ITEMS: Table = Table {
    name: "compliance_items",
    columns: &[
        key("id", "TEXT PRIMARY KEY"),
        column("text", "TEXT NOT NULL DEFAULT ''"),
        column("completed", "BOOLEAN NOT NULL DEFAULT FALSE"),
    ],
    indexes: &[],
};

pub const ZIS_TRACKING_STATS: Table = Table {
    name: "zis_tracking_stats",
    columns: &[
        key("id", "BIGSERIAL PRIMARY KEY"),
        column("total_collected", "DOUBLE PRECISION NOT NULL DEFAULT 0"),
        column("total_distributed", "DOUBLE PRECISION NOT NULL DEFAULT 0"),
        column("donor_count", "INTEGER NOT NULL DEFAULT 0"),
        column("beneficiary_count", "INTEGER NOT NULL DEFAULT 0"),
        column("updated_at", "TIMESTAMPTZ NOT NULL DEFAULT NOW()"),
    ],
    indexes: &[],
};

pub const TABLES: [Table; 3] = [RISK_ITEMS, COMPLIANCE_ITEMS, ZIS_TRACKING_STATS];

impl Table {
    pub fn create_statement(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|column| format!("{} {}", column.name, column.definition))
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TABLE IF NOT EXISTS {} ({columns})", self.name)
    }

    /// `ADD COLUMN` statements for every non-key column. Key columns only
    /// exist from the `CREATE TABLE` statement.
    pub fn add_column_statements(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|column| !column.primary_key)
            .map(|column| {
                format!(
                    "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {} {}",
                    self.name, column.name, column.definition
                )
            })
            .collect()
    }

    pub fn index_statements(&self) -> Vec<String> {
        self.indexes
            .iter()
            .map(|index| {
                format!(
                    "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
                    index.name, self.name, index.column
                )
            })
            .collect()
    }

    pub fn statements(&self) -> Vec<String> {
        let mut statements = vec![self.create_statement()];
        statements.extend(self.add_column_statements());
        statements.extend(self.index_statements());
        statements
    }
}

/// Brings every table up to the declared shape.
pub async fn ensure(pool: &PgPool) -> Result<(), sqlx::Error> {
    for table in TABLES {
        for statement in table.statements() {
            sqlx::query(&statement).execute(pool).await?;
        }
        debug!(table = table.name, "schema ensured");
    }
    Ok(())
}
