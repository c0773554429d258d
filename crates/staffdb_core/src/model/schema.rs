//! Explicit record-shape descriptors.
//!
//! # Responsibility
//! - Declare table name, field types, lengths, nullability and keys for each
//!   record type as plain constant data.
//! - Render SQLite DDL (tables, foreign-key indexes) from those descriptors.
//!
//! # Invariants
//! - Every declared constraint is also enforced by storage via `CHECK`,
//!   `NOT NULL`, `PRIMARY KEY` or `REFERENCES`.
//! - Application-side validation reads limits from the same descriptors.

/// Characters stripped before the non-blank check on required text.
const BLANK_CHARS_SQL: &str = "char(9, 10, 11, 12, 13, 32)";

/// Column type plus its storage-level limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Bounded text measured in characters.
    Char { max_length: usize },
    /// Calendar date stored as canonical `YYYY-MM-DD` text.
    Date,
    /// Fixed-point decimal stored as integer minor units.
    Decimal { max_digits: u32, decimal_places: u32 },
}

/// Foreign-key target of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeySpec {
    pub table: &'static str,
    pub column: &'static str,
}

/// One column of a record shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub nullable: bool,
    pub primary_key: bool,
    pub references: Option<ForeignKeySpec>,
}

impl FieldSpec {
    const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
            primary_key: false,
            references: None,
        }
    }

    /// Returns the declared maximum length for `Char` fields.
    pub fn max_length(&self) -> Option<usize> {
        match self.kind {
            FieldKind::Char { max_length } => Some(max_length),
            _ => None,
        }
    }

    fn column_sql(&self) -> String {
        let name = self.name;
        let (sql_type, check) = match self.kind {
            FieldKind::Char { max_length } if self.nullable => (
                format!("VARCHAR({max_length})"),
                format!("length({name}) <= {max_length}"),
            ),
            // Required text must hold something besides ASCII whitespace.
            FieldKind::Char { max_length } => (
                format!("VARCHAR({max_length})"),
                format!(
                    "length({name}) <= {max_length} AND trim({name}, {BLANK_CHARS_SQL}) <> ''"
                ),
            ),
            FieldKind::Date => ("DATE".to_string(), format!("date({name}) IS {name}")),
            FieldKind::Decimal { max_digits, .. } => {
                let bound = decimal_minor_unit_bound(max_digits);
                (
                    "INTEGER".to_string(),
                    format!("{name} BETWEEN -{bound} AND {bound}"),
                )
            }
        };

        let mut sql = format!("{name} {sql_type}");
        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
        }
        if !self.nullable {
            sql.push_str(" NOT NULL");
        }
        if self.nullable {
            sql.push_str(&format!(" CHECK ({name} IS NULL OR {check})"));
        } else {
            sql.push_str(&format!(" CHECK ({check})"));
        }
        if let Some(target) = self.references {
            sql.push_str(&format!(" REFERENCES {} ({})", target.table, target.column));
        }
        sql
    }
}

/// Largest absolute minor-unit value a decimal with `max_digits` can hold.
pub const fn decimal_minor_unit_bound(max_digits: u32) -> i64 {
    10_i64.pow(max_digits) - 1
}

/// Declared shape of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSchema {
    pub table: &'static str,
    pub fields: &'static [FieldSpec],
}

impl RecordSchema {
    /// Looks up a field by column name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns the primary-key field, if declared.
    pub fn primary_key(&self) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.primary_key)
    }

    /// Renders `CREATE TABLE IF NOT EXISTS` for this shape.
    pub fn create_table_sql(&self) -> String {
        let columns = self
            .fields
            .iter()
            .map(|field| format!("    {}", field.column_sql()))
            .collect::<Vec<_>>()
            .join(",\n");
        format!("CREATE TABLE IF NOT EXISTS {} (\n{columns}\n);", self.table)
    }

    /// Renders one index statement per foreign-key column.
    pub fn create_index_sql(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|field| field.references.is_some())
            .map(|field| {
                format!(
                    "CREATE INDEX IF NOT EXISTS {table}_{column} ON {table} ({column});",
                    table = self.table,
                    column = field.name
                )
            })
            .collect()
    }
}

pub const PERSON_NAME: FieldSpec = FieldSpec {
    primary_key: true,
    ..FieldSpec::required("person_name", FieldKind::Char { max_length: 30 })
};
pub const LIVES_IN_TOWN: FieldSpec =
    FieldSpec::required("lives_in_town", FieldKind::Char { max_length: 40 });
pub const NICKNAME: FieldSpec = FieldSpec {
    nullable: true,
    ..FieldSpec::required("nickname", FieldKind::Char { max_length: 20 })
};

pub const JOB_NAME: FieldSpec = FieldSpec {
    primary_key: true,
    ..FieldSpec::required("job_name", FieldKind::Char { max_length: 30 })
};
pub const START_DATE: FieldSpec = FieldSpec::required("start_date", FieldKind::Date);
pub const END_DATE: FieldSpec = FieldSpec::required("end_date", FieldKind::Date);
pub const SALARY: FieldSpec = FieldSpec::required(
    "salary",
    FieldKind::Decimal {
        max_digits: 7,
        decimal_places: 2,
    },
);
pub const PERSON_EMPLOYED: FieldSpec = FieldSpec {
    references: Some(ForeignKeySpec {
        table: "person",
        column: "person_name",
    }),
    ..FieldSpec::required("person_employed", FieldKind::Char { max_length: 30 })
};

pub const PERSON_SCHEMA: RecordSchema = RecordSchema {
    table: "person",
    fields: &[PERSON_NAME, LIVES_IN_TOWN, NICKNAME],
};

pub const JOB_SCHEMA: RecordSchema = RecordSchema {
    table: "job",
    fields: &[JOB_NAME, START_DATE, END_DATE, SALARY, PERSON_EMPLOYED],
};

/// All record shapes in dependency order (referenced tables first).
pub const ALL_SCHEMAS: &[RecordSchema] = &[PERSON_SCHEMA, JOB_SCHEMA];

/// Renders the full schema script for the given shapes.
pub fn schema_script(schemas: &[RecordSchema]) -> String {
    let mut statements = Vec::new();
    for schema in schemas {
        statements.push(schema.create_table_sql());
        statements.extend(schema.create_index_sql());
    }
    statements.join("\n")
}
