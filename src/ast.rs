use crate::engine::Assignments;
use crate::row::Conditions;

/// One parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Exit,
    ListTables,
    CreateTable(CreateTable),
    DropTable { table: String },
    Info { table: String },
    Insert(Insert),
    Select(Select),
    Update(Update),
    Delete(Delete),
}

impl Command {
    /// Short name used in logs, timing reports and confirmation prompts.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Exit => "exit",
            Self::ListTables => "list_tables",
            Self::CreateTable(_) => "create_table",
            Self::DropTable { .. } => "drop_table",
            Self::Info { .. } => "info",
            Self::Insert(_) => "insert",
            Self::Select(_) => "select",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub name: String,
    /// Raw `name:type` specs, validated by the catalog.
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,
    /// Literals as typed, quotes included.
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub table: String,
    pub where_clause: Option<Conditions>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,
    pub assignments: Assignments,
    pub where_clause: Conditions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: String,
    pub where_clause: Conditions,
}
