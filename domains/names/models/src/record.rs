/// One row of the benchmark load
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Record {
    pub id: i32,
    pub name: String,
}

impl Record {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Records in generation order; read-only once built
pub type RecordSet = Vec<Record>;
