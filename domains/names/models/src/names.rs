use sea_orm::{Set, entity::prelude::*};

use crate::Record;

/// Destination table; it must already exist
pub const TABLE_NAME: &str = "names";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "names")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Record> for ActiveModel {
    fn from(record: &Record) -> Self {
        Self {
            id: Set(record.id),
            name: Set(record.name.clone()),
        }
    }
}

impl From<Model> for Record {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::ActiveValue;

    use super::*;

    #[test]
    fn test_entity_targets_names_table() {
        assert_eq!(Entity.table_name(), TABLE_NAME);
    }

    #[test]
    fn test_active_model_from_record() {
        let record = Record::new(7, "Adam_7");
        let model = ActiveModel::from(&record);

        assert_eq!(model.id, ActiveValue::Set(7));
        assert_eq!(model.name, ActiveValue::Set("Adam_7".to_string()));
    }
}
