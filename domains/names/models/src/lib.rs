pub mod names;
pub mod record;

pub use names::{
    ActiveModel as NameActiveModel, Column as NameColumn, Entity as NameEntity,
    Model as NameModel, TABLE_NAME,
};
pub use record::{Record, RecordSet};
