use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use searchcrate::metadata::{EntityDescriptor, FieldDef, FieldKind};

use super::BASE;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub oid: String,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    type_name: "admin::Role",
    table: "roles",
    id_field: "oid",
    fields: &[
        FieldDef::new("name", "name", FieldKind::String),
        FieldDef::new("code", "code", FieldKind::String),
    ],
    parent: Some(&BASE),
};
