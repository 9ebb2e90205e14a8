use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use searchcrate::metadata::{EntityDescriptor, FieldDef, FieldKind};

use super::BASE;

/// Badges point at their owner, so users reach them through their own id.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "badges")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub oid: String,
    pub created_at: DateTime<Utc>,
    pub label: String,
    pub owner_oid: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    type_name: "admin::Badge",
    table: "badges",
    id_field: "oid",
    fields: &[
        FieldDef::new("label", "label", FieldKind::String),
        FieldDef::new("ownerOid", "owner_oid", FieldKind::String),
    ],
    parent: Some(&BASE),
};
