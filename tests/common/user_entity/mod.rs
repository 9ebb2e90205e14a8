use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm_migration::sea_query::StringLen;
use searchcrate::SearchResource;
use searchcrate::metadata::{
    EntityDescriptor, EnumDescriptor, EnumVariant, FieldDef, FieldKind, SearchFrom,
};

use super::{BASE, badge_entity, role_entity};

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Status {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "PASSIVE")]
    Passive,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub oid: String,
    pub created_at: DateTime<Utc>,
    pub name: String,
    #[sea_orm(nullable)]
    pub email: Option<String>,
    pub age: i32,
    pub status: Status,
    #[sea_orm(nullable)]
    pub role_oid: Option<String>,
    pub verified: bool,
    pub score: f64,
    pub version: i64,
    pub password: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub static STATUS: EnumDescriptor = EnumDescriptor {
    name: "Status",
    variants: &[
        EnumVariant {
            name: "ACTIVE",
            text: "Active",
        },
        EnumVariant {
            name: "PASSIVE",
            text: "Inactive",
        },
    ],
};

pub static USER_ROLE: SearchFrom =
    SearchFrom::new(&role_entity::DESCRIPTOR, &["name", "code"], "oid");

pub static USER_BADGES: SearchFrom =
    SearchFrom::new(&badge_entity::DESCRIPTOR, &["label"], "ownerOid").local_id("oid");

pub static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    type_name: "admin::User",
    table: "users",
    id_field: "oid",
    fields: &[
        FieldDef::new("name", "name", FieldKind::String),
        FieldDef::new("email", "email", FieldKind::String),
        FieldDef::new("age", "age", FieldKind::Integer),
        FieldDef::new("status", "status", FieldKind::SearchableEnum(&STATUS)),
        FieldDef::new("roleOid", "role_oid", FieldKind::String).search_from(&USER_ROLE),
        FieldDef::new("badges", "badges", FieldKind::String).search_from(&USER_BADGES),
        FieldDef::new("verified", "verified", FieldKind::Boolean),
        FieldDef::new("score", "score", FieldKind::Double),
        FieldDef::new("price", "price", FieldKind::Decimal),
        FieldDef::new("version", "version", FieldKind::Long),
        FieldDef::new("password", "password", FieldKind::String).search_ignore(),
        FieldDef::new("displayName", "display_name", FieldKind::String).transient(),
    ],
    parent: Some(&BASE),
};

impl SearchResource for Model {
    const DESCRIPTOR: &'static EntityDescriptor = &DESCRIPTOR;
    const RESOURCE_NAME_PLURAL: &'static str = "users";
}
