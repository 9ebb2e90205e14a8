#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, Database, DatabaseConnection, DbErr,
    Statement,
};
use sea_orm_migration::prelude::*;
use searchcrate::metadata::{EntityDescriptor, FieldDef, FieldKind};

pub mod badge_entity;
pub mod role_entity;
pub mod user_entity;

use user_entity::Status;

/// Fields every stored entity inherits.
pub static BASE: EntityDescriptor = EntityDescriptor {
    type_name: "admin::BaseEntity",
    table: "",
    id_field: "oid",
    fields: &[
        FieldDef::new("oid", "oid", FieldKind::String),
        FieldDef::new("createdAt", "created_at", FieldKind::Date),
    ],
    parent: None,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    init_tracing();
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Database seeded with three roles, three badges and seven users.
///
/// | oid | name  | age | status  | role | created    | verified | badges |
/// |-----|-------|-----|---------|------|------------|----------|--------|
/// | u1  | Alice | 34  | ACTIVE  | r1   | 2024-01-01 | yes      | b1, b2 |
/// | u2  | Bob   | 17  | ACTIVE  | r2   | 2024-01-02 | no       |        |
/// | u3  | Carol | 45  | PASSIVE | r2   | 2024-01-03 | yes      |        |
/// | u4  | Dave  | 22  | ACTIVE  | r3   | 2024-01-04 | no       | b3     |
/// | u5  | Eve   | 29  | ACTIVE  | r2   | 2024-01-05 | yes      |        |
/// | u6  | Frank | 51  | ACTIVE  |      | 2024-01-06 | no       |        |
/// | u7  | Grace | 38  | ACTIVE  | r1   | 2024-01-07 | no       |        |
///
/// Frank has no email. Every user has `score = age / 10` and `version` equal
/// to the numeric part of its oid, except Frank at `10_000_000_000`.
///
/// | oid | price  |
/// |-----|--------|
/// | u1  | 10.00  |
/// | u2  | 1.25   |
/// | u3  | 3.50   |
/// | u4  | 20.00  |
/// | u5  | 0.99   |
/// | u6  | 100.00 |
/// | u7  | 7.50   |
///
/// `price` is not part of the entity model: SQLite keeps whole decimals as
/// INTEGER, which the model decoder rejects. It is only read by projection.
pub async fn setup_seeded_db() -> Result<DatabaseConnection, DbErr> {
    let db = setup_test_db().await?;

    for (oid, name, code) in [
        ("r1", "Administrator", "ADM"),
        ("r2", "Editor", "EDT"),
        ("r3", "Viewer", "VWR"),
    ] {
        role_entity::ActiveModel {
            oid: Set(oid.to_string()),
            created_at: Set(day(1)),
            name: Set(name.to_string()),
            code: Set(code.to_string()),
        }
        .insert(&db)
        .await?;
    }

    for (oid, label, owner) in [
        ("b1", "Early adopter", "u1"),
        ("b2", "Top reviewer", "u1"),
        ("b3", "Mentor", "u4"),
    ] {
        badge_entity::ActiveModel {
            oid: Set(oid.to_string()),
            created_at: Set(day(1)),
            label: Set(label.to_string()),
            owner_oid: Set(owner.to_string()),
        }
        .insert(&db)
        .await?;
    }

    let users = [
        ("u1", "Alice", 34, Status::Active, Some("r1"), 1, true),
        ("u2", "Bob", 17, Status::Active, Some("r2"), 2, false),
        ("u3", "Carol", 45, Status::Passive, Some("r2"), 3, true),
        ("u4", "Dave", 22, Status::Active, Some("r3"), 4, false),
        ("u5", "Eve", 29, Status::Active, Some("r2"), 5, true),
        ("u6", "Frank", 51, Status::Active, None, 6, false),
        ("u7", "Grace", 38, Status::Active, Some("r1"), 7, false),
    ];
    for (oid, name, age, status, role, created, verified) in users {
        let version = if oid == "u6" { 10_000_000_000 } else { i64::from(created) };
        let email = (name != "Frank").then(|| format!("{}@example.com", name.to_lowercase()));
        user_entity::ActiveModel {
            oid: Set(oid.to_string()),
            created_at: Set(day(created)),
            name: Set(name.to_string()),
            email: Set(email),
            age: Set(age),
            status: Set(status),
            role_oid: Set(role.map(str::to_string)),
            verified: Set(verified),
            score: Set(f64::from(age) / 10.0),
            version: Set(version),
            password: Set("secret".to_string()),
        }
        .insert(&db)
        .await?;
    }

    for (oid, price) in [
        ("u1", "10.00"),
        ("u2", "1.25"),
        ("u3", "3.50"),
        ("u4", "20.00"),
        ("u5", "0.99"),
        ("u6", "100.00"),
        ("u7", "7.50"),
    ] {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            format!("UPDATE users SET price = {price} WHERE oid = '{oid}'"),
        ))
        .await?;
    }

    Ok(db)
}

/// Add an active user with no role, created on `created` January 2024.
pub async fn insert_user(
    db: &DatabaseConnection,
    oid: &str,
    name: &str,
    created: u32,
) -> Result<user_entity::Model, DbErr> {
    user_entity::ActiveModel {
        oid: Set(oid.to_string()),
        created_at: Set(day(created)),
        name: Set(name.to_string()),
        email: Set(None),
        age: Set(40),
        status: Set(Status::Active),
        role_oid: Set(None),
        verified: Set(false),
        score: Set(4.0),
        version: Set(1),
        password: Set("secret".to_string()),
    }
    .insert(db)
    .await
}

/// Midnight UTC on the given day of January 2024.
pub fn day(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateTables)]
    }
}

pub struct CreateTables;

#[async_trait::async_trait]
impl MigrationName for CreateTables {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_admin_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateTables {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Roles::Oid).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Roles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Roles::Name).string().not_null())
                    .col(ColumnDef::new(Roles::Code).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Badges::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Badges::Oid).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Badges::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Badges::Label).string().not_null())
                    .col(ColumnDef::new(Badges::OwnerOid).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Oid).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().null())
                    .col(ColumnDef::new(Users::Age).integer().not_null())
                    .col(ColumnDef::new(Users::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Users::RoleOid).string().null())
                    .col(ColumnDef::new(Users::Verified).boolean().not_null())
                    .col(ColumnDef::new(Users::Score).double().not_null())
                    .col(ColumnDef::new(Users::Price).decimal_len(10, 2).null())
                    .col(ColumnDef::new(Users::Version).big_integer().not_null())
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Badges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Oid,
    CreatedAt,
    Name,
    Code,
}

#[derive(DeriveIden)]
enum Badges {
    Table,
    Oid,
    CreatedAt,
    Label,
    OwnerOid,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Oid,
    CreatedAt,
    Name,
    Email,
    Age,
    Status,
    RoleOid,
    Verified,
    Score,
    Price,
    Version,
    Password,
}
