//! Shared fixtures: in-memory SQLite with migrations applied and a seeded
//! store, technicians and terminals.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};
use sea_orm_migration::MigratorTrait;

use painel_ti::common::StatusSentinels;
use painel_ti::entity::{pdvs, status_types, stores, users};

pub const STORE_ID: i32 = 1;
pub const ADMIN_ID: i32 = 1;
pub const TECH_ID: i32 = 2;
pub const PDV_101: i32 = 101;
pub const PDV_102: i32 = 102;
pub const PDV_103: i32 = 103;

pub struct TestContext {
    pub db: DatabaseConnection,
    pub sentinels: StatusSentinels,
}

pub async fn setup() -> TestContext {
    // single connection so the in-memory database survives pooling
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1);

    let db = Database::connect(opts)
        .await
        .expect("connect to in-memory sqlite");

    migration::Migrator::up(&db, None)
        .await
        .expect("run migrations");

    seed(&db).await;

    let sentinels = StatusSentinels::load(&db)
        .await
        .expect("sentinel statuses seeded by migration");

    TestContext { db, sentinels }
}

pub async fn status_id_by_name(db: &DatabaseConnection, name: &str) -> i32 {
    status_types::Entity::find()
        .filter(status_types::Column::Name.eq(name))
        .one(db)
        .await
        .expect("query status types")
        .unwrap_or_else(|| panic!("status type '{name}' not seeded"))
        .id
}

async fn seed(db: &DatabaseConnection) {
    stores::ActiveModel {
        id: Set(STORE_ID),
        name: Set("Nilo - Loja 01 (Centro)".to_string()),
    }
    .insert(db)
    .await
    .expect("seed store");

    for (id, name, username) in [
        (ADMIN_ID, "Administrador", "admin"),
        (TECH_ID, "Fulano de Tal", "fulano"),
    ] {
        users::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            username: Set(username.to_string()),
        }
        .insert(db)
        .await
        .expect("seed user");
    }

    for (id, number) in [(PDV_101, "101"), (PDV_102, "102"), (PDV_103, "103")] {
        pdvs::ActiveModel {
            id: Set(id),
            number: Set(number.to_string()),
            store_id: Set(STORE_ID),
        }
        .insert(db)
        .await
        .expect("seed pdv");
    }
}
