use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One observation in the append-only status ledger.
///
/// `tech_id` and `item_id` go null when the referenced user/item is removed;
/// the entry itself survives until its PDV is deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "status_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub description: String,
    pub timestamp: DateTimeUtc,
    pub pdv_id: i32,
    pub status_id: i32,
    pub tech_id: Option<i32>,
    pub item_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pdvs::Entity",
        from = "Column::PdvId",
        to = "super::pdvs::Column::Id"
    )]
    Pdv,
    #[sea_orm(
        belongs_to = "super::status_types::Entity",
        from = "Column::StatusId",
        to = "super::status_types::Column::Id"
    )]
    StatusType,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TechId",
        to = "super::users::Column::Id"
    )]
    Tech,
    #[sea_orm(
        belongs_to = "super::pdv_items::Entity",
        from = "Column::ItemId",
        to = "super::pdv_items::Column::Id"
    )]
    Item,
}

impl Related<super::pdvs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pdv.def()
    }
}

impl Related<super::status_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatusType.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tech.def()
    }
}

impl Related<super::pdv_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
