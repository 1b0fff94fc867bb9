use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Incident record for a PDV, opened from a non-"Ok" status event.
///
/// `origin_status_id` is the status that triggered creation and is never the
/// "Ok" sentinel. A PDV may carry several concurrent problems (one per broken
/// item); status resolution uses the most recently created unresolved one.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "problems")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub pdv_id: i32,
    pub item_id: Option<i32>,
    pub reported_by_user_id: Option<i32>,
    pub assigned_to_user_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub status: ProblemStatus,
    pub created_at: DateTimeUtc,
    pub resolved_at: Option<DateTimeUtc>,
    pub resolution_notes: Option<String>,
    pub resolved_by_user_id: Option<i32>,
    pub origin_status_id: i32,
}

/// Lifecycle: Open -> (optionally InProgress) -> Resolved, terminal.
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ProblemStatus {
    #[sea_orm(string_value = "Aberto")]
    #[serde(rename = "Aberto")]
    Open,
    #[sea_orm(string_value = "Em Andamento")]
    #[serde(rename = "Em Andamento")]
    InProgress,
    #[sea_orm(string_value = "Resolvido")]
    #[serde(rename = "Resolvido")]
    Resolved,
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
        belongs_to = "super::pdv_items::Entity",
        from = "Column::ItemId",
        to = "super::pdv_items::Column::Id"
    )]
    Item,
    #[sea_orm(
        belongs_to = "super::status_types::Entity",
        from = "Column::OriginStatusId",
        to = "super::status_types::Column::Id"
    )]
    OriginStatus,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReportedByUserId",
        to = "super::users::Column::Id"
    )]
    Reporter,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ResolvedByUserId",
        to = "super::users::Column::Id"
    )]
    Resolver,
}

impl Related<super::pdvs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pdv.def()
    }
}

impl Related<super::pdv_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl Related<super::status_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OriginStatus.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
