use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// Daily per-store inspection round. One row per (store, date), enforced by
/// a unique index; mutated by autosave while in-progress, immutable once
/// completed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "checklists")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub date: Date,
    pub status: ChecklistStatus,
    #[sea_orm(column_type = "Json")]
    pub pdv_checks: PdvChecks,
    pub store_id: i32,
    pub finalized_by_user_id: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ChecklistStatus {
    #[sea_orm(string_value = "in-progress")]
    #[serde(rename = "in-progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    #[serde(rename = "completed")]
    Completed,
}

/// Ordered per-PDV check results, stored denormalized as a JSON column.
/// Serialization must stay lossless and order-preserving; the order is the
/// order the technician walked the terminals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct PdvChecks(pub Vec<PdvCheck>);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdvCheck {
    pub pdv_id: i32,
    pub result: CheckResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_status_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
    /// Item references in `std-<id>` form, first one wins for problem creation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckResult {
    Ok,
    Problem,
    Busy,
}

impl PdvCheck {
    /// Item id referenced by the first `issues` entry, if any.
    pub fn issue_item_id(&self) -> Option<i32> {
        let first = self.issues.first()?;
        first
            .strip_prefix("std-")
            .unwrap_or(first)
            .parse::<i32>()
            .ok()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stores::Entity",
        from = "Column::StoreId",
        to = "super::stores::Column::Id"
    )]
    Store,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::FinalizedByUserId",
        to = "super::users::Column::Id"
    )]
    Finalizer,
}

impl Related<super::stores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Store.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Finalizer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_item_id_parses_std_references() {
        let check = PdvCheck {
            pdv_id: 1,
            result: CheckResult::Problem,
            new_status_id: Some(3),
            observation: None,
            issues: vec!["std-2".to_string(), "std-5".to_string()],
        };
        assert_eq!(check.issue_item_id(), Some(2));
    }

    #[test]
    fn issue_item_id_accepts_bare_ids_and_rejects_garbage() {
        let mut check = PdvCheck {
            pdv_id: 1,
            result: CheckResult::Problem,
            new_status_id: Some(3),
            observation: None,
            issues: vec!["7".to_string()],
        };
        assert_eq!(check.issue_item_id(), Some(7));

        check.issues = vec!["teclado".to_string()];
        assert_eq!(check.issue_item_id(), None);

        check.issues.clear();
        assert_eq!(check.issue_item_id(), None);
    }

    #[test]
    fn pdv_checks_round_trip_preserves_order() {
        let checks = PdvChecks(vec![
            PdvCheck {
                pdv_id: 102,
                result: CheckResult::Problem,
                new_status_id: Some(3),
                observation: Some("Tecla travada".to_string()),
                issues: vec!["std-2".to_string()],
            },
            PdvCheck {
                pdv_id: 101,
                result: CheckResult::Ok,
                new_status_id: Some(1),
                observation: None,
                issues: vec![],
            },
            PdvCheck {
                pdv_id: 103,
                result: CheckResult::Busy,
                new_status_id: None,
                observation: None,
                issues: vec![],
            },
        ]);

        let json = serde_json::to_string(&checks).unwrap();
        let back: PdvChecks = serde_json::from_str(&json).unwrap();
        assert_eq!(back, checks);
    }
}
