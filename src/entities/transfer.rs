use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transfer lifecycle status. Confirmation is one-way; there is no
/// un-confirm and no void.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum TransferStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
}

/// Inter-location stock move document.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transfers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Generated code, unique, date-sequenced (`TRF...`)
    pub code: String,

    pub status: TransferStatus,
    pub from_location_id: i64,
    pub to_location_id: i64,
    pub confirmed_at: Option<DateTimeUtc>,
    pub notes: Option<String>,
    pub created_by: Option<i64>,
    pub deleted_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transfer_line::Entity")]
    TransferLine,
}

impl Related<super::transfer_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransferLine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_editable(&self) -> bool {
        self.status == TransferStatus::Draft
    }
}
