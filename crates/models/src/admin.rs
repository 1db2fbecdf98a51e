use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::user::Entity",
        from = "Column::UserId",
        to = "crate::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<crate::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn grant(db: &DatabaseConnection, user_id: i64) -> Result<Model, ModelError> {
    let am = ActiveModel { user_id: Set(user_id) };
    Ok(am.insert(db).await?)
}

/// Admin flag for an existing user; an unknown id is [`ModelError::NotFound`],
/// not `false`.
pub async fn is_admin(db: &DatabaseConnection, user_id: i64) -> Result<bool, ModelError> {
    if user::find(db, user_id).await?.is_none() {
        return Err(ModelError::NotFound("user"));
    }
    Ok(Entity::find_by_id(user_id).one(db).await?.is_some())
}
