use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set, TransactionTrait,
};

use super::entities::prelude::Todo;
use super::entities::todo;
use super::{StoreError, StoreResult};

/// Snapshot of every item, most recently published first.
pub async fn list_all(db: &DatabaseConnection) -> StoreResult<Vec<todo::Model>> {
    let todos = Todo::find()
        .order_by_desc(todo::Column::PubDate)
        .all(db)
        .await?;
    Ok(todos)
}

pub async fn get_by_id(db: &DatabaseConnection, id: i32) -> StoreResult<todo::Model> {
    Todo::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound { entity: "Todo", id })
}

pub async fn create(db: &DatabaseConnection, title: &str, text: &str) -> StoreResult<todo::Model> {
    if title.is_empty() {
        return Err(StoreError::MissingField { field: "Title" });
    }
    if text.is_empty() {
        return Err(StoreError::MissingField { field: "Text" });
    }

    let now = Utc::now().fixed_offset();
    let model = todo::ActiveModel {
        title: Set(title.to_string()),
        text: Set(text.to_string()),
        done: Set(false),
        pub_date: Set(now),
        update_date: Set(now),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// Full-table replace of the done flags: every row whose id is in `done_ids`
/// becomes done, every other row becomes not-done, and every row's
/// `update_date` moves. One transaction, committed or rolled back whole.
pub async fn set_done_flags(
    db: &DatabaseConnection,
    done_ids: &HashSet<i32>,
) -> StoreResult<u64> {
    let txn = db.begin().await?;
    let todos = Todo::find().all(&txn).await?;
    let now = Utc::now().fixed_offset();

    let mut touched = 0u64;
    for item in todos {
        let done = done_ids.contains(&item.id);
        let mut active: todo::ActiveModel = item.into();
        active.done = Set(done);
        active.update_date = Set(now);
        active.update(&txn).await?;
        touched += 1;
    }

    txn.commit().await?;
    Ok(touched)
}
