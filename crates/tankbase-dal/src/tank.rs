use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::Pool;
use tracing::debug;

use crate::error::Result;

/// Payload for both create and update - update replaces every field except id.
#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CreateTank {
    #[garde(length(min = 1, max = 255))]
    pub name: String,
    #[garde(length(min = 1, max = 255))]
    pub nation: String,
    #[garde(length(min = 1, max = 255))]
    pub class: String,
    #[garde(skip)]
    pub year: Option<i64>,
    #[garde(length(max = 5000))]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Tank {
    pub id: i64,
    pub name: String,
    pub nation: String,
    pub class: String,
    pub year: Option<i64>,
    pub description: Option<String>,
}

pub type TankRepository = TankRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct TankRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> TankRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: CreateTank) -> Result<Tank> {
        let result = sqlx::query(
            "INSERT INTO tanks (name, nation, class, year, description) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&payload.name)
        .bind(&payload.nation)
        .bind(&payload.class)
        .bind(payload.year)
        .bind(&payload.description)
        .execute(&self.executor)
        .await?;

        let id = result.last_insert_rowid();
        self.get(id).await
    }

    /// Replaces all fields of the matching record. An id that matches no row
    /// affects nothing and is not an error.
    pub async fn update(&self, id: i64, payload: CreateTank) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE tanks SET name = ?, nation = ?, class = ?, year = ?, description = ? WHERE id = ?",
        )
        .bind(&payload.name)
        .bind(&payload.nation)
        .bind(&payload.class)
        .bind(payload.year)
        .bind(&payload.description)
        .bind(id)
        .execute(&self.executor)
        .await?;

        let affected = result.rows_affected();
        if affected == 0 {
            debug!("Update of tank {} matched no row", id);
        }
        Ok(affected)
    }

    /// Hard delete; deleting an unknown id affects nothing and is not an error.
    pub async fn delete(&self, id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tanks WHERE id = ?")
            .bind(id)
            .execute(&self.executor)
            .await?;

        let affected = result.rows_affected();
        if affected == 0 {
            debug!("Delete of tank {} matched no row", id);
        }
        Ok(affected)
    }

    /// Full listing, most recently created first.
    pub async fn list_all(&self) -> Result<Vec<Tank>> {
        let records = sqlx::query_as::<_, Tank>("SELECT * FROM tanks ORDER BY id DESC")
            .fetch_all(&self.executor)
            .await?;
        Ok(records)
    }

    pub async fn get(&self, id: i64) -> Result<Tank> {
        let record = sqlx::query_as::<_, Tank>("SELECT * FROM tanks WHERE id = ?")
            .bind(id)
            .fetch_one(&self.executor)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    crate::Error::RecordNotFound(format!("Tank {}", id))
                }
                other => other.into(),
            })?;
        Ok(record)
    }
}
