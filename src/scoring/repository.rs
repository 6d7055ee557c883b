use std::str::FromStr;
use std::sync::Mutex;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::{debug, instrument, warn};

use super::errors::ScoringError;
use super::models::{Delivery, ExtraType, ScoreboardRow, WicketType};

/// Trait for the delivery event log.
///
/// Two orderings matter and must not be conflated: game order
/// (innings, over, ball) for replay and display, and arrival order
/// (created_at) for free-hit detection when recording the next ball.
#[async_trait]
pub trait DeliveryRepository: Send + Sync {
    async fn insert(&self, delivery: &Delivery) -> Result<(), ScoringError>;
    async fn update(&self, delivery: &Delivery) -> Result<(), ScoringError>;
    async fn delete(&self, delivery_id: &str) -> Result<Option<Delivery>, ScoringError>;
    async fn get(&self, delivery_id: &str) -> Result<Option<Delivery>, ScoringError>;

    /// All deliveries of a match in game order (innings, over, ball).
    async fn list_for_match(&self, match_id: &str) -> Result<Vec<Delivery>, ScoringError>;

    /// Deliveries of one innings in arrival order (created_at).
    async fn list_in_arrival_order(
        &self,
        match_id: &str,
        innings: u8,
    ) -> Result<Vec<Delivery>, ScoringError>;

    /// The latest recorded slot of an innings: maximum by (over, ball).
    async fn last_slot(
        &self,
        match_id: &str,
        innings: u8,
    ) -> Result<Option<Delivery>, ScoringError>;
}

/// In-memory implementation of DeliveryRepository for development and testing
pub struct InMemoryDeliveryRepository {
    deliveries: Mutex<Vec<Delivery>>,
}

impl Default for InMemoryDeliveryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDeliveryRepository {
    pub fn new() -> Self {
        Self {
            deliveries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DeliveryRepository for InMemoryDeliveryRepository {
    #[instrument(skip(self, delivery))]
    async fn insert(&self, delivery: &Delivery) -> Result<(), ScoringError> {
        debug!(
            delivery_id = %delivery.id,
            match_id = %delivery.match_id,
            over = delivery.over_number,
            ball = delivery.ball_number,
            "Recording delivery in memory"
        );

        let mut deliveries = self.deliveries.lock().unwrap();
        if deliveries.iter().any(|d| d.id == delivery.id) {
            warn!(delivery_id = %delivery.id, "Delivery already exists in memory");
            return Err(ScoringError::Repository(
                "Delivery already exists".to_string(),
            ));
        }
        deliveries.push(delivery.clone());
        Ok(())
    }

    #[instrument(skip(self, delivery))]
    async fn update(&self, delivery: &Delivery) -> Result<(), ScoringError> {
        let mut deliveries = self.deliveries.lock().unwrap();
        match deliveries.iter_mut().find(|d| d.id == delivery.id) {
            Some(existing) => {
                *existing = delivery.clone();
                Ok(())
            }
            None => Err(ScoringError::DeliveryNotFound(delivery.id.clone())),
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, delivery_id: &str) -> Result<Option<Delivery>, ScoringError> {
        let mut deliveries = self.deliveries.lock().unwrap();
        let position = deliveries.iter().position(|d| d.id == delivery_id);
        Ok(position.map(|index| deliveries.remove(index)))
    }

    #[instrument(skip(self))]
    async fn get(&self, delivery_id: &str) -> Result<Option<Delivery>, ScoringError> {
        let deliveries = self.deliveries.lock().unwrap();
        Ok(deliveries.iter().find(|d| d.id == delivery_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_for_match(&self, match_id: &str) -> Result<Vec<Delivery>, ScoringError> {
        let deliveries = self.deliveries.lock().unwrap();
        let mut rows: Vec<Delivery> = deliveries
            .iter()
            .filter(|d| d.match_id == match_id)
            .cloned()
            .collect();
        rows.sort_by_key(|d| (d.innings, d.over_number, d.ball_number));
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn list_in_arrival_order(
        &self,
        match_id: &str,
        innings: u8,
    ) -> Result<Vec<Delivery>, ScoringError> {
        let deliveries = self.deliveries.lock().unwrap();
        let mut rows: Vec<Delivery> = deliveries
            .iter()
            .filter(|d| d.match_id == match_id && d.innings == innings)
            .cloned()
            .collect();
        rows.sort_by_key(|d| d.created_at);
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn last_slot(
        &self,
        match_id: &str,
        innings: u8,
    ) -> Result<Option<Delivery>, ScoringError> {
        let deliveries = self.deliveries.lock().unwrap();
        Ok(deliveries
            .iter()
            .filter(|d| d.match_id == match_id && d.innings == innings)
            .max_by_key(|d| (d.over_number, d.ball_number, d.created_at))
            .cloned())
    }
}

/// PostgreSQL implementation of the delivery event log
pub struct PostgresDeliveryRepository {
    pool: PgPool,
}

impl PostgresDeliveryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn delivery_from_row(row: &sqlx::postgres::PgRow) -> Result<Delivery, ScoringError> {
        let extra_type: Option<String> = row
            .try_get("extra_type")
            .map_err(|e| ScoringError::Repository(e.to_string()))?;
        let wicket_type: Option<String> = row
            .try_get("wicket_type")
            .map_err(|e| ScoringError::Repository(e.to_string()))?;

        let parse = |e: sqlx::Error| ScoringError::Repository(e.to_string());

        Ok(Delivery {
            id: row.try_get("id").map_err(parse)?,
            match_id: row.try_get("match_id").map_err(parse)?,
            innings: row.try_get::<i16, _>("innings").map_err(parse)? as u8,
            over_number: row.try_get::<i32, _>("over_number").map_err(parse)? as u32,
            ball_number: row.try_get::<i32, _>("ball_number").map_err(parse)? as u32,
            batsman_id: row.try_get("batsman_id").map_err(parse)?,
            bowler_id: row.try_get("bowler_id").map_err(parse)?,
            runs: row.try_get::<i32, _>("runs").map_err(parse)? as u32,
            extras: row.try_get::<i32, _>("extras").map_err(parse)? as u32,
            extra_type: extra_type
                .as_deref()
                .map(ExtraType::from_str)
                .transpose()
                .map_err(|e| ScoringError::Repository(e.to_string()))?,
            wicket_type: wicket_type
                .as_deref()
                .map(WicketType::from_str)
                .transpose()
                .map_err(|e| ScoringError::Repository(e.to_string()))?,
            wicket_player_id: row.try_get("wicket_player_id").map_err(parse)?,
            is_free_hit: row.try_get("is_free_hit").map_err(parse)?,
            created_at: row.try_get("created_at").map_err(parse)?,
        })
    }
}

#[async_trait]
impl DeliveryRepository for PostgresDeliveryRepository {
    #[instrument(skip(self, delivery))]
    async fn insert(&self, delivery: &Delivery) -> Result<(), ScoringError> {
        debug!(delivery_id = %delivery.id, match_id = %delivery.match_id, "Recording delivery in database");

        sqlx::query(
            "INSERT INTO balls (id, match_id, innings, over_number, ball_number, batsman_id, bowler_id, runs, extras, extra_type, wicket_type, wicket_player_id, is_free_hit, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(&delivery.id)
        .bind(&delivery.match_id)
        .bind(delivery.innings as i16)
        .bind(delivery.over_number as i32)
        .bind(delivery.ball_number as i32)
        .bind(&delivery.batsman_id)
        .bind(&delivery.bowler_id)
        .bind(delivery.runs as i32)
        .bind(delivery.extras as i32)
        .bind(delivery.extra_type.map(|t| t.to_string()))
        .bind(delivery.wicket_type.map(|t| t.to_string()))
        .bind(&delivery.wicket_player_id)
        .bind(delivery.is_free_hit)
        .bind(delivery.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to record delivery in database");
            ScoringError::Repository(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self, delivery))]
    async fn update(&self, delivery: &Delivery) -> Result<(), ScoringError> {
        let result = sqlx::query(
            "UPDATE balls SET runs = $2, extras = $3, extra_type = $4, wicket_type = $5, wicket_player_id = $6 WHERE id = $1",
        )
        .bind(&delivery.id)
        .bind(delivery.runs as i32)
        .bind(delivery.extras as i32)
        .bind(delivery.extra_type.map(|t| t.to_string()))
        .bind(delivery.wicket_type.map(|t| t.to_string()))
        .bind(&delivery.wicket_player_id)
        .execute(&self.pool)
        .await
        .map_err(|e| ScoringError::Repository(e.to_string()))?;

        if result.rows_affected() == 0 {
            warn!(delivery_id = %delivery.id, "Delivery not found for update");
            return Err(ScoringError::DeliveryNotFound(delivery.id.clone()));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, delivery_id: &str) -> Result<Option<Delivery>, ScoringError> {
        let row = sqlx::query("DELETE FROM balls WHERE id = $1 RETURNING *")
            .bind(delivery_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ScoringError::Repository(e.to_string()))?;

        row.as_ref().map(Self::delivery_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn get(&self, delivery_id: &str) -> Result<Option<Delivery>, ScoringError> {
        let row = sqlx::query("SELECT * FROM balls WHERE id = $1")
            .bind(delivery_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ScoringError::Repository(e.to_string()))?;

        row.as_ref().map(Self::delivery_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn list_for_match(&self, match_id: &str) -> Result<Vec<Delivery>, ScoringError> {
        let rows = sqlx::query(
            "SELECT * FROM balls WHERE match_id = $1 ORDER BY innings ASC, over_number ASC, ball_number ASC",
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ScoringError::Repository(e.to_string()))?;

        rows.iter().map(Self::delivery_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn list_in_arrival_order(
        &self,
        match_id: &str,
        innings: u8,
    ) -> Result<Vec<Delivery>, ScoringError> {
        let rows = sqlx::query(
            "SELECT * FROM balls WHERE match_id = $1 AND innings = $2 ORDER BY created_at ASC",
        )
        .bind(match_id)
        .bind(innings as i16)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ScoringError::Repository(e.to_string()))?;

        rows.iter().map(Self::delivery_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn last_slot(
        &self,
        match_id: &str,
        innings: u8,
    ) -> Result<Option<Delivery>, ScoringError> {
        let row = sqlx::query(
            "SELECT * FROM balls WHERE match_id = $1 AND innings = $2 ORDER BY over_number DESC, ball_number DESC, created_at DESC LIMIT 1",
        )
        .bind(match_id)
        .bind(innings as i16)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ScoringError::Repository(e.to_string()))?;

        row.as_ref().map(Self::delivery_from_row).transpose()
    }
}

/// Trait for the persisted scoreboard snapshot rows, keyed by
/// (match, team, innings). Upserts are idempotent.
#[async_trait]
pub trait ScoreboardRepository: Send + Sync {
    async fn upsert(&self, rows: &[ScoreboardRow]) -> Result<(), ScoringError>;
    async fn rows_for_match(&self, match_id: &str) -> Result<Vec<ScoreboardRow>, ScoringError>;
    async fn rows_for_matches(
        &self,
        match_ids: &[String],
    ) -> Result<Vec<ScoreboardRow>, ScoringError>;
}

/// In-memory implementation of ScoreboardRepository for development and testing
pub struct InMemoryScoreboardRepository {
    rows: Mutex<Vec<ScoreboardRow>>,
}

impl Default for InMemoryScoreboardRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryScoreboardRepository {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ScoreboardRepository for InMemoryScoreboardRepository {
    #[instrument(skip(self, rows))]
    async fn upsert(&self, rows: &[ScoreboardRow]) -> Result<(), ScoringError> {
        let mut stored = self.rows.lock().unwrap();
        for row in rows {
            let existing = stored.iter_mut().find(|r| {
                r.match_id == row.match_id && r.team_id == row.team_id && r.innings == row.innings
            });
            match existing {
                Some(slot) => *slot = row.clone(),
                None => stored.push(row.clone()),
            }
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn rows_for_match(&self, match_id: &str) -> Result<Vec<ScoreboardRow>, ScoringError> {
        let stored = self.rows.lock().unwrap();
        Ok(stored
            .iter()
            .filter(|r| r.match_id == match_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn rows_for_matches(
        &self,
        match_ids: &[String],
    ) -> Result<Vec<ScoreboardRow>, ScoringError> {
        let stored = self.rows.lock().unwrap();
        Ok(stored
            .iter()
            .filter(|r| match_ids.contains(&r.match_id))
            .cloned()
            .collect())
    }
}
