/*
 * Responsibility
 * - vehicles CRUD behind the VehicleStore trait
 * - list applies name/brand filters before paging
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tokio::sync::RwLock;

use crate::domain::{NewVehicle, Vehicle, VehicleFilter};
use crate::repos::{error::RepoError, pagination::Page};

#[async_trait]
pub trait VehicleStore: Send + Sync {
    /// Ordered by id. Fails with `InvalidPage` when `page <= 0`.
    async fn list(&self, page: i64, filter: &VehicleFilter) -> Result<Vec<Vehicle>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Vehicle>, RepoError>;

    async fn save(&self, vehicle: NewVehicle) -> Result<Vehicle, RepoError>;

    /// All or nothing.
    async fn save_all(&self, vehicles: Vec<NewVehicle>) -> Result<Vec<Vehicle>, RepoError>;

    async fn update(&self, id: i64, vehicle: NewVehicle) -> Result<Option<Vehicle>, RepoError>;

    async fn delete(&self, id: i64) -> Result<bool, RepoError>;
}

#[derive(Debug, FromRow)]
struct VehicleRow {
    id: i64,
    name: String,
    brand: String,
    year: i32,
}

impl From<VehicleRow> for Vehicle {
    fn from(row: VehicleRow) -> Self {
        Vehicle {
            id: row.id,
            name: row.name,
            brand: row.brand,
            year: row.year,
        }
    }
}

/// Substring pattern for `ILIKE ... ESCAPE '\'`. The term's own `%` and `_`
/// match literally, as they do in the in-memory filter.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(Clone, Debug)]
pub struct PgVehicleStore {
    db: PgPool,
}

impl PgVehicleStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VehicleStore for PgVehicleStore {
    async fn list(&self, page: i64, filter: &VehicleFilter) -> Result<Vec<Vehicle>, RepoError> {
        let page = Page::new(page)?;

        let rows = sqlx::query_as::<_, VehicleRow>(
            r#"
            SELECT id, name, brand, year
            FROM vehicles
            WHERE ($1::text IS NULL OR name ILIKE $1 ESCAPE '\')
              AND ($2::text IS NULL OR brand ILIKE $2 ESCAPE '\')
            ORDER BY id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filter.name.as_deref().map(like_pattern))
        .bind(filter.brand.as_deref().map(like_pattern))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Vehicle::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Vehicle>, RepoError> {
        let row = sqlx::query_as::<_, VehicleRow>(
            r#"
            SELECT id, name, brand, year
            FROM vehicles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Vehicle::from))
    }

    async fn save(&self, vehicle: NewVehicle) -> Result<Vehicle, RepoError> {
        let row = sqlx::query_as::<_, VehicleRow>(
            r#"
            INSERT INTO vehicles (name, brand, year)
            VALUES ($1, $2, $3)
            RETURNING id, name, brand, year
            "#,
        )
        .bind(&vehicle.name)
        .bind(&vehicle.brand)
        .bind(vehicle.year)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn save_all(&self, vehicles: Vec<NewVehicle>) -> Result<Vec<Vehicle>, RepoError> {
        let mut tx = self.db.begin().await?;
        let mut saved = Vec::with_capacity(vehicles.len());

        for vehicle in vehicles {
            let row = sqlx::query_as::<_, VehicleRow>(
                r#"
                INSERT INTO vehicles (name, brand, year)
                VALUES ($1, $2, $3)
                RETURNING id, name, brand, year
                "#,
            )
            .bind(&vehicle.name)
            .bind(&vehicle.brand)
            .bind(vehicle.year)
            .fetch_one(&mut *tx)
            .await?;
            saved.push(row.into());
        }

        tx.commit().await?;
        Ok(saved)
    }

    async fn update(&self, id: i64, vehicle: NewVehicle) -> Result<Option<Vehicle>, RepoError> {
        let row = sqlx::query_as::<_, VehicleRow>(
            r#"
            UPDATE vehicles
            SET name = $2, brand = $3, year = $4
            WHERE id = $1
            RETURNING id, name, brand, year
            "#,
        )
        .bind(id)
        .bind(&vehicle.name)
        .bind(&vehicle.brand)
        .bind(vehicle.year)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Vehicle::from))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM vehicles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Vehicle>,
    last_id: i64,
}

impl Table {
    fn insert(&mut self, vehicle: NewVehicle) -> Vehicle {
        self.last_id += 1;
        let saved = Vehicle {
            id: self.last_id,
            name: vehicle.name,
            brand: vehicle.brand,
            year: vehicle.year,
        };
        self.rows.push(saved.clone());
        saved
    }
}

#[derive(Debug, Default)]
pub struct InMemoryVehicleStore {
    table: RwLock<Table>,
}

impl InMemoryVehicleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VehicleStore for InMemoryVehicleStore {
    async fn list(&self, page: i64, filter: &VehicleFilter) -> Result<Vec<Vehicle>, RepoError> {
        let page = Page::new(page)?;
        let table = self.table.read().await;
        let matching: Vec<Vehicle> = table
            .rows
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect();
        Ok(page.slice(&matching))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Vehicle>, RepoError> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|v| v.id == id).cloned())
    }

    async fn save(&self, vehicle: NewVehicle) -> Result<Vehicle, RepoError> {
        Ok(self.table.write().await.insert(vehicle))
    }

    async fn save_all(&self, vehicles: Vec<NewVehicle>) -> Result<Vec<Vehicle>, RepoError> {
        let mut table = self.table.write().await;
        Ok(vehicles.into_iter().map(|v| table.insert(v)).collect())
    }

    async fn update(&self, id: i64, vehicle: NewVehicle) -> Result<Option<Vehicle>, RepoError> {
        let mut table = self.table.write().await;
        Ok(table.rows.iter_mut().find(|v| v.id == id).map(|row| {
            row.name = vehicle.name;
            row.brand = vehicle.brand;
            row.year = vehicle.year;
            row.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|v| v.id != id);
        Ok(table.rows.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car(name: &str, brand: &str) -> NewVehicle {
        NewVehicle {
            name: name.to_string(),
            brand: brand.to_string(),
            year: 2020,
        }
    }

    #[tokio::test]
    async fn filters_apply_before_paging() {
        let store = InMemoryVehicleStore::new();
        for i in 0..15 {
            let civic = car(&format!("Civic {i}"), "Honda");
            let focus = car(&format!("Focus {i}"), "Ford");
            store.save(civic).await.unwrap();
            store.save(focus).await.unwrap();
        }

        let filter = VehicleFilter::new(None, Some("honda".into()));
        let first = store.list(1, &filter).await.unwrap();
        let second = store.list(2, &filter).await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(second.len(), 5);
        assert!(first.iter().chain(&second).all(|v| v.brand == "Honda"));

        assert!(matches!(
            store.list(0, &VehicleFilter::default()).await,
            Err(RepoError::InvalidPage(0))
        ));
    }

    #[test]
    fn like_pattern_matches_wildcards_literally() {
        assert_eq!(like_pattern("civic"), "%civic%");
        assert_eq!(like_pattern("50%_off"), r"%50\%\_off%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
    }

    #[tokio::test]
    async fn wildcard_characters_in_filters_are_literal() {
        let store = InMemoryVehicleStore::new();
        store.save(car("Model_3", "Tesla")).await.unwrap();
        store.save(car("Model S", "Tesla")).await.unwrap();

        let filter = VehicleFilter::new(Some("l_".into()), None);
        let rows = store.list(1, &filter).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Model_3");

        let filter = VehicleFilter::new(Some("%".into()), None);
        assert!(store.list(1, &filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let store = InMemoryVehicleStore::new();
        let saved = store.save(car("Beetle", "VW")).await.unwrap();

        let updated = store
            .update(saved.id, car("Golf", "VW"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Golf");
        assert!(store.update(99, car("x", "y")).await.unwrap().is_none());

        assert!(store.delete(saved.id).await.unwrap());
        assert!(!store.delete(saved.id).await.unwrap());
        assert!(store.find_by_id(saved.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_all_assigns_consecutive_ids() {
        let store = InMemoryVehicleStore::new();
        let saved = store
            .save_all(vec![car("A", "B"), car("C", "D")])
            .await
            .unwrap();
        assert_eq!(saved.iter().map(|v| v.id).collect::<Vec<_>>(), vec![1, 2]);
    }
}
