/*
 * Responsibility
 * - PrincipalStore: the persistence collaborator behind signup/login/users
 * - PgPrincipalStore: users table via SQLx
 * - InMemoryPrincipalStore: development / tests without a database
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tokio::sync::RwLock;

use crate::domain::{NewPrincipal, Principal, Role};
use crate::repos::{error::RepoError, pagination::Page};

const DUPLICATE_EMAIL: &str = "Email is already registered";

#[async_trait]
pub trait PrincipalStore: Send + Sync {
    /// Exact match on both email and secret. `None` does not say which one
    /// was wrong.
    async fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Principal>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Principal>, RepoError>;

    async fn save(&self, principal: NewPrincipal) -> Result<Principal, RepoError>;

    /// Ordered by id. Fails with `InvalidPage` when `page <= 0`.
    async fn list(&self, page: i64) -> Result<Vec<Principal>, RepoError>;
}

#[derive(Debug, FromRow)]
struct PrincipalRow {
    id: i64,
    email: String,
    password: String,
    role: String,
}

impl TryFrom<PrincipalRow> for Principal {
    type Error = RepoError;

    fn try_from(row: PrincipalRow) -> Result<Self, Self::Error> {
        let role = Role::from_canonical(&row.role)
            .ok_or_else(|| RepoError::InvalidRow(format!("users.role = {:?}", row.role)))?;
        Ok(Principal {
            id: row.id,
            email: row.email,
            password: row.password,
            role,
        })
    }
}

#[derive(Clone, Debug)]
pub struct PgPrincipalStore {
    db: PgPool,
}

impl PgPrincipalStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PrincipalStore for PgPrincipalStore {
    async fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Principal>, RepoError> {
        let row = sqlx::query_as::<_, PrincipalRow>(
            r#"
            SELECT id, email, password, role
            FROM users
            WHERE email = $1 AND password = $2
            "#,
        )
        .bind(email)
        .bind(password)
        .fetch_optional(&self.db)
        .await?;

        row.map(Principal::try_from).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Principal>, RepoError> {
        let row = sqlx::query_as::<_, PrincipalRow>(
            r#"
            SELECT id, email, password, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(Principal::try_from).transpose()
    }

    async fn save(&self, principal: NewPrincipal) -> Result<Principal, RepoError> {
        let row = sqlx::query_as::<_, PrincipalRow>(
            r#"
            INSERT INTO users (email, password, role)
            VALUES ($1, $2, $3)
            RETURNING id, email, password, role
            "#,
        )
        .bind(&principal.email)
        .bind(&principal.password)
        .bind(principal.role.as_str())
        .fetch_one(&self.db)
        .await
        .map_err(|e| RepoError::from_sqlx(e, DUPLICATE_EMAIL))?;

        Principal::try_from(row)
    }

    async fn list(&self, page: i64) -> Result<Vec<Principal>, RepoError> {
        let page = Page::new(page)?;

        let rows = sqlx::query_as::<_, PrincipalRow>(
            r#"
            SELECT id, email, password, role
            FROM users
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Principal::try_from).collect()
    }
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Principal>,
    last_id: i64,
}

#[derive(Debug, Default)]
pub struct InMemoryPrincipalStore {
    table: RwLock<Table>,
}

impl InMemoryPrincipalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PrincipalStore for InMemoryPrincipalStore {
    async fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Principal>, RepoError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .find(|p| p.email == email && p.password == password)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Principal>, RepoError> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|p| p.id == id).cloned())
    }

    async fn save(&self, principal: NewPrincipal) -> Result<Principal, RepoError> {
        let mut table = self.table.write().await;
        if table.rows.iter().any(|p| p.email == principal.email) {
            return Err(RepoError::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        table.last_id += 1;
        let saved = Principal {
            id: table.last_id,
            email: principal.email,
            password: principal.password,
            role: principal.role,
        };
        table.rows.push(saved.clone());
        Ok(saved)
    }

    async fn list(&self, page: i64) -> Result<Vec<Principal>, RepoError> {
        let page = Page::new(page)?;
        let table = self.table.read().await;
        Ok(page.slice(&table.rows))
    }
}
