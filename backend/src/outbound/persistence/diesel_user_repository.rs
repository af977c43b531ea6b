//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Email uniqueness is enforced by the `users_email_key` constraint; unique
//! violations surface as [`UserPersistenceError::DuplicateEmail`] so a lost
//! signup race reads the same as the service-level pre-check.

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel_async::RunQueryDsl;
use pagination::Page;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, ProfileChanges, SortField, SortOrder, User, UserId, UserListQuery};

use super::models::{NewUserRow, ProfileUpdateRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

type SearchPredicate = Box<dyn BoxableExpression<users::table, Pg, SqlType = Bool>>;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.message())
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserPersistenceError::duplicate_email()
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        _ => UserPersistenceError::query("database error"),
    }
}

/// Escape `ILIKE` metacharacters so search text matches literally.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn search_predicate(search: Option<&str>) -> Option<SearchPredicate> {
    search.map(|text| {
        let pattern = like_pattern(text);
        Box::new(
            users::name
                .ilike(pattern.clone())
                .or(users::email.ilike(pattern.clone()))
                .or(users::phone.ilike(pattern)),
        ) as SearchPredicate
    })
}

fn ordered(
    query: users::BoxedQuery<'static, Pg>,
    field: SortField,
    order: SortOrder,
) -> users::BoxedQuery<'static, Pg> {
    let primary = match (field, order) {
        (SortField::Name, SortOrder::Asc) => query.order_by(users::name.asc()),
        (SortField::Name, SortOrder::Desc) => query.order_by(users::name.desc()),
        (SortField::Email, SortOrder::Asc) => query.order_by(users::email.asc()),
        (SortField::Email, SortOrder::Desc) => query.order_by(users::email.desc()),
        (SortField::Phone, SortOrder::Asc) => query.order_by(users::phone.asc()),
        (SortField::Phone, SortOrder::Desc) => query.order_by(users::phone.desc()),
        (SortField::CreatedAt, SortOrder::Asc) => query.order_by(users::created_at.asc()),
        (SortField::CreatedAt, SortOrder::Desc) => query.order_by(users::created_at.desc()),
    };
    match order {
        SortOrder::Asc => primary.then_order_by((users::created_at.asc(), users::id.asc())),
        SortOrder::Desc => primary.then_order_by((users::created_at.desc(), users::id.desc())),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: Uuid::new_v4(),
            name: &user.name,
            email: &user.email,
            phone: &user.phone,
            password_hash: user.password_hash.as_str(),
            avatar: user.avatar.as_ref().map(|avatar| avatar.as_str()),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(User::from)
            .map_err(map_diesel_error)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(User::from))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(User::from))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let update = ProfileUpdateRow {
            name: &changes.name,
            email: &changes.email,
            phone: &changes.phone,
        };

        let row: Option<UserRow> = diesel::update(users::table.find(id.as_uuid()))
            .set(&update)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(User::from))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(users::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn list_page(&self, query: &UserListQuery) -> Result<Page<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut count = users::table.select(count_star()).into_boxed();
        if let Some(predicate) = search_predicate(query.search.as_deref()) {
            count = count.filter(predicate);
        }
        let total: i64 = count
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut rows = users::table.into_boxed();
        if let Some(predicate) = search_predicate(query.search.as_deref()) {
            rows = rows.filter(predicate);
        }
        let rows: Vec<UserRow> = ordered(rows, query.sort_field, query.sort_order)
            .offset(i64::try_from(query.page.offset()).unwrap_or(i64::MAX))
            .limit(i64::from(query.page.limit()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(Page::new(
            rows.into_iter().map(User::from).collect(),
            query.page,
            u64::try_from(total).unwrap_or(0),
        ))
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order_by((users::name.asc(), users::created_at.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}
