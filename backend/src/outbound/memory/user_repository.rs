//! In-memory `UserRepository`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use mockable::Clock;
use pagination::Page;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, ProfileChanges, User, UserId, UserListQuery};

/// Credential store held in process memory.
///
/// Email uniqueness is checked and the record written under one write lock,
/// so concurrent signups with the same email cannot both succeed.
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryUserRepository {
    /// Empty store stamping records with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            clock,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<UserId, User>>, UserPersistenceError> {
        self.users
            .read()
            .map_err(|_| UserPersistenceError::query("user store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<UserId, User>>, UserPersistenceError> {
        self.users
            .write()
            .map_err(|_| UserPersistenceError::query("user store lock poisoned"))
    }
}

fn email_taken(users: &HashMap<UserId, User>, email: &str, except: Option<&UserId>) -> bool {
    users
        .values()
        .any(|user| user.email == email && Some(&user.id) != except)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, UserPersistenceError> {
        let mut users = self.write()?;
        if email_taken(&users, &user.email, None) {
            return Err(UserPersistenceError::duplicate_email());
        }
        let record = User {
            id: UserId::random(),
            name: user.name,
            email: user.email,
            phone: user.phone,
            password_hash: user.password_hash,
            avatar: user.avatar,
            created_at: self.clock.utc(),
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .read()?
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn update_profile(
        &self,
        id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut users = self.write()?;
        if !users.contains_key(id) {
            return Ok(None);
        }
        if email_taken(&users, &changes.email, Some(id)) {
            return Err(UserPersistenceError::duplicate_email());
        }
        Ok(users.get_mut(id).map(|user| {
            user.name.clone_from(&changes.name);
            user.email.clone_from(&changes.email);
            user.phone.clone_from(&changes.phone);
            user.clone()
        }))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        Ok(self.write()?.remove(id).is_some())
    }

    async fn list_page(&self, query: &UserListQuery) -> Result<Page<User>, UserPersistenceError> {
        let users = self.read()?;
        let mut matched: Vec<&User> = users.values().filter(|user| query.matches(user)).collect();
        matched.sort_by(|a, b| query.compare(a, b));
        let total = matched.len();
        let items = matched
            .get(query.page.window(total))
            .unwrap_or_default()
            .iter()
            .map(|user| (*user).clone())
            .collect();
        Ok(Page::new(
            items,
            query.page,
            u64::try_from(total).unwrap_or(u64::MAX),
        ))
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut users: Vec<User> = self.read()?.values().cloned().collect();
        users.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PasswordHash, SortField, SortOrder, UserListParams};
    use crate::outbound::memory::test_clock::MutableClock;
    use chrono::{TimeDelta, TimeZone, Utc};
    use rstest::{fixture, rstest};

    struct Harness {
        clock: Arc<MutableClock>,
        repo: InMemoryUserRepository,
    }

    #[fixture]
    fn harness() -> Harness {
        let start = Utc
            .with_ymd_and_hms(2025, 1, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        let clock = Arc::new(MutableClock::new(start));
        let repo = InMemoryUserRepository::new(clock.clone());
        Harness { clock, repo }
    }

    fn new_user(name: &str, email: &str, phone: &str) -> NewUser {
        NewUser {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            password_hash: PasswordHash::new("hash"),
            avatar: None,
        }
    }

    async fn seed(harness: &Harness) {
        for (name, email, phone) in [
            ("Charlie", "charlie@example.com", "0300000000"),
            ("alice", "alice@example.com", "0100000000"),
            ("Bob", "bob@example.com", "0200000000"),
            ("Dana", "dana@sample.org", "0400000000"),
        ] {
            harness
                .repo
                .insert(new_user(name, email, phone))
                .await
                .expect("seed insert");
            harness.clock.advance(TimeDelta::seconds(1));
        }
    }

    fn query(params: UserListParams) -> UserListQuery {
        UserListQuery::from_params(&params)
    }

    #[rstest]
    #[tokio::test]
    async fn insert_assigns_id_and_clock_time(harness: Harness) {
        let user = harness
            .repo
            .insert(new_user("Ada", "ada@example.com", "0123456789"))
            .await
            .expect("insert succeeds");

        assert_eq!(user.created_at, harness.clock.utc());
        let found = harness.repo.find_by_id(&user.id).await.expect("lookup");
        assert_eq!(found, Some(user));
    }

    #[rstest]
    #[tokio::test]
    async fn insert_rejects_duplicate_email(harness: Harness) {
        harness
            .repo
            .insert(new_user("Ada", "ada@example.com", "0123456789"))
            .await
            .expect("first insert");

        let err = harness
            .repo
            .insert(new_user("Imposter", "ada@example.com", "0987654321"))
            .await
            .expect_err("duplicate");

        assert_eq!(err, UserPersistenceError::DuplicateEmail);
    }

    #[rstest]
    #[tokio::test]
    async fn email_lookup_is_exact(harness: Harness) {
        harness
            .repo
            .insert(new_user("Ada", "ada@example.com", "0123456789"))
            .await
            .expect("insert");

        let miss = harness
            .repo
            .find_by_email("ADA@example.com")
            .await
            .expect("lookup");
        assert!(miss.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn update_refuses_another_users_email(harness: Harness) {
        harness
            .repo
            .insert(new_user("Ada", "ada@example.com", "0123456789"))
            .await
            .expect("insert");
        let bob = harness
            .repo
            .insert(new_user("Bob", "bob@example.com", "0123456789"))
            .await
            .expect("insert");

        let changes = ProfileChanges {
            name: "Bob".into(),
            email: "ada@example.com".into(),
            phone: "0123456789".into(),
        };
        let err = harness
            .repo
            .update_profile(&bob.id, &changes)
            .await
            .expect_err("taken");
        assert_eq!(err, UserPersistenceError::DuplicateEmail);
    }

    #[rstest]
    #[tokio::test]
    async fn update_of_missing_user_is_none(harness: Harness) {
        let changes = ProfileChanges {
            name: "Ghost".into(),
            email: "ghost@example.com".into(),
            phone: "0123456789".into(),
        };
        let updated = harness
            .repo
            .update_profile(&UserId::random(), &changes)
            .await
            .expect("no error");
        assert!(updated.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed(harness: Harness) {
        let user = harness
            .repo
            .insert(new_user("Ada", "ada@example.com", "0123456789"))
            .await
            .expect("insert");

        assert!(harness.repo.delete(&user.id).await.expect("delete"));
        assert!(!harness.repo.delete(&user.id).await.expect("delete again"));
    }

    #[rstest]
    #[tokio::test]
    async fn list_page_sorts_by_name_and_slices(harness: Harness) {
        seed(&harness).await;

        let page = harness
            .repo
            .list_page(&query(UserListParams {
                page: Some("2".into()),
                ..UserListParams::default()
            }))
            .await
            .expect("page");

        let names: Vec<_> = page.items.iter().map(|user| user.name.as_str()).collect();
        assert_eq!(names, ["alice"]);
        assert_eq!(page.pagination.total_items, 4);
        assert_eq!(page.pagination.total_pages, 2);
        assert!(!page.pagination.has_next_page);
    }

    #[rstest]
    #[tokio::test]
    async fn list_page_filters_case_insensitively(harness: Harness) {
        seed(&harness).await;

        let page = harness
            .repo
            .list_page(&query(UserListParams {
                search: Some("EXAMPLE.COM".into()),
                sort_by: Some("createdAt".into()),
                sort_order: Some("desc".into()),
                ..UserListParams::default()
            }))
            .await
            .expect("page");

        let names: Vec<_> = page.items.iter().map(|user| user.name.as_str()).collect();
        assert_eq!(names, ["Bob", "alice", "Charlie"]);
        assert_eq!(page.pagination.total_items, 3);
    }

    #[rstest]
    #[tokio::test]
    async fn page_beyond_end_is_empty(harness: Harness) {
        seed(&harness).await;
        let beyond = UserListQuery {
            page: pagination::PageRequest::new(9, 3).expect("valid request"),
            search: None,
            sort_field: SortField::Email,
            sort_order: SortOrder::Asc,
        };

        let page = harness.repo.list_page(&beyond).await.expect("page");

        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total_pages, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn list_all_orders_by_name(harness: Harness) {
        seed(&harness).await;

        let names: Vec<_> = harness
            .repo
            .list_all()
            .await
            .expect("all")
            .into_iter()
            .map(|user| user.name)
            .collect();

        assert_eq!(names, ["Bob", "Charlie", "Dana", "alice"]);
    }
}
