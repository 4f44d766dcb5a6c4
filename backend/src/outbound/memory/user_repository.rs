//! In-memory `UserRepository` used when no database is configured.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository, UserSort};
use crate::domain::{Email, User, UserId, Username};

/// Process-local user store guarded by a read/write lock.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(
        &self,
        f: impl FnOnce(&HashMap<UserId, User>) -> T,
    ) -> Result<T, UserPersistenceError> {
        let guard = self
            .users
            .read()
            .map_err(|_| UserPersistenceError::query("user store lock poisoned"))?;
        Ok(f(&guard))
    }

    fn write<T>(
        &self,
        f: impl FnOnce(&mut HashMap<UserId, User>) -> Result<T, UserPersistenceError>,
    ) -> Result<T, UserPersistenceError> {
        let mut guard = self
            .users
            .write()
            .map_err(|_| UserPersistenceError::query("user store lock poisoned"))?;
        f(&mut guard)
    }

    fn find_where(
        &self,
        predicate: impl Fn(&User) -> bool,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.read(|users| users.values().find(|user| predicate(user)).cloned())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        self.write(|users| {
            if users.values().any(|other| other.email() == user.email()) {
                return Err(UserPersistenceError::duplicate_email());
            }
            if users.values().any(|other| other.username() == user.username()) {
                return Err(UserPersistenceError::duplicate_username());
            }
            users.insert(*user.id(), user.clone());
            Ok(())
        })
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        self.write(|users| match users.get_mut(user.id()) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(UserPersistenceError::query("user not found for update")),
        })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        self.read(|users| users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        self.find_where(|user| user.email() == email)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.find_where(|user| user.username() == username)
    }

    async fn list(&self, sort: UserSort) -> Result<Vec<User>, UserPersistenceError> {
        let mut listed = self.read(|users| users.values().cloned().collect::<Vec<_>>())?;
        listed.sort_by(|a, b| sort.compare(a, b));
        Ok(listed)
    }

    async fn search(&self, fragment: &str) -> Result<Vec<User>, UserPersistenceError> {
        let needle = fragment.to_lowercase();
        let mut found = self.read(|users| {
            users
                .values()
                .filter(|user| user.username().as_ref().to_lowercase().contains(&needle))
                .cloned()
                .collect::<Vec<_>>()
        })?;
        found.sort_by(|a, b| UserSort::UsernameAsc.compare(a, b));
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PasswordHash;
    use chrono::{Duration, Utc};
    use rstest::rstest;

    fn user(name: &str, age_days: i64) -> User {
        User::register(
            Email::new(format!("{name}@example.com")).expect("email"),
            Username::new(name).expect("username"),
            PasswordHash::new("$argon2id$stub"),
            Utc::now() - Duration::days(age_days),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn rejects_duplicate_email_and_username() {
        let repo = InMemoryUserRepository::new();
        repo.insert(&user("ada", 0)).await.expect("insert");

        let same_name = User::register(
            Email::new("other@example.com").expect("email"),
            Username::new("ada").expect("username"),
            PasswordHash::new("$argon2id$stub"),
            Utc::now(),
        );
        let err = repo.insert(&same_name).await.expect_err("duplicate");
        assert_eq!(err, UserPersistenceError::DuplicateUsername);

        let err = repo.insert(&user("ada", 1)).await.expect_err("duplicate");
        assert_eq!(err, UserPersistenceError::DuplicateEmail);
    }

    #[rstest]
    #[tokio::test]
    async fn lists_newest_first_and_searches_case_insensitively() {
        let repo = InMemoryUserRepository::new();
        for (name, age) in [("Alice", 3), ("bob", 2), ("malice", 1)] {
            repo.insert(&user(name, age)).await.expect("insert");
        }

        let listed = repo.list(UserSort::default()).await.expect("list");
        let names: Vec<&str> = listed.iter().map(|u| u.username().as_ref()).collect();
        assert_eq!(names, ["malice", "bob", "Alice"]);

        let found = repo.search("ALI").await.expect("search");
        let names: Vec<&str> = found.iter().map(|u| u.username().as_ref()).collect();
        assert_eq!(names, ["Alice", "malice"]);
    }

    #[rstest]
    #[tokio::test]
    async fn update_replaces_stored_user() {
        let repo = InMemoryUserRepository::new();
        let mut stored = user("ada", 0);
        repo.insert(&stored).await.expect("insert");

        stored.promote_to_diamond();
        repo.update(&stored).await.expect("update");

        let found = repo.find_by_id(stored.id()).await.expect("find").expect("present");
        assert!(found.is_promoted());
    }
}
