use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use portcullis_core::{
    LockoutPolicy, Member, MemberId, MemberStore, MemberStoreError, UniqueIdentifierField,
    ValidationException,
};
use tokio::sync::RwLock;

#[derive(Default, Clone)]
pub struct HashMapMemberStore {
    members: Arc<RwLock<HashMap<MemberId, Member>>>,
}

impl HashMapMemberStore {
    pub fn new() -> Self {
        Self {
            members: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn get(&self, id: MemberId) -> Option<Member> {
        self.members.read().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.members.read().await.len()
    }
}

#[async_trait::async_trait]
impl MemberStore for HashMapMemberStore {
    async fn find_by_identifier(
        &self,
        field: UniqueIdentifierField,
        value: &str,
    ) -> Result<Option<Member>, MemberStoreError> {
        let members = self.members.read().await;
        Ok(members
            .values()
            .find(|member| member.identifier(field) == Some(value))
            .cloned())
    }

    async fn write(&self, member: Member) -> Result<Member, MemberStoreError> {
        let mut result = member.validate();
        if !result.valid() {
            return Err(ValidationException::from(result).into());
        }

        let mut members = self.members.write().await;
        let others = members.values().filter(|other| other.id() != member.id());
        for other in others {
            if other.email() == member.email() {
                result.add_field_error("Email", "A member with this email already exists");
            }
            if member.username().is_some() && other.username() == member.username() {
                result.add_field_error("Username", "A member with this username already exists");
            }
        }
        if !result.valid() {
            return Err(ValidationException::from(result).into());
        }

        members.insert(member.id(), member.clone());
        Ok(member)
    }

    async fn register_failed_login(
        &self,
        id: MemberId,
        policy: &LockoutPolicy,
        now: DateTime<Utc>,
    ) -> Result<(), MemberStoreError> {
        let mut members = self.members.write().await;
        let member = members.get_mut(&id).ok_or(MemberStoreError::MemberNotFound)?;
        member.register_failed_login(policy, now);
        Ok(())
    }

    async fn register_successful_login(&self, id: MemberId) -> Result<(), MemberStoreError> {
        let mut members = self.members.write().await;
        let member = members.get_mut(&id).ok_or(MemberStoreError::MemberNotFound)?;
        member.register_successful_login();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fake::{Fake, faker::internet::en::SafeEmail};

    use super::*;

    fn member() -> Member {
        let email: String = SafeEmail().fake();
        Member::new(email, "none")
    }

    #[tokio::test]
    async fn write_then_find_by_email_and_username() {
        let store = HashMapMemberStore::new();
        let member = store
            .write(member().with_username("jane"))
            .await
            .unwrap();

        let by_email = store
            .find_by_identifier(UniqueIdentifierField::Email, member.email())
            .await
            .unwrap();
        let by_username = store
            .find_by_identifier(UniqueIdentifierField::Username, "jane")
            .await
            .unwrap();

        assert_eq!(by_email.map(|m| m.id()), Some(member.id()));
        assert_eq!(by_username.map(|m| m.id()), Some(member.id()));
        assert!(
            store
                .find_by_identifier(UniqueIdentifierField::Email, "nobody@example.com")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn duplicate_email_aborts_with_validation_exception() {
        let store = HashMapMemberStore::new();
        let first = store.write(member()).await.unwrap();

        let err = store
            .write(Member::new(first.email(), "none"))
            .await
            .unwrap_err();

        match err {
            MemberStoreError::Validation(exception) => {
                assert!(exception.result().field_errors().contains_key("Email"))
            }
            other => panic!("expected a validation failure, got {other:?}"),
        }
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn rewriting_the_same_member_is_an_update() {
        let store = HashMapMemberStore::new();
        let member = store.write(member()).await.unwrap();
        store
            .write(member.clone().with_first_name("Jane"))
            .await
            .unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(
            store.get(member.id()).await.unwrap().first_name(),
            Some("Jane")
        );
    }

    #[tokio::test]
    async fn invalid_member_is_rejected() {
        let store = HashMapMemberStore::new();
        let err = store
            .write(Member::new("jane@not an email", "none"))
            .await
            .unwrap_err();
        assert!(matches!(err, MemberStoreError::Validation(_)));
    }

    #[tokio::test]
    async fn counters_update_the_stored_member() {
        let store = HashMapMemberStore::new();
        let member = store.write(member()).await.unwrap();
        let policy = LockoutPolicy {
            after_incorrect_logins: 2,
            delay_minutes: 5,
        };
        let now = Utc::now();

        store
            .register_failed_login(member.id(), &policy, now)
            .await
            .unwrap();
        assert_eq!(store.get(member.id()).await.unwrap().failed_login_count(), 1);

        store
            .register_failed_login(member.id(), &policy, now)
            .await
            .unwrap();
        assert!(store.get(member.id()).await.unwrap().is_locked_out(now));

        store
            .register_successful_login(member.id())
            .await
            .unwrap();
        assert!(!store.get(member.id()).await.unwrap().is_locked_out(now));

        assert_eq!(
            store.register_successful_login(MemberId::new()).await,
            Err(MemberStoreError::MemberNotFound)
        );
    }
}
