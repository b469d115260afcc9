//! In-process store backed by hash maps.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CredentialStore, JobStore, StoreError, StoreResult};
use crate::models::{
    Job, JobDraft, MonthlyCount, NewUser, ProfileUpdate, StatusCounts, UserRecord,
};

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
    jobs: RwLock<HashMap<Uuid, Job>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed job, bypassing `created_at` defaults.
    #[cfg(test)]
    pub(crate) async fn seed_job(&self, job: Job) {
        self.jobs.write().await.insert(job.id, job);
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert_user(&self, user: &NewUser) -> StoreResult<Uuid> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(StoreError::Conflict);
        }

        let id = Uuid::now_v7();
        users.insert(
            id,
            UserRecord {
                id,
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                email: user.email.clone(),
                location: user.location.clone(),
                password_hash: user.password_hash.clone(),
                is_verified: false,
                verification_token: Some(user.verification_token.clone()),
            },
        );
        Ok(id)
    }

    async fn update_profile(&self, id: Uuid, profile: &ProfileUpdate) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(false);
        };
        user.first_name.clone_from(&profile.first_name);
        user.last_name.clone_from(&profile.last_name);
        user.location.clone_from(&profile.location);
        Ok(true)
    }

    async fn mark_verified(&self, id: Uuid, token: &str) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) if user.pending_token() == Some(token) => {
                user.is_verified = true;
                user.verification_token = None;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn insert_job(&self, owner: Uuid, draft: &JobDraft) -> StoreResult<Job> {
        let job = Job {
            id: Uuid::now_v7(),
            company: draft.company.clone(),
            position: draft.position.clone(),
            job_location: draft.job_location.clone(),
            status: draft.status,
            job_type: draft.job_type,
            created_by: owner,
            created_at: Utc::now(),
        };
        self.jobs.write().await.insert(job.id, job.clone());
        Ok(job)
    }

    async fn list_jobs(&self, owner: Uuid) -> StoreResult<Vec<Job>> {
        let jobs = self.jobs.read().await;
        let mut owned: Vec<Job> = jobs
            .values()
            .filter(|job| job.created_by == owner)
            .cloned()
            .collect();
        owned.sort_by_key(|job| (job.created_at, job.id));
        Ok(owned)
    }

    async fn find_job(&self, id: Uuid) -> StoreResult<Option<Job>> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }

    async fn find_job_for_owner(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Job>> {
        let jobs = self.jobs.read().await;
        Ok(jobs.get(&id).filter(|job| job.created_by == owner).cloned())
    }

    async fn update_job(&self, id: Uuid, draft: &JobDraft) -> StoreResult<bool> {
        let mut jobs = self.jobs.write().await;
        let Some(job) = jobs.get_mut(&id) else {
            return Ok(false);
        };
        job.company.clone_from(&draft.company);
        job.position.clone_from(&draft.position);
        job.job_location.clone_from(&draft.job_location);
        job.status = draft.status;
        job.job_type = draft.job_type;
        Ok(true)
    }

    async fn delete_job(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.jobs.write().await.remove(&id).is_some())
    }

    async fn count_jobs_by_status(&self, owner: Uuid) -> StoreResult<StatusCounts> {
        let jobs = self.jobs.read().await;
        let mut counts = StatusCounts::default();
        for job in jobs.values().filter(|job| job.created_by == owner) {
            counts.add(job.status, 1);
        }
        Ok(counts)
    }

    async fn monthly_applications(
        &self,
        owner: Uuid,
        months: u32,
    ) -> StoreResult<Vec<MonthlyCount>> {
        let jobs = self.jobs.read().await;
        let mut buckets: BTreeMap<(i32, u32), i64> = BTreeMap::new();
        for job in jobs.values().filter(|job| job.created_by == owner) {
            *buckets
                .entry((job.created_at.year(), job.created_at.month()))
                .or_default() += 1;
        }

        Ok(buckets
            .into_iter()
            .rev()
            .take(usize::try_from(months).unwrap_or(usize::MAX))
            .map(|((year, month), count)| MonthlyCount { year, month, count })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobStatus, JobType};
    use anyhow::Result;
    use chrono::TimeZone;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            location: "London".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            verification_token: "token".to_string(),
        }
    }

    fn draft(status: JobStatus) -> JobDraft {
        JobDraft {
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            job_location: "Berlin".to_string(),
            status,
            job_type: JobType::Remote,
        }
    }

    #[tokio::test]
    async fn insert_user_rejects_duplicate_email() -> Result<()> {
        let store = MemoryStore::new();
        store.insert_user(&new_user("a@x.com")).await?;
        let second = store.insert_user(&new_user("a@x.com")).await;
        assert!(matches!(second, Err(StoreError::Conflict)));
        Ok(())
    }

    #[tokio::test]
    async fn mark_verified_is_single_use() -> Result<()> {
        let store = MemoryStore::new();
        let id = store.insert_user(&new_user("a@x.com")).await?;

        assert!(!store.mark_verified(id, "wrong").await?);
        assert!(store.mark_verified(id, "token").await?);
        assert!(!store.mark_verified(id, "token").await?);

        let user = store.find_user_by_id(id).await?;
        assert_eq!(user.as_ref().map(|user| user.is_verified), Some(true));
        assert_eq!(user.and_then(|user| user.verification_token), None);
        Ok(())
    }

    #[tokio::test]
    async fn find_job_for_owner_hides_foreign_jobs() -> Result<()> {
        let store = MemoryStore::new();
        let owner = Uuid::now_v7();
        let job = store.insert_job(owner, &draft(JobStatus::Pending)).await?;

        assert!(store.find_job(job.id).await?.is_some());
        assert!(store.find_job_for_owner(job.id, owner).await?.is_some());
        assert!(store
            .find_job_for_owner(job.id, Uuid::now_v7())
            .await?
            .is_none());
        Ok(())
    }

    #[tokio::test]
    async fn monthly_applications_newest_first_and_limited() -> Result<()> {
        let store = MemoryStore::new();
        let owner = Uuid::now_v7();
        for (month, day) in [(1, 3), (1, 20), (2, 1), (4, 9)] {
            store
                .seed_job(Job {
                    id: Uuid::now_v7(),
                    company: "Acme".to_string(),
                    position: "Engineer".to_string(),
                    job_location: "Berlin".to_string(),
                    status: JobStatus::Pending,
                    job_type: JobType::Contract,
                    created_by: owner,
                    created_at: Utc.with_ymd_and_hms(2024, month, day, 12, 0, 0).unwrap(),
                })
                .await;
        }

        let months = store.monthly_applications(owner, 2).await?;
        assert_eq!(
            months,
            vec![
                MonthlyCount {
                    year: 2024,
                    month: 4,
                    count: 1
                },
                MonthlyCount {
                    year: 2024,
                    month: 2,
                    count: 1
                },
            ]
        );

        let all = store.monthly_applications(owner, 6).await?;
        assert_eq!(all.last().map(|month| month.count), Some(2));
        Ok(())
    }

    #[tokio::test]
    async fn count_jobs_by_status_is_owner_scoped() -> Result<()> {
        let store = MemoryStore::new();
        let owner = Uuid::now_v7();
        store.insert_job(owner, &draft(JobStatus::Pending)).await?;
        store.insert_job(owner, &draft(JobStatus::Accepted)).await?;
        store
            .insert_job(Uuid::now_v7(), &draft(JobStatus::Accepted))
            .await?;

        let counts = store.count_jobs_by_status(owner).await?;
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.accepted, 1);
        assert_eq!(counts.interview, 0);
        Ok(())
    }
}
