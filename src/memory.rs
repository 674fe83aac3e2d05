//! In-memory stores and a scripted estimator for tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    assessments::{repo::AssessmentStore, repo_types::Assessment},
    auth::{
        repo::{TokenStore, UserStore},
        repo_types::{ActiveToken, AuthToken, User},
    },
    profile::{repo::ProfileStore, repo_types::Profile},
    scoring::{
        estimator::{Estimator, Prediction},
        model::{AssessmentInput, AssessmentResult},
        screening::ModelFeatures,
    },
};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn insert_without_password(&self, email: &str) -> User {
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: None,
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }

    fn by_id(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, email: &str, password_hash: &str) -> anyhow::Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email) {
            return Ok(None);
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: Some(password_hash.to_string()),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(Some(user))
    }
}

pub struct MemoryTokenStore {
    users: Arc<MemoryUserStore>,
    tokens: Mutex<Vec<AuthToken>>,
    next_id: AtomicI64,
}

impl MemoryTokenStore {
    pub fn new(users: Arc<MemoryUserStore>) -> Self {
        Self {
            users,
            tokens: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn all(&self) -> Vec<AuthToken> {
        self.tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn insert(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<AuthToken> {
        let mut tokens = self.tokens.lock().unwrap();
        anyhow::ensure!(
            !tokens.iter().any(|t| t.token_hash == token_hash),
            "duplicate token hash"
        );
        let token = AuthToken {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            user_id,
            token_hash: token_hash.to_string(),
            expires_at,
            revoked_at: None,
            created_at: OffsetDateTime::now_utc(),
            last_used_at: None,
        };
        tokens.push(token.clone());
        Ok(token)
    }

    async fn find_active(
        &self,
        token_hash: &str,
        now: OffsetDateTime,
    ) -> anyhow::Result<Option<ActiveToken>> {
        let found = self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.token_hash == token_hash && t.revoked_at.is_none() && t.expires_at > now)
            .map(|t| (t.id, t.user_id));
        Ok(found.and_then(|(token_id, user_id)| {
            self.users
                .by_id(user_id)
                .map(|user| ActiveToken { token_id, user })
        }))
    }

    async fn touch(&self, token_id: i64, now: OffsetDateTime) -> anyhow::Result<()> {
        if let Some(t) = self
            .tokens
            .lock()
            .unwrap()
            .iter_mut()
            .find(|t| t.id == token_id)
        {
            t.last_used_at = Some(now);
        }
        Ok(())
    }

    async fn revoke(&self, token_hash: &str, now: OffsetDateTime) -> anyhow::Result<u64> {
        let mut changed = 0;
        for t in self.tokens.lock().unwrap().iter_mut() {
            if t.token_hash == token_hash && t.revoked_at.is_none() {
                t.revoked_at = Some(now);
                changed += 1;
            }
        }
        Ok(changed)
    }
}

#[derive(Default)]
pub struct MemoryProfileStore {
    rows: Mutex<HashMap<Uuid, Profile>>,
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        Ok(self.rows.lock().unwrap().get(&user_id).cloned())
    }

    async fn upsert(
        &self,
        user_id: Uuid,
        full_name: Option<&str>,
        email: Option<&str>,
    ) -> anyhow::Result<Profile> {
        let now = OffsetDateTime::now_utc();
        let mut rows = self.rows.lock().unwrap();
        let created_at = rows.get(&user_id).map_or(now, |p| p.created_at);
        let profile = Profile {
            user_id,
            full_name: full_name.map(str::to_string),
            email: email.map(str::to_string),
            created_at,
            updated_at: now,
        };
        rows.insert(user_id, profile.clone());
        Ok(profile)
    }

    async fn delete(&self, user_id: Uuid) -> anyhow::Result<u64> {
        Ok(self.rows.lock().unwrap().remove(&user_id).map_or(0, |_| 1))
    }
}

pub struct MemoryAssessmentStore {
    rows: Mutex<Vec<Assessment>>,
    next_id: AtomicI64,
}

impl Default for MemoryAssessmentStore {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl AssessmentStore for MemoryAssessmentStore {
    async fn create(
        &self,
        user_id: Uuid,
        input: &AssessmentInput,
        result: &AssessmentResult,
    ) -> anyhow::Result<i64> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().push(Assessment {
            id,
            user_id,
            input: input.clone(),
            risk_score: result.risk_score,
            confidence: result.confidence,
            contributing_factors: result.contributing_factors.clone(),
            recommendations: result.recommendations.clone(),
            screening: Some(result.screening.clone()),
            created_at: OffsetDateTime::now_utc(),
        });
        Ok(id)
    }

    async fn latest(&self, user_id: Uuid) -> anyhow::Result<Option<Assessment>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id)
            .max_by_key(|a| (a.created_at, a.id))
            .cloned())
    }

    async fn get(&self, user_id: Uuid, id: i64) -> anyhow::Result<Option<Assessment>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id && a.user_id == user_id)
            .cloned())
    }

    async fn delete_all(&self, user_id: Uuid) -> anyhow::Result<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|a| a.user_id != user_id);
        Ok((before - rows.len()) as u64)
    }
}

/// Estimator that returns a canned prediction (or always fails) and records
/// the features it was given.
#[derive(Default)]
pub struct ScriptedEstimator {
    response: Option<Prediction>,
    calls: Mutex<Vec<ModelFeatures>>,
}

impl ScriptedEstimator {
    pub fn returning(probability: f64, model_version: &str) -> Self {
        Self {
            response: Some(Prediction {
                probability,
                model_version: model_version.to_string(),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ModelFeatures> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Estimator for ScriptedEstimator {
    async fn predict(&self, features: &ModelFeatures) -> anyhow::Result<Prediction> {
        self.calls.lock().unwrap().push(features.clone());
        self.response
            .clone()
            .ok_or_else(|| anyhow::anyhow!("estimator unavailable"))
    }
}
