//! # Entity Registry
//!
//! 엔티티 종류(닫힌 열거형)마다 문서 저장소를 하나씩 보관하는 레지스트리입니다.
//! 프로세스 시작 시 한 번 만들어 [`AppState`](super::state::AppState)를 통해 전달하며,
//! 문자열 이름으로 모델을 찾는 전역 조회는 없습니다.
//!
//! ```rust,ignore
//! let registry = Registry::new(|kind| Arc::new(MongoDocumentStore::new(&db, kind.collection_name())));
//! let employments = registry.store(EntityKind::Employment);
//! ```

use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use crate::repositories::document_store::DocumentStore;
use crate::repositories::memory_store::InMemoryDocumentStore;

/// 저장되는 엔티티 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Employment,
    Education,
    Company,
    School,
    Course,
    Test,
    Question,
    Answer,
    Subscription,
    BetaSignup,
}

impl EntityKind {
    pub const ALL: [EntityKind; 11] = [
        EntityKind::User,
        EntityKind::Employment,
        EntityKind::Education,
        EntityKind::Company,
        EntityKind::School,
        EntityKind::Course,
        EntityKind::Test,
        EntityKind::Question,
        EntityKind::Answer,
        EntityKind::Subscription,
        EntityKind::BetaSignup,
    ];

    pub fn collection_name(&self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::Employment => "employments",
            EntityKind::Education => "educations",
            EntityKind::Company => "companies",
            EntityKind::School => "schools",
            EntityKind::Course => "courses",
            EntityKind::Test => "tests",
            EntityKind::Question => "questions",
            EntityKind::Answer => "answers",
            EntityKind::Subscription => "subscriptions",
            EntityKind::BetaSignup => "beta_signups",
        }
    }

    /// 부모 종류와 부모 ID를 담는 필드 이름
    pub fn parent(&self) -> Option<(EntityKind, &'static str)> {
        match self {
            EntityKind::Course => Some((EntityKind::School, "school")),
            EntityKind::Test => Some((EntityKind::Course, "course")),
            EntityKind::Question => Some((EntityKind::Test, "test")),
            EntityKind::Answer => Some((EntityKind::Question, "question")),
            _ => None,
        }
    }

    /// 이 종류를 부모로 가지는 자식 종류들
    pub fn children(&self) -> Vec<(EntityKind, &'static str)> {
        Self::ALL
            .iter()
            .filter_map(|kind| match kind.parent() {
                Some((parent, field)) if parent == *self => Some((*kind, field)),
                _ => None,
            })
            .collect()
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection_name())
    }
}

/// 종류별 저장소 레지스트리
#[derive(Clone)]
pub struct Registry {
    stores: Vec<Arc<dyn DocumentStore>>,
}

impl Registry {
    /// 모든 종류에 대해 팩토리를 한 번씩 호출하여 레지스트리를 만듭니다.
    pub fn new<F>(mut factory: F) -> Self
    where
        F: FnMut(EntityKind) -> Arc<dyn DocumentStore>,
    {
        Self {
            stores: EntityKind::ALL.iter().map(|kind| factory(*kind)).collect(),
        }
    }

    /// 모든 종류를 메모리 저장소로 채운 레지스트리
    pub fn in_memory() -> Self {
        Self::new(|kind| Arc::new(InMemoryDocumentStore::new(kind.collection_name())))
    }

    pub fn store(&self, kind: EntityKind) -> Arc<dyn DocumentStore> {
        self.stores[kind.index()].clone()
    }
}
