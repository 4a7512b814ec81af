//! # Sub-document Reconciler
//!
//! 사용자 프로필이 ID로 참조하는 하위 문서(경력, 학력)에 create/update/delete 묶음을 적용합니다.
//!
//! ## 단계
//!
//! [`prepare`](SubDocumentReconciler::prepare)는 쓰기 없이 모든 검증을 끝냅니다.
//!
//! 1. `action`별로 분류하고 예약 필드(`_id`, `id`, `user`)를 제거
//! 2. create 항목의 필수 필드, update/delete ID의 중복 여부 확인
//! 3. update/delete 대상 ID를 한 번의 배치 쿼리로 조회하여 존재 여부와 소유자 확인
//! 4. 하나라도 없으면 `ReferenceNotFound(not_found)`로 중단
//!
//! [`apply`](SubDocumentReconciler::apply)는 검증이 끝난 계획을 update → delete → create 순서로 적용하고
//! 새 참조 목록을 돌려줍니다. 쓰기 단계는 트랜잭션으로 묶이지 않습니다.
//!
//! 다른 사용자 소유의 ID와 형식이 잘못된 ID는 존재하지 않는 ID와 똑같이 `not_found`에 들어갑니다.

use std::collections::HashSet;
use std::sync::Arc;
use mongodb::bson::{doc, oid::ObjectId, Bson, DateTime, Document};
use serde_json::{Map, Value};
use crate::core::errors::{AppError, AppResult};
use crate::core::registry::{EntityKind, Registry};
use crate::domain::models::reconcile::ReconcileItem;
use crate::repositories::document_store::DocumentStore;
use crate::utils::document::json_to_document;
use crate::utils::string_utils::is_present;

/// 소유자 역참조 필드
pub const OWNER_FIELD: &str = "user";

const RESERVED_FIELDS: [&str; 3] = ["_id", "id", OWNER_FIELD];

/// create 항목에 반드시 있어야 하는 필드
pub fn required_fields(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::Employment => &["title", "company"],
        EntityKind::Education => &["school", "degree"],
        _ => &[],
    }
}

/// 검증을 통과한 적용 계획
#[derive(Debug, Clone)]
pub struct ReconcilePlan {
    kind: EntityKind,
    owner: ObjectId,
    current: Vec<ObjectId>,
    updates: Vec<(ObjectId, Document)>,
    deletes: Vec<ObjectId>,
    creates: Vec<Document>,
}

impl ReconcilePlan {
    pub fn is_noop(&self) -> bool {
        self.updates.is_empty() && self.deletes.is_empty() && self.creates.is_empty()
    }
}

#[derive(Clone)]
pub struct SubDocumentReconciler {
    registry: Registry,
}

fn strip_reserved(mut fields: Map<String, Value>) -> Map<String, Value> {
    for key in RESERVED_FIELDS {
        fields.remove(key);
    }
    fields
}

impl SubDocumentReconciler {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    fn store(&self, kind: EntityKind) -> Arc<dyn DocumentStore> {
        self.registry.store(kind)
    }

    /// 검증만 수행하고 적용 계획을 만듭니다. 저장소에는 쓰지 않습니다.
    pub async fn prepare(
        &self,
        kind: EntityKind,
        owner: &ObjectId,
        current: &[ObjectId],
        items: Vec<ReconcileItem>,
    ) -> AppResult<ReconcilePlan> {
        let mut creates = Vec::new();
        let mut updates: Vec<(ObjectId, Map<String, Value>)> = Vec::new();
        let mut deletes = Vec::new();

        // 같은 ObjectId가 대소문자만 다른 hex로 들어와도 중복으로 봅니다.
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut seen_malformed: HashSet<String> = HashSet::new();
        let mut malformed: Vec<String> = Vec::new();

        for (index, item) in items.into_iter().enumerate() {
            if let Some(raw) = item.target_id() {
                let fresh = match ObjectId::parse_str(raw) {
                    Ok(oid) => seen.insert(oid),
                    Err(_) => seen_malformed.insert(raw.to_string()),
                };
                if !fresh {
                    return Err(AppError::ValidationError(format!(
                        "{}[{}]: 같은 ID({})에 대한 작업이 중복되었습니다", kind, index, raw
                    )));
                }
            }

            match item {
                ReconcileItem::Create { fields } => {
                    let fields = strip_reserved(fields);
                    if let Some(missing) = required_fields(kind).iter().find(|f| !is_present(fields.get(**f))) {
                        return Err(AppError::ValidationError(format!(
                            "{}[{}]: {} 필드가 필요합니다", kind, index, missing
                        )));
                    }
                    creates.push(json_to_document(fields)?);
                }
                ReconcileItem::Update { id, fields } => match ObjectId::parse_str(&id) {
                    Ok(oid) => updates.push((oid, strip_reserved(fields))),
                    Err(_) => malformed.push(id),
                },
                ReconcileItem::Delete { id } => match ObjectId::parse_str(&id) {
                    Ok(oid) => deletes.push(oid),
                    Err(_) => malformed.push(id),
                },
            }
        }

        let referenced: Vec<ObjectId> = updates.iter().map(|(id, _)| *id).chain(deletes.iter().copied()).collect();
        let owned = self.owned_ids(kind, owner, current, &referenced).await?;

        let mut not_found = malformed;
        not_found.extend(referenced.iter().filter(|id| !owned.contains(id)).map(|id| id.to_hex()));

        if !not_found.is_empty() {
            log::warn!("{} 재조정 중단: owner={} not_found={:?}", kind, owner, not_found);
            return Err(AppError::ReferenceNotFound(not_found));
        }

        let updates = updates
            .into_iter()
            .map(|(id, fields)| Ok((id, json_to_document(fields)?)))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(ReconcilePlan {
            kind,
            owner: *owner,
            current: current.to_vec(),
            updates,
            deletes,
            creates,
        })
    }

    /// 한 번의 배치 조회로 실제 존재하고 이 소유자에게 속한 ID만 추립니다.
    ///
    /// 역참조 필드가 없는 문서는 소유자의 현재 참조 목록에 있을 때만 소유로 봅니다.
    async fn owned_ids(
        &self,
        kind: EntityKind,
        owner: &ObjectId,
        current: &[ObjectId],
        ids: &[ObjectId],
    ) -> AppResult<HashSet<ObjectId>> {
        let docs = self.store(kind).find_by_ids(ids).await?;

        Ok(docs
            .iter()
            .filter_map(|doc| {
                let id = doc.get_object_id("_id").ok()?;
                let owned = match doc.get(OWNER_FIELD) {
                    Some(Bson::ObjectId(user)) => user == owner,
                    Some(Bson::String(user)) => *user == owner.to_hex(),
                    None => current.contains(&id),
                    Some(_) => false,
                };
                owned.then_some(id)
            })
            .collect())
    }

    /// 검증된 계획을 적용하고 새 참조 목록을 돌려줍니다.
    ///
    /// 기존 순서를 유지하며 삭제된 ID는 빠지고, 새로 만든 ID는 뒤에 붙습니다.
    pub async fn apply(&self, plan: ReconcilePlan) -> AppResult<Vec<ObjectId>> {
        let ReconcilePlan { kind, owner, current, updates, deletes, creates } = plan;
        let store = self.store(kind);
        let now = DateTime::now();

        let mut retained: Vec<ObjectId> = current.into_iter().filter(|id| !deletes.contains(id)).collect();
        let (update_count, delete_count, create_count) = (updates.len(), deletes.len(), creates.len());

        for (id, mut fields) in updates {
            fields.insert("updated_at", now);
            match store.update_by_id(&id, fields).await? {
                Some(_) if !retained.contains(&id) => retained.push(id),
                Some(_) => {}
                None => {
                    log::warn!("{} 갱신 대상이 사라졌습니다: {}", kind, id);
                    retained.retain(|existing| *existing != id);
                }
            }
        }

        if !deletes.is_empty() {
            store.delete_many(doc! { "_id": { "$in": deletes } }).await?;
        }

        let creates: Vec<Document> = creates
            .into_iter()
            .map(|mut fields| {
                fields.insert(OWNER_FIELD, owner);
                fields.insert("created_at", now);
                fields.insert("updated_at", now);
                fields
            })
            .collect();
        retained.extend(store.create_many(creates).await?);

        log::info!(
            "{} 재조정 완료: owner={} updated={} deleted={} created={} total={}",
            kind, owner, update_count, delete_count, create_count, retained.len()
        );

        Ok(retained)
    }

    /// `prepare` 후 바로 `apply`
    pub async fn reconcile(
        &self,
        kind: EntityKind,
        owner: &ObjectId,
        current: &[ObjectId],
        items: Vec<ReconcileItem>,
    ) -> AppResult<Vec<ObjectId>> {
        let plan = self.prepare(kind, owner, current, items).await?;
        self.apply(plan).await
    }
}
