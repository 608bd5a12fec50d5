//! The object registry: arena of live objects plus a parent→children index.
//!
//! [`ObjectRegistry`] keeps all state behind a single `RwLock`, so every
//! mutation (insert, cascading removal, attribute update) is observed
//! atomically by concurrent readers. Cascading removal walks the children
//! index with an explicit worklist rather than recursion.
//!
//! Every mutation either completes or leaves the state untouched, so a
//! poisoned lock is recovered instead of failing all later requests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use mog_types::{Discriminant, MediaObjectId, ObjectId};

use crate::error::{RegistryError, Result};
use crate::record::{Attributes, ObjectRecord};

#[derive(Debug, Default)]
struct RegistryState {
    objects: HashMap<ObjectId, ObjectRecord>,
    /// Forward-edge index: parent -> direct children.
    children: HashMap<ObjectId, Vec<ObjectId>>,
}

impl RegistryState {
    fn live(&self, id: ObjectId) -> Result<&ObjectRecord> {
        self.objects
            .get(&id)
            .ok_or(RegistryError::MediaObjectNotFound(id))
    }

    /// `id` followed by every descendant, breadth-first.
    fn subtree(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut order = vec![id];
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            if let Some(kids) = self.children.get(&current) {
                for kid in kids {
                    order.push(*kid);
                    queue.push_back(*kid);
                }
            }
        }
        order
    }
}

/// Owner of every live media object.
///
/// Identifiers must come from [`ObjectRegistry::allocate_id`]. The counter
/// only moves forward, so a released identifier is never handed out again.
#[derive(Debug)]
pub struct ObjectRegistry {
    state: RwLock<RegistryState>,
    next_id: AtomicU64,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Reserve a fresh identifier. Identifiers are never handed out twice.
    pub fn allocate_id(&self) -> ObjectId {
        ObjectId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    /// Insert a new live object.
    pub fn put(&self, record: ObjectRecord) -> Result<()> {
        self.put_with(record, |_| ())
    }

    /// Insert a new live object and run `on_commit` before the lock is
    /// released.
    ///
    /// The parent (if any) is validated under the same lock as the insert,
    /// so a child can never be attached to a pipeline that is being
    /// released concurrently. Anything `on_commit` does is ordered before
    /// any later mutation.
    pub fn put_with<F>(&self, record: ObjectRecord, on_commit: F) -> Result<()>
    where
        F: FnOnce(&ObjectRecord),
    {
        let id = record.id();
        let mut state = self.write();

        if state.objects.contains_key(&id) {
            return Err(RegistryError::Internal(format!("object id already in use: {id}")));
        }

        if let Some(parent_id) = record.parent {
            let parent = state.live(parent_id)?;
            if !parent.kind().can_parent() {
                return Err(RegistryError::InvalidParent {
                    parent: parent_id,
                    kind: parent.kind(),
                });
            }
            state.children.entry(parent_id).or_default().push(id);
        }

        debug!(object = %record.object, parent = ?record.parent, "registered media object");
        let record = state.objects.entry(id).or_insert(record);
        on_commit(record);
        Ok(())
    }

    /// Remove `id` and all of its descendants in one step.
    ///
    /// Returns the removed records, `id` first.
    pub fn remove_subtree(&self, id: ObjectId) -> Result<Vec<ObjectRecord>> {
        self.remove_subtree_with(id, |_| ())
    }

    /// Like [`ObjectRegistry::remove_subtree`], running `on_commit` over the
    /// removed records before the lock is released.
    pub fn remove_subtree_with<F>(&self, id: ObjectId, on_commit: F) -> Result<Vec<ObjectRecord>>
    where
        F: FnOnce(&[ObjectRecord]),
    {
        let mut state = self.write();
        let parent = state.live(id)?.parent;

        let order = state.subtree(id);
        let mut removed = Vec::with_capacity(order.len());
        for oid in order {
            state.children.remove(&oid);
            if let Some(record) = state.objects.remove(&oid) {
                removed.push(record);
            }
        }

        if let Some(parent_id) = parent {
            if let Some(siblings) = state.children.get_mut(&parent_id) {
                siblings.retain(|c| *c != id);
            }
        }

        debug!(root = %id, count = removed.len(), "removed object subtree");
        on_commit(&removed);
        Ok(removed)
    }

    /// Run `f` against a live record while holding the write lock.
    ///
    /// Requests against the same object are serialized. If `f` fails or
    /// panics the record is left as it was.
    pub fn update<T, F>(&self, id: ObjectId, f: F) -> Result<T>
    where
        F: FnOnce(&mut ObjectRecord) -> Result<T>,
    {
        let mut state = self.write();
        let record = state
            .objects
            .get_mut(&id)
            .ok_or(RegistryError::MediaObjectNotFound(id))?;
        let mut draft = record.clone();
        let out = f(&mut draft)?;
        *record = draft;
        Ok(out)
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    pub fn get(&self, id: ObjectId) -> Result<ObjectRecord> {
        self.read().live(id).cloned()
    }

    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.read().objects.contains_key(&id)
    }

    /// The immediate parent of `id`.
    pub fn get_parent(&self, id: ObjectId) -> Result<MediaObjectId> {
        let state = self.read();
        let record = state.live(id)?;
        let parent_id = record.parent.ok_or(RegistryError::NoParent(id))?;
        Ok(state.live(parent_id)?.object.clone())
    }

    /// The root pipeline that `id` belongs to (itself, for pipelines).
    pub fn get_media_pipeline(&self, id: ObjectId) -> Result<MediaObjectId> {
        let state = self.read();
        let pipeline = state.live(id)?.pipeline;
        Ok(state.live(pipeline)?.object.clone())
    }

    /// Direct children of `id`, in creation order.
    pub fn children_of(&self, id: ObjectId) -> Result<Vec<ObjectId>> {
        let state = self.read();
        state.live(id)?;
        Ok(state.children.get(&id).cloned().unwrap_or_default())
    }

    /// Every descendant of `id`, breadth-first, excluding `id` itself.
    pub fn descendants(&self, id: ObjectId) -> Result<Vec<ObjectId>> {
        let state = self.read();
        state.live(id)?;
        let mut all = state.subtree(id);
        all.remove(0);
        Ok(all)
    }

    /// The URI a URI endpoint was created with.
    pub fn uri_of(&self, id: ObjectId) -> Result<String> {
        let record = self.get(id)?;
        match record.attributes {
            Attributes::Uri { uri, .. } => Ok(uri),
            _ => Err(RegistryError::TypeMismatch {
                id,
                expected: Discriminant::UriEndPoint,
                actual: record.kind(),
            }),
        }
    }

    /// The URL an HTTP endpoint is reachable at.
    pub fn url_of(&self, id: ObjectId) -> Result<String> {
        let record = self.get(id)?;
        match record.attributes {
            Attributes::Http { url } => Ok(url),
            _ => Err(RegistryError::TypeMismatch {
                id,
                expected: Discriminant::EndPoint,
                actual: record.kind(),
            }),
        }
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.read().objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Identifiers of all live root pipelines, sorted.
    pub fn pipelines(&self) -> Result<Vec<ObjectId>> {
        let state = self.read();
        let mut ids: Vec<ObjectId> = state
            .objects
            .values()
            .filter(|r| r.is_root())
            .map(|r| r.id())
            .collect();
        ids.sort();
        Ok(ids)
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}
