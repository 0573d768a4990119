//! UUID sources for emitted `uuid` fields.
//!
//! Each render walks the document in a fixed order and asks the document's
//! generator for one id per emitted item, passing a counter that restarts at
//! zero for every render. Deterministic generators therefore produce
//! byte-identical output across renders.

use std::fmt;

use uuid::Uuid;

const NAMESPACE_URL: Uuid = Uuid::NAMESPACE_URL;

/// Maps a per-render sequence index to a UUID.
pub trait IdGenerator: fmt::Debug + Send + Sync {
    fn id(&self, seq: u64) -> Uuid;
}

/// `00000000-0000-0000-0000-000000000001`, `...02`, and so on.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialIds;

impl IdGenerator for SequentialIds {
    fn id(&self, seq: u64) -> Uuid {
        Uuid::from_u128(u128::from(seq) + 1)
    }
}

/// UUID v5 ids inside a namespace derived from a document name.
///
/// Two documents with different names get disjoint ids; the same name always
/// reproduces the same ids.
#[derive(Debug, Clone, Copy)]
pub struct NamespacedIds {
    namespace: Uuid,
}

impl NamespacedIds {
    pub fn new(name: &str) -> Self {
        Self {
            namespace: Uuid::new_v5(&NAMESPACE_URL, name.as_bytes()),
        }
    }

    pub fn namespace(&self) -> Uuid {
        self.namespace
    }
}

impl IdGenerator for NamespacedIds {
    fn id(&self, seq: u64) -> Uuid {
        Uuid::new_v5(&self.namespace, &seq.to_be_bytes())
    }
}

/// Fresh random v4 ids; renders are not reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn id(&self, _seq: u64) -> Uuid {
        Uuid::new_v4()
    }
}

/// Counter over a generator for the duration of one render.
pub(crate) struct IdSequence<'a> {
    generator: &'a dyn IdGenerator,
    next: u64,
}

impl<'a> IdSequence<'a> {
    pub(crate) fn new(generator: &'a dyn IdGenerator) -> Self {
        Self { generator, next: 0 }
    }

    pub(crate) fn next_id(&mut self) -> Uuid {
        let id = self.generator.id(self.next);
        self.next += 1;
        id
    }
}
