//! Net registry: the bidirectional name/id table of a document.

use std::collections::HashMap;
use std::fmt;

/// Numeric net handle. Id 0 is the "no net" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NetId(u32);

impl NetId {
    pub const NONE: NetId = NetId(0);

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for NetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of a net created by connecting two pins without an explicit name.
///
/// Order-sensitive: swapping the endpoints yields a different name.
pub fn synthesize_net_name(ref1: &str, pin1: &str, ref2: &str, pin2: &str) -> String {
    format!("Net-({ref1}-{pin1})-({ref2}-{pin2})")
}

/// Maps net names to ids and back.
///
/// Ids are handed out in creation order starting at 1 and are never reused.
/// The empty name is permanently bound to [`NetId::NONE`].
#[derive(Debug, Clone)]
pub struct NetRegistry {
    /// Indexed by id.
    names: Vec<String>,
    ids: HashMap<String, NetId>,
}

impl Default for NetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NetRegistry {
    pub fn new() -> Self {
        Self {
            names: vec![String::new()],
            ids: HashMap::from([(String::new(), NetId::NONE)]),
        }
    }

    /// Id for `name`, registering it if it is new.
    pub fn get_or_create(&mut self, name: &str) -> NetId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = NetId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        log::trace!("registered net {id} `{name}`");
        id
    }

    /// Name for `id`, or `""` when the id was never handed out.
    pub fn lookup_name(&self, id: NetId) -> &str {
        self.names
            .get(id.0 as usize)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn lookup_id(&self, name: &str) -> Option<NetId> {
        self.ids.get(name).copied()
    }

    pub fn contains(&self, id: NetId) -> bool {
        (id.0 as usize) < self.names.len()
    }

    /// All nets in ascending id order, including the sentinel.
    pub fn iter(&self) -> impl Iterator<Item = (NetId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(idx, name)| (NetId(idx as u32), name.as_str()))
    }

    /// Number of nets including the sentinel.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when only the sentinel is registered.
    pub fn is_empty(&self) -> bool {
        self.names.len() == 1
    }
}
