use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKey {
    RunRecord,
    Techniques,
    SampleName,
    RunType,
}

impl AccessorKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RunRecord => "run_record",
            Self::Techniques => "techniques",
            Self::SampleName => "sample_name",
            Self::RunType => "run_type",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EntityCache<V> {
    enabled: bool,
    entries: HashMap<(u32, AccessorKey), V>,
}

impl<V> EntityCache<V> {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: HashMap::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get(&self, run: u32, key: AccessorKey) -> Option<&V> {
        if !self.enabled {
            return None;
        }
        let hit = self.entries.get(&(run, key));
        tracing::debug!(run, accessor = key.as_str(), hit = hit.is_some(), "cache lookup");
        hit
    }

    pub fn put(&mut self, run: u32, key: AccessorKey, value: V) {
        if self.enabled {
            self.entries.insert((run, key), value);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_per_run_and_accessor() {
        let mut cache = EntityCache::new(true);
        cache.put(1, AccessorKey::SampleName, "mithril".to_string());
        cache.put(1, AccessorKey::RunType, "alchemy".to_string());

        assert_eq!(
            cache.get(1, AccessorKey::SampleName).map(String::as_str),
            Some("mithril")
        );
        assert_eq!(
            cache.get(1, AccessorKey::RunType).map(String::as_str),
            Some("alchemy")
        );
        assert!(cache.get(2, AccessorKey::SampleName).is_none());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn disabled_cache_never_hits() {
        let mut cache = EntityCache::new(false);
        cache.put(1, AccessorKey::Techniques, vec![1, 2]);
        assert!(cache.get(1, AccessorKey::Techniques).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_forgets_everything() {
        let mut cache = EntityCache::new(true);
        cache.put(3, AccessorKey::RunRecord, 42u64);
        cache.clear();
        assert!(cache.get(3, AccessorKey::RunRecord).is_none());
    }

    #[test]
    fn accessor_names_are_stable() {
        assert_eq!(AccessorKey::RunRecord.as_str(), "run_record");
        assert_eq!(AccessorKey::Techniques.as_str(), "techniques");
        assert_eq!(AccessorKey::SampleName.as_str(), "sample_name");
        assert_eq!(AccessorKey::RunType.as_str(), "run_type");
    }
}
