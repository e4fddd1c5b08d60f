use std::fmt;

/// Composite address of a record in the backend store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BackendKey {
    pub namespace: String,
    pub set: String,
    pub identifier: String,
}

impl fmt::Display for BackendKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.namespace, self.set, self.identifier)
    }
}

/// Turns logical Redis key names into backend keys for one namespace and set.
#[derive(Debug, Clone)]
pub struct KeyMapper {
    namespace: String,
    set: String,
}

impl KeyMapper {
    pub fn new(namespace: &str, set: &str) -> Self {
        KeyMapper {
            namespace: namespace.to_string(),
            set: set.to_string(),
        }
    }

    pub fn to_backend_key(&self, name: &str) -> BackendKey {
        BackendKey {
            namespace: self.namespace.clone(),
            set: self.set.clone(),
            identifier: name.to_string(),
        }
    }

    pub fn to_backend_keys<S: AsRef<str>>(&self, names: &[S]) -> Vec<BackendKey> {
        names
            .iter()
            .map(|name| self.to_backend_key(name.as_ref()))
            .collect()
    }
}
