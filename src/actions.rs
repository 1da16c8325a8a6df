use std::collections::HashMap;
use std::collections::hash_map::{DefaultHasher, Entry};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::NotifyError;

/// A zero-argument callback fired when the user invokes an action.
#[derive(Clone)]
pub struct Trigger(Arc<dyn Fn() + Send + Sync>);

impl Trigger {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Trigger(Arc::new(callback))
    }

    pub fn fire(&self) {
        (self.0)()
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Trigger(..)")
    }
}

/// A button shown on the notification.
#[derive(Debug, Clone)]
pub struct Action {
    pub title: String,
    pub key: Option<String>,
    pub trigger: Trigger,
}

impl Action {
    /// Creates an action whose key is generated from its position and title.
    pub fn new<F>(title: &str, trigger: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Action {
            title: title.to_owned(),
            key: None,
            trigger: Trigger::new(trigger),
        }
    }

    /// Creates an action with an explicit wire key.
    ///
    /// The key `default` is what most notification servers report when the
    /// notification body itself is clicked.
    pub fn with_key<F>(key: &str, title: &str, trigger: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Action {
            title: title.to_owned(),
            key: Some(key.to_owned()),
            trigger: Trigger::new(trigger),
        }
    }

    fn derive_key(&self, index: usize) -> String {
        if let Some(key) = &self.key {
            return key.clone();
        }

        let mut hasher = DefaultHasher::new();
        self.title.hash(&mut hasher);
        format!("action-{}-{:08x}", index, hasher.finish() as u32)
    }
}

/// Maps action keys to the triggers registered for one notification.
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    handlers: HashMap<String, Trigger>,
}

impl ActionTable {
    pub fn get(&self, key: &str) -> Option<&Trigger> {
        self.handlers.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.handlers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// The ordered action set of a notification.
#[derive(Debug, Clone, Default)]
pub struct Actions(Vec<Action>);

impl Actions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        self.0.push(action);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.0.iter()
    }

    /// Resolves every action to its key, returning the handler table and the
    /// flattened `[key, title, key, title, ...]` list the service expects.
    ///
    /// Fails with [`NotifyError::DuplicateActionKey`] rather than letting a
    /// later action shadow an earlier one.
    pub fn derive(&self) -> Result<(ActionTable, Vec<String>), NotifyError> {
        let mut handlers = HashMap::with_capacity(self.0.len());
        let mut params = Vec::with_capacity(self.0.len() * 2);

        for (index, action) in self.0.iter().enumerate() {
            let key = action.derive_key(index);

            match handlers.entry(key.clone()) {
                Entry::Occupied(_) => return Err(NotifyError::DuplicateActionKey(key)),
                Entry::Vacant(slot) => {
                    slot.insert(action.trigger.clone());
                }
            }

            params.push(key);
            params.push(action.title.clone());
        }

        Ok((ActionTable { handlers }, params))
    }
}

impl From<Vec<Action>> for Actions {
    fn from(actions: Vec<Action>) -> Self {
        Actions(actions)
    }
}

impl FromIterator<Action> for Actions {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        Actions(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Actions {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
