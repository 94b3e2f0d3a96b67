use rand::Rng;

use crate::behavior::{Behavior, BehaviorError, StoreError};

/// Anything able to produce the current list of known behaviors
///
/// An empty list is a valid answer from the source; it is the catalog that
/// refuses to be built from one.
pub trait BehaviorSource {
    fn load_behaviors(&self) -> Result<Vec<Behavior>, StoreError>;
}

/// Immutable, non-empty snapshot of behaviors used for one injection session
#[derive(Debug, Clone)]
pub struct BehaviorCatalog {
    behaviors: Vec<Behavior>,
}

impl BehaviorCatalog {
    /// Build a catalog, rejecting an empty list or any empty behavior
    pub fn new(behaviors: Vec<Behavior>) -> Result<Self, BehaviorError> {
        if behaviors.is_empty() {
            return Err(BehaviorError::EmptyCatalog);
        }
        for behavior in &behaviors {
            behavior.validate()?;
        }

        Ok(Self { behaviors })
    }

    /// Take a snapshot of whatever the source currently holds
    pub fn load<S: BehaviorSource + ?Sized>(source: &S) -> Result<Self, StoreError> {
        let behaviors = source.load_behaviors()?;
        Ok(Self::new(behaviors)?)
    }

    /// Pick one behavior uniformly at random
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &Behavior {
        // Non-empty by construction
        &self.behaviors[rng.gen_range(0..self.behaviors.len())]
    }

    pub fn get(&self, description: &str) -> Option<&Behavior> {
        self.behaviors.iter().find(|b| b.description == description)
    }

    pub fn behaviors(&self) -> &[Behavior] {
        &self.behaviors
    }

    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }
}

impl BehaviorSource for BehaviorCatalog {
    fn load_behaviors(&self) -> Result<Vec<Behavior>, StoreError> {
        Ok(self.behaviors.clone())
    }
}

impl BehaviorSource for [Behavior] {
    fn load_behaviors(&self) -> Result<Vec<Behavior>, StoreError> {
        Ok(self.to_vec())
    }
}

impl BehaviorSource for Vec<Behavior> {
    fn load_behaviors(&self) -> Result<Vec<Behavior>, StoreError> {
        Ok(self.clone())
    }
}

