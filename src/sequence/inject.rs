use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::behavior::{Behavior, BehaviorCatalog, BehaviorError, BehaviorSource, StoreError};
use crate::trace::Trace;

/// Errors that abort an injection call
#[derive(Error, Debug)]
pub enum InjectionError {
    #[error("Insertion probability must be in [0, 1], got {0}")]
    InvalidProbability(f64),

    #[error(transparent)]
    Behavior(#[from] BehaviorError),

    #[error("Failed to load malicious behaviors: {0}")]
    Store(#[from] StoreError),
}

/// Result type for injection operations
pub type Result<T> = std::result::Result<T, InjectionError>;

/// A planned insertion: the behavior goes in front of `position`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionPoint<'a> {
    pub position: usize,
    pub behavior: &'a Behavior,
}

/// Where a behavior block landed in the output trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insertion {
    /// Index of the first injected call in the output trace
    pub position: usize,

    /// Description of the injected behavior
    pub description: String,

    /// Number of injected calls
    pub length: usize,
}

impl Insertion {
    /// Index range occupied by the block in the output trace
    pub fn span(&self) -> std::ops::Range<usize> {
        self.position..self.position + self.length
    }
}

/// Output of an injection: the new trace plus labels for every block
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InjectedTrace {
    pub trace: Trace,
    pub insertions: Vec<Insertion>,
}

impl InjectedTrace {
    /// Number of calls added on top of the target trace
    pub fn injected_calls(&self) -> usize {
        self.insertions.iter().map(|i| i.length).sum()
    }
}

/// Inserts known malicious behaviors into benign traces at random offsets
///
/// The catalog is a snapshot; the injector never reloads it. Randomness is
/// supplied by the caller so runs can be reproduced with a seeded RNG.
///
/// # Example
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use trout::behavior::{Behavior, BehaviorCatalog};
/// use trout::sequence::BehaviorInjector;
///
/// let ransomware = Behavior::new(
///     "ransomware",
///     vec!["encryptFile".to_string(), "deleteShadowCopy".to_string()],
/// ).unwrap();
/// let injector = BehaviorInjector::new(BehaviorCatalog::new(vec![ransomware]).unwrap());
///
/// let target = vec!["open(f)", "read(f)", "close(f)"];
/// let mut rng = StdRng::seed_from_u64(42);
/// let injected = injector.inject(&target, 1.0, false, &mut rng).unwrap();
///
/// assert_eq!(
///     injected.trace,
///     vec!["open(f)", "encryptFile()", "deleteShadowCopy()", "read(f)", "close(f)"]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct BehaviorInjector {
    catalog: BehaviorCatalog,
}

impl BehaviorInjector {
    pub fn new(catalog: BehaviorCatalog) -> Self {
        Self { catalog }
    }

    /// Snapshot the source's behaviors into a new injector
    ///
    /// # Errors
    /// Fails if the source fails or yields no behaviors.
    pub fn from_source<S: BehaviorSource + ?Sized>(source: &S) -> Result<Self> {
        let behaviors = source.load_behaviors()?;
        let catalog = BehaviorCatalog::new(behaviors)
            .inspect_err(|e| tracing::error!("Cannot inject behaviors: {}", e))?;
        Ok(Self::new(catalog))
    }

    pub fn catalog(&self) -> &BehaviorCatalog {
        &self.catalog
    }

    /// Choose insertion points for a trace of `trace_len` calls
    ///
    /// The scan visits offsets `0..trace_len`. A successful Bernoulli trial at
    /// offset `i` records position `i + 1` and skips `len(behavior) + 1`
    /// offsets past the block; a failed trial advances by one. Positions
    /// refer to the trace as it grows, so they are applied left to right.
    pub fn plan<R: Rng + ?Sized>(
        &self,
        trace_len: usize,
        probability: f64,
        multiple_behaviors: bool,
        rng: &mut R,
    ) -> Result<Vec<InsertionPoint<'_>>> {
        validate_probability(probability)?;

        // One behavior for the whole call unless each insertion draws its own
        let fixed = (!multiple_behaviors).then(|| self.catalog.choose(rng));

        let mut points = Vec::new();
        let mut cursor = 0;
        while cursor < trace_len {
            if rng.gen_bool(probability) {
                let behavior = match fixed {
                    Some(behavior) => behavior,
                    None => self.catalog.choose(rng),
                };
                points.push(InsertionPoint {
                    position: cursor + 1,
                    behavior,
                });
                cursor += behavior.len() + 1;
            } else {
                cursor += 1;
            }
        }

        Ok(points)
    }

    /// Produce a new trace with behaviors spliced in; `target` is left untouched
    pub fn inject<S: AsRef<str>, R: Rng + ?Sized>(
        &self,
        target: &[S],
        probability: f64,
        multiple_behaviors: bool,
        rng: &mut R,
    ) -> Result<InjectedTrace> {
        let points = self.plan(target.len(), probability, multiple_behaviors, rng)?;

        tracing::debug!(
            "Insertion points: {:?}",
            points
                .iter()
                .map(|p| (p.position, p.behavior.description.as_str()))
                .collect::<Vec<_>>()
        );

        let mut trace: Trace = target.iter().map(|s| s.as_ref().to_string()).collect();
        let insertions = splice(&mut trace, &points);

        Ok(InjectedTrace { trace, insertions })
    }
}

/// Splice behaviors into `trace` at each point, in order
///
/// Later points sit past earlier blocks, so recorded positions stay valid in
/// the final trace.
fn splice(trace: &mut Trace, points: &[InsertionPoint<'_>]) -> Vec<Insertion> {
    points
        .iter()
        .map(|point| {
            let at = point.position.min(trace.len());
            trace.splice(at..at, point.behavior.descriptors());
            Insertion {
                position: at,
                description: point.behavior.description.clone(),
                length: point.behavior.len(),
            }
        })
        .collect()
}

fn validate_probability(probability: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(InjectionError::InvalidProbability(probability));
    }
    Ok(())
}

/// Load behaviors from `source` and inject them into `target`
///
/// Convenience wrapper using the thread-local RNG; the catalog is loaded for
/// this call only.
pub fn inject_behaviors<B: BehaviorSource + ?Sized, S: AsRef<str>>(
    source: &B,
    target: &[S],
    probability: f64,
    multiple_behaviors: bool,
) -> Result<InjectedTrace> {
    BehaviorInjector::from_source(source)?.inject(
        target,
        probability,
        multiple_behaviors,
        &mut rand::thread_rng(),
    )
}
