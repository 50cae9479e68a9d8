//! Production step binding and candidate resolution
//!
//! A [`Producer`] is the typed function the splitter calls once per inbound
//! message. It is bound to the part of the message it needs: the whole
//! message, the payload, a header, or payload plus header. Header and
//! dynamically typed payload arguments are converted through [`FromValue`],
//! so a shape mismatch surfaces as [`ProductionError::TypeMismatch`].
//!
//! [`ProducerCandidates`] picks one producer among several registered
//! strategies, once, while the splitter is being wired.

use crate::{ProductionError, SplitError, SplitOutput};
use message::{FromValue, Message, Value};
use std::fmt;
use std::sync::Arc;

type ProduceFn<I, O> =
    dyn Fn(&Message<I>) -> Result<SplitOutput<O>, ProductionError> + Send + Sync;

pub struct Producer<I, O> {
    name: String,
    produce: Arc<ProduceFn<I, O>>,
}

impl<I: 'static, O: 'static> Producer<I, O> {
    /// Bind to the whole inbound message
    pub fn from_message<F>(f: F) -> Self
    where
        F: Fn(&Message<I>) -> anyhow::Result<SplitOutput<O>> + Send + Sync + 'static,
    {
        Self::wrap(move |message| f(message).map_err(ProductionError::from))
    }

    /// Bind to the inbound payload
    pub fn from_payload<F>(f: F) -> Self
    where
        F: Fn(&I) -> anyhow::Result<SplitOutput<O>> + Send + Sync + 'static,
    {
        Self::wrap(move |message| f(message.payload()).map_err(ProductionError::from))
    }

    /// Bind to one header, converted to `H`
    pub fn from_header<H, F>(header: impl Into<String>, f: F) -> Self
    where
        H: FromValue,
        F: Fn(H) -> anyhow::Result<SplitOutput<O>> + Send + Sync + 'static,
    {
        let header = header.into();
        Self::wrap(move |message| {
            let value = required_header::<I, H>(message, &header)?;
            f(value).map_err(ProductionError::from)
        })
    }

    /// Bind to the payload and one header, converted to `H`
    pub fn from_payload_and_header<H, F>(header: impl Into<String>, f: F) -> Self
    where
        H: FromValue,
        F: Fn(&I, H) -> anyhow::Result<SplitOutput<O>> + Send + Sync + 'static,
    {
        let header = header.into();
        Self::wrap(move |message| {
            let value = required_header::<I, H>(message, &header)?;
            f(message.payload(), value).map_err(ProductionError::from)
        })
    }

    fn wrap<F>(f: F) -> Self
    where
        F: Fn(&Message<I>) -> Result<SplitOutput<O>, ProductionError> + Send + Sync + 'static,
    {
        Self {
            name: "anonymous".to_string(),
            produce: Arc::new(f),
        }
    }
}

impl<O: 'static> Producer<Value, O> {
    /// Bind to a dynamically typed payload, converted to `P` before the call
    pub fn from_payload_as<P, F>(f: F) -> Self
    where
        P: FromValue,
        F: Fn(P) -> anyhow::Result<SplitOutput<O>> + Send + Sync + 'static,
    {
        Self::wrap(move |message| {
            let payload = P::from_value(message.payload())?;
            f(payload).map_err(ProductionError::from)
        })
    }
}

impl<I, O> Producer<I, O> {
    /// Label used in logs and resolution errors
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn produce(&self, message: &Message<I>) -> Result<SplitOutput<O>, ProductionError> {
        (self.produce)(message)
    }
}

fn required_header<I, H: FromValue>(
    message: &Message<I>,
    header: &str,
) -> Result<H, ProductionError> {
    message
        .headers()
        .get_as::<H>(header)?
        .ok_or_else(|| ProductionError::MissingHeader(header.to_string()))
}

impl<I, O> Clone for Producer<I, O> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            produce: Arc::clone(&self.produce),
        }
    }
}

impl<I, O> fmt::Debug for Producer<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer").field("name", &self.name).finish()
    }
}

/// How a candidate takes part in resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// Explicitly designated; beats every unmarked candidate
    Marked,
    /// Chosen only if it is the single public candidate
    Public,
    /// Never chosen implicitly, only by name
    Internal,
}

#[derive(Debug)]
struct Candidate<I, O> {
    eligibility: Eligibility,
    producer: Producer<I, O>,
}

/// Set of production strategies offered by one delegate
#[derive(Debug)]
pub struct ProducerCandidates<I, O> {
    delegate: String,
    candidates: Vec<Candidate<I, O>>,
}

impl<I, O> ProducerCandidates<I, O> {
    /// `delegate` names the owner of the candidates in errors and logs
    pub fn new(delegate: impl Into<String>) -> Self {
        Self {
            delegate: delegate.into(),
            candidates: Vec::new(),
        }
    }

    pub fn marked(self, name: impl Into<String>, producer: Producer<I, O>) -> Self {
        self.register(name, Eligibility::Marked, producer)
    }

    pub fn public(self, name: impl Into<String>, producer: Producer<I, O>) -> Self {
        self.register(name, Eligibility::Public, producer)
    }

    pub fn internal(self, name: impl Into<String>, producer: Producer<I, O>) -> Self {
        self.register(name, Eligibility::Internal, producer)
    }

    pub fn register(
        mut self,
        name: impl Into<String>,
        eligibility: Eligibility,
        producer: Producer<I, O>,
    ) -> Self {
        self.candidates.push(Candidate {
            eligibility,
            producer: producer.with_name(name),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Marked candidates first, then the uniqueness rule over public ones
    pub fn resolve(self) -> Result<Producer<I, O>, SplitError> {
        let marked = self.count(Eligibility::Marked);
        let eligibility = match marked {
            1 => Eligibility::Marked,
            0 => match self.count(Eligibility::Public) {
                1 => Eligibility::Public,
                0 => return Err(SplitError::NoProducerFound(self.delegate)),
                _ => return Err(SplitError::AmbiguousProducer(self.delegate)),
            },
            _ => return Err(SplitError::AmbiguousProducer(self.delegate)),
        };
        self.take_single(|c| c.eligibility == eligibility)
    }

    /// Pick a candidate by name regardless of eligibility
    pub fn resolve_named(self, name: &str) -> Result<Producer<I, O>, SplitError> {
        match self
            .candidates
            .iter()
            .filter(|c| c.producer.name() == name)
            .count()
        {
            0 => Err(SplitError::NoProducerFound(format!(
                "{}::{}",
                self.delegate, name
            ))),
            1 => self.take_single(|c| c.producer.name() == name),
            _ => Err(SplitError::AmbiguousProducer(format!(
                "{}::{}",
                self.delegate, name
            ))),
        }
    }

    fn count(&self, eligibility: Eligibility) -> usize {
        self.candidates
            .iter()
            .filter(|c| c.eligibility == eligibility)
            .count()
    }

    fn take_single(
        self,
        matches: impl Fn(&Candidate<I, O>) -> bool,
    ) -> Result<Producer<I, O>, SplitError> {
        let delegate = self.delegate;
        let chosen = self
            .candidates
            .into_iter()
            .find(|c| matches(c))
            .ok_or_else(|| SplitError::NoProducerFound(delegate.clone()))?;
        tracing::info!(
            "Resolved producer '{}' ({:?}) on '{}'",
            chosen.producer.name(),
            chosen.eligibility,
            delegate
        );
        Ok(chosen.producer)
    }
}
