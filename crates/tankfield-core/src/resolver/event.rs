//! Event resolver: copies plugin events into the simulation's event log.
//!
//! Events carry no state changes. Resolvers record their own events through
//! [`ResolveContext::record`]; this resolver covers the ones plugins emit
//! directly (`MoveBlocked`, `Rerouted`, `BulletImpact`, `BulletExpired`).

use crate::output::{Output, OutputEnvelope, OutputKind};

use super::{ResolveContext, Resolver};

/// Resolver that records events.
///
/// # Example
///
/// ```
/// use tankfield_core::resolver::EventResolver;
/// use tankfield_core::resolver::Resolver;
/// use tankfield_core::output::OutputKind;
///
/// let resolver = EventResolver::new();
/// assert_eq!(resolver.handles(), &[OutputKind::Event]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EventResolver;

impl EventResolver {
    /// Creates a new event resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Resolver for EventResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Event]
    }

    fn resolve(&self, envelope: &OutputEnvelope, ctx: &mut ResolveContext<'_>) {
        if let Output::Event(event) = envelope.output() {
            ctx.record(event.clone());
        }
    }
}
