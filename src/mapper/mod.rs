//! Structure-preserving provider wrappers.
//!
//! A mapper owns (or shares, through `Arc`) exactly one source provider and
//! forwards every operation to it. Only the shape of one channel changes:
//! [`MappedConnectionProvider`] rewrites `Connected` payloads,
//! [`MappedOptionProvider`] rewrites resolved options. Sequencing, timing and
//! errors of the source are left alone, so mappers can be stacked in any
//! order.

mod connection;
mod option;

pub use connection::MappedConnectionProvider;
pub use option::MappedOptionProvider;

use crate::provider::ConnectionProvider;

/// Wrap `source` so that its `Connected` payloads are passed through `mapper`.
pub fn map_connection<P, F, N>(source: P, mapper: F) -> MappedConnectionProvider<P, F>
where
    P: ConnectionProvider,
    F: Fn(P::Connection) -> N + Send + Sync + 'static,
    N: Send + 'static,
{
    MappedConnectionProvider::new(source, mapper)
}

/// Wrap `source` so that the options it resolves are passed through `mapper`.
pub fn map_option<P, G, T>(source: P, mapper: G) -> MappedOptionProvider<P, G>
where
    P: ConnectionProvider,
    G: Fn(P::Choice) -> T + Send + Sync + 'static,
    T: Send + 'static,
{
    MappedOptionProvider::new(source, mapper)
}
