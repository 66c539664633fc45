//! Transient notice delivery: a digest pipeline with layered defaults, a
//! shared configuration registry, and a per-scope display lifecycle.
//!
//! Producers hand raw [`Notice`]s to a [`Scope`] (or a detached
//! [`NoticeSink`]); the scope's controller pulls them one at a time, runs
//! the digest pipeline, and drives a single display slot through its
//! renderer, honoring each notice's dismissal policy.

/// Digest pipeline resolving raw notices into display-ready form.
pub mod digest;
/// Notice data model: kinds, dismissal policy, and the builder surface.
pub mod notice;
/// Shared configuration defaults read by every scope absent an override.
pub mod registry;
/// Display-side boundary: the alert projection and renderer strategies.
pub mod render;
/// Mounted display scopes, producer sinks, and the lifecycle controller.
pub mod scope;

pub use digest::{DEFAULT_MESSAGE, DigestFn, TitleFormat, digest, title_case};
pub use notice::{AutoDismiss, Kind, KindParseError, Notice, NoticeBuilder};
pub use registry::Registry;
pub use render::{Alert, AlertRenderer, CloseHandle, NullRenderer, TraceRenderer};
pub use scope::{NoticeSink, Phase, Scope, ScopeBuilder};
