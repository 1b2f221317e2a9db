// # dhdns-core
//
// Core library for the dhdns dynamic DNS updater.
//
// ## Architecture Overview
//
// One poll loop keeps a fixed list of A records pointed at the caller's
// public IP:
// - **DnsProvider**: Trait for listing, removing and adding records
// - **IpSource**: Trait for looking up the current IP
// - **Notifier**: Trait for push notifications about outcomes
// - **DdnsEngine**: Runs the fetch → resolve → reconcile → sleep cycle
// - **NotifierGate**: One-shot notifier verification state machine
//
// ## Design Principles
//
// 1. **Explicit context**: All loop state lives in `DdnsEngine`, no globals
// 2. **Fresh snapshots**: Provider records are re-listed every cycle
// 3. **Validated writes**: Only a classified public IPv4 address is written
// 4. **Local recovery**: Every failure is contained within its cycle

pub mod comment;
pub mod config;
pub mod engine;
pub mod error;
pub mod ip;
pub mod notify;
pub mod state;
pub mod time;
pub mod traits;

// Re-export core types for convenience
pub use comment::CommentTemplate;
pub use config::{DdnsConfig, EngineConfig, IpSourceConfig, NotifierConfig, ProviderConfig, RecordConfig};
pub use engine::{CycleReport, DdnsEngine, DomainOutcome, Resolution};
pub use error::{Error, ErrorKind, Result};
pub use notify::{DomainEvent, NotifierGate, NotifierState};
pub use traits::{DnsProvider, IpSource, Notifier};
