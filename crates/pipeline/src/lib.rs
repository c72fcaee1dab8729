//! Generation workflow orchestration.
//!
//! Drives product status through externally performed generation steps and
//! manages the per-angle script version chain. All persistence goes through
//! [`adforge_db::Store`]; all outbound calls go through a
//! [`trigger::GenerationTrigger`].

pub mod completion;
pub mod dispatcher;
pub mod error;
pub mod script_chain;
pub mod selection;
pub mod trigger;

pub use completion::{CompletionWatcher, PollPolicy, WaitError};
pub use dispatcher::{Compensation, FlightGuard, FlightKey, GenerationDispatcher};
pub use error::PipelineError;
pub use script_chain::ScriptVersionChain;
pub use selection::SelectionSet;
pub use trigger::{GenerationTrigger, TriggerError, WebhookTrigger};
