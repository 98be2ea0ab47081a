// Action dispatch - turns a matched template into a device input event.
// The template-to-action mapping is supplied by the caller as an ActionTable.

pub mod dispatcher;
pub mod error;
pub mod table;

pub use dispatcher::{ActionDispatcher, DispatchOutcome, TableDispatcher};
pub use error::ActionError;
pub use table::{ActionTable, DeviceAction};
