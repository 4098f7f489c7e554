pub mod classify;
pub mod dispatch;
pub mod error;
pub mod metrics;
pub mod payload;
pub mod tools;
pub mod view;

pub use dispatch::{SelectionContext, SelectionListener, activate_row, interpret, select};
pub use error::{Error, Result};
pub use payload::{PayloadReader, ToolResult};
pub use tools::Tool;
pub use view::{ViewBody, ViewModel, ViewVariant};
