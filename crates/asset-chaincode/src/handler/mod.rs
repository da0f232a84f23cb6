//! Handler Layer
//!
//! Entry points the runtime calls, the function registry and the
//! dispatcher that routes invocations to lifecycle operations.

pub mod chaincode;
pub mod dispatcher;
pub mod registry;

pub use chaincode::{Chaincode, Invocation, Response, STATUS_ERROR, STATUS_OK};
pub use dispatcher::Dispatcher;
pub use registry::{functions, FunctionRegistry, HandlerFn};
