//! Routes an invocation to its registered handler.

use super::chaincode::Invocation;
use super::registry::FunctionRegistry;
use crate::errors::{ChaincodeError, ChaincodeResult};
use crate::ports::AssetLifecycleApi;
use std::sync::Arc;
use tracing::debug;

/// Function-name dispatcher over a shared registry.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<FunctionRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<FunctionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Look up the handler for `invocation.function` and run it.
    ///
    /// Unknown names fail with [`ChaincodeError::UnknownFunction`] before
    /// the ledger is touched.
    pub fn dispatch(
        &self,
        api: &dyn AssetLifecycleApi,
        invocation: &Invocation,
    ) -> ChaincodeResult<Vec<u8>> {
        let handler = self
            .registry
            .lookup(&invocation.function)
            .ok_or_else(|| ChaincodeError::UnknownFunction(invocation.function.clone()))?;

        debug!(
            function = %invocation.function,
            args = invocation.args.len(),
            "Dispatching"
        );
        handler(api, invocation)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Arc::new(FunctionRegistry::standard()))
    }
}
