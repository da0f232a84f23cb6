//! Function registry.
//!
//! Maps invocation function names to handlers. Each handler checks its
//! positional argument count, decodes its transient input if it has one,
//! and calls one lifecycle operation.
//!
//! | Function | Args | Transient |
//! |----------|------|-----------|
//! | `create` | 0 | `asset` |
//! | `read` | exactly 1 | |
//! | `readConfidentialDetails` | exactly 1 | |
//! | `transfer` | 0 | `asset_owner` |
//! | `delete` | 0 | `asset_delete` |
//! | `rangeByName` | at least 2 | |
//! | `queryByOwner` | at least 1 | |
//! | `queryAdHoc` | at least 1 | |
//!
//! Extra positional arguments to the query functions are ignored.

use super::chaincode::Invocation;
use crate::domain::{decode_transient, CreateAssetInput, DeleteAssetInput, TransferAssetInput};
use crate::errors::{ArgCount, ChaincodeResult, InputError};
use crate::ports::AssetLifecycleApi;
use std::collections::HashMap;

/// Registered function names.
pub mod functions {
    pub const CREATE: &str = "create";
    pub const READ: &str = "read";
    pub const READ_CONFIDENTIAL_DETAILS: &str = "readConfidentialDetails";
    pub const TRANSFER: &str = "transfer";
    pub const DELETE: &str = "delete";
    pub const RANGE_BY_NAME: &str = "rangeByName";
    pub const QUERY_BY_OWNER: &str = "queryByOwner";
    pub const QUERY_AD_HOC: &str = "queryAdHoc";
}

/// Handler signature: the lifecycle API plus the invocation.
pub type HandlerFn = fn(&dyn AssetLifecycleApi, &Invocation) -> ChaincodeResult<Vec<u8>>;

/// Immutable name → handler table.
pub struct FunctionRegistry {
    handlers: HashMap<&'static str, HandlerFn>,
}

impl FunctionRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registry with all asset lifecycle functions.
    pub fn standard() -> Self {
        Self::new()
            .with(functions::CREATE, handle_create)
            .with(functions::READ, handle_read)
            .with(functions::READ_CONFIDENTIAL_DETAILS, handle_read_confidential_details)
            .with(functions::TRANSFER, handle_transfer)
            .with(functions::DELETE, handle_delete)
            .with(functions::RANGE_BY_NAME, handle_range_by_name)
            .with(functions::QUERY_BY_OWNER, handle_query_by_owner)
            .with(functions::QUERY_AD_HOC, handle_query_ad_hoc)
    }

    /// Builder-style registration; a repeated name replaces the handler.
    pub fn with(mut self, name: &'static str, handler: HandlerFn) -> Self {
        self.handlers.insert(name, handler);
        self
    }

    /// Exact, case-sensitive lookup.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<HandlerFn> {
        self.handlers.get(name).copied()
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn function_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

fn check_args(invocation: &Invocation, expected: ArgCount) -> Result<(), InputError> {
    if expected.accepts(invocation.args.len()) {
        Ok(())
    } else {
        Err(InputError::IncorrectArgumentCount {
            function: invocation.function.clone(),
            expected,
            actual: invocation.args.len(),
        })
    }
}

fn handle_create(api: &dyn AssetLifecycleApi, invocation: &Invocation) -> ChaincodeResult<Vec<u8>> {
    check_args(invocation, ArgCount::Exactly(0))?;
    let input: CreateAssetInput = decode_transient(&invocation.transient)?;
    api.create(input)?;
    Ok(Vec::new())
}

fn handle_read(api: &dyn AssetLifecycleApi, invocation: &Invocation) -> ChaincodeResult<Vec<u8>> {
    check_args(invocation, ArgCount::Exactly(1))?;
    api.read(&invocation.args[0])
}

fn handle_read_confidential_details(
    api: &dyn AssetLifecycleApi,
    invocation: &Invocation,
) -> ChaincodeResult<Vec<u8>> {
    check_args(invocation, ArgCount::Exactly(1))?;
    api.read_confidential_details(&invocation.args[0])
}

fn handle_transfer(
    api: &dyn AssetLifecycleApi,
    invocation: &Invocation,
) -> ChaincodeResult<Vec<u8>> {
    check_args(invocation, ArgCount::Exactly(0))?;
    let input: TransferAssetInput = decode_transient(&invocation.transient)?;
    api.transfer(input)?;
    Ok(Vec::new())
}

fn handle_delete(api: &dyn AssetLifecycleApi, invocation: &Invocation) -> ChaincodeResult<Vec<u8>> {
    check_args(invocation, ArgCount::Exactly(0))?;
    let input: DeleteAssetInput = decode_transient(&invocation.transient)?;
    api.delete(input)?;
    Ok(Vec::new())
}

fn handle_range_by_name(
    api: &dyn AssetLifecycleApi,
    invocation: &Invocation,
) -> ChaincodeResult<Vec<u8>> {
    check_args(invocation, ArgCount::AtLeast(2))?;
    api.range_by_name(&invocation.args[0], &invocation.args[1])
}

fn handle_query_by_owner(
    api: &dyn AssetLifecycleApi,
    invocation: &Invocation,
) -> ChaincodeResult<Vec<u8>> {
    check_args(invocation, ArgCount::AtLeast(1))?;
    api.query_by_owner(&invocation.args[0])
}

fn handle_query_ad_hoc(
    api: &dyn AssetLifecycleApi,
    invocation: &Invocation,
) -> ChaincodeResult<Vec<u8>> {
    check_args(invocation, ArgCount::AtLeast(1))?;
    api.query_ad_hoc(&invocation.args[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ChaincodeError;

    /// Echoes its arguments back as the payload.
    struct EchoApi;

    impl AssetLifecycleApi for EchoApi {
        fn create(&self, _input: CreateAssetInput) -> ChaincodeResult<()> {
            Ok(())
        }
        fn read(&self, name: &str) -> ChaincodeResult<Vec<u8>> {
            Ok(name.as_bytes().to_vec())
        }
        fn read_confidential_details(&self, name: &str) -> ChaincodeResult<Vec<u8>> {
            Ok(name.as_bytes().to_vec())
        }
        fn transfer(&self, _input: TransferAssetInput) -> ChaincodeResult<()> {
            Ok(())
        }
        fn delete(&self, _input: DeleteAssetInput) -> ChaincodeResult<()> {
            Ok(())
        }
        fn range_by_name(&self, start_key: &str, end_key: &str) -> ChaincodeResult<Vec<u8>> {
            Ok(format!("{start_key}..{end_key}").into_bytes())
        }
        fn query_by_owner(&self, owner: &str) -> ChaincodeResult<Vec<u8>> {
            Ok(owner.as_bytes().to_vec())
        }
        fn query_ad_hoc(&self, selector: &str) -> ChaincodeResult<Vec<u8>> {
            Ok(selector.as_bytes().to_vec())
        }
    }

    fn call(name: &str, args: &[&str]) -> ChaincodeResult<Vec<u8>> {
        let registry = FunctionRegistry::standard();
        let handler = registry.lookup(name).unwrap();
        handler(&EchoApi, &Invocation::new(name, args.iter().copied()))
    }

    #[test]
    fn test_standard_registry_names() {
        let registry = FunctionRegistry::standard();
        assert_eq!(registry.len(), 8);
        assert_eq!(
            registry.function_names(),
            vec![
                "create",
                "delete",
                "queryAdHoc",
                "queryByOwner",
                "rangeByName",
                "read",
                "readConfidentialDetails",
                "transfer",
            ]
        );
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = FunctionRegistry::standard();
        assert!(registry.lookup("read").is_some());
        assert!(registry.lookup("Read").is_none());
        assert!(registry.lookup("").is_none());
    }

    #[test]
    fn test_read_requires_exactly_one_arg() {
        assert_eq!(call("read", &["Asset1"]).unwrap(), b"Asset1");
        for args in [&[] as &[&str], &["a", "b"]] {
            let err = call("read", args).unwrap_err();
            assert!(matches!(
                err,
                ChaincodeError::Input(InputError::IncorrectArgumentCount {
                    expected: ArgCount::Exactly(1),
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_query_functions_ignore_extra_args() {
        assert_eq!(call("rangeByName", &["a", "b", "c"]).unwrap(), b"a..b");
        assert_eq!(call("queryByOwner", &["tom", "x"]).unwrap(), b"tom");
        assert!(call("rangeByName", &["a"]).is_err());
        assert!(call("queryAdHoc", &[]).is_err());
    }

    #[test]
    fn test_mutating_functions_reject_positional_args() {
        let err = call("delete", &["Asset1"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "incorrect number of arguments for delete: expecting 0, got 1"
        );
    }

    #[test]
    fn test_mutating_functions_need_transient_input() {
        let err = call("create", &[]).unwrap_err();
        assert_eq!(
            err,
            ChaincodeError::Input(InputError::MissingConfidentialKey("asset".to_string()))
        );
    }
}
