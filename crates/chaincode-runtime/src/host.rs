//! # Chaincode Host
//!
//! Runs invocations the way an endorsing peer would: each one gets a fresh
//! [`TxSimulator`] over the shared ledger, and its write set is committed
//! only when the chaincode answers with status 200. A failed invocation
//! therefore leaves no partial writes, even when it failed between the
//! public and private writes of `create` or `delete`.

use crate::config::HostConfig;
use crate::wire::{InvocationReply, InvocationRequest};
use asset_chaincode::adapters::{InMemoryLedger, TxSimulator};
use asset_chaincode::handler::{Chaincode, Invocation, Response};
use ledger_telemetry::invocation_span;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Outcome of one hosted invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub tx_id: Uuid,
    pub response: Response,
    pub committed_writes: usize,
}

impl From<Execution> for InvocationReply {
    fn from(execution: Execution) -> Self {
        InvocationReply::new(
            execution.tx_id,
            execution.response,
            execution.committed_writes,
        )
    }
}

/// Chaincode plus the ledger it commits to.
pub struct ChaincodeHost {
    chaincode: Chaincode,
    ledger: Arc<InMemoryLedger>,
}

impl ChaincodeHost {
    pub fn new(config: &HostConfig) -> Self {
        Self::with_ledger(
            config,
            Arc::new(InMemoryLedger::with_state_database(config.state_db)),
        )
    }

    pub fn with_ledger(config: &HostConfig, ledger: Arc<InMemoryLedger>) -> Self {
        Self {
            chaincode: Chaincode::new(config.chaincode.clone()),
            ledger,
        }
    }

    pub fn ledger(&self) -> &Arc<InMemoryLedger> {
        &self.ledger
    }

    /// Run the chaincode's instantiation hook.
    pub fn init(&self) -> Response {
        info!(state_db = %self.ledger.state_database(), "Instantiating chaincode");
        self.chaincode.init()
    }

    /// Simulate one invocation and commit its write set on success.
    pub fn execute(&self, invocation: &Invocation) -> Execution {
        let tx_id = Uuid::new_v4();
        let span = invocation_span!(tx_id, invocation.function);
        let _entered = span.enter();

        let simulator = TxSimulator::new(&self.ledger);
        let response = self.chaincode.invoke(&simulator, invocation);

        if !response.is_success() {
            simulator.discard();
            return Execution {
                tx_id,
                response,
                committed_writes: 0,
            };
        }

        match simulator.commit() {
            Ok(committed_writes) => {
                info!(committed_writes, "Transaction committed");
                Execution {
                    tx_id,
                    response,
                    committed_writes,
                }
            }
            Err(e) => {
                error!(error = %e, "Commit failed");
                Execution {
                    tx_id,
                    response: Response::error(format!("commit failed: {e}")),
                    committed_writes: 0,
                }
            }
        }
    }

    /// Handle one protocol line. Undecodable requests get a 500 reply.
    pub fn handle_line(&self, line: &str) -> InvocationReply {
        let invocation =
            InvocationRequest::parse(line).and_then(InvocationRequest::into_invocation);
        match invocation {
            Ok(invocation) => self.execute(&invocation).into(),
            Err(e) => {
                warn!(error = %e, "Rejected request");
                InvocationReply::new(Uuid::new_v4(), Response::error(e.to_string()), 0)
            }
        }
    }
}
