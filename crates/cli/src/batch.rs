//! Batch transaction replay
//!
//! A batch is a JSON array of operations applied in order to one registry.
//! Mutating operations carry the acting `caller` and an optional block
//! `height`; heights may not decrease within a batch.

use anyhow::{bail, Result};
use livestock_registry::{
    CallContext, LivestockRegistration, LivestockRegistry, Principal, RecordHash, RegistryError,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// One operation in a batch file
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BatchOp {
    SetAuthority {
        principal: String,
    },
    Register {
        caller: String,
        height: Option<u64>,
        hash: String,
        breed: String,
        birth_date: u64,
        #[serde(default)]
        description: String,
    },
    UpdateStatus {
        caller: String,
        height: Option<u64>,
        hash: String,
        is_active: bool,
    },
    Transfer {
        caller: String,
        height: Option<u64>,
        hash: String,
        new_owner: String,
    },
    GetRecord {
        hash: String,
    },
    GetByOwner {
        owner: String,
    },
    GetCount,
    IsRegistered {
        hash: String,
    },
}

/// Outcome of one operation, as printed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchOutcome {
    Ok { ok: bool, value: Value },
    Err { ok: bool, code: u32, error: String },
}

impl BatchOutcome {
    fn ok(value: Value) -> Self {
        BatchOutcome::Ok { ok: true, value }
    }

    fn from_result<T: Serialize>(result: livestock_registry::Result<T>) -> Self {
        match result {
            Ok(value) => Self::ok(json!(value)),
            Err(err) => Self::rejected(&err),
        }
    }

    fn rejected(err: &RegistryError) -> Self {
        BatchOutcome::Err {
            ok: false,
            code: err.code(),
            error: err.to_string(),
        }
    }
}

/// Drives a registry with a non-decreasing block height
pub struct BatchRunner {
    registry: LivestockRegistry,
    height: u64,
}

impl BatchRunner {
    pub fn new(registry: LivestockRegistry, start_height: u64) -> Self {
        Self {
            registry,
            height: start_height,
        }
    }

    pub fn registry(&self) -> &LivestockRegistry {
        &self.registry
    }

    pub fn run(&mut self, ops: Vec<BatchOp>) -> Result<Vec<BatchOutcome>> {
        ops.into_iter()
            .enumerate()
            .map(|(index, op)| {
                debug!(index, ?op, "applying batch operation");
                self.apply(op)
            })
            .collect()
    }

    fn context(&mut self, caller: String, height: Option<u64>) -> Result<CallContext> {
        if let Some(height) = height {
            if height < self.height {
                bail!(
                    "block height went backwards: {} after {}",
                    height,
                    self.height
                );
            }
            self.height = height;
        }
        Ok(CallContext::new(caller, self.height))
    }

    pub fn apply(&mut self, op: BatchOp) -> Result<BatchOutcome> {
        let outcome = match op {
            BatchOp::SetAuthority { principal } => {
                BatchOutcome::from_result(self.registry.set_authority(Principal::new(principal)))
            }
            BatchOp::Register {
                caller,
                height,
                hash,
                breed,
                birth_date,
                description,
            } => {
                let ctx = self.context(caller, height)?;
                let registration =
                    LivestockRegistration::new(hash, breed, birth_date, description);
                BatchOutcome::from_result(self.registry.register(registration, &ctx))
            }
            BatchOp::UpdateStatus {
                caller,
                height,
                hash,
                is_active,
            } => {
                let ctx = self.context(caller, height)?;
                BatchOutcome::from_result(self.registry.update_status(
                    &RecordHash::new(hash),
                    is_active,
                    &ctx,
                ))
            }
            BatchOp::Transfer {
                caller,
                height,
                hash,
                new_owner,
            } => {
                let ctx = self.context(caller, height)?;
                BatchOutcome::from_result(self.registry.transfer(
                    &RecordHash::new(hash),
                    Principal::new(new_owner),
                    &ctx,
                ))
            }
            BatchOp::GetRecord { hash } => {
                BatchOutcome::ok(json!(self.registry.get_record(&RecordHash::new(hash))))
            }
            BatchOp::GetByOwner { owner } => {
                BatchOutcome::ok(json!(self.registry.get_by_owner(&Principal::new(owner))))
            }
            BatchOp::GetCount => BatchOutcome::ok(json!(self.registry.get_count())),
            BatchOp::IsRegistered { hash } => {
                BatchOutcome::ok(json!(self.registry.is_registered(&RecordHash::new(hash))))
            }
        };
        Ok(outcome)
    }
}
