//! Livestock registry state-transition engine
//!
//! Holds every record, the per-owner index and the set-once authority.
//! Mutations take `&mut self` and either apply all of their effects or none;
//! see [`crate::SharedRegistry`] for hosting behind concurrent callers.

use crate::config::RegistryConfig;
use crate::errors::*;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

/// Livestock Registry
///
/// Records are keyed by their content hash and never removed. Every record's
/// hash appears in exactly one owner index entry: the one for its `owner`.
#[derive(Debug, Clone)]
pub struct LivestockRegistry {
    config: RegistryConfig,
    /// Next record id; equal to the number of records ever registered
    counter: u64,
    /// Set once, never cleared
    authority: Option<Principal>,
    /// Hash → record mapping
    records: HashMap<RecordHash, LivestockRecord>,
    /// Owner → hashes in acquisition order
    owner_index: HashMap<Principal, Vec<RecordHash>>,
}

/// Point-in-time copy of the registry state, ordered for stable output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub count: u64,
    pub max_records: u64,
    pub authority: Option<Principal>,
    pub records: BTreeMap<RecordHash, LivestockRecord>,
    pub owners: BTreeMap<Principal, Vec<RecordHash>>,
}

impl LivestockRegistry {
    /// Create a registry with default limits
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            counter: 0,
            authority: None,
            records: HashMap::new(),
            owner_index: HashMap::new(),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Configure the authority contract. Succeeds at most once.
    pub fn set_authority(&mut self, principal: Principal) -> Result<bool> {
        if principal.as_str().is_empty() {
            return reject(
                "set_authority",
                RegistryError::unauthorized("authority principal must not be empty"),
            );
        }

        if self.config.is_burn(&principal) {
            return reject(
                "set_authority",
                RegistryError::unauthorized("burn principal cannot be the authority"),
            );
        }

        if let Some(current) = &self.authority {
            let err = RegistryError::AuthorityAlreadySet {
                current: current.to_string(),
            };
            return reject("set_authority", err);
        }

        info!(authority = %principal, "authority contract set");
        self.authority = Some(principal);
        Ok(true)
    }

    /// Register a new animal owned by the caller and return its id
    pub fn register(
        &mut self,
        registration: LivestockRegistration,
        ctx: &CallContext,
    ) -> Result<u64> {
        if let Err(err) = self.validate_registration(&registration, ctx) {
            return reject("register", err);
        }

        let LivestockRegistration {
            hash,
            breed,
            birth_date,
            description,
        } = registration;

        let id = self.counter;
        let record = LivestockRecord {
            breed,
            birth_date,
            description,
            owner: ctx.caller.clone(),
            is_active: true,
        };

        self.records.insert(hash.clone(), record);
        self.owner_index
            .entry(ctx.caller.clone())
            .or_default()
            .push(hash.clone());
        self.counter += 1;

        info!(
            id,
            hash = %hash,
            owner = %ctx.caller,
            height = ctx.block_height,
            "livestock registered"
        );
        Ok(id)
    }

    /// Checks run in a fixed order and stop at the first failure. The owner
    /// capacity check runs last but still precedes any mutation.
    fn validate_registration(
        &self,
        registration: &LivestockRegistration,
        ctx: &CallContext,
    ) -> Result<()> {
        if self.counter >= self.config.max_records {
            return Err(RegistryError::MaxExceeded {
                what: "records",
                limit: self.config.max_records,
            });
        }

        if registration.hash.is_empty() {
            return Err(RegistryError::InvalidHash);
        }

        let breed_len = text_len(&registration.breed);
        if breed_len == 0 || breed_len > self.config.max_breed_len {
            return Err(RegistryError::InvalidBreed {
                len: breed_len,
                max: self.config.max_breed_len,
            });
        }

        if registration.birth_date > ctx.block_height {
            return Err(RegistryError::InvalidDate {
                birth_date: registration.birth_date,
                current_height: ctx.block_height,
            });
        }

        let description_len = text_len(&registration.description);
        if description_len > self.config.max_description_len {
            return Err(RegistryError::InvalidDescription {
                len: description_len,
                max: self.config.max_description_len,
            });
        }

        if self.records.contains_key(&registration.hash) {
            return Err(RegistryError::HashExists {
                hash: registration.hash.to_string(),
            });
        }

        if self.authority.is_none() {
            return Err(RegistryError::AuthorityNotSet);
        }

        self.ensure_owner_capacity(&ctx.caller)
    }

    /// Activate or deactivate a record. Only the owner may do this.
    pub fn update_status(
        &mut self,
        hash: &RecordHash,
        is_active: bool,
        ctx: &CallContext,
    ) -> Result<bool> {
        let Some(record) = self.records.get_mut(hash) else {
            return reject(
                "update_status",
                RegistryError::NotFound {
                    hash: hash.to_string(),
                },
            );
        };

        if record.owner != ctx.caller {
            return reject(
                "update_status",
                RegistryError::unauthorized(format!("{} does not own {}", ctx.caller, hash)),
            );
        }

        record.is_active = is_active;
        debug!(hash = %hash, is_active, "livestock status updated");
        Ok(true)
    }

    /// Move custody of an active record from the caller to `new_owner`
    pub fn transfer(
        &mut self,
        hash: &RecordHash,
        new_owner: Principal,
        ctx: &CallContext,
    ) -> Result<bool> {
        if let Err(err) = self.validate_transfer(hash, &new_owner, ctx) {
            return reject("transfer", err);
        }

        if let Some(list) = self.owner_index.get_mut(&ctx.caller) {
            list.retain(|h| h != hash);
        }
        self.owner_index
            .entry(new_owner.clone())
            .or_default()
            .push(hash.clone());
        if let Some(record) = self.records.get_mut(hash) {
            record.owner = new_owner.clone();
        }

        info!(hash = %hash, from = %ctx.caller, to = %new_owner, "livestock transferred");
        Ok(true)
    }

    fn validate_transfer(
        &self,
        hash: &RecordHash,
        new_owner: &Principal,
        ctx: &CallContext,
    ) -> Result<()> {
        let record = self.records.get(hash).ok_or_else(|| RegistryError::NotFound {
            hash: hash.to_string(),
        })?;

        if record.owner != ctx.caller {
            return Err(RegistryError::unauthorized(format!(
                "{} does not own {}",
                ctx.caller, hash
            )));
        }

        if !record.is_active {
            return Err(RegistryError::Inactive {
                hash: hash.to_string(),
            });
        }

        if self.config.is_burn(new_owner) {
            return Err(RegistryError::unauthorized(
                "cannot transfer to the burn principal",
            ));
        }

        self.ensure_owner_capacity(new_owner)
    }

    fn ensure_owner_capacity(&self, owner: &Principal) -> Result<()> {
        let held = self.owner_index.get(owner).map_or(0, Vec::len);
        if held >= self.config.max_records_per_owner {
            return Err(RegistryError::MaxExceeded {
                what: "records per owner",
                limit: self.config.max_records_per_owner as u64,
            });
        }
        Ok(())
    }

    /// Fetch a record by hash
    pub fn get_record(&self, hash: &RecordHash) -> Option<LivestockRecord> {
        self.records.get(hash).cloned()
    }

    /// List the hashes an owner currently holds, oldest first
    pub fn get_by_owner(&self, owner: &Principal) -> Vec<RecordHash> {
        self.owner_index.get(owner).cloned().unwrap_or_default()
    }

    pub fn get_count(&self) -> u64 {
        self.counter
    }

    pub fn is_registered(&self, hash: &RecordHash) -> bool {
        self.records.contains_key(hash)
    }

    pub fn authority(&self) -> Option<&Principal> {
        self.authority.as_ref()
    }

    pub fn max_records(&self) -> u64 {
        self.config.max_records
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            count: self.counter,
            max_records: self.config.max_records,
            authority: self.authority.clone(),
            records: self
                .records
                .iter()
                .map(|(hash, record)| (hash.clone(), record.clone()))
                .collect(),
            owners: self
                .owner_index
                .iter()
                .filter(|(_, hashes)| !hashes.is_empty())
                .map(|(owner, hashes)| (owner.clone(), hashes.clone()))
                .collect(),
        }
    }
}

fn reject<T>(operation: &'static str, err: RegistryError) -> Result<T> {
    warn!(operation, code = err.code(), error = %err, "registry operation rejected");
    Err(err)
}

impl Default for LivestockRegistry {
    fn default() -> Self {
        Self::new()
    }
}
