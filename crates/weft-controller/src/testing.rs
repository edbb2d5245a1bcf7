//! In-memory controller double shared by this crate's unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use serde_json::Value;

use weft_common::error::{Result, WeftError};

use crate::resources::{Fqn, Interface, Resource, Workload};
use crate::session::{ControllerApi, Lookup};

/// Fake controller backed by a map of JSON snapshots.
///
/// Mimics the behaviors the provisioning code relies on: UUID assignment on
/// create, address allocation for interfaces, and interface back-reference
/// synthesis on workload reads.
#[derive(Debug, Default)]
pub struct FakeSession {
    store: RefCell<HashMap<(&'static str, String), Value>>,
    creates: Cell<usize>,
    next_addr: Cell<u8>,
    poisoned: Cell<bool>,
}

impl FakeSession {
    /// Number of create calls issued so far.
    pub fn creates(&self) -> usize {
        self.creates.get()
    }

    /// Makes every subsequent call fail, simulating a controller outage.
    pub fn poison(&self) {
        self.poisoned.set(true);
    }

    /// True when a resource of the given kind and name is stored.
    pub fn contains(&self, kind: &'static str, fqn: &Fqn) -> bool {
        self.store.borrow().contains_key(&(kind, fqn.to_string()))
    }

    fn check_poison(&self) -> Result<()> {
        if self.poisoned.get() {
            return Err(WeftError::Api {
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    fn back_refs_for(&self, fqn: &Fqn) -> Vec<Value> {
        let workload_ref = serde_json::json!(fqn);
        self.store
            .borrow()
            .iter()
            .filter(|((kind, _), value)| {
                *kind == Interface::KIND && value["workload_ref"] == workload_ref
            })
            .map(|(_, value)| {
                serde_json::json!({ "uuid": value["uuid"], "to": value["fq_name"] })
            })
            .collect()
    }
}

impl ControllerApi for FakeSession {
    fn read<R: Resource>(&self, fqn: &Fqn) -> Result<Lookup<R>> {
        self.check_poison()?;
        let Some(mut value) = self
            .store
            .borrow()
            .get(&(R::KIND, fqn.to_string()))
            .cloned()
        else {
            return Ok(Lookup::Missing);
        };
        if R::KIND == Workload::KIND {
            value["interface_back_refs"] = Value::Array(self.back_refs_for(fqn));
        }
        Ok(Lookup::Found(serde_json::from_value(value)?))
    }

    fn read_by_uuid<R: Resource>(&self, uuid: &str) -> Result<Lookup<R>> {
        self.check_poison()?;
        let entry = self
            .store
            .borrow()
            .iter()
            .find(|((kind, _), value)| *kind == R::KIND && value["uuid"] == uuid)
            .map(|(_, value)| value.clone());
        match entry {
            Some(value) => Ok(Lookup::Found(serde_json::from_value(value)?)),
            None => Ok(Lookup::Missing),
        }
    }

    fn create<R: Resource>(&self, resource: &R) -> Result<R> {
        self.check_poison()?;
        let mut value = serde_json::to_value(resource)?;
        value["uuid"] = Value::String(uuid::Uuid::new_v4().to_string());
        if R::KIND == Interface::KIND {
            let host = self.next_addr.get().wrapping_add(2);
            self.next_addr.set(host);
            value["addresses"] =
                serde_json::json!([{ "ip": format!("10.0.0.{host}"), "prefix_len": 8 }]);
        }
        self.creates.set(self.creates.get() + 1);
        let _ = self
            .store
            .borrow_mut()
            .insert((R::KIND, resource.fq_name().to_string()), value.clone());
        Ok(serde_json::from_value(value)?)
    }

    fn delete<R: Resource>(&self, uuid: &str) -> Result<()> {
        self.check_poison()?;
        self.store
            .borrow_mut()
            .retain(|(kind, _), value| *kind != R::KIND || value["uuid"] != uuid);
        Ok(())
    }
}
