//! # Device Registry
//!
//! Ordered list of stations. Insertion order is display order.
//!
//! The registry knows nothing about sessions. The busy invariant is
//! enforced one level up, in `AppState`, which owns both the registry
//! and the session table.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{Device, DeviceId, DeviceStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeviceRegistry(Vec<Device>);

impl Default for DeviceRegistry {
    /// Four available stations, `PS-1` … `PS-4`.
    fn default() -> Self {
        DeviceRegistry((1..=crate::DEFAULT_DEVICE_COUNT).map(Device::new).collect())
    }
}

impl DeviceRegistry {
    pub fn new(devices: Vec<Device>) -> Self {
        DeviceRegistry(devices)
    }

    pub fn empty() -> Self {
        DeviceRegistry(Vec::new())
    }

    pub fn as_slice(&self) -> &[Device] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: DeviceId) -> Option<&Device> {
        self.0.iter().find(|d| d.id == id)
    }

    pub fn contains(&self, id: DeviceId) -> bool {
        self.get(id).is_some()
    }

    /// Looks up a device or fails with `DeviceNotFound`.
    pub fn require(&self, id: DeviceId) -> CoreResult<&Device> {
        self.get(id).ok_or(CoreError::DeviceNotFound(id))
    }

    /// Id the next `add` will assign: max existing id + 1, or 1.
    ///
    /// Fails with `DeviceIdsExhausted` once a stored id is `DeviceId::MAX`.
    pub fn next_id(&self) -> CoreResult<DeviceId> {
        match self.0.iter().map(|d| d.id).max() {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or(CoreError::DeviceIdsExhausted),
        }
    }

    /// Appends a new available device and returns it.
    pub fn add(&mut self) -> CoreResult<&Device> {
        let device = Device::new(self.next_id()?);
        self.0.push(device);
        Ok(&self.0[self.0.len() - 1])
    }

    /// Removes a device. Busy devices cannot be removed.
    pub fn remove(&mut self, id: DeviceId) -> CoreResult<Device> {
        let index = self
            .0
            .iter()
            .position(|d| d.id == id)
            .ok_or(CoreError::DeviceNotFound(id))?;

        if self.0[index].is_busy() {
            return Err(CoreError::DeviceBusy(id));
        }

        Ok(self.0.remove(index))
    }

    /// Sets a status without any rule checks. Returns the previous status.
    pub(crate) fn set_status(
        &mut self,
        id: DeviceId,
        status: DeviceStatus,
    ) -> CoreResult<DeviceStatus> {
        let device = self
            .0
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(CoreError::DeviceNotFound(id))?;
        Ok(std::mem::replace(&mut device.status, status))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Device> {
        self.0.iter_mut()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_after_max_id_is_rejected() {
        let mut registry = DeviceRegistry::new(vec![Device::new(2), Device::new(DeviceId::MAX)]);
        assert!(matches!(registry.next_id(), Err(CoreError::DeviceIdsExhausted)));
        assert!(matches!(registry.add(), Err(CoreError::DeviceIdsExhausted)));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_add_to_empty_starts_at_one() {
        let mut registry = DeviceRegistry::empty();
        assert_eq!(registry.add().unwrap().id, 1);
        assert_eq!(registry.add().unwrap().id, 2);
    }

    #[test]
    fn test_add_uses_max_plus_one_not_len() {
        let mut registry = DeviceRegistry::new(vec![Device::new(3), Device::new(9)]);
        let added = registry.add().unwrap();
        assert_eq!(added.id, 10);
        assert_eq!(added.name, "PS-10");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_remove_busy_rejected() {
        let mut registry = DeviceRegistry::default();
        registry.set_status(2, DeviceStatus::Busy).unwrap();

        assert!(matches!(registry.remove(2), Err(CoreError::DeviceBusy(2))));
        assert!(registry.contains(2));

        let removed = registry.remove(3).unwrap();
        assert_eq!(removed.id, 3);
        assert!(!registry.contains(3));
    }

    #[test]
    fn test_remove_unknown() {
        let mut registry = DeviceRegistry::default();
        assert!(matches!(registry.remove(99), Err(CoreError::DeviceNotFound(99))));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut registry = DeviceRegistry::default();
        registry.remove(2).unwrap();
        let ids: Vec<_> = registry.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        // The gap is not reused
        assert_eq!(registry.next_id().unwrap(), 5);
    }
}
