//! Field validation shared by the store and by callers that want to reject
//! bad input before issuing any command

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::model::GroupDevice;

/// Check a group name and return it trimmed
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Check that a device list is non-empty and has no repeated ids
pub fn validate_devices(devices: &[GroupDevice]) -> Result<(), ValidationError> {
    if devices.is_empty() {
        return Err(ValidationError::NoDevices);
    }

    let mut seen = HashSet::with_capacity(devices.len());
    for device in devices {
        if !seen.insert(&device.id) {
            return Err(ValidationError::DuplicateDevice(device.id.clone()));
        }
    }
    Ok(())
}

/// Check an active-slot index against a device count
pub fn validate_index(index: usize, len: usize) -> Result<(), ValidationError> {
    if index >= len {
        return Err(ValidationError::IndexOutOfRange { index, len });
    }
    Ok(())
}

/// Name and device checks together; returns the trimmed name
pub fn validate_group(name: &str, devices: &[GroupDevice]) -> Result<String, ValidationError> {
    let name = validate_name(name)?;
    validate_devices(devices)?;
    Ok(name)
}
