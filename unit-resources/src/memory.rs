// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Compiled unit backed by in-memory buffers. */

use {
    crate::{
        unit::{CompiledUnit, ResourceRead},
        Error, ResourceResult,
    },
    std::io::Cursor,
};

/// A compiled unit whose resources live in memory.
///
/// Resources are stored in insertion order and listed in that order.
/// Mostly useful for tests and for programs that synthesize resources
/// at run time.
#[derive(Clone, Debug, Default)]
pub struct MemoryUnit {
    name: String,
    resources: Vec<(String, Vec<u8>)>,
}

impl MemoryUnit {
    /// Create an empty unit with the given name.
    pub fn new(name: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            resources: vec![],
        }
    }

    /// Register a resource.
    ///
    /// If a resource with this name already exists, its content is
    /// replaced and its listing position retained.
    pub fn add_resource(&mut self, name: impl ToString, data: impl Into<Vec<u8>>) {
        let name = name.to_string();
        let data = data.into();

        if let Some(entry) = self.resources.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = data;
        } else {
            self.resources.push((name, data));
        }
    }

    /// Number of registered resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl CompiledUnit for MemoryUnit {
    fn unit_name(&self) -> &str {
        &self.name
    }

    fn resource_names(&self) -> ResourceResult<Vec<String>> {
        Ok(self.resources.iter().map(|(name, _)| name.clone()).collect())
    }

    fn open_resource(&self, name: &str) -> ResourceResult<Box<dyn ResourceRead + '_>> {
        self.resources
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| Box::new(Cursor::new(data.as_slice())) as Box<dyn ResourceRead>)
            .ok_or_else(|| Error::ResourceNotFound {
                unit: self.name.clone(),
                name: name.to_string(),
            })
    }
}
