// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Compiled unit backed by serialized resource pack data.

Resource packs are typically embedded in a binary's read-only data
segment and borrowed for the lifetime of the process. [PackedUnit]
parses the pack once at construction and serves queries from the
parsed entries without copying resource data.
*/

use {
    crate::{
        unit::{CompiledUnit, ResourceRead},
        Error, ResourceResult,
    },
    log::debug,
    std::io::Cursor,
    unit_packed_resources::{load_resource_pack, PackedResource},
};

/// A compiled unit whose resources come from serialized pack data.
///
/// The pack data is borrowed, not copied. Malformed pack data is
/// rejected at construction with [Error::InvalidUnit].
#[derive(Clone, Debug)]
pub struct PackedUnit<'a> {
    name: String,
    resources: Vec<PackedResource<'a>>,
}

impl<'a> PackedUnit<'a> {
    /// Parse serialized resource pack data into a unit.
    pub fn new(name: impl ToString, data: &'a [u8]) -> ResourceResult<Self> {
        let name = name.to_string();

        let resources = load_resource_pack(data)
            .and_then(|iter| iter.collect::<Result<Vec<_>, &'static str>>())
            .map_err(|reason| Error::InvalidUnit {
                unit: name.clone(),
                reason: reason.to_string(),
            })?;

        debug!(
            "loaded resource pack for unit {} with {} resources",
            name,
            resources.len()
        );

        Ok(Self { name, resources })
    }

    /// Number of resources in the pack.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl<'a> CompiledUnit for PackedUnit<'a> {
    fn unit_name(&self) -> &str {
        &self.name
    }

    fn resource_names(&self) -> ResourceResult<Vec<String>> {
        Ok(self
            .resources
            .iter()
            .map(|resource| resource.name.to_string())
            .collect())
    }

    fn open_resource(&self, name: &str) -> ResourceResult<Box<dyn ResourceRead + '_>> {
        self.resources
            .iter()
            .find(|resource| resource.name.as_ref() == name)
            .map(|resource| {
                Box::new(Cursor::new(resource.data.as_ref())) as Box<dyn ResourceRead>
            })
            .ok_or_else(|| Error::ResourceNotFound {
                unit: self.name.clone(),
                name: name.to_string(),
            })
    }
}
