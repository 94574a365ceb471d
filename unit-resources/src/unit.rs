// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Storage-agnostic interface to compiled units and their resources. */

use {
    crate::ResourceResult,
    std::{
        fmt::{Debug, Formatter},
        io::{Read, Seek},
    },
};

/// A readable, seekable resource content stream.
///
/// Handles are independently positioned: reading one never affects
/// another, even when both expose the same resource.
pub trait ResourceRead: Read + Seek {}

impl<T: Read + Seek> ResourceRead for T {}

/// A compiled binary unit carrying embedded resources.
///
/// Implementations supply the listing and access primitives for one
/// storage mechanism; the query layer provides filtering and projection
/// on top. Resources form a flat namespace: a name is an opaque key
/// with no directory semantics.
pub trait CompiledUnit {
    /// Name identifying this unit in diagnostics and errors.
    fn unit_name(&self) -> &str;

    /// Names of every resource in this unit, in listing order.
    ///
    /// Listing order is stable for a given unit. Errors with
    /// [crate::Error::InvalidUnit] when a listing cannot be produced.
    fn resource_names(&self) -> ResourceResult<Vec<String>>;

    /// Open a fresh read handle on the resource with exactly this name.
    ///
    /// Errors with [crate::Error::ResourceNotFound] when the unit has no
    /// resource of that name.
    fn open_resource(&self, name: &str) -> ResourceResult<Box<dyn ResourceRead + '_>>;
}

/// Describes a single resource within a compiled unit.
///
/// Descriptors are cheap handles: they hold the resource name and a
/// reference to its unit, not the content. Content is obtained on
/// demand via [ResourceDescriptor::open] and the read helpers.
#[derive(Clone)]
pub struct ResourceDescriptor<'a> {
    unit: &'a dyn CompiledUnit,
    name: String,
}

impl<'a> Debug for ResourceDescriptor<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceDescriptor")
            .field("unit", &self.unit.unit_name())
            .field("name", &self.name)
            .finish()
    }
}

impl<'a> ResourceDescriptor<'a> {
    pub(crate) fn new(unit: &'a dyn CompiledUnit, name: String) -> Self {
        Self { unit, name }
    }

    /// The resource name within its unit.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name of the unit the resource belongs to.
    pub fn unit_name(&self) -> &str {
        self.unit.unit_name()
    }

    /// Open a fresh content stream positioned at the start.
    ///
    /// Every call returns an independent handle.
    pub fn open(&self) -> ResourceResult<Box<dyn ResourceRead + 'a>> {
        self.unit.open_resource(&self.name)
    }

    /// Read the full content bytes.
    pub fn read_bytes(&self) -> ResourceResult<Vec<u8>> {
        let mut reader = self.open()?;

        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;

        Ok(data)
    }

    /// Read the full content decoded as text.
    pub fn read_string(&self) -> ResourceResult<String> {
        let data = self.read_bytes()?;

        crate::decode_text(self.unit.unit_name(), &self.name, &data)
    }
}
