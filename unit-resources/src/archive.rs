// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Compiled unit backed by a zip archive.

Some build systems attach auxiliary resources to a compiled unit as a
zip archive sitting next to the binary instead of packing them into
the binary itself. [ArchiveUnit] reads such archives.

Archive entries are read eagerly at construction so queries never
perform I/O against the underlying file.
*/

use {
    crate::{
        unit::{CompiledUnit, ResourceRead},
        Error, ResourceResult,
    },
    log::debug,
    std::{
        fs::File,
        io::{BufReader, Cursor, Read, Seek},
        path::Path,
    },
};

/// A compiled unit whose resources come from a zip archive.
///
/// Directory entries are not resources and are skipped. File entries
/// are exposed under their archive path, in archive order. A path
/// appearing more than once yields a single resource holding the
/// content of its last entry.
#[derive(Clone, Debug)]
pub struct ArchiveUnit {
    name: String,
    resources: Vec<(String, Vec<u8>)>,
}

impl ArchiveUnit {
    /// Read a zip archive into a unit.
    ///
    /// Structural archive errors are reported as [Error::InvalidUnit];
    /// errors reading the underlying stream as [Error::Io].
    pub fn from_reader(name: impl ToString, reader: impl Read + Seek) -> ResourceResult<Self> {
        let name = name.to_string();

        let invalid = |reason: String| Error::InvalidUnit {
            unit: name.clone(),
            reason,
        };

        let mut archive = zip::ZipArchive::new(reader).map_err(|e| invalid(e.to_string()))?;

        let mut resources = Vec::new();

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(|e| invalid(e.to_string()))?;

            if entry.is_dir() {
                continue;
            }

            let entry_name = entry.name().to_string();

            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;

            // Repeated names keep their first listing position with the
            // content of the last entry.
            if let Some(existing) = resources.iter_mut().find(|(n, _)| *n == entry_name) {
                existing.1 = data;
            } else {
                resources.push((entry_name, data));
            }
        }

        debug!(
            "loaded archive for unit {} with {} resources",
            name,
            resources.len()
        );

        Ok(Self { name, resources })
    }

    /// Read a zip archive from the filesystem into a unit.
    pub fn from_path(name: impl ToString, path: impl AsRef<Path>) -> ResourceResult<Self> {
        let file = File::open(path.as_ref())?;

        Self::from_reader(name, BufReader::new(file))
    }

    /// Number of file entries in the archive.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl CompiledUnit for ArchiveUnit {
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
