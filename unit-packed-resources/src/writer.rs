// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Serializing of resources into packed resources data blobs. */

use {
    crate::{
        resource::PackedResource,
        serialization::{BlobSectionField, ResourceField, HEADER_V1},
    },
    anyhow::{Context, Result},
    byteorder::{LittleEndian, WriteBytesExt},
    std::io::Write,
};

/// Compute the length of the version 1 index entry for a resource.
fn index_entry_length(resource: &PackedResource) -> usize {
    // Start of entry, name field, name length, end of entry.
    let mut index = 1 + 1 + 2 + 1;

    if !resource.data.is_empty() {
        // Data field + its length.
        index += 1 + 8;
    }

    index
}

/// Write the version 1 index entry for a resource.
fn write_index_entry<W: Write>(resource: &PackedResource, dest: &mut W) -> Result<()> {
    let name_len = u16::try_from(resource.name.as_bytes().len())
        .context("converting resource name length to u16")?;

    dest.write_u8(ResourceField::StartOfEntry.into())
        .context("writing start of index entry")?;

    dest.write_u8(ResourceField::Name.into())
        .context("writing resource name field")?;
    dest.write_u16::<LittleEndian>(name_len)
        .context("writing resource name length")?;

    if !resource.data.is_empty() {
        dest.write_u8(ResourceField::Data.into())
            .context("writing resource data field")?;
        dest.write_u64::<LittleEndian>(resource.data.len() as u64)
            .context("writing resource data length")?;
    }

    dest.write_u8(ResourceField::EndOfEntry.into())
        .context("writing end of index entry")?;

    Ok(())
}

/// Write a packed resources blob, version 1.
///
/// Resources are written in slice order. The index describing them is
/// followed by blob data grouped by field: all names, then all content
/// bytes. A resource with empty content has no data field in its index
/// entry; parsing restores it as an empty blob.
pub fn write_resource_pack_v1<W: Write>(
    resources: &[PackedResource],
    dest: &mut W,
) -> Result<()> {
    let mut names_payload_length: usize = 0;
    let mut data_payload_length: usize = 0;

    // 1 for end of index field.
    let mut resources_index_length = 1;

    for resource in resources {
        names_payload_length += resource.name.as_bytes().len();
        data_payload_length += resource.data.len();
        resources_index_length += index_entry_length(resource);
    }

    let mut blob_sections = Vec::new();
    if !resources.is_empty() {
        blob_sections.push((ResourceField::Name, names_payload_length));
    }
    if data_payload_length > 0 {
        blob_sections.push((ResourceField::Data, data_payload_length));
    }

    // Start of entry, field type and its value, payload length field and
    // its value, end of entry.
    let blob_section_entry_length = 1 + 2 + 9 + 1;
    // 1 for end of index field.
    let blob_index_length = 1 + blob_sections.len() * blob_section_entry_length;

    dest.write_all(HEADER_V1).context("writing header")?;

    dest.write_u8(blob_sections.len() as u8)
        .context("writing blob section count")?;
    dest.write_u32::<LittleEndian>(blob_index_length as u32)
        .context("writing blob index length")?;
    dest.write_u32::<LittleEndian>(resources.len() as u32)
        .context("writing resources count")?;
    dest.write_u32::<LittleEndian>(resources_index_length as u32)
        .context("writing resources index length")?;

    // Write the blob index.
    for (field, payload_length) in &blob_sections {
        dest.write_u8(BlobSectionField::StartOfEntry.into())
            .context("writing start of blob index entry")?;
        dest.write_u8(BlobSectionField::ResourceFieldType.into())
            .context("writing resource field type field")?;
        dest.write_u8((*field).into())
            .context("writing resource field type value")?;
        dest.write_u8(BlobSectionField::RawPayloadLength.into())
            .context("writing raw payload length field")?;
        dest.write_u64::<LittleEndian>(*payload_length as u64)
            .context("writing raw payload length")?;
        dest.write_u8(BlobSectionField::EndOfEntry.into())
            .context("writing end of blob index entry")?;
    }
    dest.write_u8(BlobSectionField::EndOfIndex.into())
        .context("writing end of blob index")?;

    // Write the resources index.
    for resource in resources {
        write_index_entry(resource, dest)?;
    }
    dest.write_u8(ResourceField::EndOfIndex.into())
        .context("writing end of resources index")?;

    // Write blob data, one field at a time.
    for resource in resources {
        dest.write_all(resource.name.as_bytes())
            .context("writing resource name")?;
    }

    for resource in resources {
        if !resource.data.is_empty() {
            dest.write_all(&resource.data)
                .context("writing resource data")?;
        }
    }

    Ok(())
}
