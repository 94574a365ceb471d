// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Resolve resources out of compiled units.

[UnitResources] queries a single unit. The free functions in this
module run the same operations across several units, concatenating
per-unit results in the order the units were supplied.

Every operation resolves the unit listing afresh; nothing is cached
between calls. Filtering operations yield an empty collection when
nothing matches. Listing failures ([crate::Error::InvalidUnit]) always
propagate to the caller.
*/

use {
    crate::{
        selector::Selector,
        unit::{CompiledUnit, ResourceDescriptor, ResourceRead},
        ResourceResult,
    },
    regex::Regex,
};

/// Queryable view over the resources of a single compiled unit.
#[derive(Clone, Copy)]
pub struct UnitResources<'a> {
    unit: &'a dyn CompiledUnit,
}

impl<'a> UnitResources<'a> {
    /// Create a view over a unit.
    pub fn new(unit: &'a dyn CompiledUnit) -> Self {
        Self { unit }
    }

    /// Resolve descriptors of all resources matching a selector.
    ///
    /// Results are in listing order for [Selector::All],
    /// [Selector::NameContains], and [Selector::NameMatchesRegex]; for
    /// [Selector::NameIn] they are in pattern order then listing order,
    /// duplicates retained.
    pub fn find(&self, selector: &Selector) -> ResourceResult<Vec<ResourceDescriptor<'a>>> {
        let names = self.unit.resource_names()?;

        Ok(selector
            .select(&names)
            .into_iter()
            .map(|i| ResourceDescriptor::new(self.unit, names[i].clone()))
            .collect())
    }

    /// Resolve matching resources and decode each as text.
    pub fn find_as_strings(&self, selector: &Selector) -> ResourceResult<Vec<String>> {
        self.find(selector)?
            .iter()
            .map(|resource| resource.read_string())
            .collect()
    }

    /// Resolve matching resources and open a content stream on each.
    pub fn find_as_streams(
        &self,
        selector: &Selector,
    ) -> ResourceResult<Vec<Box<dyn ResourceRead + 'a>>> {
        self.find(selector)?
            .iter()
            .map(|resource| resource.open())
            .collect()
    }

    /// Every resource in the unit, in listing order.
    pub fn list(&self) -> ResourceResult<Vec<ResourceDescriptor<'a>>> {
        self.find(&Selector::All)
    }

    /// The text content of every resource, in listing order.
    pub fn list_as_strings(&self) -> ResourceResult<Vec<String>> {
        self.find_as_strings(&Selector::All)
    }

    /// A content stream per resource, in listing order.
    pub fn list_as_streams(&self) -> ResourceResult<Vec<Box<dyn ResourceRead + 'a>>> {
        self.find_as_streams(&Selector::All)
    }

    /// Resources whose name contains `pattern`.
    ///
    /// An empty pattern matches every resource.
    pub fn find_by_name(
        &self,
        pattern: &str,
        ignore_case: bool,
    ) -> ResourceResult<Vec<ResourceDescriptor<'a>>> {
        self.find(&Selector::NameContains {
            pattern: pattern.to_string(),
            ignore_case,
        })
    }

    /// Text content of resources whose name contains `pattern`.
    pub fn find_by_name_as_strings(
        &self,
        pattern: &str,
        ignore_case: bool,
    ) -> ResourceResult<Vec<String>> {
        self.find_as_strings(&Selector::NameContains {
            pattern: pattern.to_string(),
            ignore_case,
        })
    }

    /// Content streams of resources whose name contains `pattern`.
    pub fn find_by_name_as_streams(
        &self,
        pattern: &str,
        ignore_case: bool,
    ) -> ResourceResult<Vec<Box<dyn ResourceRead + 'a>>> {
        self.find_as_streams(&Selector::NameContains {
            pattern: pattern.to_string(),
            ignore_case,
        })
    }

    /// Resources whose name contains any of `patterns`.
    ///
    /// Evaluates [UnitResources::find_by_name] once per pattern and
    /// concatenates the results. No patterns yields no resources.
    pub fn find_by_names(
        &self,
        patterns: &[&str],
        ignore_case: bool,
    ) -> ResourceResult<Vec<ResourceDescriptor<'a>>> {
        self.find(&Selector::NameIn {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            ignore_case,
        })
    }

    /// Text content of resources whose name contains any of `patterns`.
    pub fn find_by_names_as_strings(
        &self,
        patterns: &[&str],
        ignore_case: bool,
    ) -> ResourceResult<Vec<String>> {
        self.find_as_strings(&Selector::NameIn {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            ignore_case,
        })
    }

    /// Content streams of resources whose name contains any of `patterns`.
    pub fn find_by_names_as_streams(
        &self,
        patterns: &[&str],
        ignore_case: bool,
    ) -> ResourceResult<Vec<Box<dyn ResourceRead + 'a>>> {
        self.find_as_streams(&Selector::NameIn {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            ignore_case,
        })
    }

    /// Resources whose name contains a match of the regular expression.
    pub fn find_by_regex(&self, pattern: &Regex) -> ResourceResult<Vec<ResourceDescriptor<'a>>> {
        self.find(&Selector::NameMatchesRegex(pattern.clone()))
    }

    /// Text content of resources whose name the expression matches.
    pub fn find_by_regex_as_strings(&self, pattern: &Regex) -> ResourceResult<Vec<String>> {
        self.find_as_strings(&Selector::NameMatchesRegex(pattern.clone()))
    }

    /// Content streams of resources whose name the expression matches.
    pub fn find_by_regex_as_streams(
        &self,
        pattern: &Regex,
    ) -> ResourceResult<Vec<Box<dyn ResourceRead + 'a>>> {
        self.find_as_streams(&Selector::NameMatchesRegex(pattern.clone()))
    }

    /// The text content of the resource with exactly this name.
    ///
    /// Unlike the filtering operations, the resource is required to
    /// exist: a missing name is a [crate::Error::ResourceNotFound].
    pub fn resource_string(&self, name: &str) -> ResourceResult<String> {
        ResourceDescriptor::new(self.unit, name.to_string()).read_string()
    }
}

/// Resolve descriptors matching a selector across units, in unit order.
pub fn find<'a>(
    units: &[&'a dyn CompiledUnit],
    selector: &Selector,
) -> ResourceResult<Vec<ResourceDescriptor<'a>>> {
    let mut descriptors = Vec::new();

    for unit in units {
        descriptors.extend(UnitResources::new(*unit).find(selector)?);
    }

    Ok(descriptors)
}

/// Resolve matching resources across units and decode each as text.
pub fn find_as_strings(
    units: &[&dyn CompiledUnit],
    selector: &Selector,
) -> ResourceResult<Vec<String>> {
    let mut strings = Vec::new();

    for unit in units {
        strings.extend(UnitResources::new(*unit).find_as_strings(selector)?);
    }

    Ok(strings)
}

/// Resolve matching resources across units and open a stream on each.
pub fn find_as_streams<'a>(
    units: &[&'a dyn CompiledUnit],
    selector: &Selector,
) -> ResourceResult<Vec<Box<dyn ResourceRead + 'a>>> {
    let mut streams = Vec::new();

    for unit in units {
        streams.extend(UnitResources::new(*unit).find_as_streams(selector)?);
    }

    Ok(streams)
}

/// Every resource of every unit, in unit order then listing order.
pub fn list_all<'a>(
    units: &[&'a dyn CompiledUnit],
) -> ResourceResult<Vec<ResourceDescriptor<'a>>> {
    find(units, &Selector::All)
}

/// The text content of every resource of every unit.
pub fn list_all_as_strings(units: &[&dyn CompiledUnit]) -> ResourceResult<Vec<String>> {
    find_as_strings(units, &Selector::All)
}

/// A content stream per resource of every unit.
pub fn list_all_as_streams<'a>(
    units: &[&'a dyn CompiledUnit],
) -> ResourceResult<Vec<Box<dyn ResourceRead + 'a>>> {
    find_as_streams(units, &Selector::All)
}

/// Resources across units whose name contains `pattern`.
///
/// An empty pattern matches every resource.
pub fn find_by_name<'a>(
    units: &[&'a dyn CompiledUnit],
    pattern: &str,
    ignore_case: bool,
) -> ResourceResult<Vec<ResourceDescriptor<'a>>> {
    find(
        units,
        &Selector::NameContains {
            pattern: pattern.to_string(),
            ignore_case,
        },
    )
}

/// Text content of resources across units whose name contains `pattern`.
pub fn find_by_name_as_strings(
    units: &[&dyn CompiledUnit],
    pattern: &str,
    ignore_case: bool,
) -> ResourceResult<Vec<String>> {
    find_as_strings(
        units,
        &Selector::NameContains {
            pattern: pattern.to_string(),
            ignore_case,
        },
    )
}

/// Content streams of resources across units whose name contains `pattern`.
pub fn find_by_name_as_streams<'a>(
    units: &[&'a dyn CompiledUnit],
    pattern: &str,
    ignore_case: bool,
) -> ResourceResult<Vec<Box<dyn ResourceRead + 'a>>> {
    find_as_streams(
        units,
        &Selector::NameContains {
            pattern: pattern.to_string(),
            ignore_case,
        },
    )
}

/// Resources across units whose name contains any of `patterns`.
///
/// Within each unit, results are concatenated per pattern with
/// duplicates retained, like [UnitResources::find_by_names]. No
/// patterns yields no resources.
pub fn find_by_names<'a>(
    units: &[&'a dyn CompiledUnit],
    patterns: &[&str],
    ignore_case: bool,
) -> ResourceResult<Vec<ResourceDescriptor<'a>>> {
    find(
        units,
        &Selector::NameIn {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            ignore_case,
        },
    )
}

/// Text content of resources across units whose name contains any of
/// `patterns`.
pub fn find_by_names_as_strings(
    units: &[&dyn CompiledUnit],
    patterns: &[&str],
    ignore_case: bool,
) -> ResourceResult<Vec<String>> {
    find_as_strings(
        units,
        &Selector::NameIn {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            ignore_case,
        },
    )
}

/// Content streams of resources across units whose name contains any of
/// `patterns`.
pub fn find_by_names_as_streams<'a>(
    units: &[&'a dyn CompiledUnit],
    patterns: &[&str],
    ignore_case: bool,
) -> ResourceResult<Vec<Box<dyn ResourceRead + 'a>>> {
    find_as_streams(
        units,
        &Selector::NameIn {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            ignore_case,
        },
    )
}

/// Resources across units whose name contains a match of the regular
/// expression.
pub fn find_by_regex<'a>(
    units: &[&'a dyn CompiledUnit],
    pattern: &Regex,
) -> ResourceResult<Vec<ResourceDescriptor<'a>>> {
    find(units, &Selector::NameMatchesRegex(pattern.clone()))
}

/// Text content of resources across units whose name the expression
/// matches.
pub fn find_by_regex_as_strings(
    units: &[&dyn CompiledUnit],
    pattern: &Regex,
) -> ResourceResult<Vec<String>> {
    find_as_strings(units, &Selector::NameMatchesRegex(pattern.clone()))
}

/// Content streams of resources across units whose name the expression
/// matches.
pub fn find_by_regex_as_streams<'a>(
    units: &[&'a dyn CompiledUnit],
    pattern: &Regex,
) -> ResourceResult<Vec<Box<dyn ResourceRead + 'a>>> {
    find_as_streams(units, &Selector::NameMatchesRegex(pattern.clone()))
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{memory::MemoryUnit, Error},
        std::io::Read,
    };

    fn sample_unit() -> MemoryUnit {
        let mut unit = MemoryUnit::new("sample");
        unit.add_resource("a.txt", &b"alpha"[..]);
        unit.add_resource("b.txt", &b"bravo"[..]);
        unit.add_resource("ab.txt", &b"alpha bravo"[..]);
        unit
    }

    /// A unit whose listing always fails.
    struct BrokenUnit;

    impl CompiledUnit for BrokenUnit {
        fn unit_name(&self) -> &str {
            "broken"
        }

        fn resource_names(&self) -> ResourceResult<Vec<String>> {
            Err(Error::InvalidUnit {
                unit: "broken".to_string(),
                reason: "listing unavailable".to_string(),
            })
        }

        fn open_resource(&self, name: &str) -> ResourceResult<Box<dyn ResourceRead + '_>> {
            Err(Error::ResourceNotFound {
                unit: "broken".to_string(),
                name: name.to_string(),
            })
        }
    }

    fn descriptor_names(descriptors: &[ResourceDescriptor]) -> Vec<String> {
        descriptors.iter().map(|d| d.name().to_string()).collect()
    }

    #[test]
    fn test_list() -> ResourceResult<()> {
        let unit = sample_unit();
        let resources = UnitResources::new(&unit);

        let all = resources.list()?;
        assert_eq!(descriptor_names(&all), vec!["a.txt", "b.txt", "ab.txt"]);
        assert!(all.iter().all(|d| d.unit_name() == "sample"));

        Ok(())
    }

    #[test]
    fn test_find_by_name() -> ResourceResult<()> {
        let unit = sample_unit();
        let resources = UnitResources::new(&unit);

        let matched = resources.find_by_name("a", false)?;
        assert_eq!(descriptor_names(&matched), vec!["a.txt", "ab.txt"]);

        let matched = resources.find_by_name("A", false)?;
        assert!(matched.is_empty());

        let matched = resources.find_by_name("A", true)?;
        assert_eq!(descriptor_names(&matched), vec!["a.txt", "ab.txt"]);

        Ok(())
    }

    #[test]
    fn test_find_by_name_includes_every_listed_name() -> ResourceResult<()> {
        let unit = sample_unit();
        let resources = UnitResources::new(&unit);

        for name in unit.resource_names()? {
            let matched = resources.find_by_name(&name, false)?;
            assert!(matched.iter().any(|d| d.name() == name));
        }

        Ok(())
    }

    #[test]
    fn test_find_by_empty_name_lists_everything() -> ResourceResult<()> {
        let unit = sample_unit();
        let resources = UnitResources::new(&unit);

        assert_eq!(
            descriptor_names(&resources.find_by_name("", false)?),
            descriptor_names(&resources.list()?)
        );

        Ok(())
    }

    #[test]
    fn test_find_by_names_concatenates() -> ResourceResult<()> {
        let unit = sample_unit();
        let resources = UnitResources::new(&unit);

        let matched = resources.find_by_names(&["b", "a"], false)?;

        // Per-pattern results back to back; "ab.txt" matched twice.
        assert_eq!(
            descriptor_names(&matched),
            vec!["b.txt", "ab.txt", "a.txt", "ab.txt"]
        );

        Ok(())
    }

    #[test]
    fn test_find_by_names_empty_list_yields_nothing() -> ResourceResult<()> {
        let unit = sample_unit();
        let resources = UnitResources::new(&unit);

        // No patterns selects nothing, even though a single empty
        // pattern selects everything.
        assert!(resources.find_by_names(&[], false)?.is_empty());
        assert_eq!(resources.find_by_names(&[""], false)?.len(), 3);

        Ok(())
    }

    #[test]
    fn test_find_by_regex() -> ResourceResult<()> {
        let unit = sample_unit();
        let resources = UnitResources::new(&unit);

        let matched = resources.find_by_regex(&Regex::new("^a").unwrap())?;
        assert_eq!(descriptor_names(&matched), vec!["a.txt", "ab.txt"]);

        let matched = resources.find_by_regex(&Regex::new("zzz").unwrap())?;
        assert!(matched.is_empty());

        let matched = resources.find_by_regex(&Regex::new(r"\.txt$").unwrap())?;
        assert_eq!(
            descriptor_names(&matched),
            descriptor_names(&resources.list()?)
        );

        Ok(())
    }

    #[test]
    fn test_string_projection() -> ResourceResult<()> {
        let unit = sample_unit();
        let resources = UnitResources::new(&unit);

        assert_eq!(
            resources.list_as_strings()?,
            vec!["alpha", "bravo", "alpha bravo"]
        );
        assert_eq!(
            resources.find_by_name_as_strings("a", false)?,
            vec!["alpha", "alpha bravo"]
        );
        assert_eq!(
            resources.find_by_names_as_strings(&["b", "a"], false)?,
            vec!["bravo", "alpha bravo", "alpha", "alpha bravo"]
        );
        assert_eq!(
            resources.find_by_regex_as_strings(&Regex::new("^a").unwrap())?,
            vec!["alpha", "alpha bravo"]
        );

        Ok(())
    }

    #[test]
    fn test_string_projection_decode_failure() {
        let mut unit = MemoryUnit::new("bin");
        unit.add_resource("blob.bin", &b"\xff\xfe"[..]);

        let resources = UnitResources::new(&unit);

        let err = resources.list_as_strings().unwrap_err();
        assert!(matches!(err, Error::ResourceDecode { .. }));
    }

    #[test]
    fn test_stream_projection() -> ResourceResult<()> {
        let unit = sample_unit();
        let resources = UnitResources::new(&unit);

        let mut streams = resources.find_by_name_as_streams("a", false)?;
        assert_eq!(streams.len(), 2);

        let mut content = String::new();
        streams[0].read_to_string(&mut content)?;
        assert_eq!(content, "alpha");

        let mut content = String::new();
        streams[1].read_to_string(&mut content)?;
        assert_eq!(content, "alpha bravo");

        Ok(())
    }

    #[test]
    fn test_streams_are_independent() -> ResourceResult<()> {
        let unit = sample_unit();
        let resources = UnitResources::new(&unit);

        let mut first = resources.find_by_name_as_streams("a.txt", false)?;
        let mut second = resources.find_by_name_as_streams("a.txt", false)?;

        let mut buf = [0u8; 2];
        first[0].read_exact(&mut buf)?;
        assert_eq!(&buf, b"al");

        // The second handle still reads from the start.
        let mut content = String::new();
        second[0].read_to_string(&mut content)?;
        assert_eq!(content, "alpha");

        Ok(())
    }

    #[test]
    fn test_read_bytes_roundtrip() -> ResourceResult<()> {
        let mut unit = MemoryUnit::new("bin");
        unit.add_resource("blob.bin", &b"\x00\xff\x7f binary"[..]);

        let resources = UnitResources::new(&unit);

        let descriptors = resources.find_by_name("blob", false)?;
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].read_bytes()?, b"\x00\xff\x7f binary");

        Ok(())
    }

    #[test]
    fn test_resource_string() -> ResourceResult<()> {
        let unit = sample_unit();
        let resources = UnitResources::new(&unit);

        assert_eq!(resources.resource_string("a.txt")?, "alpha");

        let err = resources.resource_string("missing.txt").unwrap_err();
        assert!(
            matches!(&err, Error::ResourceNotFound { unit, name }
                if unit == "sample" && name == "missing.txt")
        );

        Ok(())
    }

    #[test]
    fn test_repeated_resolution_is_stable() -> ResourceResult<()> {
        let unit = sample_unit();
        let resources = UnitResources::new(&unit);

        assert_eq!(
            descriptor_names(&resources.find_by_name("a", false)?),
            descriptor_names(&resources.find_by_name("a", false)?)
        );
        assert_eq!(resources.list_as_strings()?, resources.list_as_strings()?);

        Ok(())
    }

    #[test]
    fn test_multiple_units_preserve_order() -> ResourceResult<()> {
        let mut first = MemoryUnit::new("first");
        first.add_resource("z.txt", &b"z first"[..]);
        first.add_resource("shared.txt", &b"shared first"[..]);

        let mut second = MemoryUnit::new("second");
        second.add_resource("shared.txt", &b"shared second"[..]);
        second.add_resource("a.txt", &b"a second"[..]);

        let units: Vec<&dyn CompiledUnit> = vec![&first, &second];

        // Unit order, then listing order. Identical names in different
        // units are not de-duplicated.
        let all = list_all(&units)?;
        assert_eq!(
            descriptor_names(&all),
            vec!["z.txt", "shared.txt", "shared.txt", "a.txt"]
        );
        assert_eq!(
            all.iter().map(|d| d.unit_name()).collect::<Vec<_>>(),
            vec!["first", "first", "second", "second"]
        );

        assert_eq!(
            find_by_name_as_strings(&units, "shared", false)?,
            vec!["shared first", "shared second"]
        );

        Ok(())
    }

    #[test]
    fn test_multiple_units_all_operations() -> ResourceResult<()> {
        let mut first = MemoryUnit::new("first");
        first.add_resource("a.txt", &b"alpha"[..]);

        let mut second = MemoryUnit::new("second");
        second.add_resource("b.txt", &b"bravo"[..]);

        let units: Vec<&dyn CompiledUnit> = vec![&first, &second];

        assert_eq!(list_all_as_strings(&units)?, vec!["alpha", "bravo"]);
        assert_eq!(list_all_as_streams(&units)?.len(), 2);

        assert_eq!(
            descriptor_names(&find_by_name(&units, "b", false)?),
            vec!["b.txt"]
        );
        assert_eq!(find_by_name_as_streams(&units, "b", false)?.len(), 1);

        assert_eq!(
            descriptor_names(&find_by_names(&units, &["a", "b"], false)?),
            vec!["a.txt", "b.txt"]
        );
        assert_eq!(
            find_by_names_as_strings(&units, &["a", "b"], false)?,
            vec!["alpha", "bravo"]
        );
        assert_eq!(
            find_by_names_as_streams(&units, &["a", "b"], false)?.len(),
            2
        );

        let re = Regex::new("txt").unwrap();
        assert_eq!(
            descriptor_names(&find_by_regex(&units, &re)?),
            vec!["a.txt", "b.txt"]
        );
        assert_eq!(
            find_by_regex_as_strings(&units, &re)?,
            vec!["alpha", "bravo"]
        );
        assert_eq!(find_by_regex_as_streams(&units, &re)?.len(), 2);

        Ok(())
    }

    #[test]
    fn test_listing_failure_propagates() {
        let good = sample_unit();
        let broken = BrokenUnit;

        let units: Vec<&dyn CompiledUnit> = vec![&good, &broken];

        let err = list_all(&units).unwrap_err();
        assert!(matches!(err, Error::InvalidUnit { .. }));

        let err = UnitResources::new(&broken).find_by_name("a", false).unwrap_err();
        assert!(matches!(err, Error::InvalidUnit { .. }));
    }
}
