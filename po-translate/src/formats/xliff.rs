//! Support for XLIFF `.xliff` / `.xlf` files, versions 1.x and 2.x.
//!
//! Version 1.x keeps text in `<trans-unit><source/><target/></trans-unit>`;
//! version 2.x keeps it in `<unit><segment><source/><target/></segment></unit>`.
//! Either way an entry is a projection of the element holding the
//! `<source>`/`<target>` pair, and saving only touches targets whose text
//! changed.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::{
    error::Error,
    traits::{Catalog, Parser},
    types::Entry,
    xml::{NodeId, XmlTree},
};

/// The XLIFF dialect of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// XLIFF 1.x (`trans-unit`).
    V1,
    /// XLIFF 2.x (`unit` / `segment`).
    V2,
}

impl Version {
    /// Detect the version from the root `<xliff version="...">` attribute,
    /// falling back to the element names present in the document.
    fn detect(tree: &XmlTree) -> Result<Self, Error> {
        let root = tree
            .root_element()
            .filter(|&root| tree.is_named(root, "xliff"))
            .ok_or_else(|| Error::InvalidResource("missing <xliff> root element".to_string()))?;

        match tree.attribute(root, "version")? {
            Some(v) if v.trim().starts_with('1') => Ok(Version::V1),
            Some(v) if v.trim().starts_with('2') => Ok(Version::V2),
            Some(v) => Err(Error::UnsupportedFormat(format!("XLIFF version {}", v))),
            None if tree.elements_named("trans-unit").is_empty() => Ok(Version::V2),
            None => Ok(Version::V1),
        }
    }

    /// Local name of the element that directly holds `<source>`/`<target>`.
    fn unit_element(self) -> &'static str {
        match self {
            Version::V1 => "trans-unit",
            Version::V2 => "segment",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Format {
    tree: XmlTree,
    version: Version,
    pub entries: Vec<Entry>,
}

impl Format {
    pub fn version(&self) -> Version {
        self.version
    }

    /// Write changed translations into their `<target>` elements, creating
    /// the element next to `<source>` when it does not exist yet.
    fn apply(&self, tree: &mut XmlTree) -> Result<(), Error> {
        for entry in &self.entries {
            let Some(unit) = entry.origin else {
                continue;
            };
            let existing = tree.first_child_named(unit, "target");
            let current = match existing {
                Some(target) => tree.text(target)?,
                None => String::new(),
            };
            if current == entry.translated_text {
                continue;
            }

            let target = match existing {
                Some(target) => target,
                None => create_target(tree, unit)?,
            };
            tree.set_text(target, &entry.translated_text);
        }
        Ok(())
    }
}

/// Insert a `<target>` after the unit's `<source>`, using the same namespace
/// prefix as the source element.
fn create_target(tree: &mut XmlTree, unit: NodeId) -> Result<NodeId, Error> {
    let source = tree.first_child_named(unit, "source").ok_or_else(|| {
        Error::InvalidResource(format!(
            "<{}> without <source>",
            tree.qualified_name(unit)
        ))
    })?;
    let name = match tree.qualified_name(source).rsplit_once(':') {
        Some((prefix, _)) => format!("{}:target", prefix),
        None => "target".to_string(),
    };
    tree.insert_element_after(source, &name)
}

/// Identifier of the nearest enclosing `<group>`, if any.
fn group_context(tree: &XmlTree, unit: NodeId) -> Result<String, Error> {
    match tree.ancestor_named(unit, "group") {
        Some(group) => Ok(tree.attribute(group, "id")?.unwrap_or_default()),
        None => Ok(String::new()),
    }
}

impl Parser for Format {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let tree = XmlTree::from_reader(reader)?;
        let version = Version::detect(&tree)?;

        let mut entries = Vec::new();
        for unit in tree.elements_named(version.unit_element()) {
            let source_text = match tree.first_child_named(unit, "source") {
                Some(source) => tree.text(source)?,
                None => String::new(),
            };
            let translated_text = match tree.first_child_named(unit, "target") {
                Some(target) => tree.text(target)?,
                None => String::new(),
            };
            let mut entry = Entry::new(source_text)
                .with_translation(translated_text)
                .with_context(group_context(&tree, unit)?);
            entry.origin = Some(unit);
            entries.push(entry);
        }

        debug!(?version, entries = entries.len(), "parsed XLIFF document");
        Ok(Format {
            tree,
            version,
            entries,
        })
    }

    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error> {
        let mut tree = self.tree.clone();
        self.apply(&mut tree)?;
        tree.to_writer(writer)
    }
}

impl Catalog for Format {
    fn entries(&self) -> &[Entry] {
        &self.entries
    }

    fn entries_mut(&mut self) -> &mut [Entry] {
        &mut self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const XLIFF_12: &str = indoc! {r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
          <file source-language="en" target-language="sv" datatype="plaintext" original="app">
            <body>
              <group id="menu">
                <trans-unit id="open" resname="open">
                  <source>Open</source>
                  <target></target>
                  <note>File menu</note>
                </trans-unit>
              </group>
              <trans-unit id="quit">
                <source>Quit</source>
              </trans-unit>
              <trans-unit id="bye">
                <source>Bye</source>
                <target state="translated">Hej då</target>
              </trans-unit>
            </body>
          </file>
        </xliff>
    "#};

    const XLIFF_20: &str = indoc! {r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <xliff xmlns="urn:oasis:names:tc:xliff:document:2.0" version="2.0" srcLang="en" trgLang="de">
          <file id="f1">
            <group id="g1">
              <unit id="u1">
                <segment>
                  <source>Hello</source>
                </segment>
              </unit>
            </group>
            <unit id="u2">
              <segment state="final">
                <source>World</source>
                <target>Welt</target>
              </segment>
            </unit>
          </file>
        </xliff>
    "#};

    fn save(format: &Format) -> String {
        let mut out = Vec::new();
        format.to_writer(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_v12() {
        let format = Format::from_str(XLIFF_12).unwrap();
        assert_eq!(format.version(), Version::V1);
        assert_eq!(format.entries.len(), 3);
        assert_eq!(format.entries[0].source_text, "Open");
        assert_eq!(format.entries[0].context, "menu");
        assert_eq!(format.entries[1].context, "");
        assert_eq!(format.entries[2].translated_text, "Hej då");

        let untranslated: Vec<&str> = format
            .get_untranslated()
            .iter()
            .map(|e| e.source_text.as_str())
            .collect();
        assert_eq!(untranslated, vec!["Open", "Quit"]);
    }

    #[test]
    fn test_save_v12_fills_and_creates_targets() {
        let mut format = Format::from_str(XLIFF_12).unwrap();
        format.entries[0].translated_text = "Öppna".to_string();
        format.entries[1].translated_text = "Avsluta".to_string();
        let out = save(&format);

        assert!(out.contains("<target>Öppna</target>\n          <note>File menu</note>"));
        assert!(out.contains("<source>Quit</source>\n        <target>Avsluta</target>"));
        assert!(out.contains(r#"<target state="translated">Hej då</target>"#));
        assert!(out.contains(r#"<trans-unit id="open" resname="open">"#));

        let reparsed = Format::from_str(&out).unwrap();
        assert_eq!(reparsed.entries[0].translated_text, "Öppna");
        assert_eq!(reparsed.entries[1].translated_text, "Avsluta");
        assert!(reparsed.get_untranslated().is_empty());
    }

    #[test]
    fn test_unchanged_document_is_written_verbatim() {
        let format = Format::from_str(XLIFF_12).unwrap();
        assert_eq!(save(&format), XLIFF_12);
    }

    #[test]
    fn test_parse_and_save_v20() {
        let mut format = Format::from_str(XLIFF_20).unwrap();
        assert_eq!(format.version(), Version::V2);
        assert_eq!(format.entries.len(), 2);
        assert_eq!(format.entries[0].context, "g1");
        assert_eq!(format.get_untranslated().len(), 1);

        format.entries[0].translated_text = "Hallo".to_string();
        let out = save(&format);
        assert!(out.contains("<source>Hello</source>\n          <target>Hallo</target>"));

        let reparsed = Format::from_str(&out).unwrap();
        assert_eq!(reparsed.entries[0].translated_text, "Hallo");
        assert_eq!(reparsed.entries[1].translated_text, "Welt");
    }

    #[test]
    fn test_prefixed_elements_get_prefixed_target() {
        let xml = indoc! {r#"
            <x:xliff xmlns:x="urn:oasis:names:tc:xliff:document:1.2" version="1.2">
              <x:file><x:body>
                <x:trans-unit id="a">
                  <x:source>A</x:source>
                </x:trans-unit>
              </x:body></x:file>
            </x:xliff>
        "#};
        let mut format = Format::from_str(xml).unwrap();
        format.entries[0].translated_text = "Ä".to_string();
        let out = save(&format);
        assert!(out.contains("<x:target>Ä</x:target>"));
    }

    #[test]
    fn test_version_detected_without_attribute() {
        let xml = "<xliff><file><body><trans-unit id=\"a\"><source>A</source></trans-unit></body></file></xliff>";
        assert_eq!(Format::from_str(xml).unwrap().version(), Version::V1);
    }

    #[test]
    fn test_non_xliff_root_is_rejected() {
        assert!(Format::from_str("<TS></TS>").is_err());
        assert!(Format::from_str("<xliff version=\"3.0\"></xliff>").is_err());
    }
}
