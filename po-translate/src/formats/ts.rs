//! Support for Qt Linguist `.ts` files.
//!
//! Entries are projections of `<context>/<message>` elements. The parsed XML
//! tree is kept as-is, and saving writes translations back into it so that
//! everything else in the document survives unchanged.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::{
    error::Error,
    traits::{Catalog, Parser},
    types::{Entry, FLAG_UNFINISHED},
    xml::XmlTree,
};

/// `type` values that describe a message's lifecycle rather than its
/// translation progress; they are left alone when a translation is written.
const LIFECYCLE_TYPES: [&str; 2] = ["vanished", "obsolete"];

#[derive(Debug, Clone)]
pub struct Format {
    tree: XmlTree,
    pub entries: Vec<Entry>,
}

impl Format {
    /// Write every entry's translation into its `<message>` element.
    fn apply(&self, tree: &mut XmlTree) -> Result<(), Error> {
        for entry in &self.entries {
            let Some(message) = entry.origin else {
                continue;
            };
            let translation = match tree.first_child_named(message, "translation") {
                Some(node) => node,
                None if entry.translated_text.is_empty() => continue,
                None => {
                    let anchor = tree
                        .children_named(message, "source")
                        .last()
                        .copied()
                        .ok_or_else(|| {
                            Error::InvalidResource("<message> without <source>".to_string())
                        })?;
                    tree.insert_element_after(anchor, "translation")?
                }
            };

            let forms = tree.children_named(translation, "numerusform");
            match forms.split_first() {
                Some((&first, rest)) => {
                    // Plural messages: the first form carries the entry, and
                    // empty forms are filled with it.
                    if tree.text(first)? != entry.translated_text {
                        tree.set_text(first, &entry.translated_text);
                    }
                    for &form in rest {
                        if tree.text(form)?.is_empty() {
                            tree.set_text(form, &entry.translated_text);
                        }
                    }
                }
                None => {
                    if tree.text(translation)? != entry.translated_text {
                        tree.set_text(translation, &entry.translated_text);
                    }
                }
            }
            if !entry.translated_text.is_empty() {
                let kind = tree.attribute(translation, "type")?;
                if kind.is_some_and(|kind| !LIFECYCLE_TYPES.contains(&kind.as_str())) {
                    tree.remove_attribute(translation, "type")?;
                }
            }
        }
        Ok(())
    }
}

impl Parser for Format {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let tree = XmlTree::from_reader(reader)?;
        let mut entries = Vec::new();

        for context in tree.elements_named("context") {
            let context_name = match tree.first_child_named(context, "name") {
                Some(name) => tree.text(name)?,
                None => String::new(),
            };

            for message in tree.children_named(context, "message") {
                let source_text = match tree.first_child_named(message, "source") {
                    Some(source) => tree.text(source)?,
                    None => String::new(),
                };
                let mut entry = Entry::new(source_text).with_context(context_name.clone());
                entry.origin = Some(message);

                let translation = tree.first_child_named(message, "translation");
                if tree.attribute(message, "numerus")?.as_deref() == Some("yes")
                    && translation.is_none_or(|t| tree.first_child_named(t, "numerusform").is_none())
                {
                    debug!(source = %entry.source_text, "skipping plural message without <numerusform>");
                    continue;
                }

                if let Some(translation) = translation {
                    entry.translated_text = match tree.first_child_named(translation, "numerusform") {
                        Some(form) => tree.text(form)?,
                        None => tree.text(translation)?,
                    };
                    if tree.attribute(translation, "type")?.as_deref() == Some(FLAG_UNFINISHED) {
                        entry.flags.push(FLAG_UNFINISHED.to_string());
                    }
                }
                entries.push(entry);
            }
        }

        debug!(entries = entries.len(), "parsed Qt TS document");
        Ok(Format { tree, entries })
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

    /// Qt can mark a non-empty translation as unfinished, so those messages
    /// are sent for translation as well.
    fn is_untranslated(&self, entry: &Entry) -> bool {
        entry.needs_translation() || entry.has_flag(FLAG_UNFINISHED)
    }
}
