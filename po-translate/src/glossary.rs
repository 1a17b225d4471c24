//! Term glossaries: a two-column CSV table mapping source terms to the
//! translation that should be used for them.
//!
//! ```text
//! source,target
//! Save,Speichern
//! File,Datei
//! ```
//!
//! The first row is a header and its labels are not checked. Terms are
//! matched exactly, case and surrounding whitespace included; the first
//! occurrence of a term wins.

use std::{
    collections::HashMap,
    io::{BufRead, Write},
};

use tracing::debug;

use crate::{error::Error, traits::Parser};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Glossary {
    /// Term pairs in file order, without duplicates.
    terms: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl Glossary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a term unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>) -> bool {
        let source = source.into();
        if self.index.contains_key(&source) {
            return false;
        }
        self.index.insert(source.clone(), self.terms.len());
        self.terms.push((source, target.into()));
        true
    }

    /// The target term for `source`, if the glossary has one.
    pub fn get(&self, source: &str) -> Option<&str> {
        self.index
            .get(source)
            .map(|&i| self.terms[i].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterates `(source, target)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.terms.iter().map(|(s, t)| (s.as_str(), t.as_str()))
    }
}

impl Parser for Glossary {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::None)
            .from_reader(reader);

        let mut glossary = Glossary::new();
        let mut skipped = 0usize;
        for record in rdr.records() {
            let record = record?;
            match (record.get(0), record.get(1)) {
                (Some(source), Some(target)) => {
                    if !glossary.insert(source, target) {
                        skipped += 1;
                    }
                }
                _ => skipped += 1,
            }
        }
        debug!(terms = glossary.len(), skipped, "loaded glossary");
        Ok(glossary)
    }

    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error> {
        let mut wtr = csv::WriterBuilder::new().from_writer(writer);
        wtr.write_record(["source", "target"])?;
        for (source, target) in self.iter() {
            wtr.write_record([source, target])?;
        }
        wtr.flush()?;
        Ok(())
    }
}
