/// The in-memory OPC package.
///
/// `OpcPackage` holds the package-level relationships and every part
/// reachable from them. It is produced by reading a `.pptx` and is also the
/// structure the presentation writer fills before serializing.
use std::collections::BTreeMap;
use std::io::{Read, Seek};
use std::path::Path;

use crate::ooxml::opc::constants::relationship_type;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{PACKAGE_URI, PackURI};
use crate::ooxml::opc::part::Part;
use crate::ooxml::opc::pkgreader::PackageReader;
use crate::ooxml::opc::rel::Relationships;

#[derive(Debug, Clone)]
pub struct OpcPackage {
    rels: Relationships,
    /// Parts keyed by partname; ordered so serialization is deterministic
    parts: BTreeMap<PackURI, Part>,
}

impl OpcPackage {
    pub fn new() -> Self {
        Self {
            rels: Relationships::new(PACKAGE_URI.to_string()),
            parts: BTreeMap::new(),
        }
    }

    /// Open a package file.
    ///
    /// The file handle is released before this returns, on every path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Load a package from any seekable reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive =
            zip::ZipArchive::new(reader).map_err(|e| OpcError::NotAPackage(e.to_string()))?;
        let pkg_reader = PackageReader::from_archive(&mut archive)?;
        Ok(Self::unmarshal(pkg_reader))
    }

    /// Turn serialized parts and relationships into the object graph.
    fn unmarshal(mut pkg_reader: PackageReader) -> Self {
        let mut package = Self::new();

        for srel in pkg_reader.pkg_srels() {
            package.rels.add_relationship(
                srel.reltype.clone(),
                srel.target_ref.clone(),
                srel.r_id.clone(),
                srel.is_external(),
            );
        }

        for spart in pkg_reader.take_sparts() {
            let mut part = Part::new(spart.partname, spart.content_type, spart.blob);
            for srel in spart.srels {
                let is_external = srel.is_external();
                part.rels_mut()
                    .add_relationship(srel.reltype, srel.target_ref, srel.r_id, is_external);
            }
            package.add_part(part);
        }

        package
    }

    /// The part the package `officeDocument` relationship points at
    /// (`/ppt/presentation.xml` for a presentation).
    pub fn main_document_part(&self) -> Result<&Part> {
        let rel = self.rels.part_with_reltype(relationship_type::OFFICE_DOCUMENT)?;
        let partname = rel.target_partname()?;
        self.get_part(&partname)
    }

    pub fn get_part(&self, partname: &PackURI) -> Result<&Part> {
        self.parts
            .get(partname)
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    pub fn get_part_mut(&mut self, partname: &PackURI) -> Result<&mut Part> {
        self.parts
            .get_mut(partname)
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    /// Part reached from the package through a relationship of `reltype`.
    pub fn part_by_reltype(&self, reltype: &str) -> Result<&Part> {
        let partname = self.rels.part_with_reltype(reltype)?.target_partname()?;
        self.get_part(&partname)
    }

    /// Part reached from `source` through relationship `r_id`.
    pub fn related_part(&self, source: &Part, r_id: &str) -> Result<&Part> {
        self.get_part(&source.related_partname(r_id)?)
    }

    /// Part reached from `source` through its first relationship of `reltype`.
    pub fn related_part_by_reltype(&self, source: &Part, reltype: &str) -> Result<&Part> {
        self.get_part(&source.partname_with_reltype(reltype)?)
    }

    pub fn add_part(&mut self, part: Part) {
        self.parts.insert(part.partname().clone(), part);
    }

    pub fn iter_parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.values()
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// Relate the package itself to `target`, returning the rId.
    pub fn relate_to(&mut self, target: &PackURI, reltype: &str) -> String {
        self.rels.get_or_add(reltype, target.membername())
    }

    /// First free partname for a template such as `/ppt/media/image%d.png`.
    pub fn next_partname(&self, template: &str) -> Result<PackURI> {
        for n in 1..=u32::MAX {
            let candidate = PackURI::new(template.replace("%d", &n.to_string()))
                .map_err(OpcError::InvalidPackUri)?;
            if !self.parts.contains_key(&candidate) {
                return Ok(candidate);
            }
        }
        Err(OpcError::InvalidPackUri(format!(
            "no free partname for {}",
            template
        )))
    }

    pub fn contains_part(&self, partname: &PackURI) -> bool {
        self.parts.contains_key(partname)
    }
}

impl Default for OpcPackage {
    fn default() -> Self {
        Self::new()
    }
}
