//! Low-level, read-only view of a serialized OPC package.
//!
//! The reader decompresses every zip member up front, parses
//! `[Content_Types].xml`, then walks the relationship graph from the
//! package rels so that only parts reachable from the package are loaded.

use crate::common::xml::attr_value;
use crate::ooxml::opc::constants::target_mode;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PACKAGE_URI, PackURI};
use quick_xml::Reader;
use quick_xml::events::Event;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet, VecDeque};
use std::io::{Read, Seek};

/// Part as loaded from the archive, before becoming a `Part`.
#[derive(Debug)]
pub struct SerializedPart {
    pub partname: PackURI,
    pub content_type: String,
    pub blob: Vec<u8>,
    pub srels: SmallVec<[SerializedRelationship; 8]>,
}

/// Relationship as read from a `.rels` member.
#[derive(Debug, Clone)]
pub struct SerializedRelationship {
    pub base_uri: String,
    pub r_id: String,
    pub reltype: String,
    pub target_ref: String,
    pub target_mode: String,
}

impl SerializedRelationship {
    #[inline]
    pub fn is_external(&self) -> bool {
        self.target_mode == target_mode::EXTERNAL
    }

    pub fn target_partname(&self) -> Result<PackURI> {
        if self.is_external() {
            return Err(OpcError::InvalidRelationship(format!(
                "{} points outside the package",
                self.r_id
            )));
        }
        PackURI::from_rel_ref(&self.base_uri, &self.target_ref).map_err(OpcError::InvalidPackUri)
    }
}

/// Content type lookup built from `Default` and `Override` elements.
struct ContentTypeMap {
    /// Keyed by lower-case extension
    defaults: HashMap<String, String>,
    /// Keyed by lower-case partname
    overrides: HashMap<String, String>,
}

impl ContentTypeMap {
    fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut map = Self {
            defaults: HashMap::new(),
            overrides: HashMap::new(),
        };
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    let is_default = match e.local_name().as_ref() {
                        b"Default" => true,
                        b"Override" => false,
                        _ => {
                            buf.clear();
                            continue;
                        },
                    };

                    let mut key = None;
                    let mut content_type = None;
                    for attr in e.attributes() {
                        let attr = attr?;
                        match attr.key.as_ref() {
                            b"Extension" | b"PartName" => key = Some(attr_value(&attr)),
                            b"ContentType" => content_type = Some(attr_value(&attr)),
                            _ => {},
                        }
                    }

                    if let (Some(key), Some(ct)) = (key, content_type) {
                        let key = key.to_lowercase();
                        if is_default {
                            map.defaults.insert(key, ct);
                        } else {
                            map.overrides.insert(key, ct);
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OpcError::XmlError(format!(
                        "Content types parse error: {}",
                        e
                    )));
                },
                _ => {},
            }
            buf.clear();
        }

        Ok(map)
    }

    /// Override first, then the default for the extension.
    fn get(&self, pack_uri: &PackURI) -> Result<String> {
        if let Some(ct) = self.overrides.get(&pack_uri.as_str().to_lowercase()) {
            return Ok(ct.clone());
        }
        if let Some(ct) = self.defaults.get(&pack_uri.ext().to_lowercase()) {
            return Ok(ct.clone());
        }
        Err(OpcError::ContentTypeNotFound(pack_uri.to_string()))
    }
}

/// Decompressed zip members, looked up case-insensitively as OPC requires.
struct MemberCache {
    files: HashMap<String, Vec<u8>>,
    /// lower-case name -> actual member name
    folded: HashMap<String, String>,
}

impl MemberCache {
    fn load<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> Result<Self> {
        let mut files = HashMap::with_capacity(archive.len());
        let mut folded = HashMap::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut content = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut content)?;
            folded.insert(name.to_lowercase(), name.clone());
            files.insert(name, content);
        }

        Ok(Self { files, folded })
    }

    fn resolve(&self, membername: &str) -> Option<&str> {
        if self.files.contains_key(membername) {
            return Some(self.files.get_key_value(membername)?.0.as_str());
        }
        self.folded.get(&membername.to_lowercase()).map(String::as_str)
    }

    fn get(&self, membername: &str) -> Option<&[u8]> {
        let name = self.resolve(membername)?;
        self.files.get(name).map(Vec::as_slice)
    }

    fn take(&mut self, membername: &str) -> Option<Vec<u8>> {
        let name = self.resolve(membername)?.to_string();
        self.files.remove(&name)
    }
}

/// Package reader giving access to serialized parts and relationships.
pub struct PackageReader {
    pkg_srels: SmallVec<[SerializedRelationship; 8]>,
    sparts: Vec<SerializedPart>,
}

impl PackageReader {
    /// Parse the package held by `archive`.
    pub fn from_archive<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> Result<Self> {
        let mut cache = MemberCache::load(archive)?;

        let content_types_xml = cache
            .get(CONTENT_TYPES_URI.trim_start_matches('/'))
            .ok_or_else(|| OpcError::PartNotFound("[Content_Types].xml".to_string()))?;
        let content_types = ContentTypeMap::from_xml(content_types_xml)?;

        let package_uri = PackURI::new(PACKAGE_URI).map_err(OpcError::InvalidPackUri)?;
        let pkg_srels = Self::load_rels(&cache, &package_uri)?;
        let sparts = Self::load_parts(&mut cache, &pkg_srels, &content_types)?;

        Ok(Self { pkg_srels, sparts })
    }

    fn load_rels(
        cache: &MemberCache,
        source_uri: &PackURI,
    ) -> Result<SmallVec<[SerializedRelationship; 8]>> {
        let rels_uri = source_uri.rels_uri().map_err(OpcError::InvalidPackUri)?;
        match cache.get(rels_uri.membername()) {
            Some(xml) => Self::parse_rels_xml(xml, source_uri.base_uri()),
            None => Ok(SmallVec::new()),
        }
    }

    fn parse_rels_xml(
        rels_xml: &[u8],
        base_uri: &str,
    ) -> Result<SmallVec<[SerializedRelationship; 8]>> {
        let mut srels = SmallVec::new();
        let mut reader = Reader::from_reader(rels_xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    if e.local_name().as_ref() == b"Relationship" {
                        let mut r_id = None;
                        let mut reltype = None;
                        let mut target_ref = None;
                        let mut target_mode = target_mode::INTERNAL.to_string();

                        for attr in e.attributes() {
                            let attr = attr?;
                            match attr.key.as_ref() {
                                b"Id" => r_id = Some(attr_value(&attr)),
                                b"Type" => reltype = Some(attr_value(&attr)),
                                b"Target" => target_ref = Some(attr_value(&attr)),
                                b"TargetMode" => target_mode = attr_value(&attr),
                                _ => {},
                            }
                        }

                        if let (Some(id), Some(rt), Some(tr)) = (r_id, reltype, target_ref) {
                            srels.push(SerializedRelationship {
                                base_uri: base_uri.to_string(),
                                r_id: id,
                                reltype: rt,
                                target_ref: tr,
                                target_mode,
                            });
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OpcError::XmlError(format!("Rels parse error: {}", e))),
                _ => {},
            }
            buf.clear();
        }

        Ok(srels)
    }

    /// Breadth-first walk of the relationship graph.
    ///
    /// Targets that are not present in the archive are skipped: a dangling
    /// relationship only becomes an error when something actually asks for
    /// that part.
    fn load_parts(
        cache: &mut MemberCache,
        pkg_srels: &[SerializedRelationship],
        content_types: &ContentTypeMap,
    ) -> Result<Vec<SerializedPart>> {
        let mut sparts = Vec::with_capacity(32);
        let mut visited = HashSet::with_capacity(32);
        let mut queue: VecDeque<PackURI> = VecDeque::new();

        let mut enqueue = |srels: &[SerializedRelationship], queue: &mut VecDeque<PackURI>| {
            for srel in srels.iter().filter(|s| !s.is_external()) {
                if let Ok(partname) = srel.target_partname()
                    && visited.insert(partname.clone())
                {
                    queue.push_back(partname);
                }
            }
        };

        enqueue(pkg_srels, &mut queue);

        while let Some(partname) = queue.pop_front() {
            let Some(blob) = cache.take(partname.membername()) else {
                tracing::debug!(part = %partname, "relationship target missing from archive");
                continue;
            };
            let srels = Self::load_rels(cache, &partname)?;
            enqueue(&srels, &mut queue);

            let content_type = content_types.get(&partname)?;
            sparts.push(SerializedPart {
                partname,
                content_type,
                blob,
                srels,
            });
        }

        Ok(sparts)
    }

    pub fn pkg_srels(&self) -> &[SerializedRelationship] {
        &self.pkg_srels
    }

    /// Take ownership of all serialized parts.
    pub fn take_sparts(&mut self) -> Vec<SerializedPart> {
        std::mem::take(&mut self.sparts)
    }
}
