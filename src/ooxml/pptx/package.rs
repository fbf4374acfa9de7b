/// `.pptx` package: an OPC package whose main part is a presentation.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::metadata::CoreProperties;
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::pptx::parts::PresentationPart;
use crate::ooxml::pptx::presentation::Presentation;
use std::io::{Read, Seek};
use std::path::Path;

/// A PowerPoint package opened for reading.
///
/// ```rust,no_run
/// use powerbb::ooxml::pptx::Package;
///
/// let pkg = Package::open("deck.pptx")?;
/// let pres = pkg.presentation()?;
/// println!("{} slides", pres.slide_count()?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Package {
    opc: OpcPackage,
}

impl Package {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_opc(OpcPackage::open(path)?)
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_opc(OpcPackage::from_reader(reader)?)
    }

    /// Accept `opc` only if its main part is a presentation.
    fn from_opc(opc: OpcPackage) -> Result<Self> {
        let main_part = opc
            .main_document_part()
            .map_err(|e| OoxmlError::PartNotFound(format!("main presentation part: {}", e)))?;
        PresentationPart::from_part(main_part)?;
        Ok(Self { opc })
    }

    pub fn presentation(&self) -> Result<Presentation<'_>> {
        let main_part = self
            .opc
            .main_document_part()
            .map_err(|e| OoxmlError::PartNotFound(format!("main presentation part: {}", e)))?;
        Ok(Presentation::new(PresentationPart::from_part(main_part)?, &self.opc))
    }

    /// Core properties (`docProps/core.xml`), if present.
    pub fn core_properties(&self) -> Result<Option<CoreProperties>> {
        CoreProperties::from_package(&self.opc)
    }

    #[inline]
    pub fn opc_package(&self) -> &OpcPackage {
        &self.opc
    }
}
