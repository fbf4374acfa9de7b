//! Built-in template parts for new presentations.
//!
//! The template is a single master with one theme and two layouts. Parts
//! are embedded at compile time.

/// Layouts offered by the built-in slide master, in master order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuiltinLayout {
    TitleOnly,
    #[default]
    Blank,
}

impl BuiltinLayout {
    pub const ALL: [BuiltinLayout; 2] = [BuiltinLayout::TitleOnly, BuiltinLayout::Blank];

    /// Name stored in the layout's `p:cSld/@name`.
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinLayout::TitleOnly => "Title Only",
            BuiltinLayout::Blank => "Blank",
        }
    }

    /// Exact, case-sensitive lookup by layout name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.name() == name)
    }

    pub fn xml(&self) -> &'static str {
        match self {
            BuiltinLayout::TitleOnly => include_str!("resources/slideLayoutTitleOnly.xml"),
            BuiltinLayout::Blank => include_str!("resources/slideLayoutBlank.xml"),
        }
    }

    /// Whether the layout carries a `type="title"` placeholder.
    pub fn has_title(&self) -> bool {
        matches!(self, BuiltinLayout::TitleOnly)
    }

    /// 1-based position, used for the layout partname.
    pub fn index(&self) -> usize {
        match self {
            BuiltinLayout::TitleOnly => 1,
            BuiltinLayout::Blank => 2,
        }
    }
}

/// Slide master; its `sldLayoutIdLst` expects the layouts as `rId1`, `rId2`
/// in [`BuiltinLayout::ALL`] order.
pub fn slide_master_xml() -> &'static str {
    include_str!("resources/slideMaster1.xml")
}

/// Theme shared by the slide master and the notes master.
pub fn theme_xml() -> &'static str {
    include_str!("resources/theme1.xml")
}

pub fn notes_master_xml() -> &'static str {
    include_str!("resources/notesMaster1.xml")
}

pub fn pres_props_xml() -> &'static str {
    include_str!("resources/presProps.xml")
}

pub fn view_props_xml() -> &'static str {
    include_str!("resources/viewProps.xml")
}

pub fn table_styles_xml() -> &'static str {
    include_str!("resources/tableStyles.xml")
}
