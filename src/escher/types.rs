//! Escher record type ids.
//!
//! Based on the Microsoft Office Drawing binary format (MS-ODRAW).

pub mod record_id {
    pub const DGG_CONTAINER: u16 = 0xF000;
    pub const BSTORE_CONTAINER: u16 = 0xF001;
    pub const DG_CONTAINER: u16 = 0xF002;
    pub const SPGR_CONTAINER: u16 = 0xF003;
    pub const SP_CONTAINER: u16 = 0xF004;
    pub const SOLVER_CONTAINER: u16 = 0xF005;
    pub const DGG: u16 = 0xF006;
    pub const BSE: u16 = 0xF007;
    pub const DG: u16 = 0xF008;
    pub const SPGR: u16 = 0xF009;
    pub const SP: u16 = 0xF00A;
    pub const OPT: u16 = 0xF00B;
    pub const CLIENT_TEXTBOX: u16 = 0xF00D;
    pub const CHILD_ANCHOR: u16 = 0xF00F;
    pub const CLIENT_ANCHOR: u16 = 0xF010;
    pub const CLIENT_DATA: u16 = 0xF011;
    pub const CONNECTOR_RULE: u16 = 0xF012;
    pub const ALIGN_RULE: u16 = 0xF013;
    pub const ARC_RULE: u16 = 0xF014;
    pub const CLIENT_RULE: u16 = 0xF015;
    pub const CALLOUT_RULE: u16 = 0xF017;
    pub const BLIP_START: u16 = 0xF018;
    pub const BLIP_EMF: u16 = 0xF01A;
    pub const BLIP_WMF: u16 = 0xF01B;
    pub const BLIP_PICT: u16 = 0xF01C;
    pub const BLIP_JPEG: u16 = 0xF01D;
    pub const BLIP_PNG: u16 = 0xF01E;
    pub const BLIP_DIB: u16 = 0xF01F;
    pub const BLIP_TIFF: u16 = 0xF029;
    pub const BLIP_END: u16 = 0xF117;
    pub const COLOR_MRU: u16 = 0xF11A;
    pub const SPLIT_MENU_COLORS: u16 = 0xF11E;
    pub const SECONDARY_OPT: u16 = 0xF121;
    pub const TERTIARY_OPT: u16 = 0xF122;
}

/// Escher record types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum EscherRecordType {
    /// Unknown or unsupported record type
    Unknown = 0x0000,

    // Container records (0xF000 - 0xF005)
    /// Drawing Group Container
    DggContainer = 0xF000,
    /// Blip Store Container
    BStoreContainer = 0xF001,
    /// Drawing Container
    DgContainer = 0xF002,
    /// Shape Group Container
    SpgrContainer = 0xF003,
    /// Shape Container
    SpContainer = 0xF004,
    /// Solver Container
    SolverContainer = 0xF005,

    // Atom records
    /// File Drawing Group atom
    Dgg = 0xF006,
    /// Blip Store Entry
    Bse = 0xF007,
    /// Drawing atom
    Dg = 0xF008,
    /// Shape Group atom
    Spgr = 0xF009,
    /// Shape atom
    Sp = 0xF00A,
    /// Shape Options
    Opt = 0xF00B,
    /// Client Textbox (host records)
    ClientTextbox = 0xF00D,
    /// Child Anchor
    ChildAnchor = 0xF00F,
    /// Client Anchor
    ClientAnchor = 0xF010,
    /// Client Data
    ClientData = 0xF011,
    /// Connector Rule
    ConnectorRule = 0xF012,
    /// Align Rule
    AlignRule = 0xF013,
    /// Arc Rule
    ArcRule = 0xF014,
    /// Client Rule
    ClientRule = 0xF015,
    /// Callout Rule
    CalloutRule = 0xF017,

    // Blip records
    /// EMF Blip
    BlipEmf = 0xF01A,
    /// WMF Blip
    BlipWmf = 0xF01B,
    /// PICT Blip
    BlipPict = 0xF01C,
    /// JPEG Blip
    BlipJpeg = 0xF01D,
    /// PNG Blip
    BlipPng = 0xF01E,
    /// DIB Blip
    BlipDib = 0xF01F,
    /// TIFF Blip
    BlipTiff = 0xF029,

    /// Color MRU
    ColorMru = 0xF11A,
    /// Split Menu Colors
    SplitMenuColors = 0xF11E,
    /// Secondary Opt
    SecondaryOpt = 0xF121,
    /// Tertiary Opt
    TertiaryOpt = 0xF122,
}

impl EscherRecordType {
    /// Check if this id is one of the fixed container ids.
    #[inline]
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            Self::DggContainer
                | Self::BStoreContainer
                | Self::DgContainer
                | Self::SpgrContainer
                | Self::SpContainer
                | Self::SolverContainer
        )
    }

    /// Human-readable record name used by the tree dump.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::DggContainer => "DggContainer",
            Self::BStoreContainer => "BStoreContainer",
            Self::DgContainer => "DgContainer",
            Self::SpgrContainer => "SpgrContainer",
            Self::SpContainer => "SpContainer",
            Self::SolverContainer => "SolverContainer",
            Self::Dgg => "Dgg",
            Self::Bse => "BSE",
            Self::Dg => "Dg",
            Self::Spgr => "Spgr",
            Self::Sp => "Sp",
            Self::Opt => "Opt",
            Self::ClientTextbox => "ClientTextbox",
            Self::ChildAnchor => "ChildAnchor",
            Self::ClientAnchor => "ClientAnchor",
            Self::ClientData => "ClientData",
            Self::ConnectorRule => "ConnectorRule",
            Self::AlignRule => "AlignRule",
            Self::ArcRule => "ArcRule",
            Self::ClientRule => "ClientRule",
            Self::CalloutRule => "CalloutRule",
            Self::BlipEmf => "BlipEmf",
            Self::BlipWmf => "BlipWmf",
            Self::BlipPict => "BlipPict",
            Self::BlipJpeg => "BlipJpeg",
            Self::BlipPng => "BlipPng",
            Self::BlipDib => "BlipDib",
            Self::BlipTiff => "BlipTiff",
            Self::ColorMru => "ColorMRU",
            Self::SplitMenuColors => "SplitMenuColors",
            Self::SecondaryOpt => "SecondaryOpt",
            Self::TertiaryOpt => "TertiaryOpt",
        }
    }
}

impl From<u16> for EscherRecordType {
    fn from(value: u16) -> Self {
        match value {
            0xF000 => Self::DggContainer,
            0xF001 => Self::BStoreContainer,
            0xF002 => Self::DgContainer,
            0xF003 => Self::SpgrContainer,
            0xF004 => Self::SpContainer,
            0xF005 => Self::SolverContainer,
            0xF006 => Self::Dgg,
            0xF007 => Self::Bse,
            0xF008 => Self::Dg,
            0xF009 => Self::Spgr,
            0xF00A => Self::Sp,
            0xF00B => Self::Opt,
            0xF00D => Self::ClientTextbox,
            0xF00F => Self::ChildAnchor,
            0xF010 => Self::ClientAnchor,
            0xF011 => Self::ClientData,
            0xF012 => Self::ConnectorRule,
            0xF013 => Self::AlignRule,
            0xF014 => Self::ArcRule,
            0xF015 => Self::ClientRule,
            0xF017 => Self::CalloutRule,
            0xF01A => Self::BlipEmf,
            0xF01B => Self::BlipWmf,
            0xF01C => Self::BlipPict,
            0xF01D => Self::BlipJpeg,
            0xF01E => Self::BlipPng,
            0xF01F => Self::BlipDib,
            0xF029 => Self::BlipTiff,
            0xF11A => Self::ColorMru,
            0xF11E => Self::SplitMenuColors,
            0xF121 => Self::SecondaryOpt,
            0xF122 => Self::TertiaryOpt,
            _ => Self::Unknown,
        }
    }
}

impl From<EscherRecordType> for u16 {
    fn from(record_type: EscherRecordType) -> Self {
        record_type as u16
    }
}

/// True for ids in the reserved picture (blip) range.
#[inline]
pub const fn is_blip_id(record_id: u16) -> bool {
    record_id >= record_id::BLIP_START && record_id <= record_id::BLIP_END
}

/// Display name for any record id, including ones without a named variant.
pub fn record_name(record_id: u16) -> &'static str {
    match EscherRecordType::from(record_id) {
        EscherRecordType::Unknown if is_blip_id(record_id) => "Blip",
        other => other.name(),
    }
}
