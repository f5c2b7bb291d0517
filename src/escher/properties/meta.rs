//! Static property metadata: display name and payload kind per property number.
//!
//! The kind decides which property variant a decoded entry becomes. Numbers
//! missing from the table decode as plain simple or complex properties.

use phf::phf_map;

/// Payload shape of a property number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// No special interpretation
    Unknown,
    /// Packed group of boolean flags
    Bool,
    /// Color value
    Rgb,
    /// Shape path type
    ShapePath,
    /// Variable-length array with a 6-byte element header
    Array,
}

/// Property number and its metadata.
#[derive(Debug, Clone, Copy)]
pub struct PropertyMeta {
    pub name: &'static str,
    pub kind: PropertyKind,
}

const fn meta(name: &'static str, kind: PropertyKind) -> PropertyMeta {
    PropertyMeta { name, kind }
}

use PropertyKind::{Array, Bool, Rgb, ShapePath, Unknown};

static PROPERTY_META: phf::Map<u16, PropertyMeta> = phf_map! {
    0x0004u16 => meta("transform.rotation", Unknown),
    0x007Fu16 => meta("protection.lockagainstgrouping", Bool),
    0x0080u16 => meta("text.textid", Unknown),
    0x0081u16 => meta("text.textleft", Unknown),
    0x0082u16 => meta("text.texttop", Unknown),
    0x0083u16 => meta("text.textright", Unknown),
    0x0084u16 => meta("text.textbottom", Unknown),
    0x0085u16 => meta("text.wraptext", Unknown),
    0x0087u16 => meta("text.anchortext", Unknown),
    0x0088u16 => meta("text.textflow", Unknown),
    0x008Au16 => meta("text.idofnextshape", Unknown),
    0x00BFu16 => meta("text.sizetexttofitshape", Bool),
    0x00C0u16 => meta("geotext.unicode", Unknown),
    0x00C5u16 => meta("geotext.fontfamilyname", Unknown),
    0x00FFu16 => meta("geotext.strikethrough", Bool),
    0x0100u16 => meta("blip.cropfromtop", Unknown),
    0x0101u16 => meta("blip.cropfrombottom", Unknown),
    0x0102u16 => meta("blip.cropfromleft", Unknown),
    0x0103u16 => meta("blip.cropfromright", Unknown),
    0x0104u16 => meta("blip.bliptodisplay", Unknown),
    0x0105u16 => meta("blip.blipfilename", Unknown),
    0x0106u16 => meta("blip.blipflags", Unknown),
    0x0107u16 => meta("blip.transparentcolor", Rgb),
    0x0108u16 => meta("blip.contrastsetting", Unknown),
    0x0109u16 => meta("blip.brightnesssetting", Unknown),
    0x013Fu16 => meta("blip.pictureactive", Bool),
    0x0140u16 => meta("geometry.left", Unknown),
    0x0141u16 => meta("geometry.top", Unknown),
    0x0142u16 => meta("geometry.right", Unknown),
    0x0143u16 => meta("geometry.bottom", Unknown),
    0x0144u16 => meta("geometry.shapepath", ShapePath),
    0x0145u16 => meta("geometry.vertices", Array),
    0x0146u16 => meta("geometry.segmentinfo", Array),
    0x0147u16 => meta("geometry.adjustvalue", Unknown),
    0x0148u16 => meta("geometry.adjust2value", Unknown),
    0x0151u16 => meta("geometry.connectionsites", Array),
    0x0152u16 => meta("geometry.connectionsitesdir", Array),
    0x0155u16 => meta("geometry.adjusthandles", Array),
    0x0156u16 => meta("geometry.guides", Array),
    0x0157u16 => meta("geometry.inscribe", Array),
    0x017Fu16 => meta("geometry.fillok", Bool),
    0x0180u16 => meta("fill.filltype", Unknown),
    0x0181u16 => meta("fill.fillcolor", Rgb),
    0x0182u16 => meta("fill.fillopacity", Unknown),
    0x0183u16 => meta("fill.fillbackcolor", Rgb),
    0x0184u16 => meta("fill.backopacity", Unknown),
    0x0185u16 => meta("fill.crmod", Rgb),
    0x0186u16 => meta("fill.patterntexture", Unknown),
    0x0187u16 => meta("fill.blipfilename", Unknown),
    0x018Bu16 => meta("fill.angle", Unknown),
    0x018Cu16 => meta("fill.focus", Unknown),
    0x0197u16 => meta("fill.shadecolors", Array),
    0x01BFu16 => meta("fill.nofillhittest", Bool),
    0x01C0u16 => meta("linestyle.color", Rgb),
    0x01C1u16 => meta("linestyle.opacity", Unknown),
    0x01C2u16 => meta("linestyle.backcolor", Rgb),
    0x01C3u16 => meta("linestyle.crmod", Rgb),
    0x01C4u16 => meta("linestyle.linetype", Unknown),
    0x01CBu16 => meta("linestyle.linewidth", Unknown),
    0x01CDu16 => meta("linestyle.linestyle", Unknown),
    0x01CEu16 => meta("linestyle.linedashing", Unknown),
    0x01CFu16 => meta("linestyle.linedashstyle", Array),
    0x01D0u16 => meta("linestyle.linestartarrowhead", Unknown),
    0x01D1u16 => meta("linestyle.lineendarrowhead", Unknown),
    0x01FFu16 => meta("linestyle.nolinedrawdash", Bool),
    0x0200u16 => meta("shadowstyle.type", Unknown),
    0x0201u16 => meta("shadowstyle.color", Rgb),
    0x0202u16 => meta("shadowstyle.highlight", Rgb),
    0x0203u16 => meta("shadowstyle.crmod", Rgb),
    0x0204u16 => meta("shadowstyle.opacity", Unknown),
    0x0205u16 => meta("shadowstyle.offsetx", Unknown),
    0x0206u16 => meta("shadowstyle.offsety", Unknown),
    0x023Fu16 => meta("shadowstyle.shadowobsured", Bool),
    0x027Fu16 => meta("perspective.perspectiveon", Bool),
    0x0287u16 => meta("3d.extrusioncolor", Rgb),
    0x0288u16 => meta("3d.crmod", Rgb),
    0x02BFu16 => meta("3d.lightface", Bool),
    0x02FFu16 => meta("3dstyle.flatfillconvert", Bool),
    0x0301u16 => meta("shape.master", Unknown),
    0x0303u16 => meta("shape.connectorstyle", Unknown),
    0x0304u16 => meta("shape.blackandwhitesettings", Unknown),
    0x033Fu16 => meta("shape.backgroundshape", Bool),
    0x037Fu16 => meta("callout.lengthspecified", Bool),
    0x0380u16 => meta("groupshape.shapename", Unknown),
    0x0381u16 => meta("groupshape.description", Unknown),
    0x0382u16 => meta("groupshape.hyperlink", Unknown),
    0x0383u16 => meta("groupshape.wrappolygonvertices", Array),
    0x0384u16 => meta("groupshape.wrapdistleft", Unknown),
    0x0385u16 => meta("groupshape.wrapdisttop", Unknown),
    0x0386u16 => meta("groupshape.wrapdistright", Unknown),
    0x0387u16 => meta("groupshape.wrapdistbottom", Unknown),
    0x038Fu16 => meta("groupshape.posh", Unknown),
    0x03BFu16 => meta("groupshape.print", Bool),
};

/// Look up the metadata for a property number (flag bits already stripped).
#[inline]
pub fn lookup(property_number: u16) -> Option<&'static PropertyMeta> {
    PROPERTY_META.get(&property_number)
}

/// Payload kind of a property number; `Unknown` when unregistered.
#[inline]
pub fn property_kind(property_number: u16) -> PropertyKind {
    lookup(property_number).map_or(PropertyKind::Unknown, |m| m.kind)
}

/// Display name of a property number.
#[inline]
pub fn property_name(property_number: u16) -> &'static str {
    lookup(property_number).map_or("unknown", |m| m.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(property_kind(0x0145), PropertyKind::Array);
        assert_eq!(property_kind(0x0181), PropertyKind::Rgb);
        assert_eq!(property_kind(0x0144), PropertyKind::ShapePath);
        assert_eq!(property_kind(0x03BF), PropertyKind::Bool);
        assert_eq!(property_kind(0x0004), PropertyKind::Unknown);
        assert_eq!(property_kind(0x3FFE), PropertyKind::Unknown);
        assert_eq!(property_name(0x0004), "transform.rotation");
    }
}
