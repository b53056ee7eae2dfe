use crate::serde::Marker;

/// A set of markers, one bit per possible marker byte.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
pub struct MarkerSet {
    lo: u128,
    hi: u128,
}

impl MarkerSet {
    pub const EMPTY: MarkerSet = MarkerSet { lo: 0, hi: 0 };

    pub const fn with(self, marker: Marker) -> Self {
        let byte = marker as u8;
        if byte < 128 {
            Self {
                lo: self.lo | (1u128 << byte),
                hi: self.hi,
            }
        } else {
            Self {
                lo: self.lo,
                hi: self.hi | (1u128 << (byte - 128)),
            }
        }
    }

    pub fn insert(&mut self, marker: Marker) {
        *self = self.with(marker);
    }

    pub const fn contains(&self, marker: Marker) -> bool {
        let byte = marker as u8;
        if byte < 128 {
            self.lo & (1u128 << byte) != 0
        } else {
            self.hi & (1u128 << (byte - 128)) != 0
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.lo == 0 && self.hi == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Marker> + '_ {
        Marker::ALL
            .into_iter()
            .filter(move |marker| self.contains(*marker))
    }
}

impl FromIterator<Marker> for MarkerSet {
    fn from_iter<I: IntoIterator<Item = Marker>>(iter: I) -> Self {
        let mut set = MarkerSet::EMPTY;
        for marker in iter {
            set.insert(marker);
        }
        set
    }
}

/// Selects which records a decoder materializes. Records of other markers are skipped by byte count.
///
/// Masks do not apply to encoding.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
pub enum Mask {
    /// Decode every record.
    #[default]
    All,
    /// Skip every payload. Only markers and positions are reported.
    None,
    /// Decode the records of these markers only.
    Only(MarkerSet),
}

pub const MASK_ALL: Mask = Mask::All;
pub const MASK_NONE: Mask = Mask::None;
pub const MASK_NUMERIC: Mask = Mask::Only(
    MarkerSet::EMPTY
        .with(Marker::Int)
        .with(Marker::Long)
        .with(Marker::Double),
);

impl Mask {
    pub fn only<I: IntoIterator<Item = Marker>>(markers: I) -> Self {
        Mask::Only(markers.into_iter().collect())
    }

    pub fn matches(&self, marker: Marker) -> bool {
        match self {
            Mask::All => true,
            Mask::None => false,
            Mask::Only(set) => set.contains(marker),
        }
    }
}
