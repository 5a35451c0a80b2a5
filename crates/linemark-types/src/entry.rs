/// Change classification of a version entry relative to a compared version.
///
/// The external API encodes these as single letters (`""`, `M`, `A`, `D`, `R`,
/// `C`), which is also how they serialize.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum VersionEntryStatus {
    #[default]
    Unchanged,
    Modified,
    Added,
    Deleted,
    Renamed,
    Copied,
}

impl VersionEntryStatus {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Unchanged => "",
            Self::Modified => "M",
            Self::Added => "A",
            Self::Deleted => "D",
            Self::Renamed => "R",
            Self::Copied => "C",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "" => Some(Self::Unchanged),
            "M" => Some(Self::Modified),
            "A" => Some(Self::Added),
            "D" => Some(Self::Deleted),
            "R" => Some(Self::Renamed),
            "C" => Some(Self::Copied),
            _ => None,
        }
    }

    pub const fn is_changed(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

impl std::fmt::Display for VersionEntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for VersionEntryStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for VersionEntryStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Self::from_code(&code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown entry status: {code:?}")))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum VersionEntryType {
    Image,
    Directory,
    Text,
    Binary,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum VersionChannel {
    Listed,
    Unlisted,
}
